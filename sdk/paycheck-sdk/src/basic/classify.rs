//! Transfer intent classification.
//!
//! The send form has a single amount field that doubles as a token mint
//! address. This is the only place that field is interpreted.

use crate::error::{DispatchError, Result};
use crate::types::{TransferIntent, TransferRequest};
use crate::utils;

/// Classify a draft into a native or token transfer.
///
/// - All-digit input that fits in a `u64` is a lamport amount.
/// - Anything else must be a well-formed mint address.
///
/// Signs, decimal points and digit strings too large for a `u64` are rejected
/// rather than being reinterpreted as an address.
pub fn classify(request: &TransferRequest) -> Result<TransferIntent> {
    let field = request.amount_or_mint.trim();
    let recipient = request.recipient.trim().to_string();

    if field.is_empty() {
        return Err(DispatchError::Classification(
            "amount or mint is empty".into(),
        ));
    }

    if field.bytes().all(|b| b.is_ascii_digit()) {
        let lamports = field.parse::<u64>().map_err(|_| {
            DispatchError::Classification(format!("amount {} is out of range", field))
        })?;
        return Ok(TransferIntent::NativeTransfer {
            recipient,
            lamports,
        });
    }

    match utils::parse_address(field) {
        Some(mint) => Ok(TransferIntent::TokenTransfer { recipient, mint }),
        None => Err(DispatchError::Classification(format!(
            "{:?} is neither a lamport amount nor a mint address",
            field
        ))),
    }
}
