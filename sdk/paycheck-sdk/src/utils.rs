use crate::core::connection::LedgerConnection;
use crate::core::constants::LAMPORTS_PER_SOL;
use crate::error::{DispatchError, Result};
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use tracing::debug;

//=============================================================================
// Address & Amount Helpers
//=============================================================================

/// Parse a base58 address, ignoring surrounding whitespace
pub fn parse_address(address: &str) -> Option<Pubkey> {
    Pubkey::from_str(address.trim()).ok()
}

/// Render lamports as SOL without trailing zeros, e.g. `1.5`, `2`, `0.000000001`
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:09}", fraction);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Render lamports with thousands separators, e.g. `1,000,000,000`
pub fn format_lamports(lamports: u64) -> String {
    let digits = lamports.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

//=============================================================================
// Associated Token Accounts
//=============================================================================

/// Derive the associated token account of `owner` for `mint`
pub fn derive_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

/// An associated token account as seen at resolution time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedAccount {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    /// False when the account must be created before use
    pub exists: bool,
}

impl AssociatedAccount {
    /// Idempotent creation instruction, only for accounts that do not exist yet
    pub fn creation_instruction(&self, payer: &Pubkey) -> Option<Instruction> {
        if self.exists {
            return None;
        }
        Some(
            spl_associated_token_account::instruction::create_associated_token_account_idempotent(
                payer,
                &self.owner,
                &self.mint,
                &spl_token::id(),
            ),
        )
    }
}

/// Look up the associated token account of `owner` for `mint`.
///
/// A missing account is not an error: it is returned with `exists == false`
/// so the caller can create it in the same transaction. An address held by
/// something other than the token program cannot be used and fails resolution.
pub async fn resolve_associated_account(
    connection: &impl LedgerConnection,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<AssociatedAccount> {
    let address = derive_associated_token_address(owner, mint);

    let account = connection
        .get_account(&address)
        .await
        .map_err(|e| DispatchError::AccountResolutionFailed(format!("{}: {}", address, e)))?;

    let exists = match account {
        Some(account) if account.owner != spl_token::id() => {
            return Err(DispatchError::AccountResolutionFailed(format!(
                "{} is owned by {}, not the token program",
                address, account.owner
            )));
        },
        Some(_) => true,
        None => false,
    };

    debug!(%owner, %mint, %address, exists, "resolved associated token account");

    Ok(AssociatedAccount {
        address,
        owner: *owner,
        mint: *mint,
        exists,
    })
}
