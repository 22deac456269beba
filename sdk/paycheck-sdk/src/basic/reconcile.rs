use crate::basic::session::Session;
use crate::core::connection::LedgerConnection;
use crate::error::{DispatchError, Result};
use crate::types::Balance;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

/// Fetch the authoritative balance of `owner` and publish it to the session.
///
/// Sole writer of the session balance. Safe to call repeatedly; with no
/// balance change on the network every call yields the same value.
pub async fn reconcile(
    connection: &impl LedgerConnection,
    session: &Session,
    owner: &Pubkey,
) -> Result<Balance> {
    let lamports = connection
        .get_balance(owner)
        .await
        .map_err(|e| DispatchError::Connection(format!("failed to fetch balance: {}", e)))?;
    let balance = Balance::from_lamports(lamports);

    if session.publish_balance(owner, balance) {
        debug!(%owner, %balance, "balance reconciled");
    } else {
        debug!(%owner, "account no longer active; balance not published");
    }
    Ok(balance)
}
