use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::error::Error;
use crate::core::constants::MIN_POLL_INTERVAL;
use std::time::Duration;
use tracing::debug;

pub type ConnectionError = Box<dyn Error + Send + Sync>;

/// Point-in-time status of a submitted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Unknown to the network or below the requested commitment
    Pending,
    Confirmed,
    /// Processed with an error, e.g. insufficient funds
    Failed(String),
}

/// Terminal result of waiting on a signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Confirmed,
    Failed(String),
    /// The wait elapsed before a terminal status was observed
    TimedOut,
}

/// Network collaborator used by the dispatch engine.
///
/// Consensus, the RPC wire format and signature verification all live
/// behind this trait. Implemented over `solana-client` by
/// [`crate::core::rpc::RpcConnection`].
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<Hash, ConnectionError>;

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, ConnectionError>;

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<SignatureStatus, ConnectionError>;

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ConnectionError>;

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ConnectionError>;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, ConnectionError>;

    /// Poll `signature` until it reaches a terminal status or `timeout` elapses.
    ///
    /// Status query errors are treated as "still unknown" and polling continues;
    /// if they persist the result is [`ConfirmationStatus::TimedOut`].
    /// `poll_interval` is raised to [`MIN_POLL_INTERVAL`] if shorter.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        timeout: Duration,
        poll_interval: Duration,
    ) -> ConfirmationStatus {
        let poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        let poll = async {
            loop {
                match self.get_signature_status(signature).await {
                    Ok(SignatureStatus::Confirmed) => return ConfirmationStatus::Confirmed,
                    Ok(SignatureStatus::Failed(reason)) => {
                        return ConfirmationStatus::Failed(reason)
                    },
                    Ok(SignatureStatus::Pending) => {},
                    Err(e) => debug!(%signature, "signature status query failed: {}", e),
                }
                tokio::time::sleep(poll_interval).await;
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .unwrap_or(ConfirmationStatus::TimedOut)
    }
}
