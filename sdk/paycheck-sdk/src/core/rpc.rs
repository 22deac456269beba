use crate::config::DispatchConfig;
use crate::core::connection::{ConnectionError, LedgerConnection, SignatureStatus};
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

/// [`LedgerConnection`] over a JSON-RPC endpoint.
pub struct RpcConnection {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcConnection {
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(url.into(), commitment),
            commitment,
        }
    }

    pub fn from_config(config: &DispatchConfig) -> Self {
        Self::new(config.rpc_url(), config.commitment.into())
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl LedgerConnection for RpcConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash, ConnectionError> {
        Ok(self.client.get_latest_blockhash().await?)
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, ConnectionError> {
        Ok(self.client.send_transaction(tx).await?)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<SignatureStatus, ConnectionError> {
        let response = self.client.get_signature_statuses(&[*signature]).await?;

        let status = match response.value.into_iter().next().flatten() {
            None => SignatureStatus::Pending,
            Some(status) => match status.err {
                Some(err) => SignatureStatus::Failed(err.to_string()),
                None if status.satisfies_commitment(self.commitment) => SignatureStatus::Confirmed,
                None => SignatureStatus::Pending,
            },
        };
        Ok(status)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ConnectionError> {
        Ok(self
            .client
            .get_balance_with_commitment(pubkey, self.commitment)
            .await?
            .value)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ConnectionError> {
        Ok(self
            .client
            .get_account_with_commitment(pubkey, self.commitment)
            .await?
            .value)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, ConnectionError> {
        Ok(self
            .client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }
}
