use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;

/// Abstraction for the key holder behind a session account.
/// This allows the SDK to work with:
/// 1. Local Keypairs (Backend/CLI)
/// 2. Wallet Adapters (Frontend - the adapter signs the serialized message)
#[async_trait]
pub trait SessionSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Sign a serialized transaction message.
    /// Returns Err if the capability is no longer available (e.g. the session expired).
    async fn sign_message(&self, message: &[u8]) -> Result<Signature, String>;
}

/// Signer backed by an in-process keypair.
pub struct KeypairSigner {
    keypair: Keypair,
}

impl KeypairSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl SessionSigner for KeypairSigner {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Signature, String> {
        self.keypair
            .try_sign_message(message)
            .map_err(|e| e.to_string())
    }
}
