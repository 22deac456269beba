use crate::config::Cluster;
use crate::core::signer::{KeypairSigner, SessionSigner};
use crate::types::Balance;
use parking_lot::RwLock;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// An authenticated key holder.
///
/// The signing capability is private to the crate; callers only see the address.
pub struct Account {
    address: Pubkey,
    signer: Arc<dyn SessionSigner>,
}

impl Account {
    pub fn new(signer: Arc<dyn SessionSigner>) -> Self {
        Self {
            address: signer.pubkey(),
            signer,
        }
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self::new(Arc::new(KeypairSigner::new(keypair)))
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub(crate) async fn sign(&self, message: &[u8]) -> Result<Signature, String> {
        self.signer.sign_message(message).await
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Process-wide session context shared by every entry point.
///
/// Anyone may read the account and the cached balance. The balance is only
/// written by the reconciler. At most one dispatch runs per session, whichever
/// dispatcher started it.
#[derive(Debug)]
pub struct Session {
    cluster: Cluster,
    account: RwLock<Option<Arc<Account>>>,
    balance: RwLock<Option<Balance>>,
    in_flight: Mutex<()>,
}

impl Session {
    pub fn new(cluster: Cluster) -> Self {
        Self {
            cluster,
            account: RwLock::new(None),
            balance: RwLock::new(None),
            in_flight: Mutex::new(()),
        }
    }

    pub fn cluster(&self) -> Cluster {
        self.cluster
    }

    /// Replace the active account. The cached balance belonged to the
    /// previous holder and is discarded.
    pub fn connect(&self, account: Account) {
        *self.account.write() = Some(Arc::new(account));
        *self.balance.write() = None;
    }

    /// Drop the active account and its cached balance.
    pub fn disconnect(&self) {
        *self.account.write() = None;
        *self.balance.write() = None;
    }

    pub fn account(&self) -> Option<Arc<Account>> {
        self.account.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.read().is_some()
    }

    /// Last reconciled balance, possibly stale. `None` until the first reconciliation.
    pub fn cached_balance(&self) -> Option<Balance> {
        *self.balance.read()
    }

    pub fn is_dispatching(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Claim the session's single dispatch slot. `None` while another
    /// dispatch holds it; the slot is freed when the guard drops.
    pub(crate) fn try_begin_dispatch(&self) -> Option<MutexGuard<'_, ()>> {
        self.in_flight.try_lock().ok()
    }

    /// Store `balance` for `owner`. Ignored when `owner` is no longer the
    /// active account, so a late reconciliation cannot leak into a new session.
    pub(crate) fn publish_balance(&self, owner: &Pubkey, balance: Balance) -> bool {
        let account = self.account.read();
        match account.as_ref() {
            Some(active) if active.address() == *owner => {
                *self.balance.write() = Some(balance);
                true
            },
            _ => false,
        }
    }
}
