#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use paycheck_sdk::{
    Account, Cluster, DispatchConfig, Dispatcher, LedgerConnection, SessionSigner, Session,
    SignatureStatus,
};
use solana_sdk::{
    account::Account as LedgerAccount,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

type BoxError = Box<dyn Error + Send + Sync>;

pub const RENT_EXEMPT_LAMPORTS: u64 = 1_461_600;

/// Outcome scripted for every submitted signature
#[derive(Debug, Clone)]
pub enum Settlement {
    /// Confirmed after `polls` pending answers
    Confirm { polls: usize },
    /// Processed with an error
    Fail(String),
    /// Pending until `release` is called
    Hold,
}

struct MockState {
    balances: HashMap<Pubkey, u64>,
    accounts: HashMap<Pubkey, LedgerAccount>,
    sent: Vec<Transaction>,
    calls: Vec<&'static str>,
    send_error: Option<String>,
    blockhash_error: Option<String>,
    balance_error: Option<String>,
    account_error: Option<String>,
    settlement: Settlement,
    polls: HashMap<Signature, usize>,
    released: bool,
}

/// In-memory ledger standing in for an RPC node.
///
/// Native transfers in confirmed transactions are applied to balances at
/// submission time; held or failing transactions never move funds.
pub struct MockConnection {
    state: Mutex<MockState>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                balances: HashMap::new(),
                accounts: HashMap::new(),
                sent: Vec::new(),
                calls: Vec::new(),
                send_error: None,
                blockhash_error: None,
                balance_error: None,
                account_error: None,
                settlement: Settlement::Confirm { polls: 0 },
                polls: HashMap::new(),
                released: false,
            }),
        }
    }

    pub fn with_balance(self, owner: Pubkey, lamports: u64) -> Self {
        self.state.lock().balances.insert(owner, lamports);
        self
    }

    pub fn with_settlement(self, settlement: Settlement) -> Self {
        self.state.lock().settlement = settlement;
        self
    }

    pub fn set_balance(&self, owner: Pubkey, lamports: u64) {
        self.state.lock().balances.insert(owner, lamports);
    }

    pub fn add_token_account(&self, address: Pubkey) {
        self.add_account(address, spl_token::id());
    }

    pub fn add_account(&self, address: Pubkey, owner: Pubkey) {
        let account = LedgerAccount {
            lamports: RENT_EXEMPT_LAMPORTS,
            data: Vec::new(),
            owner,
            executable: false,
            rent_epoch: 0,
        };
        self.state.lock().accounts.insert(address, account);
    }

    pub fn fail_send(&self, reason: &str) {
        self.state.lock().send_error = Some(reason.to_string());
    }

    pub fn fail_blockhash(&self, reason: &str) {
        self.state.lock().blockhash_error = Some(reason.to_string());
    }

    pub fn fail_balance(&self, reason: &str) {
        self.state.lock().balance_error = Some(reason.to_string());
    }

    pub fn fail_account_lookup(&self, reason: &str) {
        self.state.lock().account_error = Some(reason.to_string());
    }

    /// Let held transactions confirm on their next poll
    pub fn release(&self) {
        self.state.lock().released = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.state.lock().calls.iter().filter(|c| **c == call).count()
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.state.lock().sent.clone()
    }

    pub fn balance_of(&self, owner: &Pubkey) -> u64 {
        self.state.lock().balances.get(owner).copied().unwrap_or(0)
    }

    fn record(&self, call: &'static str) {
        self.state.lock().calls.push(call);
    }
}

/// Decode a system program transfer: u32 LE tag 2 followed by u64 LE lamports
fn native_transfer_amount(tx: &Transaction, index: usize) -> Option<(Pubkey, Pubkey, u64)> {
    let ix = &tx.message.instructions[index];
    let program = tx.message.account_keys[ix.program_id_index as usize];
    if program != solana_system_interface::program::id() || ix.data.len() != 12 {
        return None;
    }
    if ix.data[..4] != 2u32.to_le_bytes() {
        return None;
    }
    let lamports = u64::from_le_bytes(ix.data[4..12].try_into().ok()?);
    let from = tx.message.account_keys[ix.accounts[0] as usize];
    let to = tx.message.account_keys[ix.accounts[1] as usize];
    Some((from, to, lamports))
}

#[async_trait]
impl LedgerConnection for MockConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash, BoxError> {
        self.record("get_latest_blockhash");
        match &self.state.lock().blockhash_error {
            Some(reason) => Err(reason.clone().into()),
            None => Ok(Hash::new_unique()),
        }
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, BoxError> {
        self.record("send_transaction");
        tx.verify()
            .map_err(|e| format!("signature verification failed: {}", e))?;

        let mut state = self.state.lock();
        if let Some(reason) = &state.send_error {
            return Err(reason.clone().into());
        }

        let signature = tx.signatures[0];
        if matches!(state.settlement, Settlement::Confirm { .. }) {
            for index in 0..tx.message.instructions.len() {
                if let Some((from, to, lamports)) = native_transfer_amount(tx, index) {
                    let from_balance = state.balances.entry(from).or_insert(0);
                    *from_balance = from_balance.saturating_sub(lamports);
                    *state.balances.entry(to).or_insert(0) += lamports;
                }
            }
        }
        state.sent.push(tx.clone());
        Ok(signature)
    }

    async fn get_signature_status(&self, signature: &Signature) -> Result<SignatureStatus, BoxError> {
        self.record("get_signature_status");
        let mut state = self.state.lock();
        let released = state.released;
        let settlement = state.settlement.clone();
        let seen = state.polls.entry(*signature).or_insert(0);
        *seen += 1;

        let status = match settlement {
            Settlement::Confirm { polls } if *seen > polls => SignatureStatus::Confirmed,
            Settlement::Confirm { .. } => SignatureStatus::Pending,
            Settlement::Fail(reason) => SignatureStatus::Failed(reason),
            Settlement::Hold if released => SignatureStatus::Confirmed,
            Settlement::Hold => SignatureStatus::Pending,
        };
        Ok(status)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, BoxError> {
        self.record("get_balance");
        let state = self.state.lock();
        match &state.balance_error {
            Some(reason) => Err(reason.clone().into()),
            None => Ok(state.balances.get(pubkey).copied().unwrap_or(0)),
        }
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<LedgerAccount>, BoxError> {
        self.record("get_account");
        let state = self.state.lock();
        match &state.account_error {
            Some(reason) => Err(reason.clone().into()),
            None => Ok(state.accounts.get(pubkey).cloned()),
        }
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        _data_len: usize,
    ) -> Result<u64, BoxError> {
        self.record("get_minimum_balance_for_rent_exemption");
        Ok(RENT_EXEMPT_LAMPORTS)
    }
}

/// Signer whose session has expired
pub struct ExpiredSigner {
    pub pubkey: Pubkey,
}

#[async_trait]
impl SessionSigner for ExpiredSigner {
    fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Signature, String> {
        Err("wallet session expired".to_string())
    }
}

pub fn fast_config() -> DispatchConfig {
    DispatchConfig::for_cluster(Cluster::Devnet)
        .with_timings(Duration::from_millis(300), Duration::from_millis(10))
}

pub struct TestContext {
    pub dispatcher: Arc<Dispatcher<MockConnection>>,
    pub session: Arc<Session>,
    pub owner: Pubkey,
}

impl TestContext {
    pub fn connection(&self) -> &MockConnection {
        self.dispatcher.connection()
    }
}

/// Session with a connected keypair account and no cached balance yet
pub fn setup_test_context(connection: MockConnection, config: DispatchConfig) -> TestContext {
    let keypair = Keypair::new();
    let session = Arc::new(Session::new(config.cluster));
    let account = Account::from_keypair(keypair);
    let owner = account.address();
    session.connect(account);

    TestContext {
        dispatcher: Arc::new(Dispatcher::new(connection, session.clone(), config)),
        session,
        owner,
    }
}

/// Like [`setup_test_context`] with `lamports` on-chain and reconciled into the session
pub async fn funded_context(lamports: u64) -> anyhow::Result<TestContext> {
    let ctx = setup_test_context(MockConnection::new(), fast_config());
    ctx.connection().set_balance(ctx.owner, lamports);
    ctx.dispatcher.refresh_balance().await?;
    Ok(ctx)
}
