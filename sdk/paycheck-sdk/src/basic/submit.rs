use crate::basic::builder::InstructionSet;
use crate::basic::session::Account;
use crate::core::connection::{ConfirmationStatus, LedgerConnection};
use crate::error::{DispatchError, Result};
use crate::types::DispatchStage;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lifecycle of a single submission.
///
/// `Idle → Signing → Submitted → Confirming → {Confirmed, Failed, TimedOut}`;
/// a failure while signing or submitting jumps straight to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Signing,
    Submitted,
    Confirming,
    Confirmed,
    Failed,
    TimedOut,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Confirmed | SubmissionState::Failed | SubmissionState::TimedOut
        )
    }
}

/// Signature of the confirmed transaction, or the classified failure
pub type SubmissionResult = Result<Signature>;

/// Signs, sends and confirms exactly one transaction. Never retries.
pub struct Submitter<'a, C: LedgerConnection> {
    connection: &'a C,
    confirm_timeout: Duration,
    poll_interval: Duration,
    state: SubmissionState,
    stage: DispatchStage,
}

impl<'a, C: LedgerConnection> Submitter<'a, C> {
    pub fn new(connection: &'a C, confirm_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            connection,
            confirm_timeout,
            poll_interval,
            state: SubmissionState::Idle,
            stage: DispatchStage::Signing,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Stage the submission was in when it last made progress; failures are attributed here.
    pub fn stage(&self) -> DispatchStage {
        self.stage
    }

    pub async fn submit(&mut self, set: InstructionSet, account: &Account) -> SubmissionResult {
        if self.state != SubmissionState::Idle {
            return Err(DispatchError::SubmissionRejected(format!(
                "submitter already used (state {:?})",
                self.state
            )));
        }

        self.transition(SubmissionState::Signing, DispatchStage::Signing);
        let tx = match self.sign(set, account).await {
            Ok(tx) => tx,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(SubmissionState::Submitted, DispatchStage::Submission);
        let signature = match self.connection.send_transaction(&tx).await {
            Ok(signature) => signature,
            Err(e) => return Err(self.fail(DispatchError::SubmissionRejected(e.to_string()))),
        };
        info!(%signature, "transaction submitted");

        self.transition(SubmissionState::Confirming, DispatchStage::Confirmation);
        let status = self
            .connection
            .confirm_transaction(&signature, self.confirm_timeout, self.poll_interval)
            .await;

        match status {
            ConfirmationStatus::Confirmed => {
                self.transition(SubmissionState::Confirmed, DispatchStage::Confirmation);
                info!(%signature, "transaction confirmed");
                Ok(signature)
            },
            ConfirmationStatus::Failed(reason) => {
                Err(self.fail(DispatchError::NetworkFailed { signature, reason }))
            },
            ConfirmationStatus::TimedOut => {
                self.transition(SubmissionState::TimedOut, DispatchStage::Confirmation);
                warn!(
                    %signature,
                    waited = ?self.confirm_timeout,
                    "confirmation timed out; transaction may still land"
                );
                Err(DispatchError::TimedOut {
                    signature,
                    waited: self.confirm_timeout,
                })
            },
        }
    }

    async fn sign(&self, set: InstructionSet, account: &Account) -> Result<Transaction> {
        if set.is_empty() {
            return Err(DispatchError::Signing("instruction set is empty".into()));
        }

        let blockhash = self.connection.get_latest_blockhash().await.map_err(|e| {
            DispatchError::Connection(format!("failed to fetch recent blockhash: {}", e))
        })?;

        let (instructions, ephemeral_signers) = set.into_parts();
        let payer = account.address();
        let message = Message::new_with_blockhash(&instructions, Some(&payer), &blockhash);
        let mut tx = Transaction::new_unsigned(message);
        let message_data = tx.message_data();

        let signature = account
            .sign(&message_data)
            .await
            .map_err(DispatchError::Signing)?;
        place_signature(&mut tx, &payer, signature)?;

        for keypair in &ephemeral_signers {
            let signature = keypair
                .try_sign_message(&message_data)
                .map_err(|e| DispatchError::Signing(e.to_string()))?;
            place_signature(&mut tx, &keypair.pubkey(), signature)?;
        }

        if tx.signatures.iter().any(|s| *s == Signature::default()) {
            return Err(DispatchError::Signing(
                "transaction requires a signer the session does not hold".into(),
            ));
        }

        debug!(%blockhash, instructions = instructions.len(), "transaction signed");
        Ok(tx)
    }

    fn transition(&mut self, next: SubmissionState, stage: DispatchStage) {
        debug!(from = ?self.state, to = ?next, "submission state");
        self.state = next;
        self.stage = stage;
    }

    fn fail(&mut self, error: DispatchError) -> DispatchError {
        debug!(from = ?self.state, stage = %self.stage, "submission failed: {}", error);
        self.state = SubmissionState::Failed;
        error
    }
}

fn place_signature(tx: &mut Transaction, signer: &Pubkey, signature: Signature) -> Result<()> {
    let required = tx.message.header.num_required_signatures as usize;
    let position = tx.message.account_keys[..required]
        .iter()
        .position(|key| key == signer)
        .ok_or_else(|| {
            DispatchError::Signing(format!("{} is not a required signer", signer))
        })?;
    tx.signatures[position] = signature;
    Ok(())
}
