use crate::basic::actions::{MintNftBuilder, MultisigBuilder};
use crate::basic::builder::{InstructionBuilder, InstructionSet};
use crate::basic::classify::classify;
use crate::basic::reconcile::reconcile;
use crate::basic::session::{Account, Session};
use crate::basic::submit::Submitter;
use crate::config::DispatchConfig;
use crate::core::connection::LedgerConnection;
use crate::error::{DispatchError, Result};
use crate::types::{
    Balance, CreatedAccount, DispatchOutcome, DispatchStage, TransferIntent, TransferRequest,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use tokio::sync::MutexGuard;
use tracing::{info, warn};

/// Entry point for sending value from the session account.
///
/// Runs classify → build → sign/submit/confirm → reconcile for one request
/// at a time per [`Session`]. A call made while another is in flight on the
/// same session, from this or any other dispatcher, is refused with
/// [`DispatchError::DispatchInProgress`] instead of being queued.
pub struct Dispatcher<C: LedgerConnection> {
    connection: C,
    session: Arc<Session>,
    config: DispatchConfig,
}

impl<C: LedgerConnection> Dispatcher<C> {
    pub fn new(connection: C, session: Arc<Session>, config: DispatchConfig) -> Self {
        Self {
            connection,
            session,
            config,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn is_dispatching(&self) -> bool {
        self.session.is_dispatching()
    }

    /// Send native SOL or a single token unit, depending on how the request classifies.
    pub async fn dispatch(&self, request: &TransferRequest) -> DispatchOutcome {
        let (_guard, account) = match self.begin() {
            Ok(started) => started,
            Err(outcome) => return outcome,
        };
        let cached = self.session.cached_balance();
        info!(account = %account.address(), "dispatch started");

        if let Err(e) = validate_form(request) {
            return refuse(DispatchStage::Validation, e);
        }

        let intent = match classify(request) {
            Ok(intent) => intent,
            Err(e) => return refuse(DispatchStage::Classification, e),
        };
        info!(?intent, "transfer classified");

        if let Err(e) = check_intent(&intent, cached) {
            return refuse(DispatchStage::Validation, e);
        }

        let set = match InstructionBuilder::new(&self.connection)
            .build(&intent, &account.address())
            .await
        {
            Ok(set) => set,
            Err(e) => return refuse(DispatchStage::Building, e),
        };

        self.execute(&account, set).await
    }

    /// Mint a new single-supply NFT into the session account.
    pub async fn mint_nft(&self) -> CreatedAccount {
        let builder = MintNftBuilder::new();
        let address = builder.mint_address();

        let outcome = match self.begin() {
            Err(outcome) => outcome,
            Ok((_guard, account)) => {
                info!(account = %account.address(), mint = %address, "minting nft");
                match builder
                    .with_payer(account.address())
                    .build_instructions(&self.connection)
                    .await
                {
                    Ok(set) => self.execute(&account, set).await,
                    Err(e) => refuse(DispatchStage::Building, e),
                }
            },
        };
        CreatedAccount { address, outcome }
    }

    /// Create an M-of-N token multisig paid for by the session account.
    pub async fn create_multisig(&self, signers: &[Pubkey], threshold: u8) -> CreatedAccount {
        let builder = MultisigBuilder::new()
            .with_signers(signers)
            .with_threshold(threshold);
        let address = builder.multisig_address();

        let outcome = match self.begin() {
            Err(outcome) => outcome,
            Ok((_guard, account)) => {
                if let Err(e) = builder.validate() {
                    refuse(DispatchStage::Validation, e)
                } else {
                    info!(account = %account.address(), multisig = %address, threshold, "creating multisig");
                    match builder
                        .with_payer(account.address())
                        .build_instructions(&self.connection)
                        .await
                    {
                        Ok(set) => self.execute(&account, set).await,
                        Err(e) => refuse(DispatchStage::Building, e),
                    }
                }
            },
        };
        CreatedAccount { address, outcome }
    }

    /// Re-read the session account's balance from the network.
    pub async fn refresh_balance(&self) -> Result<Balance> {
        let account = self
            .session
            .account()
            .ok_or(DispatchError::Unauthenticated)?;
        reconcile(&self.connection, &self.session, &account.address()).await
    }

    fn begin(&self) -> std::result::Result<(MutexGuard<'_, ()>, Arc<Account>), DispatchOutcome> {
        let guard = self
            .session
            .try_begin_dispatch()
            .ok_or_else(|| refuse(DispatchStage::Session, DispatchError::DispatchInProgress))?;
        let account = self
            .session
            .account()
            .ok_or_else(|| refuse(DispatchStage::Session, DispatchError::Unauthenticated))?;
        Ok((guard, account))
    }

    /// Submit `set` and reconcile the balance whatever the submission result.
    async fn execute(&self, account: &Account, set: InstructionSet) -> DispatchOutcome {
        let mut submitter = Submitter::new(
            &self.connection,
            self.config.confirm_timeout(),
            self.config.poll_interval(),
        );
        let result = submitter.submit(set, account).await;

        if let Err(e) = reconcile(&self.connection, &self.session, &account.address()).await {
            warn!("balance reconciliation failed: {}", e);
        }

        match result {
            Ok(signature) => {
                info!(%signature, "dispatch succeeded");
                DispatchOutcome::Success(signature)
            },
            Err(DispatchError::TimedOut { signature, .. }) => DispatchOutcome::TimedOut(signature),
            Err(e) => refuse(submitter.stage(), e),
        }
    }
}

fn refuse(stage: DispatchStage, error: DispatchError) -> DispatchOutcome {
    warn!(%stage, "dispatch failed: {}", error);
    DispatchOutcome::failed(stage, error)
}

/// Local form checks that need no classification.
fn validate_form(request: &TransferRequest) -> Result<()> {
    if request.recipient.trim().is_empty() {
        return Err(DispatchError::InvalidForm("recipient is required".into()));
    }
    if request.amount_or_mint.trim().is_empty() {
        return Err(DispatchError::InvalidForm(
            "amount or mint is required".into(),
        ));
    }
    Ok(())
}

/// Best-effort checks against the cached balance snapshot. The network
/// remains the authority on whether funds suffice.
fn check_intent(intent: &TransferIntent, cached: Option<Balance>) -> Result<()> {
    if let TransferIntent::NativeTransfer { lamports, .. } = intent {
        if *lamports == 0 {
            return Err(DispatchError::InvalidForm(
                "amount must be greater than zero".into(),
            ));
        }
        let available = cached.unwrap_or_default().lamports();
        if *lamports > available {
            return Err(DispatchError::InsufficientBalance {
                requested: *lamports,
                available,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(lamports: u64) -> TransferIntent {
        TransferIntent::NativeTransfer {
            recipient: "recipient".into(),
            lamports,
        }
    }

    #[test]
    fn test_validate_form_requires_both_fields() {
        assert!(matches!(
            validate_form(&TransferRequest::new("", "10")),
            Err(DispatchError::InvalidForm(_))
        ));
        assert!(matches!(
            validate_form(&TransferRequest::new("addr", " ")),
            Err(DispatchError::InvalidForm(_))
        ));
        assert!(validate_form(&TransferRequest::new("addr", "10")).is_ok());
    }

    #[test]
    fn test_zero_amount_is_invalid_form() {
        assert!(matches!(
            check_intent(&native(0), Some(Balance::from_sol(1))),
            Err(DispatchError::InvalidForm(_))
        ));
    }

    #[test]
    fn test_amount_above_cached_balance() {
        let err = check_intent(&native(3_000_000_000), Some(Balance::from_sol(2))).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::InsufficientBalance {
                requested: 3_000_000_000,
                available: 2_000_000_000
            }
        ));
    }

    #[test]
    fn test_amount_equal_to_cached_balance_passes() {
        assert!(check_intent(&native(2_000_000_000), Some(Balance::from_sol(2))).is_ok());
    }

    #[test]
    fn test_unknown_balance_counts_as_zero() {
        assert!(matches!(
            check_intent(&native(1), None),
            Err(DispatchError::InsufficientBalance { available: 0, .. })
        ));
    }

    #[test]
    fn test_token_transfer_ignores_balance() {
        let intent = TransferIntent::TokenTransfer {
            recipient: "recipient".into(),
            mint: Pubkey::new_unique(),
        };
        assert!(check_intent(&intent, None).is_ok());
    }
}
