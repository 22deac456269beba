use crate::config::Cluster;
use crate::core::constants::LAMPORTS_PER_SOL;
use crate::error::DispatchError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::fmt;

/// Draft transfer as entered in the send form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address, unvalidated
    pub recipient: String,

    /// Either a lamport amount or a token mint address
    pub amount_or_mint: String,

    /// Set once the holder has acknowledged the draft for signing. Advisory
    /// only: it is for the caller's UI, and dispatch neither reads nor requires it.
    pub signed: bool,
}

impl TransferRequest {
    pub fn new(recipient: impl Into<String>, amount_or_mint: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            amount_or_mint: amount_or_mint.into(),
            signed: false,
        }
    }

    /// Record the holder's acknowledgement. Does not change how the request dispatches.
    pub fn mark_signed(mut self) -> Self {
        self.signed = true;
        self
    }
}

/// Classified transfer, created fresh for every dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferIntent {
    /// Native SOL transfer. The recipient is validated by the instruction builder.
    NativeTransfer { recipient: String, lamports: u64 },

    /// Single-unit token transfer of `mint`
    TokenTransfer { recipient: String, mint: Pubkey },
}

impl TransferIntent {
    pub fn recipient(&self) -> &str {
        match self {
            TransferIntent::NativeTransfer { recipient, .. }
            | TransferIntent::TokenTransfer { recipient, .. } => recipient,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TransferIntent::NativeTransfer { .. })
    }
}

/// Spendable native balance in lamports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(u64);

impl Balance {
    pub const fn from_lamports(lamports: u64) -> Self {
        Self(lamports)
    }

    pub const fn from_sol(sol: u64) -> Self {
        Self(sol.saturating_mul(LAMPORTS_PER_SOL))
    }

    pub const fn lamports(&self) -> u64 {
        self.0
    }

    pub fn as_sol(&self) -> f64 {
        self.0 as f64 / LAMPORTS_PER_SOL as f64
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SOL", crate::utils::format_sol(self.0))
    }
}

/// Stage of the dispatch cycle an outcome is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchStage {
    Session,
    Validation,
    Classification,
    Building,
    Signing,
    Submission,
    Confirmation,
    Reconciliation,
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchStage::Session => "session",
            DispatchStage::Validation => "validation",
            DispatchStage::Classification => "classification",
            DispatchStage::Building => "building",
            DispatchStage::Signing => "signing",
            DispatchStage::Submission => "submission",
            DispatchStage::Confirmation => "confirmation",
            DispatchStage::Reconciliation => "reconciliation",
        };
        f.write_str(name)
    }
}

/// A failed dispatch, tagged with the stage that failed
#[derive(Debug)]
pub struct DispatchFailure {
    pub stage: DispatchStage,
    pub error: DispatchError,
}

impl fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.error)
    }
}

/// Terminal result of one dispatch call
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Confirmed at the configured commitment
    Success(Signature),

    /// Submitted but not confirmed in time. Funds may or may not have moved;
    /// the caller decides whether to check again or resubmit.
    TimedOut(Signature),

    Failure(DispatchFailure),
}

impl DispatchOutcome {
    pub(crate) fn failed(stage: DispatchStage, error: DispatchError) -> Self {
        DispatchOutcome::Failure(DispatchFailure { stage, error })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, DispatchOutcome::TimedOut(_))
    }

    /// Signature of the submitted transaction, if submission happened
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            DispatchOutcome::Success(signature) | DispatchOutcome::TimedOut(signature) => {
                Some(signature)
            },
            DispatchOutcome::Failure(failure) => failure.error.signature(),
        }
    }

    pub fn stage(&self) -> Option<DispatchStage> {
        match self {
            DispatchOutcome::Failure(failure) => Some(failure.stage),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DispatchError> {
        match self {
            DispatchOutcome::Failure(failure) => Some(&failure.error),
            _ => None,
        }
    }

    /// Human-readable summary for display
    pub fn reason(&self) -> String {
        match self {
            DispatchOutcome::Success(_) => "Transaction confirmed".to_string(),
            DispatchOutcome::TimedOut(signature) => format!(
                "Transaction {} was submitted but not confirmed in time; check the explorer before retrying",
                signature
            ),
            DispatchOutcome::Failure(failure) => failure.to_string(),
        }
    }

    pub fn explorer_url(&self, cluster: Cluster) -> Option<String> {
        self.signature()
            .map(|signature| cluster.explorer_url(signature))
    }
}

/// Result of a flow that creates a new on-chain account (mint, multisig)
#[derive(Debug)]
pub struct CreatedAccount {
    pub address: Pubkey,
    pub outcome: DispatchOutcome,
}
