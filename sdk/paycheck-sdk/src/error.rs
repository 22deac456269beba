use solana_sdk::signature::Signature;
use std::time::Duration;
use thiserror::Error;

/// SDK-specific error types for dispatch operations
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Required form field missing or zero
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    /// Amount-or-mint field is neither a lamport amount nor an address
    #[error("Could not classify transfer: {0}")]
    Classification(String),

    /// Recipient is not a well-formed address
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Associated token account lookup or creation could not be prepared
    #[error("Associated token account resolution failed: {0}")]
    AccountResolutionFailed(String),

    /// Signing capability unavailable or refused
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Network refused the transaction before it was processed
    #[error("Submission rejected: {0}")]
    SubmissionRejected(String),

    /// Confirmation status unknown when the wait elapsed. The transfer may still land.
    #[error("Transaction {signature} not confirmed after {waited:?}; it may still land")]
    TimedOut {
        signature: Signature,
        waited: Duration,
    },

    /// Network processed the transaction and reported a failure
    #[error("Transaction {signature} failed on-chain: {reason}")]
    NetworkFailed { signature: Signature, reason: String },

    /// Local pre-check against the cached balance
    #[error("Insufficient balance: requested {requested} lamports, {available} available")]
    InsufficientBalance { requested: u64, available: u64 },

    /// No account connected to the session
    #[error("No authenticated account")]
    Unauthenticated,

    /// Another dispatch holds the in-flight guard
    #[error("A dispatch is already in progress")]
    DispatchInProgress,

    /// Connection or RPC error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Token program instruction construction error
    #[error("Program error: {0}")]
    Program(#[from] solana_sdk::program_error::ProgramError),
}

impl DispatchError {
    /// True when funds may or may not have moved.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, DispatchError::TimedOut { .. })
    }

    /// Signature of the submitted transaction, for errors raised after submission.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            DispatchError::TimedOut { signature, .. }
            | DispatchError::NetworkFailed { signature, .. } => Some(signature),
            _ => None,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors raised while loading a [`crate::config::DispatchConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}
