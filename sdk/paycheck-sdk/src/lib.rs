pub mod advanced;
pub mod basic;
pub mod config;
pub mod core;
pub mod error;
pub mod types;
pub mod utils;

pub use crate::basic::builder::{InstructionBuilder, InstructionSet};
pub use crate::basic::classify::classify;
pub use crate::basic::dispatcher::Dispatcher;
pub use crate::basic::reconcile::reconcile;
pub use crate::basic::session::{Account, Session};
pub use crate::basic::submit::{SubmissionResult, SubmissionState, Submitter};
pub use crate::config::{Cluster, Commitment, DispatchConfig};
pub use crate::core::connection::{ConfirmationStatus, LedgerConnection, SignatureStatus};
pub use crate::core::rpc::RpcConnection;
pub use crate::core::signer::{KeypairSigner, SessionSigner};
pub use crate::error::{ConfigError, DispatchError, Result};
pub use crate::types::{
    Balance, CreatedAccount, DispatchFailure, DispatchOutcome, DispatchStage, TransferIntent,
    TransferRequest,
};
pub use crate::utils::{
    derive_associated_token_address, format_lamports, format_sol, parse_address,
    resolve_associated_account, AssociatedAccount,
};
