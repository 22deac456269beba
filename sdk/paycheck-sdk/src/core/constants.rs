use std::time::Duration;

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Token quantity moved by a token transfer (whole NFT)
pub const NFT_TRANSFER_AMOUNT: u64 = 1;

/// Decimals of a freshly minted NFT
pub const NFT_DECIMALS: u8 = 0;

/// Upper bound on multisig signers accepted by the token program
pub const MAX_MULTISIG_SIGNERS: usize = spl_token::instruction::MAX_SIGNERS;

pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Floor applied to any poll interval, including ones that skipped validation
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub const EXPLORER_BASE_URL: &str = "https://explorer.solana.com";
