// Example: sending SOL or a single NFT from a local keypair
//
// This example demonstrates how to:
// 1. Load a dispatch config (or fall back to devnet defaults)
// 2. Connect a keypair as the session account
// 3. Reconcile the balance and dispatch a transfer
//
// Usage:
//   cargo run --example send_transfer -- <RECIPIENT> <LAMPORTS_OR_MINT>
//
// PAYCHECK_KEYPAIR points at a keypair file (defaults to ~/.config/solana/id.json),
// PAYCHECK_CONFIG at an optional TOML config.

use anyhow::{bail, Context};
use paycheck_sdk::{
    format_sol, Account, DispatchConfig, DispatchOutcome, Dispatcher, RpcConnection, Session,
    TransferRequest,
};
use solana_sdk::signature::read_keypair_file;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let mut args = std::env::args().skip(1);
    let (Some(recipient), Some(amount_or_mint)) = (args.next(), args.next()) else {
        bail!("usage: send_transfer <RECIPIENT> <LAMPORTS_OR_MINT>");
    };

    let config = match std::env::var("PAYCHECK_CONFIG") {
        Ok(path) => DispatchConfig::load(&path).with_context(|| format!("loading {}", path))?,
        Err(_) => DispatchConfig::default(),
    };

    let keypair_path = std::env::var("PAYCHECK_KEYPAIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_default();
        format!("{}/.config/solana/id.json", home)
    });
    let keypair = read_keypair_file(&keypair_path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", keypair_path, e))?;

    let session = Arc::new(Session::new(config.cluster));
    session.connect(Account::from_keypair(keypair));

    let connection = RpcConnection::from_config(&config);
    println!("Cluster: {} ({})", config.cluster, connection.url());

    let dispatcher = Dispatcher::new(connection, session.clone(), config);
    let balance = dispatcher.refresh_balance().await?;
    println!("Balance: {}", balance);

    let request = TransferRequest::new(recipient, amount_or_mint).mark_signed();
    let outcome = dispatcher.dispatch(&request).await;

    match &outcome {
        DispatchOutcome::Success(signature) => println!("Confirmed: {}", signature),
        DispatchOutcome::TimedOut(signature) => println!("Unconfirmed: {}", signature),
        DispatchOutcome::Failure(failure) => println!("Failed: {}", failure),
    }
    if let Some(url) = outcome.explorer_url(session.cluster()) {
        println!("Explorer: {}", url);
    }
    if let Some(balance) = session.cached_balance() {
        println!("Balance now: {} SOL", format_sol(balance.lamports()));
    }

    Ok(())
}
