// Example: minting a single-supply NFT to a local keypair on devnet
//
// This example demonstrates how to:
// 1. Connect a keypair to a devnet session
// 2. Mint an NFT with a fresh mint account
// 3. Print the mint address and explorer link

use paycheck_sdk::{Account, Cluster, DispatchConfig, Dispatcher, RpcConnection, Session};
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

    let keypair_path = std::env::var("PAYCHECK_KEYPAIR")?;
    let keypair = read_keypair_file(&keypair_path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", keypair_path, e))?;

    let config = DispatchConfig::for_cluster(Cluster::Devnet);
    let session = Arc::new(Session::new(config.cluster));
    session.connect(Account::from_keypair(keypair));

    let dispatcher = Dispatcher::new(RpcConnection::from_config(&config), session.clone(), config);
    let created = dispatcher.mint_nft().await;

    println!("Mint: {}", created.address);
    println!("Result: {}", created.outcome.reason());
    if let Some(url) = created.outcome.explorer_url(session.cluster()) {
        println!("Explorer: {}", url);
    }

    Ok(())
}
