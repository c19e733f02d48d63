use anyhow::Result;
use bridge_indexer::config::ConfigProvider;
use bridge_indexer::repository::{Database, SwapRepository};
use bridge_indexer::rpc::RpcClient;
use bridge_indexer::scanner::Scanner;
use bridge_indexer::sink::EventSink;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "bridge-indexer")]
#[command(about = "Scan cross chain swaps and record accounting events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan swap events on the source and destination chains
    Start {
        /// Path to the TOML scan configuration
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Start { config } => start(config).await,
    }
}

async fn start(config_path: PathBuf) -> Result<()> {
    info!("Starting bridge accounting indexer");

    let provider = ConfigProvider::load(config_path)?;
    let config = provider.snapshot();
    info!("Configuration loaded with {} tokens", config.tokens.len());

    provider.clone().spawn_reload_watcher();

    let db = Database::new(&config.database_url)?;
    info!("Database initialized at {}", config.database_url);

    let sink = EventSink::new(Arc::new(SwapRepository::new(db)));

    let mut scanners = JoinSet::new();
    for (name, chain) in [("src", &config.src), ("dst", &config.dst)] {
        let client = RpcClient::new(&chain.gateway)?;
        let scanner = Scanner::new(name, chain, client, provider.clone(), sink.clone());
        scanners.spawn(scanner.run());
    }

    // Returns only when every scanner finishes a bounded range or one of
    // them hits a fatal configuration error; tail mode never terminates.
    while let Some(result) = scanners.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("Scanner error: {e}");
                return Err(e);
            }
            Err(e) => {
                error!("Scanner task failed: {e}");
                return Err(e.into());
            }
        }
    }

    Ok(())
}
