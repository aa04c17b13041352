//! triechain-node — boundary binary wiring the chain facade, configuration,
//! and the periodic cache-flush task together behind a small CLI.

mod cache_flush;
mod config;
mod context;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::info;

use config::Config;
use context::AppContext;

#[derive(Parser)]
#[clap(name = "triechain-node")]
#[clap(author, version, about = "A minimal Merkle Patricia Trie blockchain node", long_about = None)]
struct Cli {
    /// Configuration file path
    #[clap(short, long, value_name = "FILE", default_value = "config.toml")]
    config: String,

    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the node and its cache-flush task
    Start,

    /// Write a default configuration file
    Init {
        #[clap(short, long, default_value = "config.toml")]
        output: String,
    },

    /// Print the highest block on a freshly-generated chain
    Genesis,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { output }) => init_config(&output),
        Some(Commands::Genesis) => genesis(),
        Some(Commands::Start) | None => start_node(&cli.config).await,
    }
}

fn init_config(output: &str) -> Result<()> {
    let config = Config::default();
    config.to_file(output)?;
    println!("configuration written: {output}");
    Ok(())
}

fn genesis() -> Result<()> {
    use triechain_chain::Block;
    use triechain_trie::Trie;

    let block = Block::new("GENESIS", 1, Trie::new());
    println!("{}", block.to_json()?);
    Ok(())
}

async fn start_node(config_path: &str) -> Result<()> {
    let config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    init_logging(&config)?;
    info!(node = %config.node.name, "starting triechain-node");

    let ctx = Arc::new(AppContext::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let flush_task = tokio::spawn(cache_flush::run(ctx.clone(), config.cache.clone(), shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    shutdown_tx.send(true).ok();
    flush_task.await?;

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    Ok(())
}
