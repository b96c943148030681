use anyhow::Result;
use clap::Parser;
use hashchain_core::chain::Chain;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hashchain-cli")]
#[command(about = "Builds a short hash-chained ledger and prints it")]
struct Cli {
    /// Print the chain as JSON instead of the debug view
    #[arg(long)]
    json: bool,

    /// Block payloads, chained in order
    #[arg(default_values_t = [
        "It begins".to_string(),
        "First transaction".to_string(),
        "Second transaction".to_string(),
        "Third transaction".to_string(),
    ])]
    entries: Vec<String>,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();

    let mut chain = Chain::new();
    for entry in &cli.entries {
        chain.append(entry.as_bytes())?;
    }
    info!(blocks = chain.len(), verified = chain.verify(), "chain built");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    } else {
        println!("{:#?}", chain.blocks());
    }
    Ok(())
}
