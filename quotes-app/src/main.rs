use anyhow::{Context, Result};
use clap::Parser;
use quotes_common::observability::{flush_logging, init_logging};
use quotes_config::{QuotesConfig, QuotesConfigLoader};
use std::path::PathBuf;
mod wiring;

const DEFAULT_CONFIG_FILE: &str = "quotes.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about = "Scrape a quotes page and serve it as JSON", long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        env = "QUOTES_CONFIG",
        help = "YAML config file (default: ./quotes.yaml when present)"
    )]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins)
    let loader = match &args.config {
        Some(path) => QuotesConfigLoader::new().with_file(path),
        None => QuotesConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    let cfg: QuotesConfig = loader.load().context("failed to load configuration")?;

    // 2) Logging
    init_logging(wiring::log_config(&cfg.logging))?;

    // 3) Serve; any error from here on is fatal for the process.
    if let Err(err) = wiring::run(cfg).await {
        tracing::error!("quotes.fatal: {err:#}");
        flush_logging();
        std::process::exit(1);
    }

    flush_logging();
    Ok(())
}
