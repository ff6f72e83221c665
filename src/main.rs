use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod explorer;
mod heuristic;
mod models;
mod scanner;
#[cfg(test)]
mod testutil;

use models::ScanConfig;

#[derive(Parser, Debug)]
#[command(name = "airdrop-bot-scanner", version)]
struct Cli {
    /// Block-explorer API endpoint (etherscan-style txlist query)
    #[arg(long, env = "API_URL", default_value = models::DEFAULT_API_URL)]
    api_url: String,

    /// Airdrop contract address whose inbound transactions are claims
    #[arg(long, env = "AIRDROP_CONTRACT", default_value = models::DEFAULT_AIRDROP_CONTRACT)]
    contract: String,

    /// How many hours back still counts as "recently funded"
    #[arg(long, env = "TIME_WINDOW_HOURS", default_value_t = models::DEFAULT_WINDOW_HOURS)]
    window_hours: i64,

    /// Transactions per explorer page
    #[arg(long, env = "PAGE_SIZE", default_value_t = models::DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Pause between successive page requests, in milliseconds
    #[arg(long, env = "PAGE_DELAY_MS", default_value_t = models::DEFAULT_PAGE_DELAY_MS)]
    page_delay_ms: u64,

    /// Concurrent address classifications (0 = one per CPU)
    #[arg(long, env = "CONCURRENCY", default_value_t = 0)]
    concurrency: usize,

    /// Where to write flagged addresses, one per line (overwritten each run)
    #[arg(long, env = "OUTPUT_PATH", default_value = models::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Log file receiving a copy of console output
    #[arg(long, env = "LOG_FILE", default_value = "airdrop_analysis.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_file = std::fs::File::create(&cli.log_file)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(log_file)))
        .init();

    let config = ScanConfig {
        api_url: cli.api_url,
        contract_address: models::parse_address(&cli.contract)?,
        window_hours: cli.window_hours,
        page_size: cli.page_size,
        page_delay: Duration::from_millis(cli.page_delay_ms),
        concurrency: if cli.concurrency == 0 {
            models::default_concurrency()
        } else {
            cli.concurrency
        },
        output_path: cli.output,
    };

    scanner::run(config).await
}
