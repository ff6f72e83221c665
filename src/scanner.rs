use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use futures::stream::{self, StreamExt};
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::explorer::ExplorerClient;
use crate::heuristic;
use crate::models::{BotClassification, ScanConfig};

const PROGRESS_EVERY: usize = 50;

/// One full scan: contract history, claimant set, parallel classification,
/// flat-file report.
pub async fn run(config: ScanConfig) -> Result<()> {
    let client = ExplorerClient::new(
        config.api_url.clone(),
        config.page_size,
        config.page_delay,
    );

    info!(contract = %config.contract_address, "fetching claim transactions");
    let claims = client
        .account_transactions(&config.contract_address)
        .await?;
    info!(total = claims.len(), "claim transactions fetched");
    if claims.is_empty() {
        warn!("no transactions found for the airdrop contract");
        return Ok(());
    }

    let claimants = heuristic::extract_claimants(&claims);
    let total = claimants.len();
    info!(claimants = total, "unique claimants to analyze");

    let cutoff = cutoff_unix(OffsetDateTime::now_utc(), config.window_hours);
    let bots = classify_all(
        &client,
        claimants,
        &config.contract_address,
        cutoff,
        config.concurrency,
    )
    .await;

    write_bot_addresses(&config.output_path, &bots)?;

    let pct = bots.len() as f64 / total as f64 * 100.0;
    info!(
        "analysis complete: {} claimants, {} likely bots ({:.2}%), saved to {}",
        total,
        bots.len(),
        pct,
        config.output_path.display()
    );
    Ok(())
}

/// "Recently funded" threshold: now minus the configured window.
pub fn cutoff_unix(now: OffsetDateTime, window_hours: i64) -> i64 {
    (now - Duration::hours(window_hours)).unix_timestamp()
}

/// Classifies every claimant with at most `concurrency` histories in
/// flight. Results surface in completion order, so the returned list has
/// no deterministic order across runs.
pub async fn classify_all(
    client: &ExplorerClient,
    claimants: HashSet<String>,
    contract_address: &str,
    cutoff_unix: i64,
    concurrency: usize,
) -> Vec<String> {
    let total = claimants.len();
    let mut results = stream::iter(claimants)
        .map(|address| {
            let client = client.clone();
            async move { heuristic::classify(&client, address, contract_address, cutoff_unix).await }
        })
        .buffer_unordered(concurrency.max(1));

    let mut bots = Vec::new();
    let mut done = 0usize;
    while let Some(BotClassification { address, is_bot }) = results.next().await {
        done += 1;
        if done % PROGRESS_EVERY == 0 || done == total {
            info!(done, total, "classification progress");
        }
        if is_bot {
            bots.push(address);
        }
    }
    bots
}

/// One lowercase address per line, prior content truncated.
pub fn write_bot_addresses(path: &Path, bots: &[String]) -> Result<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for address in bots {
        writeln!(out, "{address}")?;
    }
    out.flush()?;
    Ok(())
}
