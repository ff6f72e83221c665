use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use alloy_primitives::Address;
use eyre::{eyre, Result};
use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "https://matchscan.io/api";
pub const DEFAULT_AIRDROP_CONTRACT: &str = "0xD5B3BC210352D71f9c7fe7d94cb86FC49B42209a";
pub const DEFAULT_WINDOW_HOURS: i64 = 48;
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 200;
pub const DEFAULT_OUTPUT_PATH: &str = "bot_addresses.txt";

/// Envelope every etherscan-style explorer wraps around query results.
#[derive(Debug, Deserialize)]
pub struct TxListResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<Vec<Transaction>>,
}

/// One row of an account's transaction list. Only the sender, recipient
/// and timestamp matter here; everything else the explorer sends rides
/// along untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub from: String,
    // Empty for contract creations.
    #[serde(default)]
    pub to: String,
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Transaction {
    /// Explorers send `timeStamp` as a decimal string of unix seconds.
    pub fn timestamp_unix(&self) -> Option<i64> {
        self.time_stamp.parse().ok()
    }
}

/// Verdict for a single claimant.
#[derive(Debug, Clone)]
pub struct BotClassification {
    pub address: String,
    pub is_bot: bool,
}

/// Everything one scan run needs. Built once in `main` and passed down;
/// nothing reads globals.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub api_url: String,
    /// Lowercase-normalized airdrop contract address.
    pub contract_address: String,
    pub window_hours: i64,
    pub page_size: usize,
    /// Pacing delay between successive page requests. Not backoff.
    pub page_delay: Duration,
    pub concurrency: usize,
    pub output_path: PathBuf,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            contract_address: DEFAULT_AIRDROP_CONTRACT.to_ascii_lowercase(),
            window_hours: DEFAULT_WINDOW_HOURS,
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            concurrency: default_concurrency(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

/// One classification slot per available processing unit.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Validates a 0x-prefixed hex address and returns it lowercase-normalized.
pub fn parse_address(s: &str) -> Result<String> {
    s.parse::<Address>()
        .map(|_| s.to_ascii_lowercase())
        .map_err(|_| eyre!("Invalid address: {}", s))
}
