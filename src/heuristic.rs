use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::explorer::ExplorerClient;
use crate::models::{BotClassification, Transaction};

/// Unique lowercase senders of the contract's claim transactions.
pub fn extract_claimants(transactions: &[Transaction]) -> HashSet<String> {
    transactions
        .iter()
        .map(|tx| tx.from.to_ascii_lowercase())
        .collect()
}

/// The fixed claim-and-run rule: the address's only outgoing transaction is
/// the claim itself, and its first funding arrived within the recent window.
///
/// `transactions` is taken as chronological; the explorer serves ascending
/// pages and nothing here re-sorts.
pub fn is_bot(
    address: &str,
    transactions: &[Transaction],
    contract_address: &str,
    cutoff_unix: i64,
) -> bool {
    let incoming: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.to.eq_ignore_ascii_case(address))
        .collect();
    let outgoing: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| tx.from.eq_ignore_ascii_case(address))
        .collect();

    if outgoing.len() != 1 {
        debug!(address, outgoing = outgoing.len(), "not a bot: outgoing count");
        return false;
    }
    if !outgoing[0].to.eq_ignore_ascii_case(contract_address) {
        debug!(address, "not a bot: claim sent elsewhere");
        return false;
    }
    let Some(first_incoming) = incoming.first() else {
        debug!(address, "not a bot: never funded");
        return false;
    };
    match first_incoming.timestamp_unix() {
        Some(ts) if ts >= cutoff_unix => true,
        Some(_) => {
            debug!(address, "not a bot: funded before cutoff");
            false
        }
        None => {
            warn!(
                address,
                raw = %first_incoming.time_stamp,
                "unparseable funding timestamp, treating as non-bot"
            );
            false
        }
    }
}

/// Classifies one claimant against its full explorer history. A failed
/// fetch degrades to a non-bot verdict rather than retrying; the count
/// understates bots when the explorer is flaky.
pub async fn classify(
    client: &ExplorerClient,
    address: String,
    contract_address: &str,
    cutoff_unix: i64,
) -> BotClassification {
    let transactions = match client.account_transactions(&address).await {
        Ok(txs) => txs,
        Err(e) => {
            warn!(address = %address, error = %e, "history fetch failed, treating as non-bot");
            return BotClassification {
                address,
                is_bot: false,
            };
        }
    };

    let verdict = is_bot(&address, &transactions, contract_address, cutoff_unix);
    if verdict {
        info!(address = %address, "likely bot");
    }
    BotClassification {
        address,
        is_bot: verdict,
    }
}
