use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{LowestGweiRecord, Transaction};
use crate::time_fmt::{datetime_label, from_unix_seconds, relative_time, INVALID_DATE};

pub const NO_LOWEST_MESSAGE: &str = "Could not determine the transaction with the lowest Gwei (perhaps all transactions had zero gas price).";

/// Lowest positive gas price in scan order. Ties keep the earlier record.
pub fn find_lowest<'a, I>(txs: I) -> Option<LowestGweiRecord>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut lowest: Option<(&Transaction, f64)> = None;
    for tx in txs {
        let Some(gwei) = tx.gas_price_gwei() else {
            continue;
        };
        if lowest.map_or(true, |(_, best)| gwei < best) {
            lowest = Some((tx, gwei));
        }
    }
    lowest.map(|(tx, gwei)| LowestGweiRecord {
        transaction: tx.clone(),
        gwei,
    })
}

/// Global minimum over the batch in fetch order (newest first).
pub fn find_global_lowest(batch: &[Transaction]) -> Option<LowestGweiRecord> {
    find_lowest(batch)
}

pub fn format_result<Tz>(
    record: &LowestGweiRecord,
    now: DateTime<Utc>,
    tz: &Tz,
    tx_url_base: &str,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tx = &record.transaction;
    let timestamp = match tx.timestamp().and_then(from_unix_seconds) {
        Some(at) => format!("{} {}", datetime_label(at, tz), relative_time(at, now)),
        None => INVALID_DATE.to_string(),
    };
    format!(
        "Lowest fee {:.4} Gwei\nTx link : {}{}\nTimestamp: {}",
        record.gwei, tx_url_base, tx.hash, timestamp
    )
}
