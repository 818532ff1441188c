use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

use crate::analyzer::find_lowest;
use crate::models::{ChartPoint, ChartSeries, Transaction};
use crate::time_fmt::{from_unix_seconds, relative_time, time_label, INVALID_DATE};

pub const DEFAULT_SEGMENTS: usize = 25;

/// Stable ascending sort on the numeric timestamp. Unparseable timestamps
/// sort first.
pub fn sort_by_timestamp(batch: &mut [Transaction]) {
    batch.sort_by_key(|tx| tx.timestamp().unwrap_or(i64::MIN));
}

pub fn segment_size(len: usize, segments: usize) -> usize {
    if segments == 0 {
        return 0;
    }
    len.div_ceil(segments)
}

/// Downsamples a time-sorted batch to at most `segments` points, one per
/// window that holds a valid gas price.
pub fn sample<Tz>(batch: &[Transaction], segments: usize, now: DateTime<Utc>, tz: &Tz) -> ChartSeries
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut series = ChartSeries::default();
    let size = segment_size(batch.len(), segments);
    if size == 0 {
        return series;
    }

    for (i, window) in batch.chunks(size).take(segments).enumerate() {
        let Some(lowest) = find_lowest(window) else {
            tracing::debug!(segment = i, len = window.len(), "no valid gas price in segment");
            continue;
        };
        let (label, relative) = match lowest.transaction.timestamp().and_then(from_unix_seconds) {
            Some(at) => (time_label(at, tz), relative_time(at, now)),
            None => {
                tracing::debug!(segment = i, hash = %lowest.transaction.hash, "segment minimum has no usable timestamp");
                (INVALID_DATE.to_string(), INVALID_DATE.to_string())
            }
        };

        tracing::debug!(segment = i, gwei = lowest.gwei, "segment minimum");
        series.push(
            label,
            ChartPoint {
                value: lowest.gwei,
                relative_time: relative,
            },
        );
    }

    series
}
