use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
    analyzer::{find_global_lowest, format_result, NO_LOWEST_MESSAGE},
    config::{mask_api_key, AnalysisConfig, ConfigError},
    explorer::{ExplorerClient, FetchError},
    fetch_stats::FETCH_STATS,
    models::{GasTrackerResult, Transaction},
    sampler::{sample, sort_by_timestamp},
};

/// Every way an analysis run can end without a result. `Display` is the text
/// shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Error fetching transactions: {0}")]
    Remote(String),
    #[error("Unexpected response format from Etherscan API.")]
    Format,
    #[error("No transactions found for this contract address.")]
    NoTransactions,
    #[error("API Error: {status} - {body}")]
    Api { status: u16, body: String },
    #[error("Network Error: No response received from Etherscan API.")]
    Network,
    #[error("An unexpected error occurred: {0}")]
    Unknown(String),
}

impl From<FetchError> for TrackerError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Remote(message) => Self::Remote(message),
            FetchError::Format => Self::Format,
            FetchError::NoTransactions => Self::NoTransactions,
            FetchError::Http { status, body } => Self::Api { status, body },
            FetchError::Network(_) => Self::Network,
            FetchError::Other(message) => Self::Unknown(message),
        }
    }
}

/// Runs one full analysis. Failures come back as a message-only result.
pub async fn analyze(
    client: &ExplorerClient,
    config: &AnalysisConfig,
    segments: usize,
    tx_url_base: &str,
) -> GasTrackerResult {
    FETCH_STATS.inc_runs();
    match run(client, config, segments, tx_url_base).await {
        Ok(result) => result,
        Err(err) => {
            FETCH_STATS.inc_failed_runs();
            tracing::error!(error = ?err, "gas analysis failed");
            GasTrackerResult::message(err.to_string())
        }
    }
}

async fn run(
    client: &ExplorerClient,
    config: &AnalysisConfig,
    segments: usize,
    tx_url_base: &str,
) -> Result<GasTrackerResult, TrackerError> {
    config.validate()?;
    tracing::info!(
        apikey = %mask_api_key(&config.api_key),
        address = %config.contract_address,
        per_page = config.transactions_per_page,
        max = config.max_transactions_to_scan,
        "starting gas analysis"
    );

    let batch = client.fetch_all(config).await?;
    tracing::info!(count = batch.len(), "analyzing transactions for lowest gas fee");

    Ok(build_result(batch, segments, Utc::now(), &Local, tx_url_base))
}

/// Analysis and sampling over an already fetched batch.
pub fn build_result<Tz>(
    batch: Vec<Transaction>,
    segments: usize,
    now: DateTime<Utc>,
    tz: &Tz,
    tx_url_base: &str,
) -> GasTrackerResult
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    // Global minimum runs over fetch order; only the chart needs time order.
    let Some(lowest) = find_global_lowest(&batch) else {
        tracing::info!("no transaction with a positive gas price");
        return GasTrackerResult::message(NO_LOWEST_MESSAGE);
    };

    let mut sorted = batch;
    sort_by_timestamp(&mut sorted);
    let chart_series = sample(&sorted, segments, now, tz);

    tracing::info!(
        gwei = lowest.gwei,
        hash = %lowest.transaction.hash,
        points = chart_series.len(),
        "lowest gas fee found"
    );

    GasTrackerResult {
        result_text: format_result(&lowest, now, tz, tx_url_base),
        chart_series,
    }
}
