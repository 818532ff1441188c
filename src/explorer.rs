use anyhow::{Context, Result};
use futures_util::{stream, StreamExt};
use serde::Deserialize;
use url::Url;

use crate::{
    config::{mask_api_key, AnalysisConfig, ExplorerConfig},
    fetch_stats::{FetchStats, FETCH_STATS},
    models::Transaction,
};

const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The explorer answered with an explicit error message.
    #[error("explorer returned error: {0}")]
    Remote(String),
    #[error("unrecognized explorer response")]
    Format,
    #[error("no transactions returned for address")]
    NoTransactions,
    #[error("explorer responded with HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("no response from explorer: {0}")]
    Network(String),
    #[error("{0}")]
    Other(String),
}

/// Outcome of a single, successfully classified page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Records(Vec<Transaction>),
    Empty,
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: Option<String>,
    message: Option<String>,
    result: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct ExplorerClient {
    http: reqwest::Client,
    api_url: Url,
    chain_id: u64,
    max_concurrent_requests: usize,
    stats: &'static FetchStats,
}

impl ExplorerClient {
    pub fn new(config: &ExplorerConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(config.request_timeout)
            .build()
            .context("failed to build reqwest client")?;
        let api_url = Url::parse(&config.api_url).context("invalid EXPLORER_API_URL")?;
        Ok(Self {
            http,
            api_url,
            chain_id: config.chain_id,
            max_concurrent_requests: config.max_concurrent_requests.max(1),
            stats: &FETCH_STATS,
        })
    }

    /// Records traffic into `stats` instead of the process-wide counters.
    pub fn with_stats(mut self, stats: &'static FetchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Fetches every page for the configured address, newest first, and
    /// returns at most `max_transactions_to_scan` records in request order.
    ///
    /// At most `max_concurrent_requests` pages are in flight. Responses are
    /// classified in page order and the first failing page aborts the run.
    pub async fn fetch_all(&self, config: &AnalysisConfig) -> Result<Vec<Transaction>, FetchError> {
        let pages = page_count(config.max_transactions_to_scan, config.transactions_per_page);
        tracing::debug!(
            pages,
            per_page = config.transactions_per_page,
            max = config.max_transactions_to_scan,
            concurrency = self.max_concurrent_requests,
            "fetching transaction pages"
        );

        let mut responses = stream::iter(1..=pages)
            .map(|page| self.fetch_page(config, page))
            .buffered(self.max_concurrent_requests);

        let mut merged: Vec<Transaction> = Vec::new();
        let mut page_no = 0u32;
        while let Some(result) = responses.next().await {
            page_no += 1;
            match result {
                Ok(Page::Records(txs)) => {
                    tracing::debug!(page = page_no, count = txs.len(), "page returned transactions");
                    merged.extend(txs);
                }
                Ok(Page::Empty) => {
                    tracing::debug!(page = page_no, "no transactions found for page");
                    self.stats.inc_empty_pages(1);
                }
                Err(err) => {
                    tracing::warn!(page = page_no, %err, "page fetch failed, aborting run");
                    return Err(err);
                }
            }
        }

        let fetched = merged.len();
        merged.truncate(config.max_transactions_to_scan as usize);
        tracing::debug!(fetched, kept = merged.len(), "merged transaction pages");

        if merged.is_empty() {
            return Err(FetchError::NoTransactions);
        }
        self.stats.inc_transactions(merged.len() as u64);
        Ok(merged)
    }

    async fn fetch_page(&self, config: &AnalysisConfig, page: u32) -> Result<Page, FetchError> {
        let params = self.page_params(config, page);
        tracing::debug!(
            page,
            url = %self.api_url,
            apikey = %mask_api_key(&config.api_key),
            "requesting page"
        );
        self.stats.inc_pages_requested(1);

        let response = self
            .http
            .get(self.api_url.clone())
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                body: render_body(&body),
            });
        }

        classify_page(&body)
    }

    fn page_params(&self, config: &AnalysisConfig, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("chainid", self.chain_id.to_string()),
            ("module", "account".to_string()),
            ("action", "txlist".to_string()),
            ("address", config.contract_address.trim().to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("page", page.to_string()),
            ("offset", config.transactions_per_page.to_string()),
            ("sort", "desc".to_string()),
            ("apikey", config.api_key.clone()),
        ]
    }
}

/// Number of pages needed to cover `max` records.
pub fn page_count(max: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    max.div_ceil(per_page)
}

/// Interprets one explorer response body.
pub fn classify_page(body: &str) -> Result<Page, FetchError> {
    let response: ExplorerResponse =
        serde_json::from_str(body).map_err(|_| FetchError::Format)?;

    if response.status.as_deref() == Some("1") {
        if let Some(serde_json::Value::Array(records)) = response.result {
            // Odd records keep their slot and are filtered out as invalid prices.
            let txs: Vec<Transaction> = records
                .into_iter()
                .map(|record| serde_json::from_value(record).unwrap_or_default())
                .collect();
            return Ok(Page::Records(txs));
        }
    }

    match response.message.as_deref() {
        Some(NO_TRANSACTIONS_MESSAGE) => Ok(Page::Empty),
        Some(message) if !message.is_empty() => Err(FetchError::Remote(message.to_string())),
        _ => Err(FetchError::Format),
    }
}

/// Error bodies as compact JSON; non-JSON text comes back as a quoted string.
fn render_body(body: &str) -> String {
    let value = serde_json::from_str::<serde_json::Value>(body)
        .unwrap_or_else(|_| serde_json::Value::String(body.to_string()));
    value.to_string()
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() {
        FetchError::Network(err.to_string())
    } else {
        FetchError::Other(err.to_string())
    }
}
