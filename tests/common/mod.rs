#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tokio::task::JoinHandle;

use gas_fee_tracker::config::{AnalysisConfig, Config, ExplorerConfig};
use gas_fee_tracker::explorer::ExplorerClient;

pub type PageHandler = Arc<dyn Fn(u32) -> (StatusCode, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    handler: PageHandler,
    delay: Arc<dyn Fn(u32) -> Duration + Send + Sync>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

pub struct MockExplorer {
    pub url: String,
    pub requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    peak: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl MockExplorer {
    /// Highest number of requests the mock was serving at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        let mut pages: Vec<u32> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|q| q.get("page").and_then(|p| p.parse().ok()))
            .collect();
        pages.sort_unstable();
        pages
    }
}

impl Drop for MockExplorer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_page(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let page = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    state.requests.lock().unwrap().push(query);

    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep((state.delay)(page)).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    (state.handler)(page)
}

pub async fn spawn_explorer<F>(handler: F) -> MockExplorer
where
    F: Fn(u32) -> (StatusCode, String) + Send + Sync + 'static,
{
    spawn_slow_explorer(|_| Duration::ZERO, handler).await
}

/// Mock whose answer for each page is held back by `delay(page)`.
pub async fn spawn_slow_explorer<D, F>(delay: D, handler: F) -> MockExplorer
where
    D: Fn(u32) -> Duration + Send + Sync + 'static,
    F: Fn(u32) -> (StatusCode, String) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let peak = Arc::new(AtomicUsize::new(0));
    let state = MockState {
        handler: Arc::new(handler),
        delay: Arc::new(delay),
        requests: requests.clone(),
        in_flight: Arc::new(AtomicUsize::new(0)),
        peak: peak.clone(),
    };
    let app = Router::new()
        .route("/v2/api", get(serve_page))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let server = axum::serve(listener, app);
    let handle = tokio::spawn(async move {
        let _ = server.await;
    });

    MockExplorer {
        url: format!("http://{}/v2/api", addr),
        requests,
        peak,
        handle,
    }
}

/// `count` records with ascending hashes and gas prices starting at `first_gwei`.
pub fn txs_json(prefix: &str, count: usize, first_gwei: u64) -> serde_json::Value {
    let records: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "blockNumber": (19_000_000 + i).to_string(),
                "hash": format!("0x{prefix}{i:04}"),
                "gasPrice": ((first_gwei + i as u64) * 1_000_000_000).to_string(),
                "timeStamp": (1_700_000_000 - i as i64 * 12).to_string(),
            })
        })
        .collect();
    serde_json::Value::Array(records)
}

pub fn ok_body(result: serde_json::Value) -> String {
    serde_json::json!({ "status": "1", "message": "OK", "result": result }).to_string()
}

pub fn no_transactions_body() -> String {
    serde_json::json!({ "status": "0", "message": "No transactions found", "result": [] })
        .to_string()
}

pub fn explorer_config(url: &str) -> ExplorerConfig {
    ExplorerConfig {
        api_url: url.to_string(),
        tx_url_base: "https://etherscan.io/tx/".to_string(),
        chain_id: 1,
        max_concurrent_requests: 2,
        request_timeout: Duration::from_secs(5),
    }
}

pub fn analysis_config(per_page: u32, max: u32) -> AnalysisConfig {
    AnalysisConfig {
        api_key: "TESTKEY123456789".to_string(),
        contract_address: "0x0dE8bf93dA2f7eecb3d9169422413A9bef4ef628".to_string(),
        transactions_per_page: per_page,
        max_transactions_to_scan: max,
    }
}

pub fn client(url: &str) -> ExplorerClient {
    ExplorerClient::new(&explorer_config(url)).unwrap()
}

pub fn app_config(url: &str, per_page: u32, max: u32) -> Config {
    Config {
        analysis: analysis_config(per_page, max),
        explorer: explorer_config(url),
        chart_segments: 25,
        http_bind_addr: "127.0.0.1:0".to_string(),
    }
}

/// A URL nothing is listening on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v2/api", addr)
}
