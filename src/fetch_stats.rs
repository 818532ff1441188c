use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters for explorer traffic.
#[derive(Debug)]
pub struct FetchStats {
    runs: AtomicU64,
    pages_requested: AtomicU64,
    empty_pages: AtomicU64,
    failed_runs: AtomicU64,
    transactions: AtomicU64,
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStats {
    pub const fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            pages_requested: AtomicU64::new(0),
            empty_pages: AtomicU64::new(0),
            failed_runs: AtomicU64::new(0),
            transactions: AtomicU64::new(0),
        }
    }

    pub fn inc_runs(&self) {
        self.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_pages_requested(&self, n: u64) {
        self.pages_requested.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_empty_pages(&self, n: u64) {
        self.empty_pages.fetch_add(n, Ordering::Relaxed);
    }

    pub fn inc_failed_runs(&self) {
        self.failed_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_transactions(&self, n: u64) {
        self.transactions.fetch_add(n, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchSnapshot {
        FetchSnapshot {
            runs: self.runs.load(Ordering::Relaxed),
            pages_requested: self.pages_requested.load(Ordering::Relaxed),
            empty_pages: self.empty_pages.load(Ordering::Relaxed),
            failed_runs: self.failed_runs.load(Ordering::Relaxed),
            transactions: self.transactions.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct FetchSnapshot {
    pub runs: u64,
    pub pages_requested: u64,
    pub empty_pages: u64,
    pub failed_runs: u64,
    pub transactions: u64,
}

pub static FETCH_STATS: FetchStats = FetchStats::new();
