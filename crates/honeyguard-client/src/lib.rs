pub mod error;
pub mod http;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use honeyguard_schema::{IntelItem, ReportResult, StatsResponse};
use tokio::sync::RwLock;

pub use error::ClientError;
pub use http::{HttpSocClient, DEFAULT_BASE_URL, INTEL_PATH, REPORT_PATH, STATS_PATH};

/// Raw access to the honeypot backend. Implementations report every failure;
/// the fallback policy lives in [`ApiClient`].
#[async_trait]
pub trait SocApi: Send + Sync {
    async fn stats(&self) -> Result<StatsResponse, ClientError>;
    async fn intel(&self) -> Result<Vec<IntelItem>, ClientError>;
    async fn report(&self) -> Result<ReportResult, ClientError>;
}

/// Best-effort client used by the dashboard. Each call is a single attempt;
/// failures are logged and replaced by a safe default.
#[derive(Clone)]
pub struct ApiClient {
    api: Arc<dyn SocApi>,
}

impl ApiClient {
    pub fn new(api: Arc<dyn SocApi>) -> Self {
        Self { api }
    }

    pub fn http(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self::new(Arc::new(HttpSocClient::with_timeout(base_url, timeout)))
    }

    /// `GET /stats`, or empty interactions and counts on failure.
    pub async fn fetch_dashboard_data(&self) -> StatsResponse {
        match self.api.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Error fetching SOC stats");
                StatsResponse::empty()
            }
        }
    }

    /// `GET /api/intel`, or an empty table on failure.
    pub async fn fetch_intel(&self) -> Vec<IntelItem> {
        match self.api.intel().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Error fetching intel");
                Vec::new()
            }
        }
    }

    /// `POST /api/report`, or the generic NPCI failure on error.
    pub async fn report_scam(&self) -> ReportResult {
        match self.api.report().await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(kind = e.kind(), error = %e, "Error reporting scam");
                ReportResult::failed()
            }
        }
    }
}

/// In-memory backend for tests and offline runs. An endpoint without a
/// canned response behaves like an unreachable server.
#[derive(Default)]
pub struct StubApi {
    stats: RwLock<Option<StatsResponse>>,
    intel: RwLock<Option<Vec<IntelItem>>>,
    report: RwLock<Option<ReportResult>>,
    latency: Option<Duration>,
    stats_calls: AtomicUsize,
    intel_calls: AtomicUsize,
    report_calls: AtomicUsize,
}

impl StubApi {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, stats: StatsResponse) -> Self {
        self.stats = RwLock::new(Some(stats));
        self
    }

    pub fn with_intel(mut self, items: Vec<IntelItem>) -> Self {
        self.intel = RwLock::new(Some(items));
        self
    }

    pub fn with_report(mut self, result: ReportResult) -> Self {
        self.report = RwLock::new(Some(result));
        self
    }

    /// Delay every call, to keep requests in flight.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn set_stats(&self, stats: Option<StatsResponse>) {
        *self.stats.write().await = stats;
    }

    pub async fn set_intel(&self, items: Option<Vec<IntelItem>>) {
        *self.intel.write().await = items;
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    pub fn intel_calls(&self) -> usize {
        self.intel_calls.load(Ordering::SeqCst)
    }

    pub fn report_calls(&self) -> usize {
        self.report_calls.load(Ordering::SeqCst)
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn offline(endpoint: &'static str) -> ClientError {
    ClientError::Connect {
        endpoint,
        message: "stub backend offline".to_string(),
    }
}

#[async_trait]
impl SocApi for StubApi {
    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.stats.read().await.clone().ok_or_else(|| offline(STATS_PATH))
    }

    async fn intel(&self) -> Result<Vec<IntelItem>, ClientError> {
        self.intel_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.intel.read().await.clone().ok_or_else(|| offline(INTEL_PATH))
    }

    async fn report(&self) -> Result<ReportResult, ClientError> {
        self.report_calls.fetch_add(1, Ordering::SeqCst);
        self.delay().await;
        self.report
            .read()
            .await
            .clone()
            .ok_or_else(|| offline(REPORT_PATH))
    }
}
