use crate::models::DeepDiveReport;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while retrieving a deep-dive report
#[derive(Debug, Clone, Error)]
pub enum DeepDiveError {
    #[error("AI service unavailable: {0}")]
    AIServiceUnavailable(String),
}

impl From<reqwest::Error> for DeepDiveError {
    fn from(value: reqwest::Error) -> Self {
        DeepDiveError::AIServiceUnavailable(value.to_string())
    }
}

/// External collaborator producing deep-dive reports
///
/// Reports are returned exactly as the collaborator produced them; a
/// failure is an error, never a placeholder report.
pub trait DeepDiveSource: Send + Sync {
    fn fetch_report(
        &self,
        candidate_id: &str,
    ) -> impl Future<Output = Result<DeepDiveReport, DeepDiveError>> + Send;
}

/// In-memory TTL cache in front of a deep-dive source
///
/// Concurrent requests for the same institution share one upstream call.
/// Failures are not cached.
pub struct DeepDiveCache<S> {
    inner: S,
    cache: moka::future::Cache<String, DeepDiveReport>,
}

impl<S: DeepDiveSource> DeepDiveCache<S> {
    pub fn new(inner: S, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub async fn invalidate(&self, candidate_id: &str) {
        self.cache.invalidate(candidate_id).await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl<S: DeepDiveSource> DeepDiveSource for DeepDiveCache<S> {
    async fn fetch_report(&self, candidate_id: &str) -> Result<DeepDiveReport, DeepDiveError> {
        if let Some(report) = self.cache.get(candidate_id).await {
            tracing::trace!("Deep-dive cache hit: {}", candidate_id);
            return Ok(report);
        }

        self.cache
            .try_get_with(candidate_id.to_string(), self.inner.fetch_report(candidate_id))
            .await
            .map_err(|e| (*e).clone())
    }
}
