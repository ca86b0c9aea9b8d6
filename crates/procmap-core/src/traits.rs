use crate::{InsightRecord, Query, ReferenceContext, Result};
use async_trait::async_trait;

/// Remote producer of insight records for a log and query.
///
/// Implementations report transport failures as [`crate::ProcMapError::Source`];
/// callers surface them without retrying.
#[async_trait]
pub trait InsightSource: Send + Sync {
    async fn fetch_insights(&self, log_name: &str, query: &Query) -> Result<Vec<InsightRecord>>;
}

/// Remote producer of event-log statistics, optionally restricted by a query.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn statistics(&self, log_name: &str, query: Option<&Query>) -> Result<ReferenceContext>;
}
