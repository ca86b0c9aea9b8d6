//! Insight refresh driven by an interactive shell.
//!
//! The shell calls [`InsightRefresh::refresh`] whenever the condition set or
//! the reference context changes. Requests may overlap; only the newest one
//! publishes its ranking.

use crate::InsightRanker;
use procmap_core::{
    from_query, to_query, ArtifactResult, Condition, InsightRecord, InsightSource, LatestValue,
    Query, ReferenceContext, Result, StatisticsSource,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Conditions or context missing; nothing was requested
    Skipped,
    /// A newer request started before this one finished
    Superseded,
    /// Ranking published with this many insights
    Published(usize),
}

/// Result of selecting an artifact: its conditions, the population they
/// select, and what happened to the insight refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactAnalysis {
    pub conditions: Vec<Condition>,
    pub context: ReferenceContext,
    pub outcome: RefreshOutcome,
}

pub struct InsightRefresh<S> {
    source: S,
    ranker: InsightRanker,
    latest: LatestValue<Vec<InsightRecord>>,
}

impl<S: InsightSource> InsightRefresh<S> {
    pub fn new(source: S, ranker: InsightRanker) -> Self {
        Self {
            source,
            ranker,
            latest: LatestValue::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Latest published ranking; `None` before the first one or while loading.
    pub fn insights(&self) -> Option<Vec<InsightRecord>> {
        self.latest.get()
    }

    /// Fetch, rank and publish insights for `conditions`.
    ///
    /// Source failures are returned as is and not retried.
    pub async fn refresh(
        &self,
        log_name: &str,
        conditions: &[Condition],
        context: Option<&ReferenceContext>,
    ) -> Result<RefreshOutcome> {
        if conditions.is_empty() || context.is_none() {
            return Ok(RefreshOutcome::Skipped);
        }

        let query = to_query(conditions)?;
        let ticket = self.latest.begin_and_reset();

        let insights = self.source.fetch_insights(log_name, &query).await?;
        if !self.latest.is_current(ticket) {
            debug!(log_name, generation = ticket.generation(), "insight request superseded");
            return Ok(RefreshOutcome::Superseded);
        }

        let ranked = self.ranker.rank(insights, context)?;
        let count = ranked.len();
        if self.latest.publish(ticket, ranked) {
            info!(log_name, count, "insights refreshed");
            Ok(RefreshOutcome::Published(count))
        } else {
            Ok(RefreshOutcome::Superseded)
        }
    }

    /// Restrict the population to an artifact's cases and refresh insights
    /// against it.
    pub async fn select_artifact<T: StatisticsSource>(
        &self,
        statistics: &T,
        log_name: &str,
        artifact: &ArtifactResult,
    ) -> Result<ArtifactAnalysis> {
        let query = Query {
            conditions: artifact.conditions.clone(),
        };
        let conditions = from_query(&query)?;
        let context = statistics.statistics(log_name, Some(&query)).await?;
        let outcome = self.refresh(log_name, &conditions, Some(&context)).await?;

        Ok(ArtifactAnalysis {
            conditions,
            context,
            outcome,
        })
    }
}
