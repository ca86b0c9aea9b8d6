use procmap_core::{InsightConfig, InsightRecord, ProcMapError, ReferenceContext, Result};
use std::cmp::Ordering;
use tracing::debug;

/// Filters insights by coverage and orders them by effect magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRanker {
    min_coverage: f64,
    keep_uncovered: bool,
}

impl Default for InsightRanker {
    fn default() -> Self {
        Self::from_config(&InsightConfig::default())
    }
}

impl InsightRanker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &InsightConfig) -> Self {
        Self {
            min_coverage: config.min_coverage,
            keep_uncovered: config.keep_uncovered,
        }
    }

    pub fn with_min_coverage(mut self, min_coverage: f64) -> Self {
        self.min_coverage = min_coverage;
        self
    }

    pub fn with_keep_uncovered(mut self, keep: bool) -> Self {
        self.keep_uncovered = keep;
        self
    }

    /// Whether `insight` survives the coverage filter against `context`.
    /// Nothing is material against an invalid context.
    pub fn is_material(&self, insight: &InsightRecord, context: &ReferenceContext) -> bool {
        match insight.coverage(context) {
            None => false,
            Some(_) if insight.cases_within == 0 => self.keep_uncovered,
            Some(coverage) => coverage > self.min_coverage,
        }
    }

    /// Keep material insights and sort them by descending `|effect_size|`.
    ///
    /// An empty list or a missing context is returned untouched: inputs arrive
    /// asynchronously and either may simply not be there yet. The sort is
    /// stable, so equal magnitudes keep their input order.
    pub fn rank(
        &self,
        insights: Vec<InsightRecord>,
        context: Option<&ReferenceContext>,
    ) -> Result<Vec<InsightRecord>> {
        if insights.is_empty() {
            return Ok(insights);
        }
        let Some(context) = context else {
            return Ok(insights);
        };
        if !context.is_valid() {
            return Err(ProcMapError::InvalidContext(format!(
                "numTraces must be positive, got {}",
                context.num_traces
            )));
        }

        let total = insights.len();
        let mut ranked: Vec<InsightRecord> = insights
            .into_iter()
            .filter(|insight| self.is_material(insight, context))
            .collect();
        ranked.sort_by(by_magnitude_desc);

        debug!(
            total,
            kept = ranked.len(),
            num_traces = context.num_traces,
            "ranked insights"
        );
        Ok(ranked)
    }
}

/// Descending absolute effect size; NaN sorts after every number.
pub fn by_magnitude_desc(a: &InsightRecord, b: &InsightRecord) -> Ordering {
    let (a, b) = (a.effect_size.abs(), b.effect_size.abs());
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.total_cmp(&a),
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_threshold_is_strict() {
        let ranker = InsightRanker::new();
        let context = ReferenceContext::new(100);
        assert!(!ranker.is_material(&InsightRecord::new(1.0, 25), &context));
        assert!(ranker.is_material(&InsightRecord::new(1.0, 26), &context));
    }

    #[test]
    fn uncovered_insights_can_be_dropped() {
        let context = ReferenceContext::new(100);
        let uncovered = InsightRecord::new(1.0, 0);
        assert!(InsightRanker::new().is_material(&uncovered, &context));
        let ranker = InsightRanker::new().with_keep_uncovered(false);
        assert!(!ranker.is_material(&uncovered, &context));
    }

    #[test]
    fn nothing_is_material_without_population() {
        let ranker = InsightRanker::new();
        let empty = ReferenceContext::new(0);
        assert!(!ranker.is_material(&InsightRecord::new(1.0, 0), &empty));
        assert!(!ranker.is_material(&InsightRecord::new(1.0, 10), &empty));
    }

    #[test]
    fn nan_ranks_last() {
        let a = InsightRecord::new(f64::NAN, 0);
        let b = InsightRecord::new(-0.1, 0);
        assert_eq!(by_magnitude_desc(&a, &b), Ordering::Greater);
        assert_eq!(by_magnitude_desc(&b, &a), Ordering::Less);
    }

    #[test]
    fn negative_effects_rank_by_magnitude() {
        let a = InsightRecord::new(-0.8, 0);
        let b = InsightRecord::new(0.5, 0);
        assert_eq!(by_magnitude_desc(&a, &b), Ordering::Less);
    }
}
