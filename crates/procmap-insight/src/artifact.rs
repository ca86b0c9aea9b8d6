use procmap_core::{ArtifactResult, ProcMapError, ReferenceContext, Result};
use serde::{Deserialize, Serialize};

/// One row of the artifact overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub name: String,
    pub num_affected_cases: u64,
    /// Share of the population in percent
    pub coverage: f64,
}

impl ArtifactSummary {
    pub fn coverage_label(&self) -> String {
        format_percentage(self.coverage)
    }
}

pub fn total_affected_cases(artifacts: &[ArtifactResult]) -> u64 {
    artifacts.iter().map(|a| a.num_affected_cases).sum()
}

fn ensure_valid(context: &ReferenceContext) -> Result<()> {
    if context.is_valid() {
        Ok(())
    } else {
        Err(ProcMapError::InvalidContext(format!(
            "numTraces must be positive, got {}",
            context.num_traces
        )))
    }
}

pub fn coverage_percentage(affected: u64, context: &ReferenceContext) -> Result<f64> {
    ensure_valid(context)?;
    Ok(affected as f64 / context.num_traces as f64 * 100.0)
}

/// `42.6` -> `"43%"`. Values that are not finite render as `"n/a"`.
pub fn format_percentage(percentage: f64) -> String {
    if percentage.is_finite() {
        format!("{}%", percentage.round() as i64)
    } else {
        "n/a".to_string()
    }
}

/// Summaries in input order. The context is checked even when there is
/// nothing to summarize, since callers derive totals from it.
pub fn summarize_artifacts(
    artifacts: &[ArtifactResult],
    context: &ReferenceContext,
) -> Result<Vec<ArtifactSummary>> {
    ensure_valid(context)?;
    artifacts
        .iter()
        .map(|artifact| -> Result<ArtifactSummary> {
            Ok(ArtifactSummary {
                name: artifact.name.clone(),
                num_affected_cases: artifact.num_affected_cases,
                coverage: coverage_percentage(artifact.num_affected_cases, context)?,
            })
        })
        .collect()
}
