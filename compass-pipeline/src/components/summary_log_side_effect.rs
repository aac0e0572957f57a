use async_trait::async_trait;
use std::sync::Arc;

use crate::side_effect::{SideEffect, SideEffectInput};
use crate::types::{AnalysisQuery, ItemComparison};

/// Logs a one-line run summary once selection is complete: row count and the
/// total savings opportunity on the table.
pub struct SummaryLogSideEffect;

#[async_trait]
impl SideEffect<AnalysisQuery, ItemComparison> for SummaryLogSideEffect {
    async fn run(
        &self,
        input: Arc<SideEffectInput<AnalysisQuery, ItemComparison>>,
    ) -> Result<(), String> {
        let total_opportunity: f64 = input
            .selected_candidates
            .iter()
            .filter_map(|c| c.cost_opportunity)
            .sum();
        log::info!(
            "request_id={} focus={} snapshot={} rows={} total_opportunity={:.2}",
            input.query.request_id,
            input.query.focus_country,
            input.query.snapshot_label,
            input.selected_candidates.len(),
            total_opportunity
        );
        Ok(())
    }
}
