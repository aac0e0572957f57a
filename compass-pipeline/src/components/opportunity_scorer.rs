use async_trait::async_trait;

use compass_core::opportunity::cost_opportunity;

use crate::scorer::Scorer;
use crate::types::{AnalysisQuery, ItemComparison};

/// Prices the savings opportunity: the focus-vs-minimum cost gap scaled by
/// the focus country's sales volume. Runs after the cheapest-country scorer
/// because it reads the resolved minimum.
pub struct OpportunityScorer;

#[async_trait]
impl Scorer<AnalysisQuery, ItemComparison> for OpportunityScorer {
    async fn score(
        &self,
        _query: &AnalysisQuery,
        candidates: &[ItemComparison],
    ) -> Result<Vec<ItemComparison>, String> {
        let scored = candidates
            .iter()
            .map(|candidate| {
                let amount = match (
                    candidate.focus_cost,
                    candidate.min_cost_other,
                    candidate.focus_sales_qty,
                ) {
                    (Some(focus), Some(min), Some(qty)) => cost_opportunity(focus, min, qty),
                    // No minimum means no alternative to align to.
                    _ => 0.0,
                };
                ItemComparison {
                    cost_opportunity: Some(amount),
                    ..ItemComparison::default()
                }
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ItemComparison, scored: ItemComparison) {
        candidate.cost_opportunity = scored.cost_opportunity;
    }
}
