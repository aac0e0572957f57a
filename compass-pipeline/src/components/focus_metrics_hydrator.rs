use async_trait::async_trait;

use crate::hydrator::Hydrator;
use crate::types::{AnalysisQuery, ItemComparison};

/// Copies the focus country's raw cost and sales volume out of the metrics
/// map onto dedicated candidate fields, where the gate and the scorers read
/// them without repeating the lookup.
///
/// Validity is not judged here: the raw cost is surfaced as-is and the
/// comparability filter decides what survives.
pub struct FocusMetricsHydrator;

#[async_trait]
impl Hydrator<AnalysisQuery, ItemComparison> for FocusMetricsHydrator {
    async fn hydrate(
        &self,
        query: &AnalysisQuery,
        candidates: &[ItemComparison],
    ) -> Result<Vec<ItemComparison>, String> {
        let hydrated = candidates
            .iter()
            .map(|candidate| {
                let focus = candidate.metrics_for(&query.focus_country);
                ItemComparison {
                    focus_cost: focus.map(|m| m.cost_latest),
                    focus_sales_qty: focus.map(|m| m.sales_qty),
                    ..ItemComparison::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut ItemComparison, hydrated: ItemComparison) {
        candidate.focus_cost = hydrated.focus_cost;
        candidate.focus_sales_qty = hydrated.focus_sales_qty;
    }
}
