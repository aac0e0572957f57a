use async_trait::async_trait;
use std::sync::Arc;

use compass_core::registry::CountryRegistry;

use crate::filter::{Filter, FilterResult};
use crate::types::{AnalysisQuery, ItemComparison};

/// The comparability gate: an item is benchmarkable only if the focus
/// country has a usable cost (present, positive) and at least one other
/// registry country does too. Everything else is removed here, before any
/// comparison arithmetic runs, so an excluded item produces no output row
/// at all rather than a row of nulls.
pub struct ComparableCostFilter {
    registry: Arc<CountryRegistry>,
}

impl ComparableCostFilter {
    pub fn new(registry: Arc<CountryRegistry>) -> Self {
        Self { registry }
    }

    fn is_comparable(&self, query: &AnalysisQuery, candidate: &ItemComparison) -> bool {
        let focus_valid = candidate.focus_cost.is_some_and(|cost| cost > 0.0);
        if !focus_valid {
            return false;
        }
        self.registry
            .others(&query.focus_country)
            .any(|country| candidate.valid_cost_for(&country.code).is_some())
    }
}

#[async_trait]
impl Filter<AnalysisQuery, ItemComparison> for ComparableCostFilter {
    async fn filter(
        &self,
        query: &AnalysisQuery,
        candidates: Vec<ItemComparison>,
    ) -> Result<FilterResult<ItemComparison>, String> {
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|candidate| self.is_comparable(query, candidate));

        Ok(FilterResult { kept, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CountryMetrics;
    use std::collections::BTreeMap;

    fn candidate(focus_cost: Option<f64>, others: &[(&str, f64)]) -> ItemComparison {
        let mut metrics: BTreeMap<String, CountryMetrics> = others
            .iter()
            .map(|&(code, cost)| {
                (
                    code.to_string(),
                    CountryMetrics {
                        cost_latest: cost,
                        cost_mean: cost,
                        sales_qty: 1.0,
                        profit: 0.0,
                        sales_amt: 0.0,
                    },
                )
            })
            .collect();
        if let Some(cost) = focus_cost {
            metrics.insert(
                "KSA".into(),
                CountryMetrics {
                    cost_latest: cost,
                    cost_mean: cost,
                    sales_qty: 1.0,
                    profit: 0.0,
                    sales_amt: 0.0,
                },
            );
        }
        ItemComparison {
            item_barcode: "111".into(),
            metrics,
            focus_cost,
            focus_sales_qty: focus_cost.map(|_| 1.0),
            ..ItemComparison::default()
        }
    }

    fn query() -> AnalysisQuery {
        AnalysisQuery {
            request_id: "test-gate".into(),
            focus_country: "KSA".into(),
            snapshot_label: "latest".into(),
            filters: None,
        }
    }

    async fn run(filter: &ComparableCostFilter, candidates: Vec<ItemComparison>) -> (usize, usize) {
        let FilterResult { kept, removed } = filter.filter(&query(), candidates).await.unwrap();
        (kept.len(), removed.len())
    }

    #[tokio::test]
    async fn comparable_items_pass() {
        let filter = ComparableCostFilter::new(Arc::new(CountryRegistry::builtin()));
        let (kept, removed) = run(&filter, vec![candidate(Some(100.0), &[("UAE", 80.0)])]).await;
        assert_eq!((kept, removed), (1, 0));
    }

    #[tokio::test]
    async fn missing_focus_cost_is_removed() {
        let filter = ComparableCostFilter::new(Arc::new(CountryRegistry::builtin()));
        let (kept, removed) = run(&filter, vec![candidate(None, &[("UAE", 80.0)])]).await;
        assert_eq!((kept, removed), (0, 1));
    }

    #[tokio::test]
    async fn non_positive_focus_cost_is_removed() {
        let filter = ComparableCostFilter::new(Arc::new(CountryRegistry::builtin()));
        let (kept, removed) = run(
            &filter,
            vec![
                candidate(Some(0.0), &[("UAE", 80.0)]),
                candidate(Some(-5.0), &[("UAE", 80.0)]),
            ],
        )
        .await;
        assert_eq!((kept, removed), (0, 2));
    }

    #[tokio::test]
    async fn no_valid_other_cost_is_removed() {
        let filter = ComparableCostFilter::new(Arc::new(CountryRegistry::builtin()));
        // No other observations at all, and only a worthless zero cost.
        let (kept, removed) = run(
            &filter,
            vec![
                candidate(Some(100.0), &[]),
                candidate(Some(100.0), &[("UAE", 0.0)]),
            ],
        )
        .await;
        assert_eq!((kept, removed), (0, 2));
    }
}
