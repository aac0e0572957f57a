use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{AnalysisQuery, ItemComparison};

/// Drops rows below the query's minimum opportunity threshold.
///
/// Wired after selection: the opportunity amount only exists once the
/// scorers have run, and filtering afterwards keeps the removed rows out of
/// the report without touching the ordering of what remains.
pub struct LowOpportunityFilter;

fn threshold(query: &AnalysisQuery) -> Option<f64> {
    query.filters.as_ref().and_then(|f| f.min_opportunity)
}

#[async_trait]
impl Filter<AnalysisQuery, ItemComparison> for LowOpportunityFilter {
    fn enable(&self, query: &AnalysisQuery) -> bool {
        threshold(query).is_some()
    }

    async fn filter(
        &self,
        query: &AnalysisQuery,
        candidates: Vec<ItemComparison>,
    ) -> Result<FilterResult<ItemComparison>, String> {
        let min_opportunity = threshold(query).unwrap_or(0.0);
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| c.cost_opportunity.unwrap_or(0.0) >= min_opportunity);

        Ok(FilterResult { kept, removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalysisFilters;

    fn candidate(barcode: &str, opportunity: f64) -> ItemComparison {
        ItemComparison {
            item_barcode: barcode.into(),
            cost_opportunity: Some(opportunity),
            ..ItemComparison::default()
        }
    }

    fn query(min_opportunity: Option<f64>) -> AnalysisQuery {
        AnalysisQuery {
            request_id: "test-low-opportunity".into(),
            focus_country: "KSA".into(),
            snapshot_label: "latest".into(),
            filters: min_opportunity.map(|m| AnalysisFilters {
                min_opportunity: Some(m),
                ..AnalysisFilters::default()
            }),
        }
    }

    #[tokio::test]
    async fn removes_rows_below_the_threshold() {
        let filter = LowOpportunityFilter;
        let q = query(Some(500.0));
        let FilterResult { kept, removed } = filter
            .filter(&q, vec![candidate("big", 2400.0), candidate("small", 50.0)])
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].item_barcode, "big");
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].item_barcode, "small");
    }

    #[test]
    fn disabled_without_a_threshold() {
        let filter = LowOpportunityFilter;
        assert!(!filter.enable(&query(None)));
        assert!(filter.enable(&query(Some(100.0))));
    }
}
