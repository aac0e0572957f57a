use crate::selector::Selector;
use crate::types::{AnalysisQuery, ItemComparison};

/// Orders candidates by savings opportunity, highest first.
///
/// Equal opportunities are ordered by barcode ascending so two runs over the
/// same snapshot always emit the same row sequence; score-only ordering would
/// leave tie order to the sort's whims.
#[derive(Default)]
pub struct OpportunitySelector {
    /// Optional cap on the number of rows kept, for top-N reporting.
    pub limit: Option<usize>,
}

impl OpportunitySelector {
    pub fn top(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }
}

impl Selector<AnalysisQuery, ItemComparison> for OpportunitySelector {
    fn score(&self, candidate: &ItemComparison) -> f64 {
        candidate.cost_opportunity.unwrap_or(f64::NEG_INFINITY)
    }

    fn sort(&self, candidates: Vec<ItemComparison>) -> Vec<ItemComparison> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| {
            let sa = self.score(a);
            let sb = self.score(b);
            let by_score = match (sa.is_nan(), sb.is_nan()) {
                (true, true) => std::cmp::Ordering::Equal,
                (true, false) => std::cmp::Ordering::Greater,
                (false, true) => std::cmp::Ordering::Less,
                (false, false) => sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal),
            };
            by_score.then_with(|| a.item_barcode.cmp(&b.item_barcode))
        });
        sorted
    }

    fn size(&self) -> Option<usize> {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(barcode: &str, opportunity: f64) -> ItemComparison {
        ItemComparison {
            item_barcode: barcode.into(),
            cost_opportunity: Some(opportunity),
            ..ItemComparison::default()
        }
    }

    fn query() -> AnalysisQuery {
        AnalysisQuery {
            request_id: "test-selector".into(),
            focus_country: "KSA".into(),
            snapshot_label: "latest".into(),
            filters: None,
        }
    }

    #[test]
    fn orders_by_opportunity_descending() {
        let selector = OpportunitySelector::default();
        let selected = selector.select(
            &query(),
            vec![
                candidate("222", 50.0),
                candidate("111", 900.0),
                candidate("333", 400.0),
            ],
        );
        let barcodes: Vec<&str> = selected.iter().map(|c| c.item_barcode.as_str()).collect();
        assert_eq!(barcodes, vec!["111", "333", "222"]);
    }

    #[test]
    fn equal_opportunities_order_by_barcode() {
        let selector = OpportunitySelector::default();
        let selected = selector.select(
            &query(),
            vec![
                candidate("999", 100.0),
                candidate("111", 100.0),
                candidate("555", 100.0),
            ],
        );
        let barcodes: Vec<&str> = selected.iter().map(|c| c.item_barcode.as_str()).collect();
        assert_eq!(barcodes, vec!["111", "555", "999"]);
    }

    #[test]
    fn limit_truncates_after_ordering() {
        let selector = OpportunitySelector::top(2);
        let selected = selector.select(
            &query(),
            vec![
                candidate("222", 50.0),
                candidate("111", 900.0),
                candidate("333", 400.0),
            ],
        );
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].item_barcode, "111");
        assert_eq!(selected[1].item_barcode, "333");
    }

    #[test]
    fn unscored_candidates_sink_to_the_end() {
        let selector = OpportunitySelector::default();
        let mut unscored = candidate("000", 0.0);
        unscored.cost_opportunity = None;
        let selected = selector.select(&query(), vec![unscored, candidate("111", 5.0)]);
        assert_eq!(selected[0].item_barcode, "111");
        assert_eq!(selected[1].item_barcode, "000");
    }
}
