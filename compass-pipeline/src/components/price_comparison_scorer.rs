use async_trait::async_trait;
use rayon::prelude::*;
use std::sync::Arc;

use compass_core::registry::CountryRegistry;
use compass_core::segments::{classify, relative_change, PriceSegment};

use crate::scorer::Scorer;
use crate::types::{AnalysisQuery, CountryComparison, ItemComparison};

/// Computes, for every non-focus registry country, the relative price change
/// against the focus cost and its band.
///
/// One data-driven pass over the registry per item: the country set comes
/// from the roster, never from hand-enumerated columns. Items are mutually
/// independent, so the batch runs on a parallel iterator; this is the widest
/// stage (items x countries) in the pipeline.
pub struct PriceComparisonScorer {
    registry: Arc<CountryRegistry>,
}

impl PriceComparisonScorer {
    pub fn new(registry: Arc<CountryRegistry>) -> Self {
        Self { registry }
    }

    fn compare(&self, query: &AnalysisQuery, candidate: &ItemComparison) -> Vec<CountryComparison> {
        // The gate runs before scorers; a candidate without a usable focus
        // cost can only appear here if the wiring is wrong, and then every
        // country reads as not-available rather than dividing by zero.
        let focus_cost = candidate.focus_cost.filter(|cost| *cost > 0.0);

        self.registry
            .others(&query.focus_country)
            .map(|country| {
                let other_cost = candidate.valid_cost_for(&country.code);
                match (focus_cost, other_cost) {
                    (Some(focus), Some(other)) => {
                        let change = relative_change(other, focus);
                        CountryComparison {
                            country: country.code.clone(),
                            price_change_pct: Some(change),
                            segment: classify(change),
                        }
                    }
                    _ => CountryComparison {
                        country: country.code.clone(),
                        price_change_pct: None,
                        segment: PriceSegment::NotAvailable,
                    },
                }
            })
            .collect()
    }
}

#[async_trait]
impl Scorer<AnalysisQuery, ItemComparison> for PriceComparisonScorer {
    async fn score(
        &self,
        query: &AnalysisQuery,
        candidates: &[ItemComparison],
    ) -> Result<Vec<ItemComparison>, String> {
        let scored = candidates
            .par_iter()
            .map(|candidate| ItemComparison {
                comparisons: self.compare(query, candidate),
                ..ItemComparison::default()
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ItemComparison, scored: ItemComparison) {
        candidate.comparisons = scored.comparisons;
    }
}
