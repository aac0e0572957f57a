use async_trait::async_trait;
use std::sync::Arc;

use compass_core::cheapest::resolve_cheapest;
use compass_core::registry::CountryRegistry;
use compass_core::segments::{classify, relative_change, PriceSegment};

use crate::scorer::Scorer;
use crate::types::{AnalysisQuery, CheapestCountry, ItemComparison};

/// Resolves the cheapest non-focus country per item and bands the
/// focus-vs-minimum gap.
///
/// Ties go to the country declared earliest in the registry. When no other
/// country has a usable cost the outcome is `NoData` with no minimum; the
/// gate makes that unreachable in a normal run, but the scorer still models
/// the state instead of leaking a placeholder number downstream.
pub struct CheapestCountryScorer {
    registry: Arc<CountryRegistry>,
}

impl CheapestCountryScorer {
    pub fn new(registry: Arc<CountryRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Scorer<AnalysisQuery, ItemComparison> for CheapestCountryScorer {
    async fn score(
        &self,
        query: &AnalysisQuery,
        candidates: &[ItemComparison],
    ) -> Result<Vec<ItemComparison>, String> {
        let scored = candidates
            .iter()
            .map(|candidate| {
                let resolved = resolve_cheapest(&self.registry, &query.focus_country, |country| {
                    candidate.valid_cost_for(&country.code)
                });

                match resolved {
                    Some((country, min_cost)) => {
                        let segment = candidate
                            .focus_cost
                            .filter(|cost| *cost > 0.0)
                            .map(|focus| classify(relative_change(min_cost, focus)));
                        ItemComparison {
                            min_cost_other: Some(min_cost),
                            cheapest_country: Some(CheapestCountry::Country(country.code.clone())),
                            min_cost_segment: segment,
                            ..ItemComparison::default()
                        }
                    }
                    None => ItemComparison {
                        min_cost_other: None,
                        cheapest_country: Some(CheapestCountry::NoData),
                        min_cost_segment: Some(PriceSegment::NotAvailable),
                        ..ItemComparison::default()
                    },
                }
            })
            .collect();
        Ok(scored)
    }

    fn update(&self, candidate: &mut ItemComparison, scored: ItemComparison) {
        candidate.min_cost_other = scored.min_cost_other;
        candidate.cheapest_country = scored.cheapest_country;
        candidate.min_cost_segment = scored.min_cost_segment;
    }
}
