use async_trait::async_trait;

use compass_core::registry::CountryRegistry;

use crate::error::DataQualityWarning;
use crate::observation_loader::RawObservation;
use crate::pivoter::{pivot_observations, WideItemRecord};
use crate::source::Source;
use crate::types::{AnalysisQuery, ItemComparison};

/// Source that produces one `ItemComparison` candidate per pivoted item.
///
/// The source owns the snapshot reshaping: it runs the pivot once at
/// construction (the pivot is focus-independent, so re-running it per query
/// would be wasted work) and keeps the diagnostics for the caller to collect.
pub struct SnapshotPivotSource {
    records: Vec<WideItemRecord>,
    warnings: Vec<DataQualityWarning>,
}

impl SnapshotPivotSource {
    /// Pivot a snapshot of raw observations into candidate-ready records.
    pub fn new(observations: &[RawObservation], registry: &CountryRegistry) -> Self {
        let outcome = pivot_observations(observations, registry);
        Self {
            records: outcome.records,
            warnings: outcome.warnings,
        }
    }

    /// Wrap already-pivoted records, e.g. from a shared pivot run.
    pub fn from_records(records: Vec<WideItemRecord>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    /// Data-quality findings gathered while pivoting.
    pub fn diagnostics(&self) -> &[DataQualityWarning] {
        &self.warnings
    }
}

#[async_trait]
impl Source<AnalysisQuery, ItemComparison> for SnapshotPivotSource {
    fn enable(&self, _query: &AnalysisQuery) -> bool {
        !self.records.is_empty()
    }

    async fn get_candidates(&self, _query: &AnalysisQuery) -> Result<Vec<ItemComparison>, String> {
        let candidates = self
            .records
            .iter()
            .map(|record| ItemComparison {
                item_barcode: record.item_barcode.clone(),
                hierarchy: record.hierarchy.clone(),
                metrics: record.metrics.clone(),
                ..ItemComparison::default()
            })
            .collect();
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(country: &str, barcode: &str, cost: f64) -> RawObservation {
        RawObservation {
            country: country.into(),
            item_barcode: barcode.into(),
            department: "GROCERY".into(),
            section: "S".into(),
            family: "F".into(),
            subfamily: "SF".into(),
            brand: "B".into(),
            brand_principal: "BP".into(),
            cost_latest: cost,
            cost_mean: cost,
            sales_qty: 10.0,
            profit: 1.0,
            sales_amt: 10.0,
        }
    }

    fn query() -> AnalysisQuery {
        AnalysisQuery {
            request_id: "test-source".into(),
            focus_country: "KSA".into(),
            snapshot_label: "latest".into(),
            filters: None,
        }
    }

    #[tokio::test]
    async fn source_emits_one_candidate_per_item() {
        let registry = CountryRegistry::builtin();
        let observations = vec![
            observation("KSA", "111", 100.0),
            observation("UAE", "111", 80.0),
            observation("KSA", "222", 50.0),
        ];
        let source = SnapshotPivotSource::new(&observations, &registry);
        let candidates = source.get_candidates(&query()).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].item_barcode, "111");
        assert_eq!(candidates[0].metrics.len(), 2);
        assert!(candidates[0].focus_cost.is_none(), "stage fields start empty");
    }

    #[tokio::test]
    async fn source_is_disabled_for_an_empty_snapshot() {
        let registry = CountryRegistry::builtin();
        let source = SnapshotPivotSource::new(&[], &registry);
        assert!(!source.enable(&query()));
    }

    #[tokio::test]
    async fn diagnostics_carry_pivot_warnings() {
        let registry = CountryRegistry::builtin();
        let observations = vec![observation("MARS", "111", 10.0)];
        let source = SnapshotPivotSource::new(&observations, &registry);
        assert_eq!(source.diagnostics().len(), 1);
    }
}
