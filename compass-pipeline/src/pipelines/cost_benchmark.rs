use async_trait::async_trait;
use std::sync::Arc;

use compass_core::registry::CountryRegistry;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::cheapest_country_scorer::CheapestCountryScorer;
use crate::components::comparable_cost_filter::ComparableCostFilter;
use crate::components::focus_metrics_hydrator::FocusMetricsHydrator;
use crate::components::low_opportunity_filter::LowOpportunityFilter;
use crate::components::opportunity_scorer::OpportunityScorer;
use crate::components::opportunity_selector::OpportunitySelector;
use crate::components::price_comparison_scorer::PriceComparisonScorer;
use crate::components::scope_filter::ScopeFilter;
use crate::components::snapshot_pivot_source::SnapshotPivotSource;
use crate::components::snapshot_stamp_query_hydrator::SnapshotStampQueryHydrator;
use crate::components::summary_log_side_effect::SummaryLogSideEffect;
use crate::filter::Filter;
use crate::hydrator::Hydrator;
use crate::observation_loader::RawObservation;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::SideEffect;
use crate::source::Source;
use crate::types::{AnalysisQuery, ItemComparison};

/// The country cost benchmark pipeline.
///
/// Pipeline flow:
/// 1. SnapshotStampQueryHydrator fills in a default snapshot label
/// 2. SnapshotPivotSource emits one candidate per pivoted item
/// 3. FocusMetricsHydrator surfaces the focus country's cost and volume
/// 4. ScopeFilter applies the optional department scope
/// 5. ComparableCostFilter removes items the focus country cannot be
///    benchmarked on
/// 6. PriceComparisonScorer bands every other country against the focus cost
/// 7. CheapestCountryScorer resolves the minimum-cost alternative
/// 8. OpportunityScorer prices the focus-vs-minimum gap
/// 9. OpportunitySelector orders rows by opportunity, barcode as tie-break
/// 10. LowOpportunityFilter applies the optional reporting threshold
/// 11. SummaryLogSideEffect logs the run summary
pub struct CostBenchmarkPipeline {
    query_hydrators: Vec<Box<dyn QueryHydrator<AnalysisQuery>>>,
    sources: Vec<Box<dyn Source<AnalysisQuery, ItemComparison>>>,
    hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, ItemComparison>>>,
    filters: Vec<Box<dyn Filter<AnalysisQuery, ItemComparison>>>,
    scorers: Vec<Box<dyn Scorer<AnalysisQuery, ItemComparison>>>,
    selector: OpportunitySelector,
    post_selection_hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, ItemComparison>>>,
    post_selection_filters: Vec<Box<dyn Filter<AnalysisQuery, ItemComparison>>>,
    side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ItemComparison>>>>,
}

impl CostBenchmarkPipeline {
    /// Build the pipeline around an already-pivoted source.
    ///
    /// This is the primary constructor: `run_analysis` pivots first so it can
    /// collect the source diagnostics before handing the source over.
    pub fn with_source(source: SnapshotPivotSource, registry: Arc<CountryRegistry>) -> Self {
        Self::with_source_and_limit(source, registry, None)
    }

    /// Build the pipeline with a cap on the number of reported rows.
    pub fn with_source_and_limit(
        source: SnapshotPivotSource,
        registry: Arc<CountryRegistry>,
        limit: Option<usize>,
    ) -> Self {
        let query_hydrators: Vec<Box<dyn QueryHydrator<AnalysisQuery>>> =
            vec![Box::new(SnapshotStampQueryHydrator)];

        let sources: Vec<Box<dyn Source<AnalysisQuery, ItemComparison>>> = vec![Box::new(source)];

        let hydrators: Vec<Box<dyn Hydrator<AnalysisQuery, ItemComparison>>> =
            vec![Box::new(FocusMetricsHydrator)];

        let filters: Vec<Box<dyn Filter<AnalysisQuery, ItemComparison>>> = vec![
            Box::new(ScopeFilter),
            Box::new(ComparableCostFilter::new(Arc::clone(&registry))),
        ];

        let scorers: Vec<Box<dyn Scorer<AnalysisQuery, ItemComparison>>> = vec![
            Box::new(PriceComparisonScorer::new(Arc::clone(&registry))),
            Box::new(CheapestCountryScorer::new(Arc::clone(&registry))),
            Box::new(OpportunityScorer),
        ];

        let selector = OpportunitySelector { limit };

        let post_selection_filters: Vec<Box<dyn Filter<AnalysisQuery, ItemComparison>>> =
            vec![Box::new(LowOpportunityFilter)];

        let side_effects: Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ItemComparison>>>> =
            Arc::new(vec![Box::new(SummaryLogSideEffect)]);

        Self {
            query_hydrators,
            sources,
            hydrators,
            filters,
            scorers,
            selector,
            post_selection_hydrators: Vec::new(),
            post_selection_filters,
            side_effects,
        }
    }

    /// Convenience constructor: pivot the snapshot and wire the pipeline in
    /// one step. Pivot diagnostics are logged but not returned; callers that
    /// need them go through `run_analysis`.
    pub fn with_observations(
        observations: &[RawObservation],
        registry: Arc<CountryRegistry>,
    ) -> Self {
        let source = SnapshotPivotSource::new(observations, &registry);
        Self::with_source(source, registry)
    }
}

#[async_trait]
impl CandidatePipeline<AnalysisQuery, ItemComparison> for CostBenchmarkPipeline {
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<AnalysisQuery>>] {
        &self.query_hydrators
    }

    fn sources(&self) -> &[Box<dyn Source<AnalysisQuery, ItemComparison>>] {
        &self.sources
    }

    fn hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, ItemComparison>>] {
        &self.hydrators
    }

    fn filters(&self) -> &[Box<dyn Filter<AnalysisQuery, ItemComparison>>] {
        &self.filters
    }

    fn scorers(&self) -> &[Box<dyn Scorer<AnalysisQuery, ItemComparison>>] {
        &self.scorers
    }

    fn selector(&self) -> &dyn Selector<AnalysisQuery, ItemComparison> {
        &self.selector
    }

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<AnalysisQuery, ItemComparison>>] {
        &self.post_selection_hydrators
    }

    fn post_selection_filters(&self) -> &[Box<dyn Filter<AnalysisQuery, ItemComparison>>] {
        &self.post_selection_filters
    }

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<AnalysisQuery, ItemComparison>>>> {
        Arc::clone(&self.side_effects)
    }
}
