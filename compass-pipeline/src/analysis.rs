//! Analysis entry point.
//!
//! `run_analysis` is the one call external collaborators make: validate the
//! focus country, pivot the snapshot, run the benchmark pipeline, and project
//! the report rows, returning data-quality findings alongside the results.

use std::sync::Arc;

use compass_core::registry::CountryRegistry;

use crate::candidate_pipeline::CandidatePipeline;
use crate::components::snapshot_pivot_source::SnapshotPivotSource;
use crate::error::{AnalysisResult, DataQualityWarning};
use crate::observation_loader::RawObservation;
use crate::pipelines::cost_benchmark::CostBenchmarkPipeline;
use crate::projector::{project_rows, ProjectedRow};
use crate::types::{AnalysisFilters, AnalysisQuery};

/// Projected rows plus everything worth telling the caller about the data.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Report rows, ordered by opportunity descending (barcode breaks ties).
    pub rows: Vec<ProjectedRow>,
    /// Non-fatal findings: duplicates, bad costs, unknown countries, empty
    /// results. Never causes the run to abort.
    pub warnings: Vec<DataQualityWarning>,
}

/// Run the full benchmark for one focus country over one snapshot.
///
/// Aborts with `AnalysisError::UnknownCountry` before touching the data when
/// the focus code is not in the registry, and with
/// `AnalysisError::Computation` if a stage-wiring bug would otherwise leak
/// inconsistent values into the output.
pub async fn run_analysis(
    observations: &[RawObservation],
    focus_country_code: &str,
    registry: Arc<CountryRegistry>,
    filters: Option<AnalysisFilters>,
) -> AnalysisResult<AnalysisOutcome> {
    let focus = registry.lookup(focus_country_code)?;
    let focus_code = focus.code.clone();

    let source = SnapshotPivotSource::new(observations, &registry);
    let mut warnings = source.diagnostics().to_vec();

    let pipeline = CostBenchmarkPipeline::with_source(source, Arc::clone(&registry));
    let query = AnalysisQuery {
        request_id: format!("benchmark-{}", focus_code.to_lowercase()),
        focus_country: focus_code.clone(),
        snapshot_label: String::new(),
        filters,
    };

    let result = pipeline.execute(query).await;

    if result.selected_candidates.is_empty() {
        warnings.push(DataQualityWarning::NoComparableItems {
            focus_country: focus_code.clone(),
        });
    }

    let rows = project_rows(&result.selected_candidates, &focus_code)?;
    Ok(AnalysisOutcome { rows, warnings })
}
