use async_trait::async_trait;

use crate::query_hydrator::QueryHydrator;
use crate::types::AnalysisQuery;

/// Label applied when the caller does not name the snapshot. The analysis
/// always runs over whatever single snapshot it was handed.
pub const DEFAULT_SNAPSHOT_LABEL: &str = "latest";

/// Fills in a snapshot label when the caller left it empty, so downstream
/// logging and reports always have something to cite.
pub struct SnapshotStampQueryHydrator;

#[async_trait]
impl QueryHydrator<AnalysisQuery> for SnapshotStampQueryHydrator {
    async fn hydrate(&self, query: &AnalysisQuery) -> Result<AnalysisQuery, String> {
        if query.snapshot_label.is_empty() {
            Ok(AnalysisQuery {
                snapshot_label: DEFAULT_SNAPSHOT_LABEL.to_string(),
                ..query.clone()
            })
        } else {
            Ok(query.clone())
        }
    }

    fn update(&self, query: &mut AnalysisQuery, hydrated: AnalysisQuery) {
        query.snapshot_label = hydrated.snapshot_label;
    }
}
