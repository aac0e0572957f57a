use async_trait::async_trait;

use crate::filter::{Filter, FilterResult};
use crate::types::{AnalysisQuery, ItemComparison};

/// Restricts the run to the departments named in the query's filters.
/// Disabled entirely when the query carries no department scope.
pub struct ScopeFilter;

fn scoped_departments(query: &AnalysisQuery) -> Option<&[String]> {
    query
        .filters
        .as_ref()
        .and_then(|f| f.departments.as_deref())
}

#[async_trait]
impl Filter<AnalysisQuery, ItemComparison> for ScopeFilter {
    fn enable(&self, query: &AnalysisQuery) -> bool {
        scoped_departments(query).is_some()
    }

    async fn filter(
        &self,
        query: &AnalysisQuery,
        candidates: Vec<ItemComparison>,
    ) -> Result<FilterResult<ItemComparison>, String> {
        let departments = scoped_departments(query).unwrap_or(&[]);
        let (kept, removed): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|candidate| departments.contains(&candidate.hierarchy.department));

        Ok(FilterResult { kept, removed })
    }
}
