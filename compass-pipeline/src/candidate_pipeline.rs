//! The candidate pipeline contract.
//!
//! A pipeline wires concrete stage components together and inherits the
//! execution order from the default `execute`:
//! query hydrators → sources → hydrators → filters → scorers → selector →
//! post-selection hydrators → post-selection filters → side effects.
//!
//! Stage failures never abort a run: they are logged with the request id and
//! the batch continues with the candidates it has. Fatal conditions belong to
//! the caller's error type, not to the stages.

use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::{Filter, FilterResult};
use crate::hydrator::Hydrator;
use crate::query_hydrator::QueryHydrator;
use crate::scorer::Scorer;
use crate::selector::Selector;
use crate::side_effect::{SideEffect, SideEffectInput};
use crate::source::Source;

/// Queries carry a request id for log correlation across stages.
pub trait HasRequestId {
    fn request_id(&self) -> &str;
}

/// Everything a pipeline observed while executing one query.
pub struct PipelineResult<Q, C> {
    pub query: Arc<Q>,
    /// Candidates as produced by the sources, before any filtering.
    pub retrieved_candidates: Vec<C>,
    /// Candidates removed by any filter stage.
    pub filtered_candidates: Vec<C>,
    /// The final, ordered selection.
    pub selected_candidates: Vec<C>,
}

#[async_trait]
pub trait CandidatePipeline<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    fn query_hydrators(&self) -> &[Box<dyn QueryHydrator<Q>>];

    fn sources(&self) -> &[Box<dyn Source<Q, C>>];

    fn hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];

    fn filters(&self) -> &[Box<dyn Filter<Q, C>>];

    fn scorers(&self) -> &[Box<dyn Scorer<Q, C>>];

    fn selector(&self) -> &dyn Selector<Q, C>;

    fn post_selection_hydrators(&self) -> &[Box<dyn Hydrator<Q, C>>];

    fn post_selection_filters(&self) -> &[Box<dyn Filter<Q, C>>];

    fn side_effects(&self) -> Arc<Vec<Box<dyn SideEffect<Q, C>>>>;

    /// Run the full stage sequence for one query.
    async fn execute(&self, query: Q) -> PipelineResult<Q, C> {
        let mut query = query;

        for query_hydrator in self.query_hydrators() {
            if !query_hydrator.enable(&query) {
                continue;
            }
            match query_hydrator.hydrate(&query).await {
                Ok(hydrated) => query_hydrator.update(&mut query, hydrated),
                Err(e) => log::warn!(
                    "request_id={} query hydrator {} failed: {}",
                    query.request_id(),
                    query_hydrator.name(),
                    e
                ),
            }
        }

        let mut retrieved: Vec<C> = Vec::new();
        for source in self.sources() {
            if !source.enable(&query) {
                continue;
            }
            match source.get_candidates(&query).await {
                Ok(candidates) => retrieved.extend(candidates),
                Err(e) => log::warn!(
                    "request_id={} source {} failed: {}",
                    query.request_id(),
                    source.name(),
                    e
                ),
            }
        }

        let mut removed: Vec<C> = Vec::new();
        let mut candidates = retrieved.clone();

        candidates = apply_hydrators(self.hydrators(), &query, candidates).await;
        candidates = apply_filters(self.filters(), &query, candidates, &mut removed).await;

        for scorer in self.scorers() {
            if !scorer.enable(&query) {
                continue;
            }
            match scorer.score(&query, &candidates).await {
                Ok(scored) if scored.len() == candidates.len() => {
                    for (candidate, scored_candidate) in candidates.iter_mut().zip(scored) {
                        scorer.update(candidate, scored_candidate);
                    }
                }
                Ok(scored) => log::warn!(
                    "request_id={} scorer {} returned {} results for {} candidates; skipped",
                    query.request_id(),
                    scorer.name(),
                    scored.len(),
                    candidates.len()
                ),
                Err(e) => log::warn!(
                    "request_id={} scorer {} failed: {}",
                    query.request_id(),
                    scorer.name(),
                    e
                ),
            }
        }

        let mut selected = self.selector().select(&query, candidates);
        selected = apply_hydrators(self.post_selection_hydrators(), &query, selected).await;
        selected = apply_filters(self.post_selection_filters(), &query, selected, &mut removed).await;

        let query = Arc::new(query);
        let input = Arc::new(SideEffectInput {
            query: Arc::clone(&query),
            selected_candidates: selected.clone(),
        });
        for side_effect in self.side_effects().iter() {
            if !side_effect.enable(Arc::clone(&query)) {
                continue;
            }
            if let Err(e) = side_effect.run(Arc::clone(&input)).await {
                log::warn!(
                    "request_id={} side effect {} failed: {}",
                    query.request_id(),
                    side_effect.name(),
                    e
                );
            }
        }

        PipelineResult {
            query,
            retrieved_candidates: retrieved,
            filtered_candidates: removed,
            selected_candidates: selected,
        }
    }
}

async fn apply_hydrators<Q, C>(
    hydrators: &[Box<dyn Hydrator<Q, C>>],
    query: &Q,
    mut candidates: Vec<C>,
) -> Vec<C>
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for hydrator in hydrators {
        if !hydrator.enable(query) {
            continue;
        }
        match hydrator.hydrate(query, &candidates).await {
            Ok(hydrated) if hydrated.len() == candidates.len() => {
                for (candidate, hydrated_candidate) in candidates.iter_mut().zip(hydrated) {
                    hydrator.update(candidate, hydrated_candidate);
                }
            }
            Ok(hydrated) => log::warn!(
                "request_id={} hydrator {} returned {} results for {} candidates; skipped",
                query.request_id(),
                hydrator.name(),
                hydrated.len(),
                candidates.len()
            ),
            Err(e) => log::warn!(
                "request_id={} hydrator {} failed: {}",
                query.request_id(),
                hydrator.name(),
                e
            ),
        }
    }
    candidates
}

async fn apply_filters<Q, C>(
    filters: &[Box<dyn Filter<Q, C>>],
    query: &Q,
    mut candidates: Vec<C>,
    removed: &mut Vec<C>,
) -> Vec<C>
where
    Q: Clone + Send + Sync + HasRequestId + 'static,
    C: Clone + Send + Sync + 'static,
{
    for filter in filters {
        if !filter.enable(query) {
            continue;
        }
        // The filter consumes the set, so keep a fallback copy in case it fails.
        match filter.filter(query, candidates.clone()).await {
            Ok(FilterResult { kept, removed: dropped }) => {
                candidates = kept;
                removed.extend(dropped);
            }
            Err(e) => log::warn!(
                "request_id={} filter {} failed: {}",
                query.request_id(),
                filter.name(),
                e
            ),
        }
    }
    candidates
}
