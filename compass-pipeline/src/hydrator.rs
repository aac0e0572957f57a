use async_trait::async_trait;

use crate::util;

/// Hydrators enrich candidates with derived or external context before the
/// scoring stages run. Each hydrator returns a parallel vector of enriched
/// copies; `update` then copies only the fields it owns back onto the
/// original candidates.
#[async_trait]
pub trait Hydrator<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this hydrator should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Produce enriched copies of the candidates, one per input, same order.
    async fn hydrate(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the fields this hydrator is responsible for onto the candidate.
    fn update(&self, candidate: &mut C, hydrated: C);

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
