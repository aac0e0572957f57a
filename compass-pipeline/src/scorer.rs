use async_trait::async_trait;

use crate::util;

/// Scorers derive values from candidates. They run sequentially after the
/// filters, so a later scorer can read fields an earlier scorer populated.
/// Like hydrators, a scorer returns scored copies and `update` writes only
/// its own fields back.
#[async_trait]
pub trait Scorer<Q, C>: Send + Sync
where
    Q: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    /// Decide if this scorer should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Produce scored copies of the candidates, one per input, same order.
    async fn score(&self, query: &Q, candidates: &[C]) -> Result<Vec<C>, String>;

    /// Copy the fields this scorer is responsible for onto the candidate.
    fn update(&self, candidate: &mut C, scored: C);

    /// Returns a stable name for logging/metrics.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
