use crate::core::{CanonicalPair, PoolId, SdkResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Lookup = Shared<BoxFuture<'static, SdkResult<Option<PoolId>>>>;

/// Process-lifetime pool id cache with per-pair single-flight lookups.
///
/// Resolved ids never expire. Negative and failed lookups are not cached,
/// so the next caller issues a fresh lookup.
#[derive(Default)]
pub struct PoolCache {
    resolved: DashMap<CanonicalPair, PoolId>,
    in_flight: DashMap<CanonicalPair, (u64, Lookup)>,
    generation: AtomicU64,
}

impl PoolCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, pair: &CanonicalPair) -> Option<PoolId> {
        self.resolved.get(pair).map(|entry| entry.value().clone())
    }

    /// Return the cached id or join (or start) the single in-flight lookup.
    ///
    /// `lookup` is only invoked when no lookup for `pair` is running. The
    /// shared future keeps running for the remaining waiters if the caller
    /// that started it is dropped.
    pub async fn get_or_lookup<F>(self: &Arc<Self>, pair: &CanonicalPair, lookup: F) -> SdkResult<Option<PoolId>>
    where
        F: FnOnce() -> BoxFuture<'static, SdkResult<Option<PoolId>>>,
    {
        if let Some(id) = self.get(pair) {
            debug!("Pool cache hit for {}", pair);
            return Ok(Some(id));
        }

        let shared = match self.in_flight.entry(pair.clone()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight lookup for {}", pair);
                entry.get().1.clone()
            }
            Entry::Vacant(entry) => {
                // Another caller may have finished between the miss and the entry lock
                if let Some(id) = self.get(pair) {
                    return Ok(Some(id));
                }

                let generation = self.generation.fetch_add(1, Ordering::Relaxed);
                debug!("Starting lookup #{} for {}", generation, pair);

                let cache = Arc::clone(self);
                let key = pair.clone();
                let inner = lookup();
                let shared = async move {
                    let result = inner.await;
                    cache.settle(&key, generation, &result);
                    result
                }
                .boxed()
                .shared();

                entry.insert((generation, shared.clone()));
                shared
            }
        };

        shared.await
    }

    /// Record the outcome of lookup `generation`, unless it was invalidated meanwhile.
    fn settle(&self, pair: &CanonicalPair, generation: u64, result: &SdkResult<Option<PoolId>>) {
        let current = self
            .in_flight
            .get(pair)
            .map(|entry| entry.0 == generation)
            .unwrap_or(false);

        if current {
            if let Ok(Some(id)) = result {
                self.resolved.insert(pair.clone(), id.clone());
            }
        }
        self.in_flight.remove_if(pair, |_, (g, _)| *g == generation);
    }

    /// Forget the pair so the next resolve goes back to the registry.
    pub fn invalidate(&self, pair: &CanonicalPair) {
        self.resolved.remove(pair);
        self.in_flight.remove(pair);
    }

    pub fn clear(&self) {
        self.resolved.clear();
        self.in_flight.clear();
    }

    pub fn size(&self) -> usize {
        self.resolved.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}
