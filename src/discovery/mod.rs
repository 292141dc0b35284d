pub mod pool_cache;


use crate::chain::{with_timeout, ChainReader};
use crate::core::{CanonicalPair, PoolId, PoolState, SdkError, SdkResult, TokenType};
use futures::future::FutureExt;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

pub use pool_cache::PoolCache;

/// Maps an unordered token pair to its pool object.
#[derive(Clone)]
pub struct PoolResolver {
    chain: Arc<dyn ChainReader>,
    cache: Arc<PoolCache>,
    timeout: Duration,
}

impl PoolResolver {
    pub fn new(chain: Arc<dyn ChainReader>, timeout: Duration) -> Self {
        Self {
            chain,
            cache: PoolCache::new(),
            timeout,
        }
    }

    /// Pool id for `(token_a, token_b)` in either order.
    pub async fn resolve(&self, token_a: &TokenType, token_b: &TokenType) -> SdkResult<PoolId> {
        let (pair, _) = CanonicalPair::new(token_a, token_b)?;
        self.resolve_pair(&pair).await
    }

    pub async fn resolve_pair(&self, pair: &CanonicalPair) -> SdkResult<PoolId> {
        let chain = self.chain.clone();
        let timeout = self.timeout;
        let key = pair.clone();

        let found = self
            .cache
            .get_or_lookup(pair, move || {
                async move {
                    info!("Looking up pool {} in registry", key.lp_name());
                    with_timeout(timeout, "lookup_pool_registry", chain.lookup_pool_registry(&key))
                        .await
                }
                .boxed()
            })
            .await?;

        match found {
            Some(id) => {
                debug!("Resolved {} -> {}", pair, id);
                Ok(id)
            }
            None => Err(SdkError::PoolNotFound {
                coin_x: pair.x.to_string(),
                coin_y: pair.y.to_string(),
            }),
        }
    }

    /// Current pool state, read through the chain with the per-call timeout.
    pub async fn fetch_pool(&self, pool_id: &PoolId) -> SdkResult<PoolState> {
        with_timeout(
            self.timeout,
            "fetch_pool_reserves",
            self.chain.fetch_pool_reserves(pool_id),
        )
        .await
    }

    /// Drop any cached or in-flight entry for the pair.
    pub fn invalidate(&self, token_a: &TokenType, token_b: &TokenType) -> SdkResult<()> {
        let (pair, _) = CanonicalPair::new(token_a, token_b)?;
        debug!("Invalidating pool cache for {}", pair);
        self.cache.invalidate(&pair);
        Ok(())
    }

    pub fn cache(&self) -> &PoolCache {
        &self.cache
    }
}
