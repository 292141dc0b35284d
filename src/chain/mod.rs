//! Network-facing collaborators.
//!
//! The core never talks to a node directly. Reads go through
//! [`ChainReader`] and submissions through [`TransactionSubmitter`], both of
//! which are suspension points that may time out independently.

pub mod rpc_client;

use crate::coins::CoinSet;
use crate::core::{CanonicalPair, ObjectId, PoolId, PoolState, SdkError, SdkResult, TokenType};
use crate::transaction::TransactionIntent;
use std::future::Future;
use std::time::Duration;

pub use rpc_client::JsonRpcClient;

/// Account address. Shares the object id format.
pub type SuiAddress = ObjectId;

/// Read-only chain queries.
#[async_trait::async_trait]
pub trait ChainReader: Send + Sync {
    async fn fetch_owned_coins(&self, owner: &SuiAddress, token_type: &TokenType)
        -> SdkResult<CoinSet>;

    async fn fetch_pool_reserves(&self, pool_id: &PoolId) -> SdkResult<PoolState>;

    /// `Ok(None)` when the registry has no entry for the pair.
    async fn lookup_pool_registry(&self, pair: &CanonicalPair) -> SdkResult<Option<PoolId>>;
}

/// Signs and submits a built intent, returning the node's raw effects.
#[async_trait::async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, intent: &TransactionIntent) -> SdkResult<serde_json::Value>;
}

/// Bound one network call. Expiry surfaces as a retryable `Timeout`.
pub async fn with_timeout<T, F>(timeout: Duration, operation: &str, fut: F) -> SdkResult<T>
where
    F: Future<Output = SdkResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(SdkError::Timeout {
            operation: operation.to_string(),
            millis: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::coins::test_support::coin;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory chain with call counters.
    #[derive(Default)]
    pub struct MockChain {
        pools: Mutex<HashMap<CanonicalPair, PoolState>>,
        coins: Mutex<Vec<(TokenType, Vec<u64>)>>,
        registry_delay: Option<Duration>,
        submit_response: Mutex<Option<SdkResult<serde_json::Value>>>,
        submitted: Mutex<Vec<TransactionIntent>>,
        pub registry_calls: AtomicUsize,
        pub reserve_calls: AtomicUsize,
        pub coin_calls: AtomicUsize,
        pub submit_calls: AtomicUsize,
    }

    impl MockChain {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_registry_delay(mut self, delay: Duration) -> Self {
            self.registry_delay = Some(delay);
            self
        }

        pub fn add_pool(&self, pair: CanonicalPair, state: PoolState) {
            self.pools.lock().unwrap().insert(pair, state);
        }

        pub fn remove_pool(&self, pair: &CanonicalPair) {
            self.pools.lock().unwrap().remove(pair);
        }

        /// Replace the owned coins of `token_type`. Ids are `0x{type index}{coin index}`.
        pub fn set_coins(&self, token_type: &str, balances: &[u64]) {
            let token_type = TokenType::from(token_type);
            let mut coins = self.coins.lock().unwrap();
            match coins.iter_mut().find(|(t, _)| *t == token_type) {
                Some((_, existing)) => *existing = balances.to_vec(),
                None => coins.push((token_type, balances.to_vec())),
            }
        }

        pub fn set_submit_response(&self, response: SdkResult<serde_json::Value>) {
            *self.submit_response.lock().unwrap() = Some(response);
        }

        pub fn submitted(&self) -> Vec<TransactionIntent> {
            self.submitted.lock().unwrap().clone()
        }

        pub fn calls(counter: &AtomicUsize) -> usize {
            counter.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ChainReader for MockChain {
        async fn fetch_owned_coins(
            &self,
            _owner: &SuiAddress,
            token_type: &TokenType,
        ) -> SdkResult<CoinSet> {
            self.coin_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;

            let (prefix, balances) = {
                let coins = self.coins.lock().unwrap();
                match coins.iter().position(|(t, _)| t == token_type) {
                    Some(index) => (index + 1, coins[index].1.clone()),
                    None => (0, Vec::new()),
                }
            };
            let coins = balances
                .iter()
                .enumerate()
                .map(|(i, balance)| {
                    coin(
                        &format!("0x{:x}{:04x}", prefix, i + 1),
                        token_type.as_str(),
                        *balance,
                    )
                })
                .collect();
            CoinSet::new(token_type.clone(), coins)
        }

        async fn fetch_pool_reserves(&self, pool_id: &PoolId) -> SdkResult<PoolState> {
            self.reserve_calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;

            self.pools
                .lock()
                .unwrap()
                .values()
                .find(|state| &state.id == pool_id)
                .cloned()
                .ok_or_else(|| SdkError::InvalidPoolState(format!("No pool object {}", pool_id)))
        }

        async fn lookup_pool_registry(&self, pair: &CanonicalPair) -> SdkResult<Option<PoolId>> {
            self.registry_calls.fetch_add(1, Ordering::SeqCst);
            match self.registry_delay {
                Some(delay) => tokio::time::sleep(delay).await,
                None => tokio::task::yield_now().await,
            }

            Ok(self
                .pools
                .lock()
                .unwrap()
                .get(pair)
                .map(|state| state.id.clone()))
        }
    }

    #[async_trait::async_trait]
    impl TransactionSubmitter for MockChain {
        async fn submit(&self, intent: &TransactionIntent) -> SdkResult<serde_json::Value> {
            self.submit_calls.fetch_add(1, Ordering::SeqCst);
            self.submitted.lock().unwrap().push(intent.clone());

            self.submit_response
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| {
                    Ok(serde_json::json!({
                        "digest": "9mGkqR2NDsXKk4x1k5PvhJWMn7sVqkDrLfnJnYy2C7ff",
                        "effects": { "status": { "status": "success" } }
                    }))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_timeout_passes_result_through() {
        let result = tokio_test::block_on(with_timeout(
            Duration::from_secs(1),
            "fetch_pool_reserves",
            async { Ok::<u64, SdkError>(7) },
        ));
        assert_eq!(result, Ok(7));
    }

    #[test]
    fn test_with_timeout_expires() {
        let result = tokio_test::block_on(with_timeout(
            Duration::from_millis(10),
            "lookup_pool_registry",
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<u64, SdkError>(7)
            },
        ));
        assert_eq!(
            result,
            Err(SdkError::Timeout {
                operation: "lookup_pool_registry".to_string(),
                millis: 10,
            })
        );
        // Sub-second budgets are reported as such, not rounded down to zero
        assert_eq!(
            result.unwrap_err().to_string(),
            "Timeout: lookup_pool_registry took longer than 10 ms"
        );
    }
}
