pub mod build;
pub mod coins;
pub mod pool;
pub mod quote;

use crate::chain::{JsonRpcClient, SuiAddress, TransactionSubmitter};
use crate::core::{Config, SdkError, SdkResult};
use crate::transaction::{DipcoinClient, TransactionIntent};
use std::sync::Arc;

/// The CLI holds no keys, so nothing it builds can be submitted.
struct OfflineSubmitter;

#[async_trait::async_trait]
impl TransactionSubmitter for OfflineSubmitter {
    async fn submit(&self, intent: &TransactionIntent) -> SdkResult<serde_json::Value> {
        Err(SdkError::SubmissionFailed(format!(
            "no signer available for {}",
            intent.entry_point().unwrap_or("intent")
        )))
    }
}

/// Client reading from the configured node.
pub fn connect(config: &Config, sender: SuiAddress) -> SdkResult<DipcoinClient> {
    let chain = Arc::new(JsonRpcClient::new(config)?);
    DipcoinClient::new(config.clone(), chain, Arc::new(OfflineSubmitter), sender)
}
