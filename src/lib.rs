pub mod chain;
pub mod cli;
pub mod coins;
pub mod core;
pub mod discovery;
pub mod quotes;
pub mod transaction;
pub mod utils;

// Re-export commonly used types
pub use crate::chain::{ChainReader, JsonRpcClient, SuiAddress, TransactionSubmitter};
pub use crate::coins::{CoinPlan, CoinSelector, CoinSet};
pub use crate::core::{CanonicalPair, Config, Network, ObjectId, PoolId, PoolState, SdkError, SdkResult, TokenType};
pub use crate::discovery::PoolResolver;
pub use crate::quotes::{QuoteEngine, Slippage};
pub use crate::transaction::{DipcoinClient, ExecutionResult, FailureCode, IntentRequest, TransactionIntent};
