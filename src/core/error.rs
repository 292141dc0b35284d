use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised by the SDK before (or instead of) a submission.
///
/// The type is `Clone` so that a single in-flight registry lookup can hand
/// the same failure to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid slippage: {0}")]
    InvalidSlippage(String),

    #[error("Invalid fee rate: {0} (max 10000 bps)")]
    InvalidFeeRate(u64),

    #[error("Insufficient {token_type} balance: required {required}, available {available} (short by {shortfall})")]
    InsufficientBalance {
        token_type: String,
        required: u64,
        available: u64,
        shortfall: u64,
    },

    #[error("Coin type mismatch: expected {expected}, found {found}")]
    CoinTypeMismatch { expected: String, found: String },

    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: u64, available: u64 },

    #[error("Cannot pair token {0} with itself")]
    IdenticalTokens(String),

    #[error("Pool not found for pair {coin_x}/{coin_y}")]
    PoolNotFound { coin_x: String, coin_y: String },

    #[error("Pool {0} has an empty reserve")]
    PoolEmpty(String),

    #[error("Slippage exceeded on-chain: {0}")]
    SlippageExceeded(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Timeout: {operation} took longer than {millis} ms")]
    Timeout { operation: String, millis: u64 },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("Invalid pool state: {0}")]
    InvalidPoolState(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Math overflow in calculation")]
    MathOverflow,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Coin {0} is reserved by another in-flight build")]
    CoinReserved(String),
}

impl SdkError {
    /// Whether the caller may retry the same request with a fresh build.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SdkError::Timeout { .. } | SdkError::NetworkError(_))
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(err: reqwest::Error) -> Self {
        SdkError::NetworkError(err.to_string())
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::SerializationError(err.to_string())
    }
}
