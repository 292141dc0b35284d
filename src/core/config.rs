use crate::core::{
    constants::*,
    error::SdkResult,
    types::{Network, ObjectId},
    SdkError,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: Network,
    pub rpc_url: String,
    pub package_id: String,
    pub version_id: String,
    pub global_id: String,
    pub pool_registry_table_id: String,
    pub request_timeout_secs: u64,
    pub default_slippage_bps: u16,
    pub slippage_abort_codes: Vec<u64>,
}

impl Config {
    /// Built-in deployment for `network`.
    pub fn for_network(network: Network) -> SdkResult<Self> {
        let contracts = CONTRACT_CONSTANTS.get(&network).ok_or_else(|| {
            SdkError::ConfigError(format!("No Dipcoin deployment known for {}", network))
        })?;
        let rpc_url = NODE_RPC
            .get(&network)
            .ok_or_else(|| SdkError::ConfigError(format!("No RPC endpoint known for {}", network)))?;

        Ok(Self {
            network,
            rpc_url: rpc_url.to_string(),
            package_id: contracts.package_id.to_string(),
            version_id: contracts.version_id.to_string(),
            global_id: contracts.global_id.to_string(),
            pool_registry_table_id: contracts.pool_registry_table_id.to_string(),
            request_timeout_secs: DEFAULT_RPC_TIMEOUT,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            slippage_abort_codes: DEFAULT_SLIPPAGE_ABORT_CODES.to_vec(),
        })
    }

    /// Start from the deployment named by `DIPCOIN_NETWORK` (default testnet)
    /// and apply `DIPCOIN_*` overrides.
    pub fn from_env() -> SdkResult<Self> {
        let network: Network = env::var("DIPCOIN_NETWORK")
            .unwrap_or_else(|_| "testnet".to_string())
            .parse()?;

        let mut config = match Self::for_network(network) {
            Ok(config) => config,
            // Unknown deployments must be fully described by the environment
            Err(_) => Self {
                network,
                rpc_url: required_var("DIPCOIN_RPC_URL")?,
                package_id: required_var("DIPCOIN_PACKAGE_ID")?,
                version_id: required_var("DIPCOIN_VERSION_ID")?,
                global_id: required_var("DIPCOIN_GLOBAL_ID")?,
                pool_registry_table_id: required_var("DIPCOIN_POOL_REGISTRY_ID")?,
                request_timeout_secs: DEFAULT_RPC_TIMEOUT,
                default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
                slippage_abort_codes: DEFAULT_SLIPPAGE_ABORT_CODES.to_vec(),
            },
        };

        if let Ok(url) = env::var("DIPCOIN_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(id) = env::var("DIPCOIN_PACKAGE_ID") {
            config.package_id = id;
        }
        if let Ok(id) = env::var("DIPCOIN_VERSION_ID") {
            config.version_id = id;
        }
        if let Ok(id) = env::var("DIPCOIN_GLOBAL_ID") {
            config.global_id = id;
        }
        if let Ok(id) = env::var("DIPCOIN_POOL_REGISTRY_ID") {
            config.pool_registry_table_id = id;
        }
        if let Some(secs) = parse_override("DIPCOIN_TIMEOUT_SECS", env::var("DIPCOIN_TIMEOUT_SECS").ok())? {
            config.request_timeout_secs = secs;
        }
        if let Some(bps) = parse_override(
            "DIPCOIN_DEFAULT_SLIPPAGE_BPS",
            env::var("DIPCOIN_DEFAULT_SLIPPAGE_BPS").ok(),
        )? {
            config.default_slippage_bps = bps;
        }
        if let Ok(codes) = env::var("DIPCOIN_SLIPPAGE_ABORT_CODES") {
            config.slippage_abort_codes = codes
                .split(',')
                .map(|c| {
                    c.trim().parse::<u64>().map_err(|_| {
                        SdkError::ConfigError(format!("Invalid abort code: {}", c))
                    })
                })
                .collect::<SdkResult<Vec<_>>>()?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> SdkResult<()> {
        if self.request_timeout_secs == 0 {
            return Err(SdkError::ConfigError(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if self.default_slippage_bps >= 10000 {
            return Err(SdkError::ConfigError(
                "Default slippage must be below 100%".to_string(),
            ));
        }

        for (name, id) in [
            ("package_id", &self.package_id),
            ("version_id", &self.version_id),
            ("global_id", &self.global_id),
            ("pool_registry_table_id", &self.pool_registry_table_id),
        ] {
            id.parse::<ObjectId>()
                .map_err(|e| SdkError::ConfigError(format!("{}: {}", name, e)))?;
        }

        if self.rpc_url.is_empty() {
            return Err(SdkError::ConfigError("RPC url is empty".to_string()));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn router_target(&self, function: &str) -> String {
        format!("{}::{}::{}", self.package_id, ROUTER_MODULE, function)
    }
}

/// Unset means no override; a set but malformed value is an error.
fn parse_override<T: FromStr>(name: &str, raw: Option<String>) -> SdkResult<Option<T>> {
    match raw {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SdkError::ConfigError(format!("Invalid {}: {}", name, value))),
    }
}

fn required_var(name: &str) -> SdkResult<String> {
    env::var(name).map_err(|_| SdkError::ConfigError(format!("{} must be set", name)))
}
