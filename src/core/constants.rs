use crate::core::types::Network;
use std::collections::HashMap;

/// On-chain object ids of a Dipcoin deployment.
#[derive(Debug, Clone)]
pub struct ContractConstants {
    pub package_id: &'static str,
    pub version_id: &'static str,
    pub global_id: &'static str,
    pub pool_registry_table_id: &'static str,
}

// Deployments by network
lazy_static::lazy_static! {
    pub static ref CONTRACT_CONSTANTS: HashMap<Network, ContractConstants> = {
        let mut m = HashMap::new();
        m.insert(
            Network::Testnet,
            ContractConstants {
                package_id: "0xa21247f737d7ff2b2b2a03411f4693001b24ad2e217b863d1a3dbfadee9ddd3c",
                version_id: "0xd4d49b0915459f013072d2c10139eeacac9865fedfc71108cc98565e446370fa",
                global_id: "0x73ea415d3adb8c5ba4cc6322eaaf40f8d99ee54d979891df467ff478ba2154ff",
                pool_registry_table_id: "0xeb87cbc1fb3cdd9d645f5b8793f30a4745637800babef11d37f4fd20569d60a8",
            },
        );
        m
    };

    pub static ref NODE_RPC: HashMap<Network, &'static str> = {
        let mut m = HashMap::new();
        m.insert(Network::Testnet, "https://fullnode.testnet.sui.io:443");
        m.insert(Network::Mainnet, "https://fullnode.mainnet.sui.io:443");
        m
    };
}

// Router module and entry points
pub const ROUTER_MODULE: &str = "router";
pub const LP_MODULE: &str = "manage";

pub const FN_ADD_LIQUIDITY: &str = "add_liquidity";
pub const FN_REMOVE_LIQUIDITY: &str = "remove_liquidity";
pub const FN_SWAP_EXACT_X_TO_Y: &str = "swap_exact_x_to_y";
pub const FN_SWAP_EXACT_Y_TO_X: &str = "swap_exact_y_to_x";
pub const FN_SWAP_X_TO_EXACT_Y: &str = "swap_x_to_exact_y";
pub const FN_SWAP_Y_TO_EXACT_X: &str = "swap_y_to_exact_x";

// Registry key type
pub const REGISTRY_KEY_TYPE: &str = "0x1::string::String";

// Fee arithmetic (basis points)
pub const FEE_SCALE: u64 = 10_000;
pub const MAX_FEE_RATE: u64 = 10_000;

// Slippage fixed point (parts per million)
pub const SLIPPAGE_SCALE: u64 = 1_000_000;

// RPC Configuration
pub const DEFAULT_RPC_TIMEOUT: u64 = 30;
pub const COINS_PAGE_LIMIT: u32 = 50;

// Transaction Configuration
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50; // 0.5%

// Router abort codes raised by the bound checks
pub const DEFAULT_SLIPPAGE_ABORT_CODES: &[u64] = &[4, 5];
