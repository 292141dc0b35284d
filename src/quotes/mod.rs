pub mod amm_calculator;
pub mod liquidity_calculator;
pub mod math;
pub mod slippage;

use crate::core::{PoolState, SdkResult, SwapDirection};
use serde::{Deserialize, Serialize};

pub use amm_calculator::AmmQuoteCalculator;
pub use liquidity_calculator::LiquidityCalculator;
pub use slippage::Slippage;

/// Side of a canonical pool pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolSide {
    X,
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapExactInQuote {
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    pub min_amount_out: u64,
    pub price_impact: f64,
    pub fee: u64,
    pub slippage: Slippage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapExactOutQuote {
    pub direction: SwapDirection,
    pub amount_out: u64,
    pub amount_in: u64,
    pub max_amount_in: u64,
    pub price_impact: f64,
    pub fee: u64,
    pub slippage: Slippage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityQuote {
    pub amount_x: u64,
    pub amount_y: u64,
    pub min_amount_x: u64,
    pub min_amount_y: u64,
    pub max_amount_x: u64,
    pub max_amount_y: u64,
    pub slippage: Slippage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityQuote {
    pub lp_amount: u64,
    pub amount_x: u64,
    pub amount_y: u64,
    pub min_amount_x: u64,
    pub min_amount_y: u64,
    pub slippage: Slippage,
}

/// Quote attached to a built intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Quote {
    SwapExactIn(SwapExactInQuote),
    SwapExactOut(SwapExactOutQuote),
    AddLiquidity(AddLiquidityQuote),
    RemoveLiquidity(RemoveLiquidityQuote),
}

/// Pure, synchronous pricing for swaps and liquidity changes.
///
/// Every method is a function of the pool snapshot and the request; nothing
/// here performs I/O.
pub struct QuoteEngine {
    amm_calculator: AmmQuoteCalculator,
    liquidity_calculator: LiquidityCalculator,
}

impl QuoteEngine {
    pub fn new() -> Self {
        Self {
            amm_calculator: AmmQuoteCalculator::new(),
            liquidity_calculator: LiquidityCalculator::new(),
        }
    }

    pub fn swap_exact_in(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_in: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactInQuote> {
        self.amm_calculator
            .quote_exact_in(pool, direction, amount_in, slippage)
    }

    pub fn swap_exact_out(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_out: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactOutQuote> {
        self.amm_calculator
            .quote_exact_out(pool, direction, amount_out, slippage)
    }

    pub fn add_liquidity(
        &self,
        pool: &PoolState,
        x_desired: u64,
        y_desired: u64,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        self.liquidity_calculator
            .quote_add(pool, x_desired, y_desired, slippage)
    }

    pub fn add_liquidity_single(
        &self,
        pool: &PoolState,
        side: PoolSide,
        amount: u64,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        self.liquidity_calculator
            .quote_add_single(pool, side, amount, slippage)
    }

    pub fn remove_liquidity(
        &self,
        pool: &PoolState,
        lp_amount: u64,
        slippage: Slippage,
    ) -> SdkResult<RemoveLiquidityQuote> {
        self.liquidity_calculator
            .quote_remove(pool, lp_amount, slippage)
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new()
    }
}
