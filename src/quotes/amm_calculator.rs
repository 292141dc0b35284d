use crate::core::{PoolState, SdkError, SdkResult, SwapDirection, FEE_SCALE, MAX_FEE_RATE};
use crate::quotes::math::{to_u64, U256};
use crate::quotes::slippage::Slippage;
use crate::quotes::{SwapExactInQuote, SwapExactOutQuote};
use log::debug;

/// Constant product (x * y = k) swap calculator.
///
/// Mirrors the router's integer arithmetic: fees are basis points of
/// `FEE_SCALE` applied to the input side, and every division truncates.
pub struct AmmQuoteCalculator;

impl AmmQuoteCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Output for an exact input.
    ///
    /// `out = in*(S-f)*r_out / (r_in*S + in*(S-f))`
    pub fn get_amount_out(
        &self,
        fee_rate: u64,
        amount_in: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> SdkResult<u64> {
        validate_inputs(fee_rate, amount_in, reserve_in, reserve_out)?;

        let fee_multiplier = U256::from(FEE_SCALE - fee_rate);
        let amount_in_after_fees = U256::from(amount_in) * fee_multiplier;
        let new_reserve_in = U256::from(reserve_in) * U256::from(FEE_SCALE) + amount_in_after_fees;

        to_u64(amount_in_after_fees * U256::from(reserve_out) / new_reserve_in)
    }

    /// Input needed for an exact output.
    ///
    /// `in = r_in*out*S / ((r_out-out)*(S-f)) + 1`
    pub fn get_amount_in(
        &self,
        fee_rate: u64,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> SdkResult<u64> {
        validate_inputs(fee_rate, amount_out, reserve_in, reserve_out)?;

        if amount_out >= reserve_out {
            return Err(SdkError::InsufficientLiquidity {
                requested: amount_out,
                available: reserve_out,
            });
        }
        if fee_rate == MAX_FEE_RATE {
            return Err(SdkError::InvalidFeeRate(fee_rate));
        }

        let numerator = U256::from(reserve_in) * U256::from(amount_out) * U256::from(FEE_SCALE);
        let denominator =
            U256::from(reserve_out - amount_out) * U256::from(FEE_SCALE - fee_rate);

        to_u64(numerator / denominator + U256::one())
    }

    /// Price impact in percent, relative to the spot price before the swap.
    pub fn calculate_price_impact(
        &self,
        amount_in: u64,
        amount_out: u64,
        reserve_in: u64,
        reserve_out: u64,
    ) -> f64 {
        if amount_in == 0 || amount_out == 0 || reserve_in == 0 || reserve_out == 0 {
            return 0.0;
        }

        let initial_price = reserve_out as f64 / reserve_in as f64;
        let execution_price = amount_out as f64 / amount_in as f64;

        (1.0 - execution_price / initial_price) * 100.0
    }

    /// Fee charged on `amount_in`, truncated.
    pub fn calculate_fee(&self, amount_in: u64, fee_rate: u64) -> u64 {
        (u128::from(amount_in) * u128::from(fee_rate) / u128::from(FEE_SCALE)) as u64
    }

    pub fn quote_exact_in(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_in: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactInQuote> {
        let (reserve_in, reserve_out) = pool.reserves(direction);
        ensure_reserves(pool, reserve_in, reserve_out)?;

        debug!(
            "Exact-in quote: pool={}, amount_in={}, reserve_in={}, reserve_out={}, fee={}",
            pool.id, amount_in, reserve_in, reserve_out, pool.fee_rate
        );

        let amount_out = self.get_amount_out(pool.fee_rate, amount_in, reserve_in, reserve_out)?;
        if amount_out == 0 {
            return Err(SdkError::InvalidAmount(format!(
                "Input {} is too small to produce any output",
                amount_in
            )));
        }

        Ok(SwapExactInQuote {
            direction,
            amount_in,
            amount_out,
            min_amount_out: slippage.lower_bound(amount_out)?,
            price_impact: self.calculate_price_impact(amount_in, amount_out, reserve_in, reserve_out),
            fee: self.calculate_fee(amount_in, pool.fee_rate),
            slippage,
        })
    }

    pub fn quote_exact_out(
        &self,
        pool: &PoolState,
        direction: SwapDirection,
        amount_out: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactOutQuote> {
        let (reserve_in, reserve_out) = pool.reserves(direction);
        ensure_reserves(pool, reserve_in, reserve_out)?;

        debug!(
            "Exact-out quote: pool={}, amount_out={}, reserve_in={}, reserve_out={}, fee={}",
            pool.id, amount_out, reserve_in, reserve_out, pool.fee_rate
        );

        let amount_in = self.get_amount_in(pool.fee_rate, amount_out, reserve_in, reserve_out)?;

        Ok(SwapExactOutQuote {
            direction,
            amount_out,
            amount_in,
            max_amount_in: slippage.upper_bound(amount_in)?,
            price_impact: self.calculate_price_impact(amount_in, amount_out, reserve_in, reserve_out),
            fee: self.calculate_fee(amount_in, pool.fee_rate),
            slippage,
        })
    }
}

impl Default for AmmQuoteCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_inputs(fee_rate: u64, amount: u64, reserve_in: u64, reserve_out: u64) -> SdkResult<()> {
    if fee_rate > MAX_FEE_RATE {
        return Err(SdkError::InvalidFeeRate(fee_rate));
    }
    if amount == 0 {
        return Err(SdkError::InvalidAmount("Swap amount must be greater than 0".to_string()));
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(SdkError::PoolEmpty("swap reserves".to_string()));
    }
    Ok(())
}

fn ensure_reserves(pool: &PoolState, reserve_in: u64, reserve_out: u64) -> SdkResult<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(SdkError::PoolEmpty(pool.id.to_string()));
    }
    Ok(())
}
