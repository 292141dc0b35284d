use crate::core::{PoolState, SdkError, SdkResult};
use crate::quotes::math::mul_div;
use crate::quotes::slippage::Slippage;
use crate::quotes::{AddLiquidityQuote, PoolSide, RemoveLiquidityQuote};
use log::debug;

/// Proportional deposit and withdrawal amounts for a constant product pool.
pub struct LiquidityCalculator;

impl LiquidityCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Largest `(x, y)` not exceeding the desired amounts that matches the
    /// pool's reserve ratio.
    pub fn calc_optimal_coin_values(
        &self,
        x_desired: u64,
        y_desired: u64,
        reserve_x: u64,
        reserve_y: u64,
    ) -> SdkResult<(u64, u64)> {
        let y_optimal = mul_div(x_desired, reserve_y, reserve_x)?;
        if y_optimal <= y_desired {
            return Ok((x_desired, y_optimal));
        }

        let x_optimal = mul_div(y_desired, reserve_x, reserve_y)?;
        if x_optimal > x_desired {
            return Err(SdkError::InvalidPoolState(format!(
                "Optimal deposit {} exceeds desired {}",
                x_optimal, x_desired
            )));
        }
        Ok((x_optimal, y_desired))
    }

    /// Deposit of both sides, capped at the caller's desired amounts.
    pub fn quote_add(
        &self,
        pool: &PoolState,
        x_desired: u64,
        y_desired: u64,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        if x_desired == 0 || y_desired == 0 {
            return Err(SdkError::InvalidAmount(
                "Liquidity amounts must be greater than 0".to_string(),
            ));
        }
        ensure_reserves(pool)?;

        let (amount_x, amount_y) =
            self.calc_optimal_coin_values(x_desired, y_desired, pool.bal_x, pool.bal_y)?;
        debug!(
            "Optimal deposit for pool {}: ({}, {}) from desired ({}, {})",
            pool.id, amount_x, amount_y, x_desired, y_desired
        );

        self.bounded_add(amount_x, amount_y, Some((x_desired, y_desired)), slippage)
    }

    /// Deposit given one side; the other side follows the reserve ratio.
    /// The given side never goes above `amount`.
    pub fn quote_add_single(
        &self,
        pool: &PoolState,
        side: PoolSide,
        amount: u64,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        if amount == 0 {
            return Err(SdkError::InvalidAmount(
                "Liquidity amount must be greater than 0".to_string(),
            ));
        }
        ensure_reserves(pool)?;

        let (amount_x, amount_y) = match side {
            PoolSide::X => (amount, mul_div(amount, pool.bal_y, pool.bal_x)?),
            PoolSide::Y => (mul_div(amount, pool.bal_x, pool.bal_y)?, amount),
        };
        if amount_x == 0 || amount_y == 0 {
            return Err(SdkError::InvalidAmount(format!(
                "Deposit of {} is too small for the pool ratio",
                amount
            )));
        }

        let cap = match side {
            PoolSide::X => (amount, u64::MAX),
            PoolSide::Y => (u64::MAX, amount),
        };
        self.bounded_add(amount_x, amount_y, Some(cap), slippage)
    }

    /// Withdrawal for burning `lp_amount` LP coins.
    pub fn quote_remove(
        &self,
        pool: &PoolState,
        lp_amount: u64,
        slippage: Slippage,
    ) -> SdkResult<RemoveLiquidityQuote> {
        if lp_amount == 0 {
            return Err(SdkError::InvalidAmount(
                "LP amount must be greater than 0".to_string(),
            ));
        }
        ensure_reserves(pool)?;
        if pool.lp_supply == 0 {
            return Err(SdkError::PoolEmpty(pool.id.to_string()));
        }
        if lp_amount > pool.lp_supply {
            return Err(SdkError::InsufficientLiquidity {
                requested: lp_amount,
                available: pool.lp_supply,
            });
        }

        let amount_x = mul_div(lp_amount, pool.bal_x, pool.lp_supply)?;
        let amount_y = mul_div(lp_amount, pool.bal_y, pool.lp_supply)?;

        Ok(RemoveLiquidityQuote {
            lp_amount,
            amount_x,
            amount_y,
            min_amount_x: slippage.lower_bound(amount_x)?,
            min_amount_y: slippage.lower_bound(amount_y)?,
            slippage,
        })
    }

    fn bounded_add(
        &self,
        amount_x: u64,
        amount_y: u64,
        cap: Option<(u64, u64)>,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        let mut max_amount_x = slippage.upper_bound(amount_x)?;
        let mut max_amount_y = slippage.upper_bound(amount_y)?;
        if let Some((cap_x, cap_y)) = cap {
            max_amount_x = max_amount_x.min(cap_x);
            max_amount_y = max_amount_y.min(cap_y);
        }

        Ok(AddLiquidityQuote {
            amount_x,
            amount_y,
            min_amount_x: slippage.lower_bound(amount_x)?,
            min_amount_y: slippage.lower_bound(amount_y)?,
            max_amount_x,
            max_amount_y,
            slippage,
        })
    }
}

impl Default for LiquidityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_reserves(pool: &PoolState) -> SdkResult<()> {
    if pool.bal_x == 0 || pool.bal_y == 0 {
        return Err(SdkError::PoolEmpty(pool.id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::test_support::pool;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_optimal_values_prefer_x() {
        let calculator = LiquidityCalculator::new();
        // ratio 1:2, desired (100, 500) -> y limited by x
        assert_eq!(
            calculator.calc_optimal_coin_values(100, 500, 1_000, 2_000).unwrap(),
            (100, 200)
        );
        // desired (100, 150) -> x limited by y
        assert_eq!(
            calculator.calc_optimal_coin_values(100, 150, 1_000, 2_000).unwrap(),
            (75, 150)
        );
    }

    #[test]
    fn test_quote_add_bounds() {
        let calculator = LiquidityCalculator::new();
        let quote = calculator
            .quote_add(&pool(1_000_000, 2_000_000, 30), 10_000, 30_000, Slippage::from_bps(100).unwrap())
            .unwrap();

        assert_eq!(
            quote,
            AddLiquidityQuote {
                amount_x: 10_000,
                amount_y: 20_000,
                min_amount_x: 9_900,
                min_amount_y: 19_800,
                // x capped at the desired amount, y has room up to +1%
                max_amount_x: 10_000,
                max_amount_y: 20_200,
                slippage: Slippage::from_bps(100).unwrap(),
            }
        );
    }

    #[test]
    fn test_quote_add_single_side() {
        let calculator = LiquidityCalculator::new();
        let quote = calculator
            .quote_add_single(&pool(1_000_000, 2_000_000, 30), PoolSide::Y, 3_000, Slippage::from_bps(50).unwrap())
            .unwrap();

        assert_eq!(quote.amount_x, 1_500);
        assert_eq!(quote.amount_y, 3_000);
        assert_eq!(quote.min_amount_x, 1_492);
        assert_eq!(quote.max_amount_x, 1_508);
        // The fixed side is capped at what the caller offered
        assert_eq!(quote.max_amount_y, 3_000);
    }

    #[test]
    fn test_quote_remove() {
        let calculator = LiquidityCalculator::new();
        let mut state = pool(1_000_000, 2_000_000, 30);
        state.lp_supply = 1_000;

        let quote = calculator
            .quote_remove(&state, 10, Slippage::from_bps(50).unwrap())
            .unwrap();
        assert_eq!(quote.amount_x, 10_000);
        assert_eq!(quote.amount_y, 20_000);
        assert_eq!(quote.min_amount_x, 9_950);
        assert_eq!(quote.min_amount_y, 19_900);

        assert!(matches!(
            calculator.quote_remove(&state, 1_001, Slippage::ZERO),
            Err(SdkError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_empty_pool_rejected() {
        let calculator = LiquidityCalculator::new();
        assert!(matches!(
            calculator.quote_add(&pool(0, 0, 30), 10, 10, Slippage::ZERO),
            Err(SdkError::PoolEmpty(_))
        ));

        let mut state = pool(10, 10, 30);
        state.lp_supply = 0;
        assert!(matches!(
            calculator.quote_remove(&state, 1, Slippage::ZERO),
            Err(SdkError::PoolEmpty(_))
        ));
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let calculator = LiquidityCalculator::new();
        let state = pool(10, 10, 30);
        assert!(matches!(
            calculator.quote_add(&state, 0, 10, Slippage::ZERO),
            Err(SdkError::InvalidAmount(_))
        ));
        assert!(matches!(
            calculator.quote_add_single(&state, PoolSide::X, 0, Slippage::ZERO),
            Err(SdkError::InvalidAmount(_))
        ));
        assert!(matches!(
            calculator.quote_remove(&state, 0, Slippage::ZERO),
            Err(SdkError::InvalidAmount(_))
        ));
    }
}
