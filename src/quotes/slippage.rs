//! Fixed-point slippage tolerance.
//!
//! Tolerances enter the SDK as basis points, floats or decimals and are
//! converted once into parts per million. All bounds are then computed
//! with integer arithmetic:
//!
//! - lower bound: `floor(x * (1_000_000 - s) / 1_000_000)`
//! - upper bound: `ceil(x * (1_000_000 + s) / 1_000_000)`

use crate::core::{SdkError, SdkResult, SLIPPAGE_SCALE};
use crate::quotes::math::{mul_div, mul_div_ceil};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slippage {
    ppm: u64,
}

impl Slippage {
    pub const ZERO: Slippage = Slippage { ppm: 0 };

    pub fn from_ppm(ppm: u64) -> SdkResult<Self> {
        if ppm >= SLIPPAGE_SCALE {
            return Err(SdkError::InvalidSlippage(format!(
                "{} ppm is not below 100%",
                ppm
            )));
        }
        Ok(Self { ppm })
    }

    pub fn from_bps(bps: u16) -> SdkResult<Self> {
        Self::from_ppm(u64::from(bps) * 100)
    }

    /// Fraction in `[0, 1)`, e.g. `0.005` for 0.5%. Rounded to the nearest ppm.
    pub fn from_fraction(fraction: f64) -> SdkResult<Self> {
        if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
            return Err(SdkError::InvalidSlippage(format!(
                "{} is outside [0, 1)",
                fraction
            )));
        }
        Self::from_ppm((fraction * SLIPPAGE_SCALE as f64).round() as u64)
    }

    pub fn from_decimal(fraction: Decimal) -> SdkResult<Self> {
        if fraction.is_sign_negative() || fraction >= Decimal::ONE {
            return Err(SdkError::InvalidSlippage(format!(
                "{} is outside [0, 1)",
                fraction
            )));
        }
        let ppm = (fraction * Decimal::from(SLIPPAGE_SCALE))
            .round()
            .to_u64()
            .ok_or(SdkError::MathOverflow)?;
        Self::from_ppm(ppm)
    }

    pub fn ppm(&self) -> u64 {
        self.ppm
    }

    pub fn as_fraction(&self) -> f64 {
        self.ppm as f64 / SLIPPAGE_SCALE as f64
    }

    /// Smallest acceptable value of `amount`.
    pub fn lower_bound(&self, amount: u64) -> SdkResult<u64> {
        mul_div(amount, SLIPPAGE_SCALE - self.ppm, SLIPPAGE_SCALE)
    }

    /// Largest acceptable value of `amount`.
    pub fn upper_bound(&self, amount: u64) -> SdkResult<u64> {
        mul_div_ceil(amount, SLIPPAGE_SCALE + self.ppm, SLIPPAGE_SCALE)
    }
}

impl fmt::Display for Slippage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", Decimal::new(self.ppm as i64, 4).normalize())
    }
}
