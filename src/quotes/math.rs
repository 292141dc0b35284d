use crate::core::{SdkError, SdkResult};

uint::construct_uint! {
    /// 256-bit unsigned integer for intermediate products.
    pub struct U256(4);
}

/// `a * b / c`, truncating.
pub fn mul_div(a: u64, b: u64, c: u64) -> SdkResult<u64> {
    if c == 0 {
        return Err(SdkError::MathOverflow);
    }
    to_u64(U256::from(a) * U256::from(b) / U256::from(c))
}

/// `a * b / c`, rounding up.
pub fn mul_div_ceil(a: u64, b: u64, c: u64) -> SdkResult<u64> {
    if c == 0 {
        return Err(SdkError::MathOverflow);
    }
    let numerator = U256::from(a) * U256::from(b);
    let c = U256::from(c);
    let quotient = numerator / c;
    let rounded = if (numerator % c).is_zero() {
        quotient
    } else {
        quotient + U256::one()
    };
    to_u64(rounded)
}

pub fn to_u64(value: U256) -> SdkResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(SdkError::MathOverflow);
    }
    Ok(value.low_u64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(10, 3, 4).unwrap(), 7);
        assert_eq!(mul_div_ceil(10, 3, 4).unwrap(), 8);
        assert_eq!(mul_div_ceil(10, 4, 4).unwrap(), 10);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        assert_eq!(mul_div(u64::MAX, u64::MAX, u64::MAX).unwrap(), u64::MAX);
    }

    #[test]
    fn test_mul_div_errors() {
        assert_eq!(mul_div(1, 1, 0), Err(SdkError::MathOverflow));
        assert_eq!(mul_div(u64::MAX, 2, 1), Err(SdkError::MathOverflow));
    }
}
