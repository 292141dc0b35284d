use crate::core::TokenType;

/// Format large numbers with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for ch in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Struct name of a token type, e.g. `SUI` for `0x2::sui::SUI`.
pub fn short_type(token_type: &TokenType) -> &str {
    let full = token_type.as_str();
    // Type parameters are dropped from the short form
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567890), "1,234,567,890");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn test_short_type() {
        assert_eq!(short_type(&TokenType::from("0x2::sui::SUI")), "SUI");
        assert_eq!(short_type(&TokenType::from("0x5c68::coins::USDC")), "USDC");
        assert_eq!(short_type(&TokenType::from("plain")), "plain");
        assert_eq!(
            short_type(&TokenType::from("0xa212::manage::LP<0x2::sui::SUI, 0x5c68::coins::USDC>")),
            "LP"
        );
    }
}
