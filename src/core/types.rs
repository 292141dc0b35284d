use crate::core::error::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(SdkError::ConfigError(format!("Unknown network: {}", other))),
        }
    }
}

/// Hex object id (`0x`-prefixed, lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix("0x")
            .ok_or_else(|| SdkError::InvalidObjectId(format!("must start with 0x: {}", s)))?;
        if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SdkError::InvalidObjectId(s.to_string()));
        }
        Ok(Self(format!("0x{}", hex.to_lowercase())))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type PoolId = ObjectId;

/// Fully qualified Move coin type, e.g. `0x2::sui::SUI`.
///
/// Equality is exact string equality. Ordering for pair canonicalisation is
/// the byte order of the BCS encoding, which puts shorter strings first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenType(String);

impl TokenType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Type string without a leading `0x`.
    pub fn without_hex_prefix(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }

    /// BCS encoding of the type string: ULEB128 length followed by the bytes.
    pub fn bcs_bytes(&self) -> Vec<u8> {
        bcs_string(&self.0)
    }

    pub fn canonical_cmp(&self, other: &TokenType) -> Ordering {
        self.bcs_bytes().cmp(&other.bcs_bytes())
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

pub(crate) fn bcs_string(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 5);
    let mut len = bytes.len();
    loop {
        let byte = (len & 0x7f) as u8;
        len >>= 7;
        if len == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
    out.extend_from_slice(bytes);
    out
}

/// Unordered token pair stored in canonical (x < y) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalPair {
    pub x: TokenType,
    pub y: TokenType,
}

impl CanonicalPair {
    /// Canonicalise `(a, b)`. The flag is true when the arguments were swapped.
    pub fn new(a: &TokenType, b: &TokenType) -> SdkResult<(Self, bool)> {
        match a.canonical_cmp(b) {
            Ordering::Less => Ok((Self { x: a.clone(), y: b.clone() }, false)),
            Ordering::Greater => Ok((Self { x: b.clone(), y: a.clone() }, true)),
            Ordering::Equal => Err(SdkError::IdenticalTokens(a.to_string())),
        }
    }

    /// Registry key of the pool, `LP-{x}-{y}` with `0x` prefixes stripped.
    pub fn lp_name(&self) -> String {
        format!("LP-{}-{}", self.x.without_hex_prefix(), self.y.without_hex_prefix())
    }

    /// LP coin type minted by the pool.
    pub fn lp_type(&self, package_id: &str) -> TokenType {
        TokenType::new(format!(
            "{}::{}::LP<{}, {}>",
            package_id,
            crate::core::constants::LP_MODULE,
            self.x,
            self.y
        ))
    }

    pub fn type_arguments(&self) -> Vec<TokenType> {
        vec![self.x.clone(), self.y.clone()]
    }
}

impl fmt::Display for CanonicalPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.x, self.y)
    }
}

/// Which side of a canonical pair is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapDirection {
    XToY,
    YToX,
}

/// Snapshot of one owned coin object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinObject {
    pub id: ObjectId,
    pub token_type: TokenType,
    pub balance: u64,
}

/// Point-in-time read of a pool object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub id: PoolId,
    pub bal_x: u64,
    pub bal_y: u64,
    pub fee_bal_x: u64,
    pub fee_bal_y: u64,
    pub lp_supply: u64,
    /// Fee in basis points of `FEE_SCALE`.
    pub fee_rate: u64,
    pub min_liquidity: u64,
}

impl PoolState {
    /// `(reserve_in, reserve_out)` for a swap in `direction`.
    pub fn reserves(&self, direction: SwapDirection) -> (u64, u64) {
        match direction {
            SwapDirection::XToY => (self.bal_x, self.bal_y),
            SwapDirection::YToX => (self.bal_y, self.bal_x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const USDC: &str = "0x5c68f3d2ebfd711454da300d6abf3c7254dc9333cd138cdc68e158ebffd24483::coins::USDC";
    const WSOL: &str = "0x5c68f3d2ebfd711454da300d6abf3c7254dc9333cd138cdc68e158ebffd24483::coins::WSOL";

    #[test]
    fn test_object_id_parsing() {
        let id: ObjectId = "0xABCdef".parse().unwrap();
        assert_eq!(id.as_str(), "0xabcdef");
        assert!("abcdef".parse::<ObjectId>().is_err());
        assert!("0x".parse::<ObjectId>().is_err());
        assert!("0xzz".parse::<ObjectId>().is_err());
        assert_eq!(
            "0xzz".parse::<ObjectId>(),
            Err(SdkError::InvalidObjectId("0xzz".to_string()))
        );
        assert!(format!("0x{}", "a".repeat(65)).parse::<ObjectId>().is_err());
    }

    #[test]
    fn test_bcs_length_prefix() {
        assert_eq!(bcs_string("ab"), vec![2, b'a', b'b']);
        let long = "x".repeat(200);
        let encoded = bcs_string(&long);
        assert_eq!(&encoded[..2], &[0xc8, 0x01]);
        assert_eq!(encoded.len(), 202);
    }

    #[test_case("0x2::sui::SUI", USDC ; "shorter type sorts first")]
    #[test_case(USDC, WSOL ; "equal length compares bytes")]
    fn test_canonical_order(smaller: &str, larger: &str) {
        let a = TokenType::from(smaller);
        let b = TokenType::from(larger);
        let (pair, flipped) = CanonicalPair::new(&a, &b).unwrap();
        assert!(!flipped);
        assert_eq!(pair.x, a);

        let (reversed, flipped) = CanonicalPair::new(&b, &a).unwrap();
        assert!(flipped);
        assert_eq!(pair, reversed);
    }

    #[test]
    fn test_identical_tokens_rejected() {
        let a = TokenType::from(USDC);
        assert!(matches!(
            CanonicalPair::new(&a, &a),
            Err(SdkError::IdenticalTokens(_))
        ));
    }

    #[test]
    fn test_lp_name_and_type() {
        let (pair, _) = CanonicalPair::new(&TokenType::from(WSOL), &TokenType::from(USDC)).unwrap();
        assert_eq!(
            pair.lp_name(),
            format!(
                "LP-{}-{}",
                USDC.trim_start_matches("0x"),
                WSOL.trim_start_matches("0x")
            )
        );
        assert_eq!(
            pair.lp_type("0xabc").as_str(),
            format!("0xabc::manage::LP<{}, {}>", USDC, WSOL)
        );
    }
}
