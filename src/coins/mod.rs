pub mod reservation;
pub mod selector;

use crate::core::{CoinObject, ObjectId, SdkError, SdkResult, TokenType};
use log::debug;
use std::collections::HashSet;

pub use reservation::{CoinReservations, ReservationGuard};
pub use selector::{CoinInstruction, CoinPlan, CoinSelector};

/// Immutable snapshot of the owned coins of a single token type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSet {
    token_type: TokenType,
    coins: Vec<CoinObject>,
}

impl CoinSet {
    /// Build a snapshot. Zero-balance coins and repeated ids are dropped;
    /// a coin of another type is an error.
    pub fn new(token_type: TokenType, coins: Vec<CoinObject>) -> SdkResult<Self> {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(coins.len());

        for coin in coins {
            if coin.token_type != token_type {
                return Err(SdkError::CoinTypeMismatch {
                    expected: token_type.to_string(),
                    found: coin.token_type.to_string(),
                });
            }
            if coin.balance == 0 {
                debug!("Skipping empty coin {}", coin.id);
                continue;
            }
            if seen.insert(coin.id.clone()) {
                kept.push(coin);
            }
        }

        Ok(Self {
            token_type,
            coins: kept,
        })
    }

    pub fn empty(token_type: TokenType) -> Self {
        Self {
            token_type,
            coins: Vec::new(),
        }
    }

    pub fn token_type(&self) -> &TokenType {
        &self.token_type
    }

    pub fn coins(&self) -> &[CoinObject] {
        &self.coins
    }

    pub fn len(&self) -> usize {
        self.coins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn total_balance(&self) -> u64 {
        self.coins
            .iter()
            .fold(0u64, |acc, coin| acc.saturating_add(coin.balance))
    }

    /// Snapshot without the coins whose ids satisfy `excluded`.
    pub fn without<F>(&self, excluded: F) -> Self
    where
        F: Fn(&ObjectId) -> bool,
    {
        Self {
            token_type: self.token_type.clone(),
            coins: self
                .coins
                .iter()
                .filter(|coin| !excluded(&coin.id))
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn coin(id: &str, token_type: &str, balance: u64) -> CoinObject {
        CoinObject {
            id: id.parse().unwrap(),
            token_type: TokenType::from(token_type),
            balance,
        }
    }

    pub fn coin_set(token_type: &str, balances: &[u64]) -> CoinSet {
        let coins = balances
            .iter()
            .enumerate()
            .map(|(i, balance)| coin(&format!("0x{:x}", i + 1), token_type, *balance))
            .collect();
        CoinSet::new(TokenType::from(token_type), coins).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const SUI: &str = "0x2::sui::SUI";

    #[test]
    fn test_coin_set_filters_and_totals() {
        let set = CoinSet::new(
            TokenType::from(SUI),
            vec![
                coin("0x1", SUI, 10),
                coin("0x2", SUI, 0),
                coin("0x1", SUI, 10),
                coin("0x3", SUI, 25),
            ],
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.total_balance(), 35);
    }

    #[test]
    fn test_coin_set_rejects_foreign_type() {
        let result = CoinSet::new(
            TokenType::from(SUI),
            vec![coin("0x1", "0x2::coin::OTHER", 10)],
        );
        assert!(matches!(result, Err(SdkError::CoinTypeMismatch { .. })));
    }

    #[test]
    fn test_without_excludes_ids() {
        let set = coin_set(SUI, &[5, 6, 7]);
        let excluded: ObjectId = "0x2".parse().unwrap();
        let remaining = set.without(|id| *id == excluded);
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining.total_balance(), 12);
    }
}
