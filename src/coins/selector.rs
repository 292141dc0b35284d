use crate::coins::CoinSet;
use crate::core::{CoinObject, ObjectId, SdkError, SdkResult, TokenType};
use log::debug;
use serde::{Deserialize, Serialize};

/// Step needed to turn the selected coins into one coin of the exact amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinInstruction {
    /// Merge `sources` into `destination`.
    Merge {
        destination: ObjectId,
        sources: Vec<ObjectId>,
    },
    /// Split `amount` out of `coin`, leaving `remainder` behind in it.
    Split {
        coin: ObjectId,
        amount: u64,
        remainder: u64,
    },
}

/// Outcome of a selection: the coins consumed and how to shape them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinPlan {
    pub token_type: TokenType,
    pub required: u64,
    pub selected: Vec<CoinObject>,
    pub instructions: Vec<CoinInstruction>,
}

impl CoinPlan {
    /// Coin the merged balance ends up in (the largest selected coin).
    pub fn primary(&self) -> &ObjectId {
        &self.selected[0].id
    }

    pub fn selected_total(&self) -> u64 {
        self.selected
            .iter()
            .fold(0u64, |acc, coin| acc.saturating_add(coin.balance))
    }

    pub fn consumed_ids(&self) -> Vec<ObjectId> {
        self.selected.iter().map(|coin| coin.id.clone()).collect()
    }

    pub fn needs_merge(&self) -> bool {
        self.instructions
            .iter()
            .any(|ix| matches!(ix, CoinInstruction::Merge { .. }))
    }

    pub fn needs_split(&self) -> bool {
        self.instructions
            .iter()
            .any(|ix| matches!(ix, CoinInstruction::Split { .. }))
    }
}

/// Chooses, merges and splits owned coins to produce an exact amount.
pub struct CoinSelector;

impl CoinSelector {
    pub fn new() -> Self {
        Self
    }

    /// Select coins from `coins` covering exactly `required`.
    ///
    /// An exact single-coin match is preferred. Otherwise coins are taken in
    /// descending balance order (ties by id) until the target is covered,
    /// which keeps the number of merged objects minimal.
    pub fn select(&self, coins: &CoinSet, required: u64) -> SdkResult<CoinPlan> {
        if required == 0 {
            return Err(SdkError::InvalidAmount(
                "Required coin amount must be greater than 0".to_string(),
            ));
        }

        let available = coins.total_balance();
        if available < required {
            return Err(SdkError::InsufficientBalance {
                token_type: coins.token_type().to_string(),
                required,
                available,
                shortfall: required - available,
            });
        }

        let mut ordered: Vec<&CoinObject> = coins.coins().iter().collect();
        ordered.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.id.cmp(&b.id)));

        if let Some(exact) = ordered.iter().find(|coin| coin.balance == required) {
            debug!("Exact coin {} covers {} {}", exact.id, required, coins.token_type());
            return Ok(CoinPlan {
                token_type: coins.token_type().clone(),
                required,
                selected: vec![(*exact).clone()],
                instructions: Vec::new(),
            });
        }

        let mut selected = Vec::new();
        let mut total = 0u64;
        for coin in ordered {
            selected.push(coin.clone());
            total = total.saturating_add(coin.balance);
            if total >= required {
                break;
            }
        }

        let primary = selected[0].id.clone();
        let mut instructions = Vec::new();

        if selected.len() > 1 {
            instructions.push(CoinInstruction::Merge {
                destination: primary.clone(),
                sources: selected[1..].iter().map(|coin| coin.id.clone()).collect(),
            });
        }

        if total > required {
            instructions.push(CoinInstruction::Split {
                coin: primary,
                amount: required,
                remainder: total - required,
            });
        }

        debug!(
            "Selected {} {} coins (total {}) for {}",
            selected.len(),
            coins.token_type(),
            total,
            required
        );

        Ok(CoinPlan {
            token_type: coins.token_type().clone(),
            required,
            selected,
            instructions,
        })
    }
}

impl Default for CoinSelector {
    fn default() -> Self {
        Self::new()
    }
}
