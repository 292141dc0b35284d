//! Programmable transaction intent.
//!
//! An intent is an ordered command list over indexed inputs. Commands refer
//! to inputs and to the results of earlier commands through [`Argument`],
//! so a merge, a split and the router call can be chained in one atomic
//! submission.

use crate::coins::{CoinInstruction, CoinPlan};
use crate::core::{ObjectId, TokenType};
use crate::quotes::Quote;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    Object(ObjectId),
    Pure(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
    MoveCall {
        target: String,
        type_arguments: Vec<TokenType>,
        arguments: Vec<Argument>,
    },
}

/// Built request, ready for signing and submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionIntent {
    pub sender: ObjectId,
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
    /// Owned coins the intent spends or mutates.
    pub consumed_coins: Vec<ObjectId>,
    pub quote: Quote,
}

impl TransactionIntent {
    /// Target of the final router call.
    pub fn entry_point(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|command| match command {
            Command::MoveCall { target, .. } => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn input(&self, argument: Argument) -> Option<&CallArg> {
        match argument {
            Argument::Input(index) => self.inputs.get(usize::from(index)),
            _ => None,
        }
    }
}

/// Accumulates inputs and commands in order.
#[derive(Default)]
pub struct IntentBuilder {
    inputs: Vec<CallArg>,
    objects: HashMap<ObjectId, u16>,
    commands: Vec<Command>,
    consumed: Vec<ObjectId>,
}

impl IntentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Object input. The same object is only listed once.
    pub fn obj(&mut self, id: &ObjectId) -> Argument {
        if let Some(index) = self.objects.get(id) {
            return Argument::Input(*index);
        }
        let index = self.inputs.len() as u16;
        self.inputs.push(CallArg::Object(id.clone()));
        self.objects.insert(id.clone(), index);
        Argument::Input(index)
    }

    pub fn pure_u64(&mut self, value: u64) -> Argument {
        let index = self.inputs.len() as u16;
        self.inputs.push(CallArg::Pure(value));
        Argument::Input(index)
    }

    pub fn command(&mut self, command: Command) -> Argument {
        let index = self.commands.len() as u16;
        self.commands.push(command);
        Argument::Result(index)
    }

    /// Emit the merge and split a coin plan calls for and return the
    /// argument holding exactly `plan.required`.
    pub fn apply_coin_plan(&mut self, plan: &CoinPlan) -> Argument {
        self.consumed.extend(plan.consumed_ids());
        let mut coin = self.obj(plan.primary());

        for instruction in &plan.instructions {
            match instruction {
                CoinInstruction::Merge {
                    destination,
                    sources,
                } => {
                    let destination = self.obj(destination);
                    let sources = sources.iter().map(|id| self.obj(id)).collect();
                    self.command(Command::MergeCoins {
                        destination,
                        sources,
                    });
                    coin = destination;
                }
                CoinInstruction::Split { coin: source, amount, .. } => {
                    let source = self.obj(source);
                    let amount = self.pure_u64(*amount);
                    let index = self.commands.len() as u16;
                    self.command(Command::SplitCoins {
                        coin: source,
                        amounts: vec![amount],
                    });
                    coin = Argument::NestedResult(index, 0);
                }
            }
        }

        coin
    }

    pub fn move_call(
        &mut self,
        target: String,
        type_arguments: Vec<TokenType>,
        arguments: Vec<Argument>,
    ) -> Argument {
        self.command(Command::MoveCall {
            target,
            type_arguments,
            arguments,
        })
    }

    pub fn finish(self, sender: ObjectId, quote: Quote) -> TransactionIntent {
        TransactionIntent {
            sender,
            inputs: self.inputs,
            commands: self.commands,
            consumed_coins: self.consumed,
            quote,
        }
    }
}
