pub mod builder;
pub mod intent;
pub mod interpreter;

use crate::chain::{with_timeout, ChainReader, SuiAddress, TransactionSubmitter};
use crate::coins::CoinPlan;
use crate::core::{Config, PoolId, PoolState, SdkError, SdkResult, TokenType};
use crate::quotes::{
    AddLiquidityQuote, RemoveLiquidityQuote, Slippage, SwapExactInQuote, SwapExactOutQuote,
};
use builder::direction;
use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

pub use builder::{BuiltIntent, IntentRequest, TransactionBuilder};
pub use intent::{Argument, CallArg, Command, IntentBuilder, TransactionIntent};
pub use interpreter::{ExecutionResult, FailureCode, ResultInterpreter};

/// Public entry point: one method per supported intent.
///
/// Every operation validates and builds the complete intent before anything
/// is submitted. Pre-submission problems are returned as `Err`; once an
/// intent reaches the submitter the outcome is reported as an
/// [`ExecutionResult`].
pub struct DipcoinClient {
    config: Config,
    builder: TransactionBuilder,
    submitter: Arc<dyn TransactionSubmitter>,
    interpreter: ResultInterpreter,
}

impl DipcoinClient {
    pub fn new(
        config: Config,
        chain: Arc<dyn ChainReader>,
        submitter: Arc<dyn TransactionSubmitter>,
        sender: SuiAddress,
    ) -> SdkResult<Self> {
        let builder = TransactionBuilder::new(config.clone(), chain, sender)?;
        let interpreter = ResultInterpreter::new(config.slippage_abort_codes.clone());

        info!(
            "Dipcoin client on {} (package {})",
            config.network, config.package_id
        );

        Ok(Self {
            config,
            builder,
            submitter,
            interpreter,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Slippage configured as the default for this client.
    pub fn default_slippage(&self) -> SdkResult<Slippage> {
        Slippage::from_bps(self.config.default_slippage_bps)
    }

    pub async fn get_pool_id(&self, coin_a: &TokenType, coin_b: &TokenType) -> SdkResult<PoolId> {
        self.builder.resolver().resolve(coin_a, coin_b).await
    }

    pub async fn get_pool(&self, pool_id: &PoolId) -> SdkResult<PoolState> {
        self.builder.resolver().fetch_pool(pool_id).await
    }

    /// Forget the cached pool id of a pair.
    pub fn invalidate_pool(&self, coin_a: &TokenType, coin_b: &TokenType) -> SdkResult<()> {
        self.builder.resolver().invalidate(coin_a, coin_b)
    }

    pub async fn add_liquidity(
        &self,
        coin_a: &TokenType,
        coin_b: &TokenType,
        amount_a: u64,
        amount_b: u64,
        slippage: Slippage,
    ) -> SdkResult<ExecutionResult> {
        self.execute(IntentRequest::AddLiquidity {
            coin_a: coin_a.clone(),
            coin_b: coin_b.clone(),
            amount_a,
            amount_b,
            slippage,
        })
        .await
    }

    pub async fn remove_liquidity(
        &self,
        coin_a: &TokenType,
        coin_b: &TokenType,
        lp_amount: u64,
        slippage: Slippage,
    ) -> SdkResult<ExecutionResult> {
        self.execute(IntentRequest::RemoveLiquidity {
            coin_a: coin_a.clone(),
            coin_b: coin_b.clone(),
            lp_amount,
            slippage,
        })
        .await
    }

    pub async fn swap_exact_in(
        &self,
        coin_in: &TokenType,
        coin_out: &TokenType,
        amount_in: u64,
        slippage: Slippage,
    ) -> SdkResult<ExecutionResult> {
        self.execute(IntentRequest::SwapExactIn {
            coin_in: coin_in.clone(),
            coin_out: coin_out.clone(),
            amount_in,
            slippage,
        })
        .await
    }

    pub async fn swap_exact_out(
        &self,
        coin_in: &TokenType,
        coin_out: &TokenType,
        amount_out: u64,
        slippage: Slippage,
    ) -> SdkResult<ExecutionResult> {
        self.execute(IntentRequest::SwapExactOut {
            coin_in: coin_in.clone(),
            coin_out: coin_out.clone(),
            amount_out,
            slippage,
        })
        .await
    }

    /// How `owner`'s coins would be merged and split to pay `amount`.
    pub async fn plan_coins(
        &self,
        owner: &SuiAddress,
        token_type: &TokenType,
        amount: u64,
    ) -> SdkResult<CoinPlan> {
        self.builder.plan_coins(owner, token_type, amount).await
    }

    /// Build without submitting. The returned intent keeps its coins reserved.
    pub async fn build(&self, request: &IntentRequest) -> SdkResult<BuiltIntent> {
        self.builder.build(request).await
    }

    /// Build, submit and interpret one request.
    pub async fn execute(&self, request: IntentRequest) -> SdkResult<ExecutionResult> {
        let built = self.builder.build(&request).await?;
        let started = Utc::now();

        let submitted = with_timeout(
            self.config.request_timeout(),
            "submit",
            self.submitter.submit(&built.intent),
        )
        .await;

        let result = match submitted {
            Ok(raw) => self.interpreter.interpret(&raw),
            // The intent may or may not have landed; callers must re-check
            Err(err @ SdkError::Timeout { .. }) => return Err(err),
            Err(err) => {
                warn!("Submission of {:?} failed: {}", built.intent.entry_point(), err);
                ExecutionResult::submission_failed(&err)
            }
        };

        info!(
            "{} finished in {} ms: {}",
            built.intent.entry_point().unwrap_or("intent"),
            (Utc::now() - started).num_milliseconds(),
            match &result {
                ExecutionResult::Success { digest, .. } => format!("success {}", digest),
                ExecutionResult::Failure { code, .. } => format!("failure ({})", code),
            }
        );

        // Coins stay reserved until the submission has settled
        drop(built);
        Ok(result)
    }

    pub async fn quote_swap_exact_in(
        &self,
        coin_in: &TokenType,
        coin_out: &TokenType,
        amount_in: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactInQuote> {
        let (_, flipped, pool) = self.builder.load_pool(coin_in, coin_out).await?;
        self.builder
            .quotes()
            .swap_exact_in(&pool, direction(flipped), amount_in, slippage)
    }

    pub async fn quote_swap_exact_out(
        &self,
        coin_in: &TokenType,
        coin_out: &TokenType,
        amount_out: u64,
        slippage: Slippage,
    ) -> SdkResult<SwapExactOutQuote> {
        let (_, flipped, pool) = self.builder.load_pool(coin_in, coin_out).await?;
        self.builder
            .quotes()
            .swap_exact_out(&pool, direction(flipped), amount_out, slippage)
    }

    /// Deposit quote. Amounts in the result are in canonical (x, y) order.
    pub async fn quote_add_liquidity(
        &self,
        coin_a: &TokenType,
        coin_b: &TokenType,
        amount_a: u64,
        amount_b: u64,
        slippage: Slippage,
    ) -> SdkResult<AddLiquidityQuote> {
        let (_, flipped, pool) = self.builder.load_pool(coin_a, coin_b).await?;
        let (x, y) = if flipped {
            (amount_b, amount_a)
        } else {
            (amount_a, amount_b)
        };
        self.builder.quotes().add_liquidity(&pool, x, y, slippage)
    }

    /// Withdrawal quote. Amounts in the result are in canonical (x, y) order.
    pub async fn quote_remove_liquidity(
        &self,
        coin_a: &TokenType,
        coin_b: &TokenType,
        lp_amount: u64,
        slippage: Slippage,
    ) -> SdkResult<RemoveLiquidityQuote> {
        let (_, _, pool) = self.builder.load_pool(coin_a, coin_b).await?;
        self.builder
            .quotes()
            .remove_liquidity(&pool, lp_amount, slippage)
    }
}
