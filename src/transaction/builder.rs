use crate::chain::{with_timeout, ChainReader, SuiAddress};
use crate::coins::{CoinPlan, CoinReservations, CoinSelector, CoinSet, ReservationGuard};
use crate::core::{
    CanonicalPair, Config, ObjectId, PoolId, PoolState, SdkError, SdkResult, SwapDirection,
    TokenType, FN_ADD_LIQUIDITY, FN_REMOVE_LIQUIDITY, FN_SWAP_EXACT_X_TO_Y,
    FN_SWAP_EXACT_Y_TO_X, FN_SWAP_X_TO_EXACT_Y, FN_SWAP_Y_TO_EXACT_X,
};
use crate::discovery::PoolResolver;
use crate::quotes::{Quote, QuoteEngine, Slippage};
use crate::transaction::intent::{Argument, IntentBuilder, TransactionIntent};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// What the caller wants to do, in the caller's token order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentRequest {
    AddLiquidity {
        coin_a: TokenType,
        coin_b: TokenType,
        amount_a: u64,
        amount_b: u64,
        slippage: Slippage,
    },
    RemoveLiquidity {
        coin_a: TokenType,
        coin_b: TokenType,
        lp_amount: u64,
        slippage: Slippage,
    },
    SwapExactIn {
        coin_in: TokenType,
        coin_out: TokenType,
        amount_in: u64,
        slippage: Slippage,
    },
    SwapExactOut {
        coin_in: TokenType,
        coin_out: TokenType,
        amount_out: u64,
        slippage: Slippage,
    },
}

impl IntentRequest {
    fn tokens(&self) -> (&TokenType, &TokenType) {
        match self {
            IntentRequest::AddLiquidity { coin_a, coin_b, .. }
            | IntentRequest::RemoveLiquidity { coin_a, coin_b, .. } => (coin_a, coin_b),
            IntentRequest::SwapExactIn { coin_in, coin_out, .. }
            | IntentRequest::SwapExactOut { coin_in, coin_out, .. } => (coin_in, coin_out),
        }
    }

    /// Local checks that need no network access.
    pub fn validate(&self) -> SdkResult<()> {
        let zero = match self {
            IntentRequest::AddLiquidity {
                amount_a, amount_b, ..
            } => *amount_a == 0 || *amount_b == 0,
            IntentRequest::RemoveLiquidity { lp_amount, .. } => *lp_amount == 0,
            IntentRequest::SwapExactIn { amount_in, .. } => *amount_in == 0,
            IntentRequest::SwapExactOut { amount_out, .. } => *amount_out == 0,
        };
        if zero {
            return Err(SdkError::InvalidAmount(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let (a, b) = self.tokens();
        CanonicalPair::new(a, b).map(|_| ())
    }
}

/// A built intent together with the reservation on the coins it spends.
///
/// Dropping it releases the coins.
pub struct BuiltIntent {
    pub intent: TransactionIntent,
    pub pool: PoolState,
    pub pair: CanonicalPair,
    reservation: ReservationGuard,
}

impl BuiltIntent {
    pub fn reserved_coins(&self) -> &[ObjectId] {
        self.reservation.ids()
    }
}

/// Composes pool resolution, quoting and coin selection into one intent.
pub struct TransactionBuilder {
    config: Config,
    version_id: ObjectId,
    global_id: ObjectId,
    sender: SuiAddress,
    chain: Arc<dyn ChainReader>,
    resolver: PoolResolver,
    quotes: QuoteEngine,
    selector: CoinSelector,
    reservations: CoinReservations,
}

impl TransactionBuilder {
    pub fn new(config: Config, chain: Arc<dyn ChainReader>, sender: SuiAddress) -> SdkResult<Self> {
        config.validate()?;
        let version_id = config.version_id.parse()?;
        let global_id = config.global_id.parse()?;
        let resolver = PoolResolver::new(chain.clone(), config.request_timeout());

        Ok(Self {
            config,
            version_id,
            global_id,
            sender,
            chain,
            resolver,
            quotes: QuoteEngine::new(),
            selector: CoinSelector::new(),
            reservations: CoinReservations::new(),
        })
    }

    pub fn resolver(&self) -> &PoolResolver {
        &self.resolver
    }

    pub fn quotes(&self) -> &QuoteEngine {
        &self.quotes
    }

    pub fn reservations(&self) -> &CoinReservations {
        &self.reservations
    }

    pub fn sender(&self) -> &SuiAddress {
        &self.sender
    }

    fn timeout(&self) -> Duration {
        self.config.request_timeout()
    }

    /// Resolve the pool and read its current state.
    pub async fn load_pool(
        &self,
        coin_a: &TokenType,
        coin_b: &TokenType,
    ) -> SdkResult<(CanonicalPair, bool, PoolState)> {
        let (pair, flipped) = CanonicalPair::new(coin_a, coin_b)?;
        let pool_id = self.resolver.resolve_pair(&pair).await?;

        match self.resolver.fetch_pool(&pool_id).await {
            Ok(pool) => Ok((pair, flipped, pool)),
            Err(err @ SdkError::InvalidPoolState(_)) => {
                // The cached id no longer points at a readable pool
                warn!("Pool {} for {} unreadable, invalidating: {}", pool_id, pair, err);
                self.resolver.cache().invalidate(&pair);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Build the intent. Fails on the first error; nothing partial escapes.
    pub async fn build(&self, request: &IntentRequest) -> SdkResult<BuiltIntent> {
        request.validate()?;
        let (coin_a, coin_b) = request.tokens();
        let (pair, flipped, pool) = self.load_pool(coin_a, coin_b).await?;

        info!("Building {} on pool {} ({})", request_name(request), pool.id, pair);

        let built = match request {
            IntentRequest::AddLiquidity {
                amount_a,
                amount_b,
                slippage,
                ..
            } => {
                let (x_desired, y_desired) = if flipped {
                    (*amount_b, *amount_a)
                } else {
                    (*amount_a, *amount_b)
                };
                self.build_add_liquidity(pair, pool, x_desired, y_desired, *slippage)
                    .await?
            }
            IntentRequest::RemoveLiquidity {
                lp_amount, slippage, ..
            } => {
                self.build_remove_liquidity(pair, pool, *lp_amount, *slippage)
                    .await?
            }
            IntentRequest::SwapExactIn {
                amount_in, slippage, ..
            } => {
                let direction = direction(flipped);
                self.build_swap_exact_in(pair, pool, direction, *amount_in, *slippage)
                    .await?
            }
            IntentRequest::SwapExactOut {
                amount_out,
                slippage,
                ..
            } => {
                let direction = direction(flipped);
                self.build_swap_exact_out(pair, pool, direction, *amount_out, *slippage)
                    .await?
            }
        };

        debug!(
            "Built intent with {} inputs, {} commands, {} consumed coins",
            built.intent.inputs.len(),
            built.intent.commands.len(),
            built.intent.consumed_coins.len()
        );
        Ok(built)
    }

    async fn build_add_liquidity(
        &self,
        pair: CanonicalPair,
        pool: PoolState,
        x_desired: u64,
        y_desired: u64,
        slippage: Slippage,
    ) -> SdkResult<BuiltIntent> {
        let quote = self
            .quotes
            .add_liquidity(&pool, x_desired, y_desired, slippage)?;

        let (plan_x, mut reservation) = self.prepare_coins(&pair.x, quote.max_amount_x).await?;
        let (plan_y, reservation_y) = self.prepare_coins(&pair.y, quote.max_amount_y).await?;
        reservation.absorb(reservation_y);

        let mut builder = IntentBuilder::new();
        let coin_x = builder.apply_coin_plan(&plan_x);
        let coin_y = builder.apply_coin_plan(&plan_y);
        let mut arguments = self.router_prefix(&mut builder, &pool.id);
        arguments.push(coin_x);
        arguments.push(builder.pure_u64(quote.min_amount_x));
        arguments.push(coin_y);
        arguments.push(builder.pure_u64(quote.min_amount_y));
        builder.move_call(
            self.config.router_target(FN_ADD_LIQUIDITY),
            pair.type_arguments(),
            arguments,
        );

        Ok(self.finish(builder, pair, pool, Quote::AddLiquidity(quote), reservation))
    }

    async fn build_remove_liquidity(
        &self,
        pair: CanonicalPair,
        pool: PoolState,
        lp_amount: u64,
        slippage: Slippage,
    ) -> SdkResult<BuiltIntent> {
        let quote = self.quotes.remove_liquidity(&pool, lp_amount, slippage)?;
        let lp_type = pair.lp_type(&self.config.package_id);
        let (plan, reservation) = self.prepare_coins(&lp_type, lp_amount).await?;

        let mut builder = IntentBuilder::new();
        let lp_coin = builder.apply_coin_plan(&plan);
        let mut arguments = self.router_prefix(&mut builder, &pool.id);
        arguments.push(lp_coin);
        arguments.push(builder.pure_u64(quote.min_amount_x));
        arguments.push(builder.pure_u64(quote.min_amount_y));
        builder.move_call(
            self.config.router_target(FN_REMOVE_LIQUIDITY),
            pair.type_arguments(),
            arguments,
        );

        Ok(self.finish(builder, pair, pool, Quote::RemoveLiquidity(quote), reservation))
    }

    async fn build_swap_exact_in(
        &self,
        pair: CanonicalPair,
        pool: PoolState,
        direction: SwapDirection,
        amount_in: u64,
        slippage: Slippage,
    ) -> SdkResult<BuiltIntent> {
        let quote = self
            .quotes
            .swap_exact_in(&pool, direction, amount_in, slippage)?;
        let (token_in, function) = match direction {
            SwapDirection::XToY => (&pair.x, FN_SWAP_EXACT_X_TO_Y),
            SwapDirection::YToX => (&pair.y, FN_SWAP_EXACT_Y_TO_X),
        };
        let (plan, reservation) = self.prepare_coins(token_in, amount_in).await?;

        let mut builder = IntentBuilder::new();
        let coin_in = builder.apply_coin_plan(&plan);
        let mut arguments = self.router_prefix(&mut builder, &pool.id);
        arguments.push(coin_in);
        arguments.push(builder.pure_u64(quote.min_amount_out));
        builder.move_call(
            self.config.router_target(function),
            pair.type_arguments(),
            arguments,
        );

        Ok(self.finish(builder, pair, pool, Quote::SwapExactIn(quote), reservation))
    }

    async fn build_swap_exact_out(
        &self,
        pair: CanonicalPair,
        pool: PoolState,
        direction: SwapDirection,
        amount_out: u64,
        slippage: Slippage,
    ) -> SdkResult<BuiltIntent> {
        let quote = self
            .quotes
            .swap_exact_out(&pool, direction, amount_out, slippage)?;
        let (token_in, function) = match direction {
            SwapDirection::XToY => (&pair.x, FN_SWAP_X_TO_EXACT_Y),
            SwapDirection::YToX => (&pair.y, FN_SWAP_Y_TO_EXACT_X),
        };
        // The router refunds whatever part of max_in it does not need
        let (plan, reservation) = self.prepare_coins(token_in, quote.max_amount_in).await?;

        let mut builder = IntentBuilder::new();
        let coin_in = builder.apply_coin_plan(&plan);
        let mut arguments = self.router_prefix(&mut builder, &pool.id);
        arguments.push(coin_in);
        arguments.push(builder.pure_u64(amount_out));
        builder.move_call(
            self.config.router_target(function),
            pair.type_arguments(),
            arguments,
        );

        Ok(self.finish(builder, pair, pool, Quote::SwapExactOut(quote), reservation))
    }

    /// Selection plan for `owner`'s coins without reserving anything.
    pub async fn plan_coins(
        &self,
        owner: &SuiAddress,
        token_type: &TokenType,
        required: u64,
    ) -> SdkResult<CoinPlan> {
        let owned = self.fetch_coins(owner, token_type).await?;
        self.selector.select(&self.reservations.filter(&owned), required)
    }

    async fn fetch_coins(&self, owner: &SuiAddress, token_type: &TokenType) -> SdkResult<CoinSet> {
        with_timeout(
            self.timeout(),
            "fetch_owned_coins",
            self.chain.fetch_owned_coins(owner, token_type),
        )
        .await
    }

    /// Fetch, filter out reserved coins, select and reserve.
    async fn prepare_coins(
        &self,
        token_type: &TokenType,
        required: u64,
    ) -> SdkResult<(CoinPlan, ReservationGuard)> {
        let owned = self.fetch_coins(&self.sender, token_type).await?;
        let available = self.reservations.filter(&owned);
        if available.len() < owned.len() {
            debug!(
                "{} of {} {} coins are reserved by other builds",
                owned.len() - available.len(),
                owned.len(),
                token_type
            );
        }

        let plan = self.selector.select(&available, required)?;
        let reservation = self.reservations.reserve(&plan.consumed_ids())?;
        Ok((plan, reservation))
    }

    /// `version, global, pool` leading every router entry point.
    fn router_prefix(&self, builder: &mut IntentBuilder, pool_id: &PoolId) -> Vec<Argument> {
        vec![
            builder.obj(&self.version_id),
            builder.obj(&self.global_id),
            builder.obj(pool_id),
        ]
    }

    fn finish(
        &self,
        builder: IntentBuilder,
        pair: CanonicalPair,
        pool: PoolState,
        quote: Quote,
        reservation: ReservationGuard,
    ) -> BuiltIntent {
        BuiltIntent {
            intent: builder.finish(self.sender.clone(), quote),
            pool,
            pair,
            reservation,
        }
    }
}

/// Unflipped means the first token is the canonical x.
pub(crate) fn direction(flipped: bool) -> SwapDirection {
    if flipped {
        SwapDirection::YToX
    } else {
        SwapDirection::XToY
    }
}

fn request_name(request: &IntentRequest) -> &'static str {
    match request {
        IntentRequest::AddLiquidity { .. } => "add_liquidity",
        IntentRequest::RemoveLiquidity { .. } => "remove_liquidity",
        IntentRequest::SwapExactIn { .. } => "swap_exact_in",
        IntentRequest::SwapExactOut { .. } => "swap_exact_out",
    }
}
