use crate::chain::SuiAddress;
use crate::cli::{display::Display, OperationArgs};
use crate::core::{CanonicalPair, Config, SdkResult};
use crate::quotes::{Quote, Slippage};
use crate::transaction::DipcoinClient;
use colored::*;
use console::style;
use log::info;

pub async fn execute(config: &Config, sender: SuiAddress, args: OperationArgs) -> SdkResult<()> {
    println!("{}", "🚀 Dipcoin Quote".bold().cyan());

    let slippage = args.slippage(config.default_slippage_bps)?;
    args.request(slippage).validate()?;
    let client = super::connect(config, sender)?;

    let pb = Display::create_progress_bar("Fetching pool...");
    let quote = fetch_quote(&client, &args, slippage).await;
    pb.finish_and_clear();

    match (&args, quote?) {
        (OperationArgs::SwapIn(swap), Quote::SwapExactIn(quote)) => {
            Display::display_swap_exact_in(&swap.coin_in, &swap.coin_out, &quote)
        }
        (OperationArgs::SwapOut(swap), Quote::SwapExactOut(quote)) => {
            Display::display_swap_exact_out(&swap.coin_in, &swap.coin_out, &quote)
        }
        (OperationArgs::Add(add), Quote::AddLiquidity(quote)) => {
            let (pair, _) = CanonicalPair::new(&add.pair.coin_a, &add.pair.coin_b)?;
            Display::display_add_liquidity(&pair, &quote)
        }
        (OperationArgs::Remove(remove), Quote::RemoveLiquidity(quote)) => {
            let (pair, _) = CanonicalPair::new(&remove.pair.coin_a, &remove.pair.coin_b)?;
            Display::display_remove_liquidity(&pair, &quote)
        }
        _ => Display::display_error("Quote does not match the requested operation"),
    }

    println!(
        "{}",
        style("💡 Tip: `dipcoin build` prints the unsigned intent for this operation").dim()
    );
    Ok(())
}

async fn fetch_quote(
    client: &DipcoinClient,
    args: &OperationArgs,
    slippage: Slippage,
) -> SdkResult<Quote> {
    match args {
        OperationArgs::SwapIn(swap) => {
            info!(
                "Quoting {} {} -> {} (slippage {})",
                swap.amount, swap.coin_in, swap.coin_out, slippage
            );
            client
                .quote_swap_exact_in(&swap.coin_in, &swap.coin_out, swap.amount, slippage)
                .await
                .map(Quote::SwapExactIn)
        }
        OperationArgs::SwapOut(swap) => {
            info!(
                "Quoting {} -> {} {} (slippage {})",
                swap.coin_in, swap.amount, swap.coin_out, slippage
            );
            client
                .quote_swap_exact_out(&swap.coin_in, &swap.coin_out, swap.amount, slippage)
                .await
                .map(Quote::SwapExactOut)
        }
        OperationArgs::Add(add) => client
            .quote_add_liquidity(
                &add.pair.coin_a,
                &add.pair.coin_b,
                add.amount_a,
                add.amount_b,
                slippage,
            )
            .await
            .map(Quote::AddLiquidity),
        OperationArgs::Remove(remove) => client
            .quote_remove_liquidity(&remove.pair.coin_a, &remove.pair.coin_b, remove.lp_amount, slippage)
            .await
            .map(Quote::RemoveLiquidity),
    }
}
