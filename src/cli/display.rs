use crate::coins::{CoinInstruction, CoinPlan};
use crate::core::{CanonicalPair, PoolId, PoolState, TokenType};
use crate::quotes::{AddLiquidityQuote, RemoveLiquidityQuote, SwapExactInQuote, SwapExactOutQuote};
use crate::transaction::TransactionIntent;
use crate::utils::{format_number, short_type};
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal rendering for pools, quotes and coin plans
pub struct Display;

impl Display {
    pub fn display_pool_id(pair: &CanonicalPair, pool_id: &PoolId) {
        println!(
            "{} {}/{}",
            style("►").cyan(),
            short_type(&pair.x).bold(),
            short_type(&pair.y).bold()
        );
        println!("  Pool: {}", style(pool_id.to_string()).dim());
    }

    pub fn display_pool(pair: &CanonicalPair, pool: &PoolState) {
        println!("\n{}", style("🏊 Dipcoin Pool").bold().underlined());
        println!("Address: {}", style(pool.id.to_string()).dim());
        println!("X: {}", pair.x);
        println!("Y: {}", pair.y);
        println!(
            "Reserves: {} {} / {} {}",
            format_number(pool.bal_x),
            short_type(&pair.x),
            format_number(pool.bal_y),
            short_type(&pair.y)
        );
        println!(
            "Accrued Fees: {} / {}",
            format_number(pool.fee_bal_x),
            format_number(pool.fee_bal_y)
        );
        println!("LP Supply: {}", format_number(pool.lp_supply));
        println!("Fee Rate: {:.2}%", pool.fee_rate as f64 / 100.0);
    }

    pub fn display_swap_exact_in(coin_in: &TokenType, coin_out: &TokenType, quote: &SwapExactInQuote) {
        println!("\n{}", "💱 Swap Quote (exact in)".bold().green());
        println!(
            "  {} {} → {} {}",
            format_number(quote.amount_in),
            short_type(coin_in),
            format_number(quote.amount_out),
            short_type(coin_out)
        );
        println!(
            "  Price Impact: {} | Fee: {} {}",
            format_impact(quote.price_impact),
            format_number(quote.fee),
            short_type(coin_in)
        );
        println!(
            "  Min Output: {} {} ({} slippage)",
            format_number(quote.min_amount_out),
            short_type(coin_out),
            quote.slippage
        );
    }

    pub fn display_swap_exact_out(coin_in: &TokenType, coin_out: &TokenType, quote: &SwapExactOutQuote) {
        println!("\n{}", "💱 Swap Quote (exact out)".bold().green());
        println!(
            "  {} {} → {} {}",
            format_number(quote.amount_in),
            short_type(coin_in),
            format_number(quote.amount_out),
            short_type(coin_out)
        );
        println!(
            "  Price Impact: {} | Fee: {} {}",
            format_impact(quote.price_impact),
            format_number(quote.fee),
            short_type(coin_in)
        );
        println!(
            "  Max Input: {} {} ({} slippage)",
            format_number(quote.max_amount_in),
            short_type(coin_in),
            quote.slippage
        );
    }

    pub fn display_add_liquidity(pair: &CanonicalPair, quote: &AddLiquidityQuote) {
        println!("\n{}", "➕ Add Liquidity Quote".bold().green());
        for (token, amount, min, max) in [
            (&pair.x, quote.amount_x, quote.min_amount_x, quote.max_amount_x),
            (&pair.y, quote.amount_y, quote.min_amount_y, quote.max_amount_y),
        ] {
            println!(
                "  {} {} (min {}, max {})",
                format_number(amount),
                short_type(token),
                format_number(min),
                format_number(max)
            );
        }
        println!("  Slippage: {}", quote.slippage);
    }

    pub fn display_remove_liquidity(pair: &CanonicalPair, quote: &RemoveLiquidityQuote) {
        println!("\n{}", "➖ Remove Liquidity Quote".bold().green());
        println!("  Burn {} LP", format_number(quote.lp_amount));
        println!(
            "  Receive {} {} (min {})",
            format_number(quote.amount_x),
            short_type(&pair.x),
            format_number(quote.min_amount_x)
        );
        println!(
            "  Receive {} {} (min {})",
            format_number(quote.amount_y),
            short_type(&pair.y),
            format_number(quote.min_amount_y)
        );
        println!("  Slippage: {}", quote.slippage);
    }

    pub fn display_coin_plan(plan: &CoinPlan) {
        println!("\n{}", style("🪙 Coin Selection").bold().underlined());
        println!(
            "Required: {} {} | Selected: {} from {} coin(s)",
            format_number(plan.required),
            short_type(&plan.token_type),
            format_number(plan.selected_total()),
            plan.selected.len()
        );
        for coin in &plan.selected {
            println!(
                "  {} {}",
                style(coin.id.to_string()).dim(),
                format_number(coin.balance)
            );
        }

        if plan.instructions.is_empty() {
            println!("{}", "No merge or split needed".green());
        }
        for instruction in &plan.instructions {
            match instruction {
                CoinInstruction::Merge { destination, sources } => println!(
                    "  {} {} coin(s) into {}",
                    "merge".yellow(),
                    sources.len(),
                    style(destination.to_string()).dim()
                ),
                CoinInstruction::Split { coin, amount, remainder } => println!(
                    "  {} {} out of {} (leaves {})",
                    "split".yellow(),
                    format_number(*amount),
                    style(coin.to_string()).dim(),
                    format_number(*remainder)
                ),
            }
        }
    }

    pub fn display_intent_summary(intent: &TransactionIntent) {
        eprintln!(
            "{} {} | {} input(s), {} command(s), {} coin(s) consumed",
            style("►").cyan(),
            intent.entry_point().unwrap_or("intent").bold(),
            intent.inputs.len(),
            intent.commands.len(),
            intent.consumed_coins.len()
        );
    }

    pub fn display_error(message: &str) {
        println!("{} {}", "❌".red(), message.red().bold());
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

/// Format price impact with color
fn format_impact(impact: f64) -> ColoredString {
    let impact_str = format!("{:.3}%", impact);
    if impact < 0.1 {
        impact_str.green()
    } else if impact < 1.0 {
        impact_str.yellow()
    } else {
        impact_str.red()
    }
}
