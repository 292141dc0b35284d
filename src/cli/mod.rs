use crate::chain::SuiAddress;
use crate::core::{SdkResult, TokenType};
use crate::quotes::Slippage;
use crate::transaction::IntentRequest;
use clap::{Args, Parser, Subcommand};

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "dipcoin")]
#[command(about = "Pool lookup, quotes and unsigned intents for the Dipcoin AMM on Sui", long_about = None)]
pub struct Cli {
    /// Address the intents are built for
    #[arg(long, global = true, env = "DIPCOIN_SENDER", default_value = "0x0", value_parser = parse_address)]
    pub sender: SuiAddress,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the pool id of a token pair
    PoolId(PairArgs),

    /// Show reserves, fee and LP supply of a pair's pool
    Pool(PairArgs),

    /// Quote an operation against current reserves
    #[command(subcommand)]
    Quote(OperationArgs),

    /// Build the unsigned intent for an operation and print it as JSON
    #[command(subcommand)]
    Build(OperationArgs),

    /// Show how an owner's coins would cover an amount
    Coins(CoinsArgs),
}

#[derive(Args)]
pub struct PairArgs {
    /// First token type, e.g. 0x2::sui::SUI
    #[arg(value_parser = parse_token)]
    pub coin_a: TokenType,

    /// Second token type
    #[arg(value_parser = parse_token)]
    pub coin_b: TokenType,
}

#[derive(Subcommand)]
pub enum OperationArgs {
    /// Spend an exact input amount
    SwapIn(SwapArgs),

    /// Receive an exact output amount
    SwapOut(SwapArgs),

    /// Deposit both tokens of a pair
    Add(AddArgs),

    /// Burn LP tokens of a pair
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct SwapArgs {
    /// Token paid in
    #[arg(value_parser = parse_token)]
    pub coin_in: TokenType,

    /// Token received
    #[arg(value_parser = parse_token)]
    pub coin_out: TokenType,

    /// Exact amount in base units (input for swap-in, output for swap-out)
    pub amount: u64,

    /// Slippage tolerance in basis points (default: configured value)
    #[arg(short, long)]
    pub slippage: Option<u16>,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Desired amount of the first token
    pub amount_a: u64,

    /// Desired amount of the second token
    pub amount_b: u64,

    /// Slippage tolerance in basis points (default: configured value)
    #[arg(short, long)]
    pub slippage: Option<u16>,
}

#[derive(Args)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// LP tokens to burn
    pub lp_amount: u64,

    /// Slippage tolerance in basis points (default: configured value)
    #[arg(short, long)]
    pub slippage: Option<u16>,
}

#[derive(Args)]
pub struct CoinsArgs {
    /// Coin owner
    #[arg(value_parser = parse_address)]
    pub owner: SuiAddress,

    /// Token type
    #[arg(value_parser = parse_token)]
    pub token_type: TokenType,

    /// Amount in base units
    pub amount: u64,
}

impl OperationArgs {
    pub fn slippage_bps(&self) -> Option<u16> {
        match self {
            OperationArgs::SwapIn(args) | OperationArgs::SwapOut(args) => args.slippage,
            OperationArgs::Add(args) => args.slippage,
            OperationArgs::Remove(args) => args.slippage,
        }
    }

    /// Resolve the slippage against `default_bps`.
    pub fn slippage(&self, default_bps: u16) -> SdkResult<Slippage> {
        Slippage::from_bps(self.slippage_bps().unwrap_or(default_bps))
    }

    /// The request this operation describes, in the order given on the command line.
    pub fn request(&self, slippage: Slippage) -> IntentRequest {
        match self {
            OperationArgs::SwapIn(args) => IntentRequest::SwapExactIn {
                coin_in: args.coin_in.clone(),
                coin_out: args.coin_out.clone(),
                amount_in: args.amount,
                slippage,
            },
            OperationArgs::SwapOut(args) => IntentRequest::SwapExactOut {
                coin_in: args.coin_in.clone(),
                coin_out: args.coin_out.clone(),
                amount_out: args.amount,
                slippage,
            },
            OperationArgs::Add(args) => IntentRequest::AddLiquidity {
                coin_a: args.pair.coin_a.clone(),
                coin_b: args.pair.coin_b.clone(),
                amount_a: args.amount_a,
                amount_b: args.amount_b,
                slippage,
            },
            OperationArgs::Remove(args) => IntentRequest::RemoveLiquidity {
                coin_a: args.pair.coin_a.clone(),
                coin_b: args.pair.coin_b.clone(),
                lp_amount: args.lp_amount,
                slippage,
            },
        }
    }
}

fn parse_token(s: &str) -> Result<TokenType, String> {
    let parts: Vec<&str> = s.split("::").collect();
    if parts.len() < 3 || !parts[0].starts_with("0x") || parts.iter().any(|p| p.is_empty()) {
        return Err(format!("Invalid token type: {}", s));
    }
    Ok(TokenType::from(s))
}

fn parse_address(s: &str) -> Result<SuiAddress, String> {
    s.parse::<SuiAddress>()
        .map_err(|e| format!("Invalid address: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote_swap_in() {
        let cli = Cli::try_parse_from([
            "dipcoin",
            "quote",
            "swap-in",
            "0x2::sui::SUI",
            "0x5c68::coins::USDC",
            "1000",
            "--slippage",
            "100",
        ])
        .unwrap();

        match cli.command {
            Commands::Quote(OperationArgs::SwapIn(args)) => {
                assert_eq!(args.coin_in, TokenType::from("0x2::sui::SUI"));
                assert_eq!(args.amount, 1000);
                assert_eq!(args.slippage, Some(100));
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_slippage_defaults_to_config() {
        let cli = Cli::try_parse_from([
            "dipcoin",
            "build",
            "remove",
            "0x2::sui::SUI",
            "0x5c68::coins::USDC",
            "500",
        ])
        .unwrap();

        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.slippage_bps(), None);
                let slippage = args.slippage(50).unwrap();
                assert_eq!(slippage.ppm(), 5_000);
                assert!(matches!(
                    args.request(slippage),
                    IntentRequest::RemoveLiquidity { lp_amount: 500, .. }
                ));
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_rejects_malformed_token() {
        assert!(parse_token("SUI").is_err());
        assert!(parse_token("0x2::sui").is_err());
        assert!(parse_token("0x2::sui::SUI").is_ok());
        assert!(Cli::try_parse_from(["dipcoin", "pool-id", "SUI", "0x2::sui::SUI"]).is_err());
    }
}
