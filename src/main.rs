use anyhow::Context;
use clap::Parser;
use dipcoin_sdk::cli::commands::{build, coins, pool, quote};
use dipcoin_sdk::cli::{Cli, Commands};
use dipcoin_sdk::core::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration before parsing so .env can supply DIPCOIN_SENDER
    dotenv::dotenv().ok();
    let config = Config::from_env().context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let cli = Cli::parse();
    let sender = cli.sender;

    match cli.command {
        Commands::PoolId(args) => pool::execute_pool_id(&config, sender, args).await?,
        Commands::Pool(args) => pool::execute_pool(&config, sender, args).await?,
        Commands::Quote(args) => quote::execute(&config, sender, args).await?,
        Commands::Build(args) => build::execute(&config, sender, args).await?,
        Commands::Coins(args) => coins::execute(&config, sender, args).await?,
    }

    Ok(())
}
