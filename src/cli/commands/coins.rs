use crate::chain::SuiAddress;
use crate::cli::{display::Display, CoinsArgs};
use crate::core::{Config, SdkResult};

pub async fn execute(config: &Config, sender: SuiAddress, args: CoinsArgs) -> SdkResult<()> {
    let client = super::connect(config, sender)?;

    let pb = Display::create_progress_bar("Fetching coins...");
    let plan = client
        .plan_coins(&args.owner, &args.token_type, args.amount)
        .await;
    pb.finish_and_clear();

    Display::display_coin_plan(&plan?);
    Ok(())
}
