use crate::chain::SuiAddress;
use crate::cli::{display::Display, PairArgs};
use crate::core::{CanonicalPair, Config, SdkResult};
use log::info;

pub async fn execute_pool_id(config: &Config, sender: SuiAddress, args: PairArgs) -> SdkResult<()> {
    let (pair, _) = CanonicalPair::new(&args.coin_a, &args.coin_b)?;
    let client = super::connect(config, sender)?;

    let pb = Display::create_progress_bar("Looking up pool registry...");
    let pool_id = client.get_pool_id(&args.coin_a, &args.coin_b).await;
    pb.finish_and_clear();

    let pool_id = pool_id?;
    info!("Resolved {} to {}", pair, pool_id);
    Display::display_pool_id(&pair, &pool_id);
    Ok(())
}

pub async fn execute_pool(config: &Config, sender: SuiAddress, args: PairArgs) -> SdkResult<()> {
    let (pair, _) = CanonicalPair::new(&args.coin_a, &args.coin_b)?;
    let client = super::connect(config, sender)?;

    let pb = Display::create_progress_bar("Resolving pool...");
    let pool_id = match client.get_pool_id(&args.coin_a, &args.coin_b).await {
        Ok(id) => id,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.set_message("Reading reserves...");
    let pool = client.get_pool(&pool_id).await;
    pb.finish_and_clear();

    Display::display_pool(&pair, &pool?);
    Ok(())
}
