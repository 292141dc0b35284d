use crate::chain::SuiAddress;
use crate::cli::{display::Display, OperationArgs};
use crate::core::{Config, SdkResult};

/// Print the intent as JSON on stdout. The summary goes to stderr so the
/// output can be piped to a signer.
pub async fn execute(config: &Config, sender: SuiAddress, args: OperationArgs) -> SdkResult<()> {
    let slippage = args.slippage(config.default_slippage_bps)?;
    let request = args.request(slippage);
    request.validate()?;

    let client = super::connect(config, sender)?;
    let built = client.build(&request).await?;

    Display::display_intent_summary(&built.intent);
    println!("{}", serde_json::to_string_pretty(&built.intent)?);
    Ok(())
}
