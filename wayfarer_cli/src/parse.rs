use clap::Args;
use wayfarer_core::{Coordinate, RouteModificationParams, RoutingProfile};
use wayfarer_intent::{IntentContext, ModifyRouteResponse};

use crate::setup;

#[derive(Args)]
pub struct ParseArgs {
    /// What the driver said, e.g. "make it more scenic"
    #[arg(required = true)]
    request: Vec<String>,

    /// Route origin as "lon,lat"
    #[arg(long, allow_hyphen_values = true, default_value = "-122.4194,37.7749")]
    origin: Coordinate,

    /// Route destination as "lon,lat"
    #[arg(long, allow_hyphen_values = true, default_value = "-122.2712,37.8044")]
    destination: Coordinate,

    /// Road classes already avoided
    #[arg(long, value_delimiter = ',')]
    avoid: Vec<String>,

    /// Profile currently in use
    #[arg(long, default_value = "driving")]
    profile: RoutingProfile,

    /// Use a running intent endpoint instead of parsing in-process
    #[arg(long, env = "WAYFARER_INTENT_URL")]
    intent_url: Option<String>,
}

pub async fn run(args: ParseArgs) -> anyhow::Result<()> {
    let source = setup::intent_source(args.intent_url.as_deref())?;

    let current_params = args
        .avoid
        .iter()
        .fold(RouteModificationParams::default(), |params, road_class| {
            params.with_avoid(road_class.trim())
        })
        .with_profile(args.profile);

    let context =
        IntentContext::new(args.origin, args.destination).with_current_params(current_params);

    let intent = source.interpret(&args.request.join(" "), &context).await?;
    let response = ModifyRouteResponse::from(intent);

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
