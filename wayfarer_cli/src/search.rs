use anyhow::anyhow;
use clap::Args;
use indicatif::ProgressBar;
use std::time::Duration;
use wayfarer_core::Coordinate;

use crate::{render, setup};

#[derive(Args)]
pub struct SearchArgs {
    #[arg(required = true)]
    query: Vec<String>,

    /// Bias results towards this "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    near: Option<Coordinate>,
}

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let provider = setup::routing_provider()
        .ok_or_else(|| anyhow!("Place search needs MAPBOX_ACCESS_TOKEN"))?;

    let query = args.query.join(" ");

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("Searching for {query}"));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let places = provider.search_places(&query, args.near).await;
    spinner.finish_and_clear();

    let places = places?;
    println!("{}", render::places_table(&places, args.near));

    Ok(())
}
