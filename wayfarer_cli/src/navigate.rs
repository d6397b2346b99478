use std::{future::Future, io::Write, sync::Arc, time::Duration};

use clap::Args;
use indicatif::ProgressBar;
use jiff::Timestamp;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use wayfarer_core::{Coordinate, Place};
use wayfarer_navigation::{
    ManualLocationTracker, ModificationOutcome, NavigationStateKind, Navigator, NavigatorConfig,
    RouteChoice,
};

use crate::{render, setup};

const HELP: &str = "\
Commands:
  search <query>     list matching places
  go <n | query>     navigate to result n of the last search, or the best match
  <anything else>    while navigating, ask for a different route in plain words
  select <n>         preview candidate n
  confirm [n]        switch to candidate n, or the previewed one
  keep               keep the current route
  at <lon,lat>       report a GPS fix
  show               print the dashboard
  reset              start over
  quit";

#[derive(Args)]
pub struct NavigateArgs {
    /// Origin used while there is no GPS fix, as "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    origin: Option<Coordinate>,

    /// Initial GPS fix, as "lon,lat"
    #[arg(long, allow_hyphen_values = true)]
    position: Option<Coordinate>,

    /// Use a running intent endpoint instead of parsing in-process
    #[arg(long, env = "WAYFARER_INTENT_URL")]
    intent_url: Option<String>,
}

pub async fn run(args: NavigateArgs) -> anyhow::Result<()> {
    let mut config = NavigatorConfig::from_env()?;
    if let Some(origin) = args.origin {
        config.default_origin = origin;
    }

    let tracker = Arc::new(ManualLocationTracker::new());
    if let Some(position) = args.position {
        tracker.push_fix(position);
    }

    let navigator = Navigator::new(
        config,
        setup::routing_provider(),
        setup::intent_source(args.intent_url.as_deref())?,
        tracker.clone(),
    );

    println!("{HELP}\n");
    render::print_view(&navigator.view(Timestamp::now()));

    let mut results: Vec<Place> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line
            .split_once(' ')
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => {}
            "help" | "?" => println!("{HELP}"),
            "quit" | "exit" => break,
            "show" => render::print_view(&navigator.view(Timestamp::now())),
            "search" => {
                results = search(&navigator, rest).await;
            }
            "go" => {
                let place = match rest.parse::<usize>() {
                    Ok(index) if (1..=results.len()).contains(&index) => {
                        Some(results[index - 1].clone())
                    }
                    _ => {
                        results = search(&navigator, rest).await;
                        results.first().cloned()
                    }
                };

                if let Some(place) = place {
                    let label = format!("Routing to {}", place.name);
                    match with_spinner(&label, navigator.choose_destination(place)).await {
                        Ok(_) => render::print_view(&navigator.view(Timestamp::now())),
                        Err(error) => println!("{error}"),
                    }
                }
            }
            "select" => match rest.parse::<usize>() {
                Ok(index) => match navigator.select_candidate(index) {
                    Ok(()) => render::print_view(&navigator.view(Timestamp::now())),
                    Err(error) => println!("{error}"),
                },
                Err(_) => println!("Usage: select <n>"),
            },
            "confirm" | "keep" => {
                let choice = match (command, rest.parse::<usize>()) {
                    ("keep", _) => RouteChoice::KeepCurrent,
                    (_, Ok(index)) => RouteChoice::Candidate(index),
                    (_, Err(_)) => RouteChoice::Selected,
                };

                match navigator.confirm(choice) {
                    Ok(()) => render::print_view(&navigator.view(Timestamp::now())),
                    Err(error) => println!("{error}"),
                }
            }
            "at" => match rest.parse::<Coordinate>() {
                Ok(position) => {
                    tracker.push_fix(position);
                    debug!("Applied {} location updates", navigator.poll_location_updates());
                }
                Err(error) => println!("{error}"),
            },
            "reset" => match navigator.start_over() {
                Ok(()) => render::print_view(&navigator.view(Timestamp::now())),
                Err(error) => println!("{error}"),
            },
            _ => modify(&navigator, line).await,
        }

        render::print_notices(&navigator.take_notices());
        prompt();
    }

    Ok(())
}

async fn search(navigator: &Navigator, query: &str) -> Vec<Place> {
    if query.is_empty() {
        println!("Usage: search <query>");
        return Vec::new();
    }

    let label = format!("Searching for {query}");
    match with_spinner(&label, navigator.search_places(query)).await {
        Ok(places) => {
            let from = navigator
                .position()
                .unwrap_or(navigator.config().default_origin);
            println!("{}", render::places_table(&places, Some(from)));
            places
        }
        Err(error) => {
            println!("{error}");
            Vec::new()
        }
    }
}

async fn modify(navigator: &Navigator, utterance: &str) {
    if navigator.kind() != NavigationStateKind::Navigating {
        println!("Pick a destination first with `go <place>`, or type `help`.");
        return;
    }

    match with_spinner(
        "Looking for alternatives",
        navigator.request_modification(utterance),
    )
    .await
    {
        Ok(ModificationOutcome::Comparing { .. }) => {
            render::print_view(&navigator.view(Timestamp::now()))
        }
        Ok(_) => {}
        Err(error) => println!("{error}"),
    }
}

async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = future.await;

    spinner.finish_and_clear();
    output
}

fn prompt() {
    print!("> ");
    std::io::stdout().flush().ok();
}
