use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{navigate::NavigateArgs, parse::ParseArgs, search::SearchArgs};

mod navigate;
mod parse;
mod render;
mod search;
mod setup;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive dashboard: pick a destination, then reshape the route in
    /// plain words
    #[command(visible_alias = "nav")]
    Navigate {
        #[command(flatten)]
        args: NavigateArgs,
    },
    /// Turn a single request into routing constraints and print them as JSON
    Parse {
        #[command(flatten)]
        args: ParseArgs,
    },
    /// Look up places by name
    Search {
        #[command(flatten)]
        args: SearchArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Navigate { args } => navigate::run(args).await?,
        Commands::Parse { args } => parse::run(args).await?,
        Commands::Search { args } => search::run(args).await?,
    }

    Ok(())
}
