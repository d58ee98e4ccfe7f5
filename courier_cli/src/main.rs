use std::sync::Arc;

use clap::{Parser, Subcommand};
use courier_planner::{Planner, PlanningSession};
use courier_ptv::PtvClient;
use jiff::tz::TimeZone;

use crate::{
    config::{Config, ConfigArgs},
    optimize::OptimizeArgs,
    terminal::TerminalPresenter,
};

mod config;
mod interactive;
mod optimize;
mod parsers;
mod schema;
mod terminal;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Register transports and optimize them step by step
    #[command(visible_alias = "i")]
    Interactive,
    /// Optimize the transports of a JSON file
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Print the JSON schema of the `optimize` input file
    Schema,
}

fn planner(config: Config) -> Result<Arc<Planner>, anyhow::Error> {
    let client = PtvClient::new(config.client)?;
    let presenter = Arc::new(TerminalPresenter::new(TimeZone::system()));

    Ok(Arc::new(Planner::new(
        Arc::new(client),
        PlanningSession::new(),
        presenter,
        config.lifecycle,
    )))
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Interactive => interactive::run(planner(Config::load(cli.config)?)?).await?,
        Commands::Optimize { args } => {
            let planner = planner(Config::load(cli.config)?)?;
            optimize::run(args, &planner).await?;
        }
        Commands::Schema => println!("{}", schema::generate_json_schema()?),
    }

    Ok(())
}
