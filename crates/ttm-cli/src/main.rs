mod intake;
mod lookup;
mod route;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use ttm_core::{baseline_gazetteer, load_gazetteer, AppConfig};
use ttm_resolve::{Gazetteer, Resolver};
use ttm_store::{JsonFileStore, RouteRepository};

use crate::route::StopsCommands;

#[derive(Debug, Parser)]
#[command(name = "ttm-cli")]
#[command(about = "Turn delivery tickets into a Google Maps route")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse ticket text from a file (or stdin) and complete its address
    Parse {
        /// Text file to read; stdin when omitted
        path: Option<std::path::PathBuf>,
        /// Append the parsed stop to the route
        #[arg(long)]
        add: bool,
        /// Candidate to use (1-based) when the street is ambiguous
        #[arg(long)]
        pick: Option<usize>,
    },
    /// Parse a dictated transcript
    Speech {
        /// Transcript words
        #[arg(required = true, num_args = 1..)]
        transcript: Vec<String>,
    },
    /// List the cities owning a street similar to the given one
    Resolve {
        /// Street text, with or without house number
        street: String,
    },
    /// Complete the city of a partial address
    Complete {
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        city: Option<String>,
    },
    /// Remember a street under a city
    Learn {
        #[arg(long)]
        city: String,
        #[arg(long)]
        street: String,
    },
    /// List known villages, or check one
    Villages {
        /// Village name to check
        #[arg(long)]
        check: Option<String>,
    },
    /// Suggest streets for a partial name
    Suggest {
        query: String,
        /// Restrict to this city's streets
        #[arg(long)]
        city: Option<String>,
        #[arg(long, default_value_t = ttm_resolve::suggest::DEFAULT_SUGGESTION_LIMIT)]
        limit: usize,
    },
    /// Similarity score in [0, 1] between two strings
    Similarity { left: String, right: String },
    /// Manage the stops of the current route
    Stops {
        #[command(subcommand)]
        command: StopsCommands,
    },
    /// Print the Google Maps link for the current route
    Route {
        /// Print the native app link instead
        #[arg(long)]
        app: bool,
    },
    /// Show or set the route origin
    Origin {
        /// New origin address
        value: Option<String>,
    },
}

/// Shared state opened once per invocation.
pub(crate) struct App {
    pub config: AppConfig,
    pub resolver: Resolver<JsonFileStore>,
    pub routes: RouteRepository<JsonFileStore>,
}

impl App {
    fn open(config: AppConfig) -> anyhow::Result<Self> {
        let data = match &config.gazetteer_path {
            Some(path) => load_gazetteer(path)
                .with_context(|| format!("failed to load gazetteer {}", path.display()))?,
            None => baseline_gazetteer().context("bundled gazetteer is invalid")?,
        };
        let store = JsonFileStore::new(config.store_path());
        tracing::debug!(path = %store.path().display(), villages = data.villages.len(), "opened store");

        let resolver = Resolver::new(
            Gazetteer::new(data, store.clone()),
            config.default_city.clone(),
        );
        let routes = RouteRepository::new(store, config.origin.clone());
        Ok(Self {
            config,
            resolver,
            routes,
        })
    }
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ttm_core::load_app_config_from_env().context("failed to load configuration")?;
    init_tracing(&config)?;

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ttm-cli ready; run with --help for commands");
        return Ok(());
    };

    tracing::debug!(env = %config.env, "starting");
    let mut app = App::open(config)?;

    match command {
        Commands::Parse { path, add, pick } => {
            intake::run_parse(&mut app, path.as_deref(), add, pick)
        }
        Commands::Speech { transcript } => intake::run_speech(&app, &transcript.join(" ")),
        Commands::Resolve { street } => lookup::run_resolve(&app, &street),
        Commands::Complete { address, city } => {
            lookup::run_complete(&app, address.as_deref(), city.as_deref())
        }
        Commands::Learn { city, street } => lookup::run_learn(&mut app, &city, &street),
        Commands::Villages { check } => lookup::run_villages(&app, check.as_deref()),
        Commands::Suggest { query, city, limit } => {
            lookup::run_suggest(&app, &query, city.as_deref(), limit)
        }
        Commands::Similarity { left, right } => lookup::run_similarity(&left, &right),
        Commands::Stops { command } => route::run_stops(&mut app, command),
        Commands::Route { app: native } => route::run_route_url(&app, native),
        Commands::Origin { value } => route::run_origin(&mut app, value.as_deref()),
    }
}
