//! Planes CLI
//!
//! Local execution entry point. For AWS Lambda, use `planes-lambda`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use planes::{
    error::Result,
    models::{CatalogIdentity, Config},
    pipeline,
    storage::{self, ObjectStore},
};

/// Planes - Study plan catalog store
#[derive(Parser, Debug)]
#[command(name = "planes", version, about = "Scraped study plan catalog store")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "planes.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a scraped plan unless an identical one already exists
    Ingest {
        /// Path to the scraper's JSON output
        file: PathBuf,
    },

    /// List every stored plan as JSON
    List,

    /// Print the courses stored for one plan
    Show {
        /// Program name, exactly as scraped
        carrera: String,
        /// Term number within the year
        numero: u32,
        /// Academic year
        anio: u32,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Validate configuration and open the configured store.
async fn open_store(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    config.validate()?;
    storage::from_config(config).await
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    config.apply_env();
    init_logging(cli.verbose, &config.logging.level);

    log::debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Command::Ingest { file } => {
            let store = open_store(&config).await?;
            let outcome = pipeline::run_ingest(&config, store, &file).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::List => {
            let store = open_store(&config).await?;
            let catalogs = pipeline::run_list(&config, store).await?;
            log::info!("Found {} catalogs", catalogs.len());
            println!("{}", serde_json::to_string_pretty(&catalogs)?);
        }

        Command::Show {
            carrera,
            numero,
            anio,
        } => {
            let store = open_store(&config).await?;
            let identity = CatalogIdentity::new(carrera, numero, anio);
            let courses = pipeline::run_show(&config, store, &identity).await?;
            println!("{}", serde_json::to_string_pretty(&courses)?);
        }

        Command::Validate => pipeline::run_validate(&config)?,
    }

    Ok(())
}
