use anyhow::Context;
use clap::{Parser, Subcommand};
use orgpulse_access::DataAccess;
use orgpulse_core::OrgpulseConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "orgpulse", version, about = "Orgpulse analytics data-access CLI")]
struct Cli {
    /// Configuration file. A missing file means all defaults.
    #[arg(long, short, global = true, env = "ORGPULSE_CONFIG", default_value = "orgpulse.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a dialect query and print the result envelope
    Query {
        /// Query text, e.g. "SELECT * FROM daos WHERE name ILIKE $1"
        sql: String,

        /// Positional parameter ($1, $2, ...). Parsed as JSON, falling back to a string.
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,

        /// Run the safety guard first, as for free-form custom queries
        #[arg(long, default_value_t = false)]
        custom: bool,

        /// Row cap applied by the safety guard (only with --custom)
        #[arg(long)]
        limit: Option<u64>,
    },

    /// Run the safety guard on a query and print the text that would execute
    Validate {
        sql: String,

        #[arg(long)]
        limit: Option<u64>,
    },

    /// Check whether a table exists and is readable
    Exists { table: String },

    /// List known entities
    Entities {
        /// Print full records instead of internal names
        #[arg(long, default_value_t = false)]
        records: bool,
    },

    /// Validate the configuration file and report what is set
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = OrgpulseConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.cmd {
        Command::Query {
            sql,
            params,
            custom,
            limit,
        } => {
            let access = DataAccess::connect(&config);
            commands::query::run_query(&access, &sql, &params, custom, limit).await?
        }
        Command::Validate { sql, limit } => {
            let access = DataAccess::new(&config, None);
            commands::query::run_validate(&access, &sql, limit)?
        }
        Command::Exists { table } => {
            let access = DataAccess::connect(&config);
            commands::catalog::run_exists(&access, &table).await?
        }
        Command::Entities { records } => {
            let access = DataAccess::connect(&config);
            commands::catalog::run_entities(&access, records).await?
        }
        Command::CheckConfig => commands::check::run_check(&cli.config, &config)?,
    }

    Ok(())
}
