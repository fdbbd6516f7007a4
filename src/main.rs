// Seoul Food Dashboard CLI - headless dashboard/recommendation queries

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sfd_lib::commands::dashboard::{get_dashboard, get_expenditure, DashboardArgs, ExpenditureArgs};
use sfd_lib::commands::{cache, catalog, recommend, AppState};
use sfd_lib::config::{self, AppConfig};
use sfd_lib::db::Database;
use sfd_lib::error::{CommandError, CommandResult, DashboardError};
use sfd_lib::recommend::AnalyzeCommand;

const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "sfd")]
#[command(about = "Seoul commercial-area food service dashboard (headless)")]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "DB_PATH")]
    db: Option<PathBuf>,

    /// Reporting period: 20244 or 20241-20244
    #[arg(long, global = true, env = "REPORTING_PERIOD")]
    period: Option<String>,

    /// Compact JSON output
    #[arg(long, global = true)]
    compact: bool,

    /// Print query cache statistics to stderr after the command
    #[arg(long, global = true)]
    cache_stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List filter options (areas, categories, period)
    Filters,

    /// Build every dashboard panel for a filter
    #[command(after_help = "\
Examples:
  sfd dashboard --area 3110001
  sfd dashboard --category 한식음식점
  sfd dashboard --area 3110001 --category 커피-음료")]
    Dashboard {
        /// Commercial area code (at most one)
        #[arg(long)]
        area: Option<i64>,

        /// Category name (omit for all 10)
        #[arg(long)]
        category: Option<String>,
    },

    /// Dong expenditure for a set of areas
    Expenditure {
        /// Area codes, comma-separated
        #[arg(long, value_delimiter = ',', required = true)]
        areas: Vec<i64>,

        /// Area to use when the areas span several dongs
        #[arg(long)]
        choose: Option<i64>,
    },

    /// Recommend categories for an area or areas for a category
    Recommend {
        #[command(subcommand)]
        target: RecommendTarget,
    },

    /// Create the read-model schema in the database file
    InitDb,
}

#[derive(Subcommand)]
enum RecommendTarget {
    /// Best categories for an area
    Area { code: i64 },
    /// Best areas for a category
    Category { name: String },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<AppConfig, DashboardError> {
    AppConfig::from_env()?.with_overrides(cli.db.clone(), cli.period.as_deref())
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> CommandResult<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .map_err(DashboardError::from)?;
    println!("{}", text);
    Ok(())
}

fn init_db(config: &AppConfig) -> CommandResult<()> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(DashboardError::from)?;
        }
    }
    let db = Database::new(&config.database_path)?;
    db.initialize()?;
    tracing::info!(path = %config.database_path.display(), "schema initialized");
    Ok(())
}

fn run(cli: Cli) -> CommandResult<()> {
    let config = load_config(&cli)?;
    let compact = cli.compact;

    if let Commands::InitDb = cli.command {
        return init_db(&config);
    }

    let state = AppState::open(&config)?;
    let result = match cli.command {
        Commands::Filters => print_json(&catalog::get_filter_options(&state)?, compact),
        Commands::Dashboard { area, category } => {
            let args = DashboardArgs {
                areas: area.into_iter().collect(),
                categories: category.into_iter().collect(),
            };
            print_json(&get_dashboard(args, &state)?, compact)
        }
        Commands::Expenditure { areas, choose } => {
            let panel = get_expenditure(ExpenditureArgs { areas, choose }, &state)?;
            print_json(&panel, compact)
        }
        Commands::Recommend { target } => {
            let command = match target {
                RecommendTarget::Area { code } => AnalyzeCommand::Area(code),
                RecommendTarget::Category { name } => AnalyzeCommand::Category(name),
            };
            print_json(&recommend::run_analysis(command, &state)?, compact)
        }
        Commands::InitDb => Ok(()),
    };

    if cli.cache_stats {
        let status = cache::cache_stats(&state)?;
        match serde_json::to_string(&status) {
            Ok(json) => eprintln!("{}", json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize cache stats"),
        }
    }
    result
}

fn main() -> ExitCode {
    let env_files = config::load_env();
    init_tracing();
    tracing::debug!(files = ?env_files, "env files loaded");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn report(err: &CommandError) {
    match serde_json::to_string(err) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", err),
    }
}
