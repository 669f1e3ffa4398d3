mod analyze;
mod format;
mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use webprice_core::Strategy;

#[derive(Debug, Parser)]
#[command(name = "webprice")]
#[command(about = "Price-adjustment suggestions from marketplace competitiveness exports")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one or more exports and print price suggestions
    Analyze {
        /// Export files to analyze (defaults to every .csv in the current directory)
        paths: Vec<PathBuf>,
        /// Rule family to apply: competitive or margin-protection
        #[arg(long, value_parser = parse_strategy)]
        strategy: Option<Strategy>,
        /// Maximum number of suggestions to print per file
        #[arg(long)]
        top: Option<usize>,
        /// Emit machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Show how an export is decoded, split and mapped, without analyzing it
    Inspect {
        /// Export file to inspect
        path: PathBuf,
    },
}

fn parse_strategy(raw: &str) -> Result<Strategy, String> {
    Strategy::parse(raw).ok_or_else(|| {
        format!("unknown strategy '{raw}'; expected competitive or margin-protection")
    })
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = webprice_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = config.analysis;
    match cli.command {
        Some(Commands::Analyze {
            paths,
            strategy,
            top,
            json,
        }) => {
            if let Some(strategy) = strategy {
                settings.strategy = strategy;
            }
            if let Some(top) = top {
                anyhow::ensure!(top > 0, "--top must be at least 1");
                settings.top_k = top;
            }
            analyze::run_analyze(&paths, &settings, json)
        }
        Some(Commands::Inspect { path }) => inspect::run_inspect(&path, settings.header_scan_depth),
        None => analyze::run_analyze(&[], &settings, false),
    }
}
