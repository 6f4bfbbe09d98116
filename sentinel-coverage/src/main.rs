//! Point d'entrée CLI pour sentinel-coverage

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, EnvFilter};

use sentinel_coverage::cli::{self, Commands};

// Charger .env au démarrage
fn load_env() {
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Visualiser la couverture Sentinel-1 / Sentinel-2 et le taux de couverture d'une AOI
#[derive(Parser)]
#[command(name = "sentinel-coverage")]
#[command(author, version)]
#[command(about = "Sentinel-1 & Sentinel-2 reference coverage viewer (dashboard by default)")]
#[command(long_about = "Shows the reference coverage plans of S1A, S1C, S2A, S2B and S2C on a map for a chosen date,\noptionally clipped to an area of interest, with the percentage of the AOI covered.\n\nWith no subcommand, serves the dashboard.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config preset name (default) or path to a JSON config
    #[arg(long, default_value = "default", global = true, env = "SENTINEL_COVERAGE_CONFIG")]
    config: String,

    /// Directory holding the plan files, the aois/ folder and the logo
    #[arg(long, global = true, env = "SENTINEL_COVERAGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Sous-commande (défaut: serve)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli::load_config(&cli.config, cli.data_dir)?;
    debug!(config = %cli.config, data_dir = %config.data_dir.display(), "Config loaded");

    match cli.command {
        None => cli::cmd_serve(config, None).await?,
        Some(Commands::Serve { bind }) => cli::cmd_serve(config, bind).await?,
        Some(Commands::Coverage {
            date,
            aoi,
            json,
            output,
        }) => cli::cmd_coverage(config, &date, aoi.as_deref(), json, output.as_deref())?,
        Some(Commands::Export { date, aoi, output }) => {
            cli::cmd_export(config, &date, aoi.as_deref(), &output)?
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
