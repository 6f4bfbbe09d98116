//! Définition et implémentation des commandes CLI
//!
//! - `serve` (défaut) : tableau de bord HTTP
//! - `coverage` : rapport de couverture sans interface
//! - `export` : couches du jour en GeoJSON

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use swath::dates::{format_date, parse_user_date};
use tracing::{info, warn};

use crate::config::Config;
use crate::export::export_to_geojson;
use crate::report::CoverageReport;
use crate::server;
use crate::view::{Dashboard, DashboardView, ViewRequest};

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the interactive dashboard (default)
    Serve {
        /// Listen address (default: from config, 127.0.0.1:8501)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
    },

    /// Print the coverage report for a date
    Coverage {
        /// Date to evaluate (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// AOI key from the config catalog (e.g. qatari-eez)
        #[arg(short, long)]
        aoi: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Also save the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the swaths selected for a date to GeoJSON files
    Export {
        /// Date to evaluate (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// AOI key from the config catalog
        #[arg(short, long)]
        aoi: Option<String>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Charge la configuration et applique les surcharges CLI
pub fn load_config(spec: &str, data_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::resolve(spec).context(format!("Failed to load config: {spec}"))?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    Ok(config)
}

/// Exécute la commande serve
pub async fn cmd_serve(config: Config, bind: Option<SocketAddr>) -> Result<()> {
    let addr = bind.unwrap_or(config.bind);
    info!(
        data_dir = %config.data_dir.display(),
        aois = config.aois.len(),
        "Starting dashboard"
    );
    server::serve(Arc::new(Dashboard::new(config)), addr).await
}

/// Construit une requête validée depuis les arguments
fn build_request(config: &Config, date: &str, aoi: Option<&str>) -> Result<ViewRequest> {
    let date = parse_user_date(date)?;

    let aoi = match aoi {
        None => None,
        Some(key) => match config.aoi(key) {
            Some(source) => Some(source.key.clone()),
            None => {
                let known: Vec<&str> = config.aois.iter().map(|a| a.key.as_str()).collect();
                anyhow::bail!("Unknown AOI: {}. Use: {}", key, known.join(", "));
            }
        },
    };

    Ok(ViewRequest {
        aoi,
        ..ViewRequest::new(date)
    })
}

/// Calcule la vue ; échoue si les cinq plans ne sont pas tous lisibles
fn compute_ready_view(config: Config, request: ViewRequest) -> Result<DashboardView> {
    let dashboard = Dashboard::new(config);
    let view = dashboard.build_view(request);

    for notice in view.sidebar.iter().chain(&view.main) {
        warn!("{}", notice);
    }
    if !view.is_ready() {
        let missing = view.missing_files();
        if missing.is_empty() {
            anyhow::bail!("Coverage plans could not be read");
        }
        anyhow::bail!("Missing plan files: {}", missing.join(", "));
    }
    Ok(view)
}

/// Exécute la commande coverage
pub fn cmd_coverage(
    config: Config,
    date: &str,
    aoi: Option<&str>,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let request = build_request(&config, date, aoi)?;
    let view = compute_ready_view(config, request)?;
    let report = CoverageReport::from_view(&view);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.display();
    }

    if let Some(path) = output {
        report
            .save_to_file(path)
            .context(format!("Failed to save report: {}", path.display()))?;
        info!(path = %path.display(), "Report saved");
    }

    info!("{}", report.summary());
    Ok(())
}

/// Exécute la commande export
pub fn cmd_export(config: Config, date: &str, aoi: Option<&str>, output: &Path) -> Result<()> {
    let request = build_request(&config, date, aoi)?;
    let view = compute_ready_view(config, request)?;

    std::fs::create_dir_all(output)
        .context(format!("Failed to create directory: {}", output.display()))?;

    if let Some(aoi) = view.active_aoi() {
        let path = output.join("aoi.geojson");
        let written = export_to_geojson(&aoi.features, &path)?;
        println!("  AOI ({}): {} features", aoi.name, written);
    }

    for layer in view.drawn_layers() {
        let Some(reference) = layer.reference_date else {
            continue;
        };
        let path = output.join(format!("{}_{}.geojson", layer.satellite, format_date(reference)));
        let written = export_to_geojson(view.layer_features(layer), &path)?;
        println!("  {}: {} swaths -> {}", layer.satellite, written, path.display());
    }

    let report = CoverageReport::from_view(&view);
    report.save_to_file(&output.join("report.json"))?;
    println!("{}", report.summary());

    Ok(())
}
