//! # sentinel-coverage
//!
//! Visualisation des plans de couverture de référence Sentinel-1 / Sentinel-2 et taux de
//! couverture d'une zone d'intérêt.
//!
//! ## Features
//!
//! - Tableau de bord HTTP (axum + Leaflet) : AOI, date, fond de carte, fauchées par satellite
//! - Téléversement des plans et AOI absents du disque
//! - Rapport de couverture et export GeoJSON sans interface
//!
//! ## Usage CLI
//!
//! ```bash
//! # Tableau de bord sur http://127.0.0.1:8501/
//! sentinel-coverage
//! sentinel-coverage --data-dir ./plans serve --bind 0.0.0.0:8501
//!
//! # Rapport pour une date
//! sentinel-coverage coverage --date 2024-01-20 --aoi qatari-eez
//!
//! # Export GeoJSON des fauchées du jour
//! sentinel-coverage export --date 2024-01-20 --aoi qatari-eez --output ./out/
//! ```

pub mod cli;
pub mod config;
pub mod export;
pub mod render;
pub mod report;
pub mod server;
pub mod sources;
pub mod view;

pub use config::Config;
pub use report::CoverageReport;
pub use view::{Dashboard, DashboardView, ViewRequest};
