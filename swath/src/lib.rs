//! # swath
//!
//! Plans de couverture de référence Sentinel-1 / Sentinel-2 : dates de référence,
//! sélection des fauchées et taux de couverture d'une zone d'intérêt.
//!
//! ## Features
//!
//! - Résolution de phase : date choisie -> date du plan de référence (cycle 10/12 jours)
//! - Extraction des dates embarquées dans les propriétés GeoJSON (regex)
//! - Réparation des géométries et normalisation WGS84 (EPSG:4326)
//! - Cache indexé par le contenu (blake3)
//! - Union des couvertures et pourcentage de l'AOI couvert
//!
//! ## Usage
//!
//! ```rust,ignore
//! use swath::{resolve_reference_date, select_features, CoverageCache, Satellite};
//!
//! let cache = CoverageCache::new();
//! let plans = cache.load_plans(&[(Satellite::S1A, &bytes)])?;
//! let plan = plans.get(Satellite::S1A).unwrap();
//!
//! if let Some(reference) = resolve_reference_date(chosen, &plan.reference_dates, Satellite::S1A.period_days()) {
//!     let swaths = select_features(plan, &swath::dates::format_date(reference), None);
//!     println!("{} swaths", swaths.len());
//! }
//! ```

pub mod cache;
pub mod coverage;
pub mod crs;
pub mod dates;
pub mod error;
pub mod filter;
pub mod parser;
pub mod phase;
pub mod repair;
pub mod satellite;
pub mod types;

pub use cache::{ContentCache, CoverageCache, Fingerprint};
pub use coverage::{coverage_percent, CoverageAccumulator};
pub use crs::Crs;
pub use error::SwathError;
pub use filter::select_features;
pub use parser::{aoi::parse_aoi, plan::parse_plan};
pub use phase::{resolve_reference_date, same_phase};
pub use satellite::Satellite;
pub use types::{Aoi, CoveragePlan, GeoFeature, PlanSet};
