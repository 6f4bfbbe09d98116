//! Modules d'export (GeoJSON)

pub mod geojson;

pub use geojson::{collection_to_string, export_to_geojson};
