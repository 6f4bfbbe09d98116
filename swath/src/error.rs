//! Types d'erreurs pour le crate swath

use thiserror::Error;

/// Erreurs pouvant survenir lors du chargement des plans et des AOI
#[derive(Debug, Error)]
pub enum SwathError {
    /// Erreur d'I/O lors de la lecture d'un fichier
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Contenu non UTF-8 ou JSON invalide
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document GeoJSON mal formé
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Le document n'est ni une FeatureCollection, ni une Feature, ni une géométrie
    #[error("Not a feature collection: {0}")]
    NotAFeatureCollection(String),

    /// Géométrie non convertible en type `geo`
    #[error("Invalid geometry for feature {index}: {reason}")]
    InvalidGeometry { index: usize, reason: String },

    /// Système de coordonnées non supporté
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    /// Erreur lors de la réparation de géométrie
    #[error("Geometry repair failed: {0}")]
    RepairFailed(String),

    /// Identifiant de satellite inconnu
    #[error("Unknown satellite: {0}")]
    UnknownSatellite(String),

    /// Date non conforme au format YYYY-MM-DD
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

impl SwathError {
    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            index,
            reason: reason.into(),
        }
    }

    /// Crée une erreur de date invalide
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }
}
