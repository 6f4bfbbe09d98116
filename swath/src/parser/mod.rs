//! Lecture des documents GeoJSON (plans de couverture et AOI)

pub mod aoi;
pub mod plan;

use geojson::GeoJson;
use serde_json::Value;
use tracing::warn;

use crate::crs::Crs;
use crate::repair::repair_or_original;
use crate::types::GeoFeature;
use crate::SwathError;

/// Collection de features lue et normalisée
pub(crate) struct LoadedCollection {
    pub features: Vec<GeoFeature>,
    pub crs: Crs,
}

/// Lit un document GeoJSON, reprojette en WGS84 et répare chaque géométrie
///
/// Une FeatureCollection est attendue ; une Feature ou une géométrie seule est acceptée
/// comme collection d'un élément.
pub(crate) fn read_collection(bytes: &[u8]) -> Result<LoadedCollection, SwathError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(SwathError::NotAFeatureCollection(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }
    let crs = Crs::detect(value.get("crs"));

    let raw_features = match GeoJson::try_from(value)? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![geojson::Feature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    let features = raw_features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| GeoFeature {
            index,
            geometry: feature
                .geometry
                .and_then(|g| convert_geometry(index, g, crs)),
            properties: feature.properties,
        })
        .collect();

    Ok(LoadedCollection { features, crs })
}

/// geojson -> geo, reprojection puis réparation ; `None` si inutilisable
fn convert_geometry(index: usize, geometry: geojson::Geometry, crs: Crs) -> Option<geo::Geometry> {
    let converted = geo::Geometry::<f64>::try_from(geometry)
        .map_err(|e| SwathError::invalid_geometry(index, e.to_string()))
        .and_then(|g| crs.to_wgs84(g));

    match converted {
        Ok(g) => Some(repair_or_original(g)),
        Err(e) => {
            warn!(feature = index, error = %e, "Skipping unusable feature geometry");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
