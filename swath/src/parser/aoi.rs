//! Chargement d'une zone d'intérêt (AOI)

use geo::MultiPolygon;
use tracing::debug;

use crate::repair::{guard_geometry_op, polygon_parts, union_all};
use crate::types::Aoi;
use crate::SwathError;

use super::read_collection;

/// Parse une AOI : features réparées en WGS84 + union de leurs parties surfaciques
pub fn parse_aoi(name: &str, bytes: &[u8]) -> Result<Aoi, SwathError> {
    let loaded = read_collection(bytes)?;

    let parts: Vec<_> = loaded
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .flat_map(polygon_parts)
        .collect();

    let area = match guard_geometry_op("aoi union", || union_all(parts.iter())) {
        Ok(union) => union,
        Err(e) => {
            debug!(aoi = name, error = %e, "AOI union failed, using raw parts");
            MultiPolygon::new(parts)
        }
    };

    Ok(Aoi {
        name: name.to_string(),
        features: loaded.features,
        area,
        source_crs: loaded.crs,
    })
}
