//! Pourcentage de l'AOI couvert par l'union des fauchées retenues
//!
//! Aire planaire en degrés WGS84 (approximation, pas d'aire géodésique).

use geo::{Area, BooleanOps, Geometry, MultiPolygon};
use tracing::debug;

use crate::repair::{guard_geometry_op, polygon_parts, union_all};
use crate::SwathError;

/// Accumule l'union des géométries de couverture, satellite par satellite
///
/// Une union (et non une somme d'aires) évite de compter deux fois les recouvrements.
#[derive(Debug, Default)]
pub struct CoverageAccumulator {
    union: Option<MultiPolygon>,
    failed: bool,
}

impl CoverageAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute les géométries d'une couche ; une couche vide ne contribue pas
    pub fn add_layer<'a>(&mut self, geometries: impl IntoIterator<Item = &'a Geometry>) {
        if self.failed {
            return;
        }
        let parts: Vec<_> = geometries.into_iter().flat_map(polygon_parts).collect();
        if parts.is_empty() {
            return;
        }

        let merged = guard_geometry_op("coverage union", || {
            let layer = union_all(parts.iter());
            match &self.union {
                Some(acc) => acc.union(&layer),
                None => layer,
            }
        });

        match merged {
            Ok(union) => self.union = Some(union),
            Err(e) => {
                debug!(error = %e, "Coverage union failed");
                self.failed = true;
            }
        }
    }

    /// Vrai si au moins une couche a contribué
    pub fn has_contribution(&self) -> bool {
        self.union.is_some()
    }

    /// Union accumulée (`None` si aucune contribution ou après un échec)
    pub fn union(&self) -> Option<&MultiPolygon> {
        if self.failed {
            None
        } else {
            self.union.as_ref()
        }
    }

    /// Pourcentage de l'AOI couvert, arrondi à 2 décimales
    pub fn percent_of(&self, aoi: &MultiPolygon) -> Option<f64> {
        let union = self.union()?;
        match coverage_percent(aoi, union) {
            Ok(percent) => Some(percent),
            Err(e) => {
                debug!(error = %e, "Coverage percentage unavailable");
                None
            }
        }
    }
}

/// Arrondi à 2 décimales
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// aire(AOI ∩ couverture) / aire(AOI) × 100, arrondi à 2 décimales
pub fn coverage_percent(aoi: &MultiPolygon, covered: &MultiPolygon) -> Result<f64, SwathError> {
    let aoi_area = aoi.unsigned_area();
    if !aoi_area.is_finite() || aoi_area <= 0.0 {
        return Err(SwathError::RepairFailed(format!(
            "AOI area is not usable: {aoi_area}"
        )));
    }

    let covered_area = guard_geometry_op("coverage intersection", || {
        aoi.intersection(covered).unsigned_area()
    })?;

    Ok(round2(covered_area / aoi_area * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    #[test]
    fn test_quarter_coverage() {
        // AOI 10x10 = 100, couverture 5x5 = 25 -> 25.00 %
        let aoi = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        let mut acc = CoverageAccumulator::new();
        acc.add_layer([&Geometry::Polygon(square(0.0, 0.0, 5.0))]);
        assert_eq!(acc.percent_of(&aoi), Some(25.0));
    }

    #[test]
    fn test_overlap_not_double_counted() {
        let aoi = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        let mut acc = CoverageAccumulator::new();
        acc.add_layer([&Geometry::Polygon(square(0.0, 0.0, 5.0))]);
        acc.add_layer([&Geometry::Polygon(square(0.0, 0.0, 5.0))]);
        assert_eq!(acc.percent_of(&aoi), Some(25.0));
    }

    #[test]
    fn test_partially_outside() {
        let aoi = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        let mut acc = CoverageAccumulator::new();
        acc.add_layer([&Geometry::Polygon(square(5.0, 5.0, 10.0))]);
        acc.add_layer([&Geometry::Polygon(square(-3.0, 0.0, 4.0))]);
        // 25 + 4 (1x4 à l'intérieur)
        assert_eq!(acc.percent_of(&aoi), Some(29.0));
    }

    #[test]
    fn test_no_contribution() {
        let aoi = MultiPolygon::new(vec![square(0.0, 0.0, 10.0)]);
        let mut acc = CoverageAccumulator::new();
        acc.add_layer(std::iter::empty());
        assert!(!acc.has_contribution());
        assert_eq!(acc.percent_of(&aoi), None);
    }

    #[test]
    fn test_zero_area_aoi() {
        let aoi = MultiPolygon::new(Vec::new());
        let covered = MultiPolygon::new(vec![square(0.0, 0.0, 1.0)]);
        assert!(coverage_percent(&aoi, &covered).is_err());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
    }
}
