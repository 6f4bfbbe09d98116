//! Types de données pour le crate swath

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use geo::{BoundingRect, Geometry, MultiPolygon, Rect};
use geojson::JsonObject;

use crate::crs::Crs;
use crate::satellite::Satellite;

/// Une feature GeoJSON chargée : géométrie réparée en WGS84 + propriétés brutes
#[derive(Debug, Clone)]
pub struct GeoFeature {
    /// Position dans la collection d'origine (stable)
    pub index: usize,

    /// Géométrie (absente si la feature n'en a pas ou si elle est inutilisable)
    pub geometry: Option<Geometry>,

    /// Propriétés libres de la feature
    pub properties: Option<JsonObject>,
}

/// Plan de couverture de référence d'un satellite
#[derive(Debug, Clone)]
pub struct CoveragePlan {
    pub satellite: Satellite,

    /// Features dans l'ordre du fichier
    pub features: Vec<GeoFeature>,

    /// Dates uniques trouvées dans les propriétés (triées par construction)
    pub reference_dates: BTreeSet<NaiveDate>,

    /// CRS déclaré par le fichier source
    pub source_crs: Crs,
}

impl CoveragePlan {
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Les cinq plans chargés ensemble (unité de cache)
#[derive(Debug, Clone, Default)]
pub struct PlanSet {
    pub plans: BTreeMap<Satellite, CoveragePlan>,
}

impl PlanSet {
    pub fn get(&self, satellite: Satellite) -> Option<&CoveragePlan> {
        self.plans.get(&satellite)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Satellite, &CoveragePlan)> {
        self.plans.iter()
    }
}

/// Zone d'intérêt chargée
#[derive(Debug, Clone)]
pub struct Aoi {
    /// Nom affiché ("Qatari EEZ", ...)
    pub name: String,

    /// Features d'origine, pour l'affichage
    pub features: Vec<GeoFeature>,

    /// Union des parties surfaciques (géométrie de découpe et de calcul d'aire)
    pub area: MultiPolygon,

    /// CRS déclaré par le fichier source
    pub source_crs: Crs,
}

impl Aoi {
    /// Vrai si l'AOI ne contient aucune feature
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Emprise de toutes les géométries de l'AOI
    pub fn bounds(&self) -> Option<Rect> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .filter_map(|g| g.bounding_rect())
            .reduce(|a, b| {
                Rect::new(
                    geo::coord! { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    geo::coord! { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }

    /// Géométrie de découpe sous forme de `Geometry`
    pub fn geometry(&self) -> Geometry {
        Geometry::MultiPolygon(self.area.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    #[test]
    fn test_aoi_bounds_spans_features() {
        let a = polygon![(x: 50.0, y: 24.0), (x: 51.0, y: 24.0), (x: 51.0, y: 25.0)];
        let b = polygon![(x: 52.0, y: 26.0), (x: 53.0, y: 26.0), (x: 53.0, y: 27.0)];
        let aoi = Aoi {
            name: "test".to_string(),
            features: vec![
                GeoFeature {
                    index: 0,
                    geometry: Some(Geometry::Polygon(a.clone())),
                    properties: None,
                },
                GeoFeature {
                    index: 1,
                    geometry: Some(Geometry::Polygon(b.clone())),
                    properties: None,
                },
                GeoFeature {
                    index: 2,
                    geometry: None,
                    properties: None,
                },
            ],
            area: MultiPolygon::new(vec![a, b]),
            source_crs: Crs::Wgs84,
        };
        let bounds = aoi.bounds().unwrap();
        assert_eq!(bounds.min().x, 50.0);
        assert_eq!(bounds.min().y, 24.0);
        assert_eq!(bounds.max().x, 53.0);
        assert_eq!(bounds.max().y, 27.0);
    }
}
