//! Sélection des features d'un plan pour une date de référence

use geo::{Geometry, Intersects};

use crate::dates::feature_has_target_date;
use crate::types::{Aoi, CoveragePlan, GeoFeature};

/// Features du plan portant la date cible (YYYY-MM-DD) et, si une AOI est donnée,
/// intersectant sa géométrie.
///
/// Les features sans géométrie ne sont jamais retenues.
pub fn select_features<'a>(
    plan: &'a CoveragePlan,
    target_ymd: &str,
    aoi: Option<&Aoi>,
) -> Vec<&'a GeoFeature> {
    let clip: Option<Geometry> = aoi.filter(|a| !a.is_empty()).map(Aoi::geometry);

    plan.features
        .iter()
        .filter(|f| f.geometry.is_some())
        .filter(|f| feature_has_target_date(f.properties.as_ref(), target_ymd))
        .filter(|f| match (&clip, &f.geometry) {
            (Some(clip), Some(geometry)) => geometry.intersects(clip),
            _ => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::aoi::parse_aoi;
    use crate::parser::plan::parse_plan;
    use crate::dates::format_date;
    use crate::satellite::Satellite;

    const PLAN: &[u8] = br#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"pass":"valid_from=2024-05-02T00:00Z"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
        {"type":"Feature","properties":{"pass":"2024-05-02"},
         "geometry":{"type":"Polygon","coordinates":[[[10,10],[11,10],[11,11],[10,11],[10,10]]]}},
        {"type":"Feature","properties":{"pass":"2024-05-03"},
         "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
        {"type":"Feature","properties":{"pass":"2024-05-02"},"geometry":null}
    ]}"#;

    const AOI: &[u8] = br#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{},
         "geometry":{"type":"Polygon","coordinates":[[[0.5,0.5],[2,0.5],[2,2],[0.5,2],[0.5,0.5]]]}}
    ]}"#;

    #[test]
    fn test_date_only() {
        let plan = parse_plan(Satellite::S2A, PLAN).unwrap();
        let selected: Vec<usize> = select_features(&plan, "2024-05-02", None)
            .iter()
            .map(|f| f.index)
            .collect();
        assert_eq!(selected, vec![0, 1]);
    }

    #[test]
    fn test_date_and_aoi() {
        let plan = parse_plan(Satellite::S2A, PLAN).unwrap();
        let aoi = parse_aoi("box", AOI).unwrap();
        let selected: Vec<usize> = select_features(&plan, "2024-05-02", Some(&aoi))
            .iter()
            .map(|f| f.index)
            .collect();
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn test_several_dates_in_one_value() {
        let doc = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"passes":"2024-01-01,2024-01-13T04:10:00Z,2024-01-25"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
        ]}"#;
        let plan = parse_plan(Satellite::S1A, doc).unwrap();
        let refs: Vec<String> = plan.reference_dates.iter().copied().map(format_date).collect();
        assert_eq!(refs, vec!["2024-01-01", "2024-01-13", "2024-01-25"]);
        for date in &refs {
            assert_eq!(select_features(&plan, date, None).len(), 1, "{date}");
        }
    }

    #[test]
    fn test_no_partial_match() {
        let plan = parse_plan(Satellite::S2A, PLAN).unwrap();
        assert!(select_features(&plan, "2024-05", None).is_empty());
        assert!(select_features(&plan, "2024-05-04", None).is_empty());
    }
}
