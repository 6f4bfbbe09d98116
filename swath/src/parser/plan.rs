//! Chargement d'un plan de couverture de référence

use tracing::debug;

use crate::dates::collect_reference_dates;
use crate::satellite::Satellite;
use crate::types::CoveragePlan;
use crate::SwathError;

use super::read_collection;

/// Parse le plan d'un satellite et indexe ses dates de référence
pub fn parse_plan(satellite: Satellite, bytes: &[u8]) -> Result<CoveragePlan, SwathError> {
    let loaded = read_collection(bytes)?;
    let reference_dates =
        collect_reference_dates(loaded.features.iter().map(|f| f.properties.as_ref()));

    debug!(
        satellite = %satellite,
        features = loaded.features.len(),
        reference_dates = reference_dates.len(),
        crs = ?loaded.crs,
        "Parsed coverage plan"
    );

    Ok(CoveragePlan {
        satellite,
        features: loaded.features,
        reference_dates,
        source_crs: loaded.crs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &[u8] = br#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature",
             "properties": {"start": "2024-01-13T04:10:00Z", "orbit": 12},
             "geometry": {"type": "Polygon", "coordinates": [[[50,24],[52,24],[52,26],[50,26],[50,24]]]}},
            {"type": "Feature",
             "properties": {"start": "2024-01-01", "bad": "2024-02-31"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}},
            {"type": "Feature",
             "properties": {"start": "2024-01-13"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]}}
        ]
    }"#;

    #[test]
    fn test_reference_dates_sorted_unique() {
        let plan = parse_plan(Satellite::S1A, PLAN).unwrap();
        let dates: Vec<String> = plan
            .reference_dates
            .iter()
            .map(|d| crate::dates::format_date(*d))
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-13"]);
    }

    #[test]
    fn test_positional_indices() {
        let plan = parse_plan(Satellite::S2A, PLAN).unwrap();
        let indices: Vec<usize> = plan.features.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(plan.satellite, Satellite::S2A);
    }

    #[test]
    fn test_empty_collection() {
        let plan = parse_plan(
            Satellite::S1C,
            br#"{"type":"FeatureCollection","features":[]}"#,
        )
        .unwrap();
        assert!(plan.is_empty());
        assert!(plan.reference_dates.is_empty());
    }
}
