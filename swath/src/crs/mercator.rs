//! Web Mercator (EPSG:3857), modèle sphérique de rayon équatorial WGS84

use geo::Coord;

/// Rayon équatorial WGS84 en mètres
pub(super) const EARTH_RADIUS: f64 = 6_378_137.0;

/// Web Mercator vers (lon, lat) en degrés
pub fn web_mercator_to_lon_lat(c: Coord) -> Coord {
    let lon = (c.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (c.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    Coord { x: lon, y: lat }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let c = web_mercator_to_lon_lat(Coord { x: 0.0, y: 0.0 });
        assert!(c.x.abs() < 1e-12);
        assert!(c.y.abs() < 1e-12);
    }

    #[test]
    fn test_riyadh() {
        // Riyad: 46.72°E, 24.71°N
        let c = web_mercator_to_lon_lat(Coord {
            x: 5_200_800.0,
            y: 2_840_200.0,
        });
        assert!((c.x - 46.72).abs() < 0.01, "lon={}", c.x);
        assert!((c.y - 24.71).abs() < 0.02, "lat={}", c.y);
    }
}
