//! UTM WGS84 (EPSG:326xx nord, 327xx sud), inverse par série de Snyder

use geo::Coord;

use super::mercator::EARTH_RADIUS;

/// Aplatissement WGS84
const FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Facteur d'échelle au méridien central
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// UTM (zone 1..=60) vers (lon, lat) en degrés
pub fn utm_to_lon_lat(c: Coord, zone: u8, south: bool) -> Coord {
    let a = EARTH_RADIUS;
    let e2 = FLATTENING * (2.0 - FLATTENING);
    let ep2 = e2 / (1.0 - e2);

    let x = c.x - FALSE_EASTING;
    let y = if south { c.y - FALSE_NORTHING_SOUTH } else { c.y };
    let lon0 = (f64::from(zone) * 6.0 - 183.0).to_radians();

    // Latitude du pied de la normale
    let m = y / K0;
    let mu = m / (a * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2.powi(3) / 256.0));
    let sqrt_1_e2 = (1.0 - e2).sqrt();
    let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
    let phi1 = mu
        + (1.5 * e1 - 27.0 / 32.0 * e1.powi(3)) * (2.0 * mu).sin()
        + (21.0 / 16.0 * e1 * e1 - 55.0 / 32.0 * e1.powi(4)) * (4.0 * mu).sin()
        + (151.0 / 96.0 * e1.powi(3)) * (6.0 * mu).sin()
        + (1097.0 / 512.0 * e1.powi(4)) * (8.0 * mu).sin();

    let (sin1, cos1) = phi1.sin_cos();
    let tan1 = sin1 / cos1;
    let w = 1.0 - e2 * sin1 * sin1;
    let n1 = a / w.sqrt();
    let r1 = a * (1.0 - e2) / w.powf(1.5);
    let t1 = tan1 * tan1;
    let c1 = ep2 * cos1 * cos1;
    let d = x / (n1 * K0);

    let lat = phi1
        - (n1 * tan1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lon = lon0
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos1;

    Coord {
        x: lon.to_degrees(),
        y: lat.to_degrees(),
    }
}
