//! Normalisation des coordonnées vers WGS84 (EPSG:4326)
//!
//! Toutes les opérations géométriques (intersection, union, aire) supposent des
//! coordonnées en degrés WGS84. Les documents GeoJSON peuvent encore porter un membre
//! `crs` (GeoJSON 2008) ; on reconnaît :
//! - WGS84 / CRS84 (EPSG:4326) - identité
//! - Web Mercator (EPSG:3857, 900913, 102100)
//! - UTM WGS84 nord/sud (EPSG:326xx / 327xx), grille des tuiles Sentinel-2

mod mercator;
mod utm;

use geo::{Coord, Geometry, MapCoords};
use serde_json::Value;
use tracing::warn;

use crate::SwathError;

/// Code EPSG du système géographique standard
pub const WGS84_EPSG: u32 = 4326;

/// Système de coordonnées source reconnu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    Wgs84,
    WebMercator,
    Utm { zone: u8, south: bool },
}

impl Crs {
    /// Construit depuis un code EPSG
    pub fn from_epsg(epsg: u32) -> Result<Self, SwathError> {
        match epsg {
            WGS84_EPSG | 4979 => Ok(Crs::Wgs84),
            3857 | 900913 | 102100 | 102113 => Ok(Crs::WebMercator),
            32601..=32660 => Ok(Crs::Utm {
                zone: (epsg - 32600) as u8,
                south: false,
            }),
            32701..=32760 => Ok(Crs::Utm {
                zone: (epsg - 32700) as u8,
                south: true,
            }),
            other => Err(SwathError::UnsupportedCrs(format!("EPSG:{other}"))),
        }
    }

    /// Construit depuis un nom de CRS GeoJSON (`urn:ogc:def:crs:EPSG::3857`, `EPSG:4326`, ...)
    pub fn from_name(name: &str) -> Result<Self, SwathError> {
        let upper = name.trim().to_ascii_uppercase();
        if upper.ends_with("CRS84") || upper.ends_with("CRS:84") {
            return Ok(Crs::Wgs84);
        }
        let code = upper
            .rsplit(':')
            .next()
            .and_then(|tail| tail.parse::<u32>().ok())
            .ok_or_else(|| SwathError::UnsupportedCrs(name.to_string()))?;
        Self::from_epsg(code)
    }

    /// Lit le membre `crs` d'un document GeoJSON (absent = WGS84)
    pub fn from_crs_member(crs: Option<&Value>) -> Result<Self, SwathError> {
        let Some(crs) = crs else {
            return Ok(Crs::Wgs84);
        };
        if crs.is_null() {
            return Ok(Crs::Wgs84);
        }
        let name = crs
            .get("properties")
            .and_then(|p| p.get("name").or_else(|| p.get("code")))
            .ok_or_else(|| SwathError::UnsupportedCrs(crs.to_string()))?;
        match name {
            Value::String(s) => Self::from_name(s),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| SwathError::UnsupportedCrs(n.to_string()))
                .and_then(Self::from_epsg),
            other => Err(SwathError::UnsupportedCrs(other.to_string())),
        }
    }

    /// Comme `from_crs_member`, mais un membre non reconnu est lu comme WGS84
    pub fn detect(crs: Option<&Value>) -> Self {
        Self::from_crs_member(crs).unwrap_or_else(|e| {
            warn!(error = %e, "Unrecognized crs member, reading coordinates as EPSG:{WGS84_EPSG}");
            Crs::Wgs84
        })
    }

    pub fn is_wgs84(self) -> bool {
        self == Crs::Wgs84
    }

    /// Convertit une coordonnée vers (lon, lat) en degrés
    pub fn to_wgs84_coord(self, c: Coord) -> Coord {
        match self {
            Crs::Wgs84 => c,
            Crs::WebMercator => mercator::web_mercator_to_lon_lat(c),
            Crs::Utm { zone, south } => utm::utm_to_lon_lat(c, zone, south),
        }
    }

    /// Reprojette une géométrie vers WGS84
    pub fn to_wgs84(self, geometry: Geometry) -> Result<Geometry, SwathError> {
        if self.is_wgs84() {
            return Ok(geometry);
        }
        geometry.try_map_coords(|c| {
            let out = self.to_wgs84_coord(c);
            if out.x.is_finite() && out.y.is_finite() {
                Ok(out)
            } else {
                Err(SwathError::UnsupportedCrs(format!(
                    "{self:?}: coordinate ({}, {}) out of domain",
                    c.x, c.y
                )))
            }
        })
    }
}
