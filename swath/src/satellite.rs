//! Métadonnées statiques des satellites (couleur, cycle de répétition, fichier de plan)

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SwathError;

/// Identifiant d'un satellite Sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Satellite {
    S1A,
    S1C,
    S2A,
    S2B,
    S2C,
}

/// Entrée de la table de métadonnées
#[derive(Debug, Clone, Copy)]
pub struct SatelliteInfo {
    /// Couleur d'affichage (hex CSS)
    pub color: &'static str,
    /// Cycle de répétition en jours
    pub period_days: NonZeroU32,
    /// Nom de fichier du plan de référence
    pub default_file: &'static str,
}

const fn days(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(v) => v,
        None => panic!("period must be non-zero"),
    }
}

impl Satellite {
    /// Tous les satellites, dans l'ordre d'affichage
    pub const ALL: [Satellite; 5] = [
        Satellite::S1A,
        Satellite::S1C,
        Satellite::S2A,
        Satellite::S2B,
        Satellite::S2C,
    ];

    /// Table de métadonnées (immuable)
    pub const fn info(self) -> SatelliteInfo {
        match self {
            Satellite::S1A => SatelliteInfo {
                color: "#e41a1c",
                period_days: days(12),
                default_file: "S1A_12day_reference_coverage_plan.geojson",
            },
            Satellite::S1C => SatelliteInfo {
                color: "#377eb8",
                period_days: days(12),
                default_file: "S1C_12day_reference_coverage_plan.geojson",
            },
            Satellite::S2A => SatelliteInfo {
                color: "#4daf4a",
                period_days: days(10),
                default_file: "S2A_10day_reference_coverage_plan.geojson",
            },
            Satellite::S2B => SatelliteInfo {
                color: "#984ea3",
                period_days: days(10),
                default_file: "S2B_10day_reference_coverage_plan.geojson",
            },
            Satellite::S2C => SatelliteInfo {
                color: "#ff7f00",
                period_days: days(10),
                default_file: "S2C_10day_reference_coverage_plan.geojson",
            },
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Satellite::S1A => "S1A",
            Satellite::S1C => "S1C",
            Satellite::S2A => "S2A",
            Satellite::S2B => "S2B",
            Satellite::S2C => "S2C",
        }
    }

    pub fn color(self) -> &'static str {
        self.info().color
    }

    pub fn period_days(self) -> NonZeroU32 {
        self.info().period_days
    }
}

impl fmt::Display for Satellite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Satellite {
    type Err = SwathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Satellite::ALL
            .into_iter()
            .find(|sat| sat.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SwathError::UnknownSatellite(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periods() {
        assert_eq!(Satellite::S1A.period_days().get(), 12);
        assert_eq!(Satellite::S1C.period_days().get(), 12);
        for sat in [Satellite::S2A, Satellite::S2B, Satellite::S2C] {
            assert_eq!(sat.period_days().get(), 10);
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        for sat in Satellite::ALL {
            assert_eq!(sat.id().parse::<Satellite>().unwrap(), sat);
        }
        assert_eq!("s2b".parse::<Satellite>().unwrap(), Satellite::S2B);
        assert!("S3A".parse::<Satellite>().is_err());
    }

    #[test]
    fn test_default_files_mention_period() {
        for sat in Satellite::ALL {
            let info = sat.info();
            assert!(info.default_file.starts_with(sat.id()));
            assert!(info
                .default_file
                .contains(&format!("{}day", info.period_days)));
        }
    }
}
