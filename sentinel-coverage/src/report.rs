//! Rapport de couverture pour une date et une AOI
//!
//! Sert à la fois à la sortie console de la commande `coverage` et à l'API JSON.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use swath::dates::format_date;
use swath::Satellite;

use crate::sources::SourceOrigin;
use crate::view::{DashboardView, Notice};

/// Pourcentage affiché : deux décimales
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}

/// Ligne par satellite
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteLine {
    pub satellite: Satellite,
    pub color: &'static str,
    pub period_days: u32,
    /// Source du plan (`None` = en attente)
    pub source: Option<SourceOrigin>,
    /// Date de référence résolue (YYYY-MM-DD)
    pub reference_date: Option<String>,
    /// Fauchées retenues pour la date
    pub swaths: usize,
}

/// Rapport complet
#[derive(Debug, Clone, Serialize)]
pub struct CoverageReport {
    /// Date choisie
    pub date: String,
    /// Nom de l'AOI (optionnel)
    pub aoi: Option<String>,
    /// Vrai si les cinq plans sont chargés
    pub ready: bool,
    /// Fichiers de plan manquants
    pub missing_files: Vec<String>,
    pub satellites: Vec<SatelliteLine>,
    /// Pourcentage de l'AOI couvert (absent sans AOI ou sans contribution)
    pub coverage_percent: Option<f64>,
    pub notices: Vec<Notice>,
}

impl CoverageReport {
    /// Construit le rapport depuis une vue calculée
    pub fn from_view(view: &DashboardView) -> Self {
        let satellites = view
            .plan_status
            .iter()
            .map(|status| {
                let layer = view.layers.iter().find(|l| l.satellite == status.satellite);
                SatelliteLine {
                    satellite: status.satellite,
                    color: status.satellite.color(),
                    period_days: status.satellite.period_days().get(),
                    source: status.origin.clone(),
                    reference_date: layer.and_then(|l| l.reference_date).map(format_date),
                    swaths: layer.map_or(0, |l| l.feature_indices.len()),
                }
            })
            .collect();

        Self {
            date: format_date(view.request.date),
            aoi: view
                .aoi_status
                .as_ref()
                .map(|s| s.name.clone()),
            ready: view.is_ready(),
            missing_files: view.missing_files().into_iter().map(String::from).collect(),
            satellites,
            coverage_percent: view.coverage_percent,
            notices: view.sidebar.iter().chain(&view.main).cloned().collect(),
        }
    }

    /// Nombre total de fauchées retenues
    pub fn total_swaths(&self) -> usize {
        self.satellites.iter().map(|s| s.swaths).sum()
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("COVERAGE REPORT - {}", self.date);
        println!("{}", "=".repeat(60));

        println!("\nAOI: {}", self.aoi.as_deref().unwrap_or("(None)"));

        println!("\n--- SATELLITES ---");
        for line in &self.satellites {
            let source = line
                .source
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "missing".to_string());
            println!(
                "  {} ({} days): reference {}, {} swaths [{}]",
                line.satellite,
                line.period_days,
                line.reference_date.as_deref().unwrap_or("-"),
                line.swaths,
                source
            );
        }

        if let Some(percent) = self.coverage_percent {
            println!("\nCoverage: {}", format_percent(percent));
        }

        if !self.notices.is_empty() {
            println!("\n--- NOTICES ({}) ---", self.notices.len());
            for notice in &self.notices {
                println!("  {notice}");
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        let coverage = self
            .coverage_percent
            .map(format_percent)
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "{}: {} swaths, coverage {}",
            self.date,
            self.total_swaths(),
            coverage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> CoverageReport {
        CoverageReport {
            date: "2024-01-20".to_string(),
            aoi: Some("Qatari EEZ".to_string()),
            ready: true,
            missing_files: Vec::new(),
            satellites: vec![
                SatelliteLine {
                    satellite: Satellite::S1A,
                    color: Satellite::S1A.color(),
                    period_days: 12,
                    source: Some(SourceOrigin::Upload),
                    reference_date: Some("2024-01-13".to_string()),
                    swaths: 3,
                },
                SatelliteLine {
                    satellite: Satellite::S2A,
                    color: Satellite::S2A.color(),
                    period_days: 10,
                    source: None,
                    reference_date: None,
                    swaths: 0,
                },
            ],
            coverage_percent: Some(25.0),
            notices: Vec::new(),
        }
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(25.0), "25.00%");
        assert_eq!(format_percent(33.333), "33.33%");
    }

    #[test]
    fn test_summary() {
        let summary = report().summary();
        assert!(summary.contains("2024-01-20"));
        assert!(summary.contains("3 swaths"));
        assert!(summary.contains("25.00%"));
    }

    #[test]
    fn test_serialize() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["coverage_percent"], 25.0);
        assert_eq!(value["satellites"][0]["satellite"], "S1A");
        assert_eq!(value["satellites"][0]["source"]["kind"], "upload");
        assert!(value["satellites"][1]["reference_date"].is_null());
    }

    #[test]
    fn test_save_to_file() {
        let path = std::env::temp_dir().join("sentinel_coverage_report.json");
        report().save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Qatari EEZ"));
        std::fs::remove_file(path).ok();
    }
}
