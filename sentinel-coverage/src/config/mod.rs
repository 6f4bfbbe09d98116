//! Configuration de l'application

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swath::Satellite;

/// Configuration principale
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Titre affiché dans l'en-tête
    #[serde(default = "default_title")]
    pub title: String,

    /// Répertoire de base des fichiers de plans, d'AOI et du logo
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Adresse d'écoute du serveur
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,

    /// Nom de fichier du plan par satellite (défaut: nom standard du satellite)
    #[serde(default)]
    pub plans: BTreeMap<Satellite, String>,

    /// Catalogue des AOI proposées
    #[serde(default)]
    pub aois: Vec<AoiSource>,

    /// Logo cliquable de l'en-tête (optionnel)
    #[serde(default)]
    pub logo: Option<LogoConfig>,

    /// Vue initiale de la carte
    #[serde(default)]
    pub map: MapConfig,

    /// Taille maximale d'un fichier téléversé
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

/// Une AOI du catalogue
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AoiSource {
    /// Clé utilisée dans les URL (`qatari-eez`)
    pub key: String,

    /// Nom affiché (`Qatari EEZ`)
    pub name: String,

    /// Chemin relatif au répertoire de données
    pub path: PathBuf,

    /// Chemin de repli, relatif au répertoire courant
    #[serde(default)]
    pub fallback: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogoConfig {
    pub path: PathBuf,
    pub link: String,
}

/// Vue initiale de la carte
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapConfig {
    /// [lat, lon]
    pub center: [f64; 2],
    pub zoom: u8,
    pub height_px: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: [20.0, 10.0],
            zoom: 3,
            height_px: 720,
        }
    }
}

fn default_title() -> String {
    "Sentinel-1 & Sentinel-2 Coverage Viewer".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8501))
}

fn default_max_upload() -> usize {
    200 * 1024 * 1024
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default", preset),
        }
    }

    /// Nom de preset ou chemin vers un fichier JSON
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "default" => Self::from_preset(spec),
            _ => Self::load(Path::new(spec)),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Nom de fichier du plan d'un satellite
    pub fn plan_file(&self, satellite: Satellite) -> &str {
        self.plans
            .get(&satellite)
            .map(String::as_str)
            .unwrap_or(satellite.info().default_file)
    }

    /// Chemin du plan d'un satellite dans le répertoire de données
    pub fn plan_path(&self, satellite: Satellite) -> PathBuf {
        self.data_dir.join(self.plan_file(satellite))
    }

    /// Récupère une AOI du catalogue par clé
    pub fn aoi(&self, key: &str) -> Option<&AoiSource> {
        self.aois.iter().find(|a| a.key == key)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            data_dir: default_data_dir(),
            bind: default_bind(),
            plans: BTreeMap::new(),
            aois: Vec::new(),
            logo: None,
            map: MapConfig::default(),
            max_upload_bytes: default_max_upload(),
        }
    }
}
