//! Modèle de vue : un recalcul complet, de haut en bas, par requête
//!
//! AOI -> plans -> dates de référence -> sélection -> couverture.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use swath::dates::{format_date, parse_user_date};
use swath::{
    resolve_reference_date, select_features, Aoi, CoverageAccumulator, CoverageCache,
    GeoFeature, PlanSet, Satellite,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::sources::{
    aoi_on_disk, plan_on_disk, resolve_aoi, resolve_plan, SourceOrigin, UploadSlot, UploadStore,
};

/// Message affiché à l'utilisateur si des plans manquent
pub const MISSING_PLANS_MESSAGE: &str = "Please provide all five GeoJSON files to continue.";

/// Fond de carte initialement visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Basemap {
    #[default]
    #[serde(rename = "osm")]
    OpenStreetMap,
    #[serde(rename = "carto-light")]
    CartoLight,
}

impl Basemap {
    pub const ALL: [Basemap; 2] = [Basemap::OpenStreetMap, Basemap::CartoLight];

    /// Valeur utilisée dans les URL
    pub fn key(self) -> &'static str {
        match self {
            Basemap::OpenStreetMap => "osm",
            Basemap::CartoLight => "carto-light",
        }
    }

    /// Nom de la couche dans le contrôle Leaflet
    pub fn label(self) -> &'static str {
        match self {
            Basemap::OpenStreetMap => "OpenStreetMap",
            Basemap::CartoLight => "Carto Light",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message affiché dans la barre latérale ou la zone principale
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.level, self.message)
    }
}

/// Paramètres bruts de la requête (query string)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewParams {
    pub aoi: Option<String>,
    pub date: Option<String>,
    pub basemap: Option<String>,
}

/// Requête validée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    /// Clé de l'AOI du catalogue (`None` = pas d'AOI)
    pub aoi: Option<String>,
    pub date: NaiveDate,
    pub basemap: Basemap,
}

impl ViewRequest {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            aoi: None,
            date,
            basemap: Basemap::default(),
        }
    }

    /// Valide les paramètres ; les valeurs invalides reprennent leur défaut
    pub fn from_params(params: &ViewParams, config: &Config, today: NaiveDate) -> (Self, Vec<Notice>) {
        let mut notices = Vec::new();

        let date = match params.date.as_deref().filter(|s| !s.is_empty()) {
            None => today,
            Some(raw) => match parse_user_date(raw) {
                Ok(date) => date,
                Err(e) => {
                    debug!(error = %e, "Invalid date parameter");
                    notices.push(Notice::warning(format!(
                        "Invalid date '{raw}', using {}",
                        format_date(today)
                    )));
                    today
                }
            },
        };

        let aoi = params
            .aoi
            .as_deref()
            .filter(|key| !key.is_empty())
            .and_then(|key| match config.aoi(key) {
                Some(source) => Some(source.key.clone()),
                None => {
                    debug!(aoi = key, "Unknown AOI key, ignored");
                    None
                }
            });

        let basemap = params
            .basemap
            .as_deref()
            .and_then(Basemap::from_key)
            .unwrap_or_default();

        (Self { aoi, date, basemap }, notices)
    }
}

/// État du fichier de plan d'un satellite
#[derive(Debug, Clone, Serialize)]
pub struct PlanStatus {
    pub satellite: Satellite,
    pub file: String,
    /// Provenance des octets (`None` = en attente)
    pub origin: Option<SourceOrigin>,
    /// Vrai si le fichier est absent du disque (invite de téléversement)
    pub upload_prompt: bool,
}

/// État de l'AOI choisie
#[derive(Debug, Clone, Serialize)]
pub struct AoiStatus {
    pub key: String,
    pub name: String,
    pub origin: Option<SourceOrigin>,
    pub upload_prompt: bool,
}

/// Couche d'un satellite pour la date choisie
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteLayer {
    pub satellite: Satellite,
    pub reference_date: Option<NaiveDate>,
    /// Index des features retenues dans le plan
    pub feature_indices: Vec<usize>,
}

impl SatelliteLayer {
    /// Vrai si la couche est dessinée
    pub fn is_drawn(&self) -> bool {
        !self.feature_indices.is_empty()
    }
}

/// Résultat du recalcul
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub request: ViewRequest,
    pub aoi_status: Option<AoiStatus>,
    pub plan_status: Vec<PlanStatus>,
    /// Messages de la barre latérale
    pub sidebar: Vec<Notice>,
    /// Messages de la zone principale
    pub main: Vec<Notice>,
    pub aoi: Option<Arc<Aoi>>,
    pub plans: Option<Arc<PlanSet>>,
    /// Une entrée par satellite, dans l'ordre S1A..S2C (vide si les plans manquent)
    pub layers: Vec<SatelliteLayer>,
    pub coverage_percent: Option<f64>,
}

impl DashboardView {
    /// Vrai si les cinq plans sont chargés et la carte peut être dessinée
    pub fn is_ready(&self) -> bool {
        self.plans.is_some()
    }

    /// Fichiers de plan encore attendus
    pub fn missing_files(&self) -> Vec<&str> {
        self.plan_status
            .iter()
            .filter(|s| s.origin.is_none())
            .map(|s| s.file.as_str())
            .collect()
    }

    /// AOI utilisable (présente et non vide)
    pub fn active_aoi(&self) -> Option<&Aoi> {
        self.aoi.as_deref().filter(|a| !a.is_empty())
    }

    /// Features retenues d'une couche
    pub fn layer_features<'a>(
        &'a self,
        layer: &'a SatelliteLayer,
    ) -> impl Iterator<Item = &'a GeoFeature> + 'a {
        let plan = self.plans.as_deref().and_then(|p| p.get(layer.satellite));
        layer
            .feature_indices
            .iter()
            .filter_map(move |&i| plan.and_then(|p| p.features.get(i)))
    }

    /// Couches effectivement dessinées
    pub fn drawn_layers(&self) -> impl Iterator<Item = &SatelliteLayer> {
        self.layers.iter().filter(|l| l.is_drawn())
    }
}

/// État partagé de l'application : configuration, cache et téléversements
pub struct Dashboard {
    pub config: Config,
    pub cache: CoverageCache,
    pub uploads: UploadStore,
}

impl Dashboard {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            cache: CoverageCache::new(),
            uploads: UploadStore::new(),
        }
    }

    /// Recalcule la vue complète pour une requête
    pub fn build_view(&self, request: ViewRequest) -> DashboardView {
        let mut view = DashboardView {
            request,
            aoi_status: None,
            plan_status: Vec::with_capacity(Satellite::ALL.len()),
            sidebar: Vec::new(),
            main: Vec::new(),
            aoi: None,
            plans: None,
            layers: Vec::new(),
            coverage_percent: None,
        };

        self.load_aoi(&mut view);
        self.load_plans(&mut view);
        if view.is_ready() {
            self.compute_layers(&mut view);
        }

        view
    }

    fn load_aoi(&self, view: &mut DashboardView) {
        let Some(source) = view.request.aoi.as_deref().and_then(|k| self.config.aoi(k)) else {
            return;
        };

        let resolved = resolve_aoi(&self.config, &self.uploads, source);
        view.aoi_status = Some(AoiStatus {
            key: source.key.clone(),
            name: source.name.clone(),
            origin: resolved.as_ref().map(|r| r.origin.clone()),
            upload_prompt: !aoi_on_disk(&self.config, source),
        });

        let Some(resolved) = resolved else {
            view.sidebar.push(Notice::warning(format!(
                "{} file not found. Upload it to proceed.",
                source.name
            )));
            return;
        };

        match self.cache.load_aoi(&source.name, &resolved.bytes) {
            Ok(aoi) => {
                debug!(aoi = %source.name, origin = %resolved.origin, features = aoi.features.len(), "AOI ready");
                view.aoi = Some(aoi);
            }
            Err(e) => {
                warn!(aoi = %source.name, error = %e, "Failed to read AOI");
                view.sidebar
                    .push(Notice::error(format!("Failed to read {}: {e}", source.name)));
            }
        }
    }

    fn load_plans(&self, view: &mut DashboardView) {
        let mut blobs = Vec::with_capacity(Satellite::ALL.len());

        for sat in Satellite::ALL {
            let file = self.config.plan_file(sat).to_string();
            let resolved = resolve_plan(&self.config, &self.uploads, sat);
            let upload_prompt = !plan_on_disk(&self.config, sat);

            if resolved.is_none() {
                view.sidebar.push(Notice::warning(format!("Waiting for {file}")));
            } else if upload_prompt {
                debug!(satellite = %sat, "Plan taken from upload");
            }

            view.plan_status.push(PlanStatus {
                satellite: sat,
                file,
                origin: resolved.as_ref().map(|r| r.origin.clone()),
                upload_prompt,
            });
            if let Some(resolved) = resolved {
                blobs.push((sat, resolved.bytes));
            }
        }

        if blobs.len() < Satellite::ALL.len() {
            view.main.push(Notice::info(MISSING_PLANS_MESSAGE));
            return;
        }

        let refs: Vec<(Satellite, &[u8])> = blobs.iter().map(|(s, b)| (*s, &b[..])).collect();
        match self.cache.load_plans(&refs) {
            Ok(plans) => view.plans = Some(plans),
            Err(e) => {
                warn!(error = %e, "Failed to read coverage plans");
                view.main
                    .push(Notice::error(format!("Failed to read coverage plans: {e}")));
            }
        }
    }

    fn compute_layers(&self, view: &mut DashboardView) {
        let Some(plans) = view.plans.clone() else {
            return;
        };
        let aoi = view.aoi.clone().filter(|a| !a.is_empty());
        let target = view.request.date;
        let target_ymd = format_date(target);

        let mut coverage = CoverageAccumulator::new();

        for (sat, plan) in plans.iter() {
            let reference_date =
                resolve_reference_date(target, &plan.reference_dates, sat.period_days());

            let mut feature_indices = Vec::new();
            if let Some(reference) = reference_date {
                let selected = select_features(plan, &format_date(reference), aoi.as_deref());
                if aoi.is_some() {
                    coverage.add_layer(selected.iter().filter_map(|f| f.geometry.as_ref()));
                }
                feature_indices = selected.iter().map(|f| f.index).collect();
            }

            debug!(
                satellite = %sat,
                date = %target_ymd,
                reference = ?reference_date.map(format_date),
                swaths = feature_indices.len(),
                "Layer resolved"
            );

            view.layers.push(SatelliteLayer {
                satellite: *sat,
                reference_date,
                feature_indices,
            });
        }

        if let Some(aoi) = &aoi {
            view.coverage_percent = coverage.percent_of(&aoi.area);
        }

        info!(
            date = %target_ymd,
            aoi = aoi.as_ref().map(|a| a.name.as_str()),
            layers = view.drawn_layers().count(),
            coverage = ?view.coverage_percent,
            "View computed"
        );
    }

    /// Enregistre un téléversement ; `false` si l'AOI est inconnue
    pub fn store_upload(&self, slot: UploadSlot, bytes: bytes::Bytes) -> bool {
        if let UploadSlot::Aoi(key) = &slot {
            if self.config.aoi(key).is_none() {
                return false;
            }
        }
        self.uploads.put(slot, bytes);
        true
    }
}
