//! Résolution des octets des plans et des AOI : disque local, repli, téléversement

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use bytes::Bytes;
use serde::Serialize;
use swath::Satellite;
use tracing::{debug, warn};

use crate::config::{AoiSource, Config};

/// Emplacement d'un fichier téléversé
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UploadSlot {
    Plan(Satellite),
    Aoi(String),
}

impl fmt::Display for UploadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadSlot::Plan(sat) => write!(f, "plan/{sat}"),
            UploadSlot::Aoi(key) => write!(f, "aoi/{key}"),
        }
    }
}

/// Fichiers téléversés, gardés en mémoire pour la durée du processus
#[derive(Debug, Default)]
pub struct UploadStore {
    files: RwLock<HashMap<UploadSlot, Bytes>>,
}

impl UploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace le contenu d'un emplacement
    pub fn put(&self, slot: UploadSlot, bytes: Bytes) {
        debug!(slot = %slot, size = bytes.len(), "Stored upload");
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        files.insert(slot, bytes);
    }

    pub fn get(&self, slot: &UploadSlot) -> Option<Bytes> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        files.get(slot).cloned()
    }
}

/// Provenance des octets d'un fichier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum SourceOrigin {
    Local(PathBuf),
    Fallback(PathBuf),
    Upload,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Local(p) => write!(f, "{}", p.display()),
            SourceOrigin::Fallback(p) => write!(f, "{} (fallback)", p.display()),
            SourceOrigin::Upload => f.write_str("upload"),
        }
    }
}

/// Octets résolus avec leur provenance
#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub bytes: Bytes,
    pub origin: SourceOrigin,
}

/// Lit un fichier s'il existe ; une erreur de lecture est traitée comme une absence
fn read_if_exists(path: &Path) -> Option<Bytes> {
    if !path.is_file() {
        return None;
    }
    match std::fs::read(path) {
        Ok(data) => Some(Bytes::from(data)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read file");
            None
        }
    }
}

/// Vrai si le plan du satellite est présent sur disque
pub fn plan_on_disk(config: &Config, satellite: Satellite) -> bool {
    config.plan_path(satellite).is_file()
}

/// Plan d'un satellite : fichier local, sinon téléversement
pub fn resolve_plan(
    config: &Config,
    uploads: &UploadStore,
    satellite: Satellite,
) -> Option<ResolvedSource> {
    let path = config.plan_path(satellite);
    if let Some(bytes) = read_if_exists(&path) {
        return Some(ResolvedSource {
            bytes,
            origin: SourceOrigin::Local(path),
        });
    }
    uploads
        .get(&UploadSlot::Plan(satellite))
        .map(|bytes| ResolvedSource {
            bytes,
            origin: SourceOrigin::Upload,
        })
}

/// Vrai si l'AOI est disponible sur disque (chemin principal ou repli)
pub fn aoi_on_disk(config: &Config, aoi: &AoiSource) -> bool {
    config.data_dir.join(&aoi.path).is_file()
        || aoi.fallback.as_ref().is_some_and(|p| p.is_file())
}

/// AOI : chemin principal, chemin de repli, puis téléversement
pub fn resolve_aoi(
    config: &Config,
    uploads: &UploadStore,
    aoi: &AoiSource,
) -> Option<ResolvedSource> {
    let primary = config.data_dir.join(&aoi.path);
    if let Some(bytes) = read_if_exists(&primary) {
        return Some(ResolvedSource {
            bytes,
            origin: SourceOrigin::Local(primary),
        });
    }
    if let Some(fallback) = &aoi.fallback {
        if let Some(bytes) = read_if_exists(fallback) {
            return Some(ResolvedSource {
                bytes,
                origin: SourceOrigin::Fallback(fallback.clone()),
            });
        }
    }
    uploads
        .get(&UploadSlot::Aoi(aoi.key.clone()))
        .map(|bytes| ResolvedSource {
            bytes,
            origin: SourceOrigin::Upload,
        })
}
