//! Cache indexé par le contenu des fichiers
//!
//! La clé est une empreinte blake3 des octets d'entrée : un contenu identique n'est
//! jamais re-parsé et aucune invalidation n'est nécessaire.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::parser::aoi::parse_aoi;
use crate::parser::plan::parse_plan;
use crate::satellite::Satellite;
use crate::types::{Aoi, PlanSet};
use crate::SwathError;

/// Empreinte hexadécimale d'un ou plusieurs blobs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Empreinte d'une suite de blobs ; chaque blob est préfixé par sa longueur
    /// pour que `["ab", "c"]` et `["a", "bc"]` diffèrent.
    pub fn of<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hex::encode(hasher.finalize().as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0[..12])
    }
}

/// Mémoïsation `empreinte -> résultat parsé`
///
/// Les échecs ne sont pas mis en cache.
pub struct ContentCache<T> {
    entries: Mutex<HashMap<Fingerprint, Arc<T>>>,
}

impl<T> Default for ContentCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne l'entrée existante ou la calcule
    ///
    /// Le verrou n'est pas tenu pendant le calcul ; deux calculs concurrents du même
    /// contenu produisent des valeurs équivalentes et la première insérée est gardée.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: Fingerprint,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if let Some(hit) = self.lookup(&key) {
            debug!(key = %key, "Content cache hit");
            return Ok(hit);
        }

        let value = Arc::new(compute()?);
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.entry(key).or_insert(value).clone())
    }

    fn lookup(&self, key: &Fingerprint) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache des plans et des AOI
#[derive(Default)]
pub struct CoverageCache {
    plans: ContentCache<PlanSet>,
    aois: ContentCache<Aoi>,
}

impl CoverageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charge les plans des satellites donnés (l'ordre ne change pas la clé)
    pub fn load_plans(&self, blobs: &[(Satellite, &[u8])]) -> Result<Arc<PlanSet>, SwathError> {
        let mut sorted: Vec<(Satellite, &[u8])> = blobs.to_vec();
        sorted.sort_by_key(|(sat, _)| *sat);

        let key = Fingerprint::of(
            sorted
                .iter()
                .flat_map(|(sat, bytes)| [sat.id().as_bytes(), *bytes]),
        );

        self.plans.get_or_try_insert_with(key, || {
            let mut set = PlanSet::default();
            for (sat, bytes) in &sorted {
                set.plans.insert(*sat, parse_plan(*sat, bytes)?);
            }
            Ok(set)
        })
    }

    /// Charge une AOI
    pub fn load_aoi(&self, name: &str, bytes: &[u8]) -> Result<Arc<Aoi>, SwathError> {
        let key = Fingerprint::of([name.as_bytes(), bytes]);
        self.aois
            .get_or_try_insert_with(key, || parse_aoi(name, bytes))
    }

    pub fn plan_entries(&self) -> usize {
        self.plans.len()
    }

    pub fn aoi_entries(&self) -> usize {
        self.aois.len()
    }
}
