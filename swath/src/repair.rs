//! Réparation de validité des géométries surfaciques
//!
//! Équivalent d'un `buffer(0)` : le polygone est recalculé par une union booléenne
//! (`geo::BooleanOps`), ce qui résout auto-intersections, anneaux mal orientés et
//! recouvrements entre parties d'un multipolygone. Points et lignes sont gardés tels quels.

use std::panic::{catch_unwind, AssertUnwindSafe};

use geo::{Area, BooleanOps, Geometry, GeometryCollection, MultiPolygon, Polygon};
use tracing::debug;

use crate::SwathError;

/// Exécute une opération géométrique en convertissant un panic en erreur
///
/// Les opérations booléennes de `geo` peuvent paniquer sur des entrées dégénérées.
pub(crate) fn guard_geometry_op<T>(op: &str, f: impl FnOnce() -> T) -> Result<T, SwathError> {
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|_| SwathError::RepairFailed(format!("{op}: geometry operation panicked")))
}

/// Parties surfaciques d'une géométrie (les collections sont parcourues récursivement)
pub fn polygon_parts(geometry: &Geometry) -> Vec<Polygon> {
    match geometry {
        Geometry::Polygon(p) => vec![p.clone()],
        Geometry::MultiPolygon(mp) => mp.0.clone(),
        Geometry::Rect(r) => vec![r.to_polygon()],
        Geometry::Triangle(t) => vec![t.to_polygon()],
        Geometry::GeometryCollection(gc) => gc.iter().flat_map(polygon_parts).collect(),
        _ => Vec::new(),
    }
}

/// Union pliée des parties, chacune normalisée par l'union avec l'ensemble vide
///
/// Chaque partie est un opérande distinct : les recouvrements entre parties sont
/// fusionnés quelle que soit la règle de remplissage de l'overlay.
pub(crate) fn union_all<'a>(parts: impl IntoIterator<Item = &'a Polygon>) -> MultiPolygon {
    parts
        .into_iter()
        .fold(MultiPolygon::new(Vec::new()), |acc, poly| {
            acc.union(&MultiPolygon::new(vec![poly.clone()]))
        })
}

/// Normalise un multipolygone
fn normalize(mp: &MultiPolygon) -> Result<MultiPolygon, SwathError> {
    let repaired = guard_geometry_op("repair", || union_all(mp.iter()))?;

    if repaired.0.is_empty() {
        let reason = if mp.unsigned_area() > 0.0 {
            "repair produced an empty geometry"
        } else {
            "degenerate polygon (zero area)"
        };
        return Err(SwathError::RepairFailed(reason.to_string()));
    }
    Ok(repaired)
}

fn simplify_collection(mp: MultiPolygon) -> Geometry {
    if mp.0.len() == 1 {
        let mut polys = mp.0;
        Geometry::Polygon(polys.remove(0))
    } else {
        Geometry::MultiPolygon(mp)
    }
}

/// Répare une géométrie (opération faillible)
pub fn repair_geometry(geometry: &Geometry) -> Result<Geometry, SwathError> {
    match geometry {
        Geometry::Polygon(p) => {
            let mp = MultiPolygon::new(vec![p.clone()]);
            normalize(&mp).map(simplify_collection)
        }
        Geometry::MultiPolygon(mp) => normalize(mp).map(simplify_collection),
        Geometry::Rect(r) => Ok(Geometry::Polygon(r.to_polygon())),
        Geometry::Triangle(t) => {
            let poly: Polygon = t.to_polygon();
            repair_geometry(&Geometry::Polygon(poly))
        }
        Geometry::GeometryCollection(gc) => {
            let parts = gc
                .iter()
                .map(repair_geometry)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Geometry::GeometryCollection(GeometryCollection::from(parts)))
        }
        other => Ok(other.clone()),
    }
}

/// Répare une géométrie, ou retourne l'originale si la réparation échoue
pub fn repair_or_original(geometry: Geometry) -> Geometry {
    match repair_geometry(&geometry) {
        Ok(repaired) => repaired,
        Err(e) => {
            debug!(error = %e, "Geometry repair failed, keeping original geometry");
            geometry
        }
    }
}
