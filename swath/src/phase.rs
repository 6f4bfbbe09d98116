//! Résolution de la date de référence applicable à une date choisie
//!
//! Chaque plan de référence couvre un cycle de répétition (10 ou 12 jours). Toutes les
//! dates sont vues comme des points sur un cercle de circonférence `period_days` : la
//! date de référence retenue est celle du même phase que la date choisie, la plus
//! récente qui ne la dépasse pas.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use chrono::{Duration, NaiveDate};

/// Écart en jours réduit modulo la période (toujours dans `0..period`)
fn phase_offset(chosen: NaiveDate, reference: NaiveDate, period_days: NonZeroU32) -> i64 {
    (chosen - reference)
        .num_days()
        .rem_euclid(i64::from(period_days.get()))
}

/// Vrai si les deux dates sont au même phase du cycle
pub fn same_phase(chosen: NaiveDate, reference: NaiveDate, period_days: NonZeroU32) -> bool {
    phase_offset(chosen, reference, period_days) == 0
}

/// Date de référence pour `chosen`, ou `None` si aucune date de référence n'est connue.
///
/// - Parmi les dates au même phase : la plus récente `<= chosen`, sinon la plus ancienne.
/// - Sans date au même phase : ancre = plus récente `<= chosen` (ou la plus ancienne),
///   puis `chosen - ((chosen - ancre) mod période)`.
///
/// La seconde règle ne garantit pas un membre de `reference_dates` ; la formule est
/// conservée telle quelle.
pub fn resolve_reference_date(
    chosen: NaiveDate,
    reference_dates: &BTreeSet<NaiveDate>,
    period_days: NonZeroU32,
) -> Option<NaiveDate> {
    let earliest = *reference_dates.first()?;

    let mut same: Vec<NaiveDate> = reference_dates
        .iter()
        .copied()
        .filter(|r| same_phase(chosen, *r, period_days))
        .collect();

    if !same.is_empty() {
        same.sort_unstable();
        let best = same
            .iter()
            .rev()
            .find(|r| **r <= chosen)
            .copied()
            .unwrap_or(same[0]);
        return Some(best);
    }

    let anchor = reference_dates
        .range(..=chosen)
        .next_back()
        .copied()
        .unwrap_or(earliest);
    let shift = phase_offset(chosen, anchor, period_days);

    Some(chosen - Duration::days(shift))
}
