//! Extraction des dates embarquées dans les propriétés des features
//!
//! Les plans de référence n'ont pas de champ de date normalisé : les dates sont
//! cherchées par regex dans toutes les valeurs de propriétés, converties en texte.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use geojson::JsonObject;
use regex::Regex;
use serde_json::Value;

use crate::SwathError;

/// Format des dates cherchées et affichées
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}-\d{2}-\d{2}").expect("date regex is valid"));

/// Parse les 10 premiers caractères d'une chaîne en date calendaire
pub fn parse_date_ymd(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// Comme `parse_date_ymd`, mais avec une erreur explicite (entrée utilisateur)
pub fn parse_user_date(s: &str) -> Result<NaiveDate, SwathError> {
    let trimmed = s.trim();
    if trimmed.len() != 10 {
        return Err(SwathError::invalid_date(s));
    }
    parse_date_ymd(trimmed).ok_or_else(|| SwathError::invalid_date(s))
}

/// Formate une date en YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Représentation texte d'une valeur de propriété (`None` pour null)
///
/// Les chaînes sont prises telles quelles, les autres valeurs via leur texte JSON.
pub fn value_as_text(value: &Value) -> Option<std::borrow::Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(std::borrow::Cow::Borrowed(s)),
        other => Some(std::borrow::Cow::Owned(other.to_string())),
    }
}

/// Hits de la regex dans un texte, hors hits collés à un autre chiffre
///
/// `2024-05-02T00:00Z` et `X2024-05-02` donnent un hit, pas `12024-05-02` ni `2024-05-021`.
fn text_hits(text: &str) -> impl Iterator<Item = &str> {
    let bytes = text.as_bytes();
    DATE_RE
        .find_iter(text)
        .filter(move |m| {
            let before = m.start().checked_sub(1).map(|i| bytes[i]);
            let after = bytes.get(m.end()).copied();
            let digit = |b: Option<u8>| b.is_some_and(|b| b.is_ascii_digit());
            !digit(before) && !digit(after)
        })
        .map(|m| m.as_str())
}

/// Itère sur les hits de la regex dans toutes les valeurs de propriétés
fn date_hits<'a>(properties: Option<&'a JsonObject>) -> impl Iterator<Item = String> + 'a {
    properties
        .into_iter()
        .flat_map(|props| props.values())
        .filter_map(value_as_text)
        .flat_map(|text| text_hits(&text).map(str::to_string).collect::<Vec<_>>())
}

/// Dates valides trouvées dans les propriétés d'une feature
///
/// Les hits qui ne forment pas une date calendaire (ex: 2024-13-45) sont ignorés.
pub fn extract_dates_from_properties(properties: Option<&JsonObject>) -> Vec<NaiveDate> {
    date_hits(properties)
        .filter_map(|hit| parse_date_ymd(&hit))
        .collect()
}

/// Ensemble trié et dédupliqué des dates d'un ensemble de features
pub fn collect_reference_dates<'a>(
    properties: impl IntoIterator<Item = Option<&'a JsonObject>>,
) -> BTreeSet<NaiveDate> {
    properties
        .into_iter()
        .flat_map(extract_dates_from_properties)
        .collect()
}

/// Vrai si une valeur de propriété contient exactement la date cible (YYYY-MM-DD)
pub fn feature_has_target_date(properties: Option<&JsonObject>, target_ymd: &str) -> bool {
    date_hits(properties).any(|hit| hit == target_ymd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_parse_date_ymd() {
        assert_eq!(
            parse_date_ymd("2024-05-02T00:00Z"),
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
        assert_eq!(parse_date_ymd("2024-13-45"), None);
        assert_eq!(parse_date_ymd("2024"), None);
    }

    #[test]
    fn test_parse_user_date() {
        assert!(parse_user_date("2024-02-29").is_ok());
        assert!(parse_user_date("2023-02-29").is_err());
        assert!(parse_user_date("2024-02-29T10:00").is_err());
    }

    #[test]
    fn test_target_date_substring() {
        let p = props(json!({
            "note": "valid_from=2024-05-02T00:00Z",
            "start": "2024-01-13T04:10:00Z"
        }));
        assert!(feature_has_target_date(Some(&p), "2024-05-02"));
        assert!(feature_has_target_date(Some(&p), "2024-01-13"));
        assert!(!feature_has_target_date(Some(&p), "2024-05-03"));
        assert_eq!(extract_dates_from_properties(Some(&p)).len(), 2);
    }

    #[test]
    fn test_adjacent_dates_in_one_value() {
        let p = props(json!({ "window": "2024-01-01,2024-01-02;2024-01-03T00:00Z/2024-01-04" }));
        let dates: Vec<_> = extract_dates_from_properties(Some(&p))
            .into_iter()
            .map(format_date)
            .collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]);
    }

    #[test]
    fn test_non_string_values_are_stringified() {
        let p = props(json!({
            "dates": ["2024-01-01", "2024-01-13"],
            "nested": { "from": "2024-02-02" },
            "orbit": 42,
            "empty": null
        }));
        let dates = extract_dates_from_properties(Some(&p));
        assert_eq!(dates.len(), 3);
        assert!(feature_has_target_date(Some(&p), "2024-02-02"));
    }

    #[test]
    fn test_invalid_hits_dropped() {
        let p = props(json!({ "a": "2024-13-45", "b": "2024-02-30", "c": "2024-03-01" }));
        let dates = extract_dates_from_properties(Some(&p));
        assert_eq!(dates, vec![NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()]);
    }

    #[test]
    fn test_digit_neighbours() {
        let p = props(json!({ "id": "X2024-05-02" }));
        assert!(feature_has_target_date(Some(&p), "2024-05-02"));

        let p = props(json!({ "a": "12024-05-02", "b": "2024-05-021" }));
        assert!(extract_dates_from_properties(Some(&p)).is_empty());
        assert!(!feature_has_target_date(Some(&p), "2024-05-02"));
    }

    #[test]
    fn test_collect_sorted_unique() {
        let a = props(json!({ "d": "2024-01-13" }));
        let b = props(json!({ "d": "2024-01-01", "e": "2024-01-13" }));
        let set = collect_reference_dates([Some(&a), Some(&b), None]);
        let dates: Vec<_> = set.into_iter().map(format_date).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-13"]);
    }
}
