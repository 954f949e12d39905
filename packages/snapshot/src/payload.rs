//! Top-level payload parsing and schema variant detection.

use chrono::Utc;
use flood_map_risk_models::{AlertSeverity, SchemaVariant, Snapshot, SnapshotStatistics};

use crate::{SnapshotError, normalize::normalize_area};

/// Parses a raw payload into a [`Snapshot`].
///
/// The schema variant is detected from which collection the payload
/// carries: a top-level `areas` array (area-shaped schema) or a top-level
/// `bairros` array (neighborhood-shaped schema). Records that fail
/// normalization are logged and skipped; the batch continues.
///
/// # Errors
///
/// Returns [`SnapshotError::InvalidShape`] when neither collection is
/// present — a malformed payload never produces a partial snapshot.
pub fn parse_snapshot(payload: &serde_json::Value) -> Result<Snapshot, SnapshotError> {
    let (variant, raw_areas) = detect_variant(payload).ok_or(SnapshotError::InvalidShape)?;

    let mut areas = Vec::with_capacity(raw_areas.len());
    for raw in raw_areas {
        match normalize_area(raw, variant) {
            Ok(area) => areas.push(area),
            Err(e) => log::warn!("Skipping record: {e}"),
        }
    }
    log::info!(
        "Parsed {} of {} records from {variant} payload",
        areas.len(),
        raw_areas.len(),
    );

    let general_alert = payload
        .get("alerta_geral")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();
    let alert_severity = AlertSeverity::classify(&general_alert);

    Ok(Snapshot {
        general_alert,
        alert_severity,
        statistics: parse_statistics(payload.get("estatisticas")),
        areas,
        variant,
        fetched_at: Utc::now(),
    })
}

/// Finds the area collection and tags which schema shipped it.
fn detect_variant(
    payload: &serde_json::Value,
) -> Option<(SchemaVariant, &Vec<serde_json::Value>)> {
    if let Some(areas) = payload.get("areas").and_then(serde_json::Value::as_array) {
        return Some((SchemaVariant::Area, areas));
    }
    payload
        .get("bairros")
        .and_then(serde_json::Value::as_array)
        .map(|bairros| (SchemaVariant::Neighborhood, bairros))
}

/// Parses the optional `estatisticas {total, alto, moderado, baixo}` block.
fn parse_statistics(value: Option<&serde_json::Value>) -> Option<SnapshotStatistics> {
    let stats = value?;
    let count = |key: &str| stats.get(key).and_then(serde_json::Value::as_u64);
    Some(SnapshotStatistics {
        total: count("total")?,
        high: count("alto").unwrap_or(0),
        moderate: count("moderado").unwrap_or(0),
        low: count("baixo").unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_area_variant() {
        let payload = json!({
            "alerta_geral": "Alerta ALTO",
            "areas": [
                { "nome": "Centro - Boa Vista/Santo Amaro", "nivel_risco": "alto" },
                { "nivel_risco": "baixo" }
            ]
        });
        let snapshot = parse_snapshot(&payload).unwrap();
        assert_eq!(snapshot.variant, SchemaVariant::Area);
        // The nameless record is skipped, not fatal.
        assert_eq!(snapshot.areas.len(), 1);
        assert_eq!(snapshot.alert_severity, AlertSeverity::High);
    }

    #[test]
    fn detects_neighborhood_variant() {
        let payload = json!({
            "bairros": [
                { "nome": "Afogados", "nivel_risco": "moderado" }
            ]
        });
        let snapshot = parse_snapshot(&payload).unwrap();
        assert_eq!(snapshot.variant, SchemaVariant::Neighborhood);
        assert_eq!(snapshot.areas.len(), 1);
        assert_eq!(snapshot.alert_severity, AlertSeverity::Normal);
    }

    #[test]
    fn missing_collections_are_a_shape_error() {
        let payload = json!({ "alerta_geral": "ok", "pontos": [] });
        assert!(matches!(
            parse_snapshot(&payload),
            Err(SnapshotError::InvalidShape)
        ));
    }

    #[test]
    fn statistics_block_is_optional() {
        let with = json!({
            "areas": [],
            "estatisticas": { "total": 7, "alto": 4, "moderado": 3, "baixo": 0 }
        });
        let snapshot = parse_snapshot(&with).unwrap();
        let stats = snapshot.statistics.unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.high, 4);

        let without = json!({ "areas": [] });
        assert!(parse_snapshot(&without).unwrap().statistics.is_none());
    }

    #[test]
    fn payload_order_is_preserved() {
        let payload = json!({
            "areas": [
                { "nome": "A" }, { "nome": "B" }, { "nome": "C" }
            ]
        });
        let snapshot = parse_snapshot(&payload).unwrap();
        let names: Vec<&str> = snapshot.areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
