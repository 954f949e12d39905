//! Embedded static fallback dataset.
//!
//! A condensed version of the Defesa Civil risk-area survey for Recife,
//! embedded at compile time via `include_str!`. Served when the upstream
//! forecast service is unreachable, with the general alert marking the
//! data as static.

use flood_map_risk_models::Snapshot;
use flood_map_snapshot::parse_snapshot;

/// Embedded fallback payload, area-shaped schema.
const FALLBACK_JSON: &str = include_str!("../data/fallback.json");

/// Builds a snapshot from the embedded fallback dataset.
///
/// # Panics
///
/// Panics if the embedded payload fails to parse. Since it is a
/// compile-time constant, a parse failure indicates a development error
/// and is caught by the tests below.
#[must_use]
pub fn fallback_snapshot() -> Snapshot {
    let payload: serde_json::Value = serde_json::from_str(FALLBACK_JSON)
        .unwrap_or_else(|e| panic!("Embedded fallback dataset is not valid JSON: {e}"));
    parse_snapshot(&payload)
        .unwrap_or_else(|e| panic!("Embedded fallback dataset failed to parse: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_risk_models::SchemaVariant;

    #[test]
    fn fallback_dataset_parses() {
        let snapshot = fallback_snapshot();
        assert_eq!(snapshot.variant, SchemaVariant::Area);
        assert!(!snapshot.areas.is_empty());
        assert!(!snapshot.general_alert.is_empty());
    }

    #[test]
    fn fallback_areas_are_drawable() {
        // Every fallback area ships a full ring; none should degrade to a
        // marker.
        for area in fallback_snapshot().areas {
            assert!(
                area.geometry.as_ref().is_some_and(|ring| ring.len() >= 3),
                "fallback area '{}' has no drawable ring",
                area.name
            );
        }
    }

    #[test]
    fn fallback_statistics_match_area_counts() {
        let snapshot = fallback_snapshot();
        let stats = snapshot.statistics.expect("fallback carries statistics");
        assert_eq!(stats.total as usize, snapshot.areas.len());
    }
}
