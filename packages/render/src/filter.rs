//! Region and risk-level filtering over a snapshot's areas.

use std::sync::LazyLock;

use flood_map_risk_models::{FilterState, RegionFilter, RiskArea, RiskFilter};
use regex::Regex;

/// Matches an embedded numeric zone token like "RPA 3", "Zona 1", or
/// "ZONE 3", case-insensitively.
static ZONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:rpa|zona|zone)\s*(\d+)").expect("valid regex"));

/// Applies the current [`FilterState`] over a full area set.
///
/// Stateless beyond the compiled zone pattern; held by the render context
/// rather than recompiled per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterEngine;

impl FilterEngine {
    /// Creates a filter engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Returns the order-preserving subsequence of `areas` passing both the
    /// region and the risk predicate.
    #[must_use]
    pub fn apply<'a>(&self, areas: &'a [RiskArea], filter: &FilterState) -> Vec<&'a RiskArea> {
        areas
            .iter()
            .filter(|area| Self::matches_region(area, filter.region))
            .filter(|area| Self::matches_risk(area, filter.risk))
            .collect()
    }

    fn matches_region(area: &RiskArea, filter: RegionFilter) -> bool {
        match filter {
            RegionFilter::All => true,
            // An area with no extractable zone token never matches a
            // specific zone filter.
            RegionFilter::Zone(zone) => zone_of(&area.region) == Some(zone),
        }
    }

    fn matches_risk(area: &RiskArea, filter: RiskFilter) -> bool {
        match filter {
            RiskFilter::All => true,
            RiskFilter::Level(level) => area.level == level,
        }
    }
}

/// Extracts the numeric zone token embedded in a free-text region, if any.
#[must_use]
pub fn zone_of(region: &str) -> Option<u32> {
    ZONE_RE
        .captures(region)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Sorts a filtered set by descending score, highest risk first.
///
/// A rendering-time concern layered on top of filtering: only the
/// area-shaped schema carries `risco_atual` as a primary sort key, so the
/// coordinator applies this for area-variant snapshots only.
pub fn sort_by_score_desc(areas: &mut [&RiskArea]) {
    areas.sort_by(|a, b| b.score.total_cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_risk_models::{FALLBACK_CENTROID, RiskLevel, SchemaVariant};

    fn area(name: &str, region: &str, level: RiskLevel, score: f64) -> RiskArea {
        RiskArea {
            name: name.to_string(),
            region: region.to_string(),
            geometry: None,
            centroid: FALLBACK_CENTROID,
            level,
            level_label: level.to_string(),
            score,
            flood_probability_pct: 0.0,
            probability_label: None,
            color: level.default_color().to_string(),
            area_km2: None,
            recommendations: Vec::new(),
            critical_points: Vec::new(),
            neighborhoods: Vec::new(),
            variant: SchemaVariant::Area,
        }
    }

    fn fixture() -> Vec<RiskArea> {
        vec![
            area("Imbiribeira", "Zona Sul - RPA 6", RiskLevel::High, 8.5),
            area("Boa Vista", "Centro - RPA 1", RiskLevel::High, 9.0),
            area("Casa Amarela", "zona 3", RiskLevel::Moderate, 5.1),
            area("Várzea", "Zona Oeste", RiskLevel::Low, 2.0),
        ]
    }

    #[test]
    fn all_all_is_identity_in_order() {
        let areas = fixture();
        let filtered = FilterEngine::new().apply(&areas, &FilterState::default());
        let names: Vec<&str> = filtered.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Imbiribeira", "Boa Vista", "Casa Amarela", "Várzea"]
        );
    }

    #[test]
    fn zone_and_level_predicates_are_anded() {
        let areas = fixture();
        let filter = FilterState {
            region: RegionFilter::Zone(1),
            risk: RiskFilter::Level(RiskLevel::High),
        };
        let filtered = FilterEngine::new().apply(&areas, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Boa Vista");
    }

    #[test]
    fn zone_token_extraction_is_case_insensitive() {
        assert_eq!(zone_of("Zona Sul - RPA 6"), Some(6));
        assert_eq!(zone_of("zona 3"), Some(3));
        assert_eq!(zone_of("ZONE 3"), Some(3));
        assert_eq!(zone_of("Zona Oeste"), None);
        assert_eq!(zone_of(""), None);
    }

    #[test]
    fn area_without_zone_token_never_matches_a_zone() {
        let areas = fixture();
        let filter = FilterState {
            region: RegionFilter::Zone(4),
            risk: RiskFilter::All,
        };
        assert!(FilterEngine::new().apply(&areas, &filter).is_empty());
    }

    #[test]
    fn medium_alias_filters_like_moderate() {
        let areas = fixture();
        let engine = FilterEngine::new();
        let medium = FilterState {
            region: RegionFilter::All,
            risk: RiskFilter::parse("medium").unwrap(),
        };
        let moderate = FilterState {
            region: RegionFilter::All,
            risk: RiskFilter::parse("moderate").unwrap(),
        };
        let a: Vec<&str> = engine.apply(&areas, &medium).iter().map(|x| x.name.as_str()).collect();
        let b: Vec<&str> = engine.apply(&areas, &moderate).iter().map(|x| x.name.as_str()).collect();
        assert_eq!(a, b);
        assert_eq!(a, vec!["Casa Amarela"]);
    }

    #[test]
    fn score_sort_is_descending() {
        let areas = fixture();
        let mut refs: Vec<&RiskArea> = areas.iter().collect();
        sort_by_score_desc(&mut refs);
        let names: Vec<&str> = refs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Boa Vista", "Imbiribeira", "Casa Amarela", "Várzea"]
        );
    }
}
