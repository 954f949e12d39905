#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood-risk taxonomy and snapshot types.
//!
//! This crate defines the canonical risk level taxonomy, the normalized
//! [`RiskArea`] record, and the [`Snapshot`] / [`FilterState`] types shared
//! across the whole flood-map system. Both incoming payload schemas are
//! normalized into these types at the boundary; everything downstream
//! (filtering, presentation, rendering, the API) works only with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Risk level for a flood-risk area, from lowest to highest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low flood risk.
    Low = 1,
    /// Moderate flood risk.
    Moderate = 2,
    /// High flood risk.
    High = 3,
}

impl RiskLevel {
    /// Parses a risk level from a source token, case-insensitively.
    ///
    /// Accepts the Portuguese tokens used by the upstream payloads
    /// (`baixo`/`moderado`/`alto`) as well as the English filter tokens
    /// (`low`/`moderate`/`high`). The user-facing `medium` alias maps to
    /// [`Self::Moderate`]. Returns `None` for unrecognized tokens; callers
    /// decide the default (the normalizer falls back to [`Self::Low`]).
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "baixo" | "low" => Some(Self::Low),
            "moderado" | "moderate" | "medium" | "medio" | "médio" => Some(Self::Moderate),
            "alto" | "high" => Some(Self::High),
            _ => None,
        }
    }

    /// CSS class driving the list card badge and popup styling.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Low => "risk-low",
            Self::Moderate => "risk-moderate",
            Self::High => "risk-high",
        }
    }

    /// Fallback fill/badge color when the payload carries no `cor_risco`.
    #[must_use]
    pub const fn default_color(self) -> &'static str {
        match self {
            Self::Low => "#388e3c",
            Self::Moderate => "#f57c00",
            Self::High => "#d32f2f",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Moderate, Self::High]
    }
}

/// Severity of the free-text general alert carried by a snapshot.
///
/// Classified by case-insensitive substring match against known alert
/// tokens; the raw alert text is preserved alongside for display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    /// No elevated alert.
    Normal,
    /// Attention-level alert.
    Moderate,
    /// Maximum-level alert.
    High,
}

impl AlertSeverity {
    /// Classifies a free-text general alert into a severity bucket.
    #[must_use]
    pub fn classify(alert: &str) -> Self {
        let lower = alert.to_lowercase();
        if ["alto", "vermelho", "crítico", "critico", "máximo", "maximo"]
            .iter()
            .any(|token| lower.contains(token))
        {
            Self::High
        } else if ["moderado", "laranja", "atenção", "atencao"]
            .iter()
            .any(|token| lower.contains(token))
        {
            Self::Moderate
        } else {
            Self::Normal
        }
    }
}

/// Which payload schema produced a record.
///
/// The upstream service ships two near-identical shapes: an older
/// neighborhood-keyed payload (`bairros` array, numeric probability) and a
/// newer area-keyed payload (`areas` array, string probability, critical
/// points). Presentation details differ per variant, so the tag is kept on
/// every normalized record instead of duplicating the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaVariant {
    /// Neighborhood-shaped records from a top-level `bairros` array.
    Neighborhood,
    /// Area-shaped records from a top-level `areas` array.
    Area,
}

/// A geographic coordinate in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Fallback centroid used when an area has neither an explicit center nor
/// enough valid geometry to derive one: central Recife (Marco Zero).
pub const FALLBACK_CENTROID: LatLng = LatLng::new(-8.0476, -34.877);

/// A normalized flood-risk area.
///
/// Immutable value object once built; the normalizer is the only producer.
/// `name` is unique within a snapshot and is the lookup key for
/// click-to-center behavior on both the map and the sidebar list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskArea {
    /// Unique area name within the snapshot.
    pub name: String,
    /// Free-text region, may embed a zone token (e.g. "Zona Sul - RPA 6").
    pub region: String,
    /// One validated polygon ring, or `None` when the source geometry was
    /// absent or had fewer than three valid points.
    pub geometry: Option<Vec<LatLng>>,
    /// Explicit center, derived ring mean, or [`FALLBACK_CENTROID`].
    pub centroid: LatLng,
    /// Normalized risk level.
    pub level: RiskLevel,
    /// Risk level token as it appeared in the source, original casing.
    pub level_label: String,
    /// Continuous severity score, `>= 0`.
    pub score: f64,
    /// Flood probability in percent, clamped to `[0, 100]`.
    pub flood_probability_pct: f64,
    /// Literal probability string from the source, kept for variant-faithful
    /// display (the area-shaped schema ships it as a formatted string).
    pub probability_label: Option<String>,
    /// CSS color token driving both map fill and badge color.
    pub color: String,
    /// Area in square kilometers, when provided.
    pub area_km2: Option<f64>,
    /// Civil-defense recommendations; defaulted when the source has none.
    pub recommendations: Vec<String>,
    /// Known critical points (streets, crossings) — area schema only.
    pub critical_points: Vec<String>,
    /// Neighborhoods covered by this area — area schema only.
    pub neighborhoods: Vec<String>,
    /// Which payload schema produced this record.
    pub variant: SchemaVariant,
}

/// Aggregate counts shipped with (or recomputed from) a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatistics {
    /// Total number of areas.
    pub total: u64,
    /// Areas at high risk.
    pub high: u64,
    /// Areas at moderate risk.
    pub moderate: u64,
    /// Areas at low risk.
    pub low: u64,
}

impl SnapshotStatistics {
    /// Recomputes the counts from a set of normalized areas.
    #[must_use]
    pub fn from_areas(areas: &[RiskArea]) -> Self {
        let mut stats = Self {
            total: areas.len() as u64,
            high: 0,
            moderate: 0,
            low: 0,
        };
        for area in areas {
            match area.level {
                RiskLevel::High => stats.high += 1,
                RiskLevel::Moderate => stats.moderate += 1,
                RiskLevel::Low => stats.low += 1,
            }
        }
        stats
    }
}

/// One fetched, internally consistent set of risk areas.
///
/// A snapshot replaces its predecessor atomically from the renderer's point
/// of view; consumers never observe a mix of old and new areas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Free-text general alert from the payload.
    pub general_alert: String,
    /// Severity bucket classified from the general alert text.
    pub alert_severity: AlertSeverity,
    /// Aggregate counts, when the payload carried them.
    pub statistics: Option<SnapshotStatistics>,
    /// Normalized areas, in payload order.
    pub areas: Vec<RiskArea>,
    /// Which payload schema this snapshot was parsed from.
    pub variant: SchemaVariant,
    /// When the snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Region half of the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionFilter {
    /// Every region passes.
    All,
    /// Only areas whose region embeds this numeric zone token pass.
    Zone(u32),
}

impl RegionFilter {
    /// Parses a user selection: `"all"` (case-insensitive) or a zone id.
    ///
    /// Returns `None` for values that are neither.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Some(Self::All)
        } else {
            trimmed.parse().ok().map(Self::Zone)
        }
    }
}

/// Risk half of the filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskFilter {
    /// Every risk level passes.
    All,
    /// Only areas at exactly this level pass.
    Level(RiskLevel),
}

impl RiskFilter {
    /// Parses a user selection: `"all"` or a level token.
    ///
    /// The `medium` alias maps to [`RiskLevel::Moderate`] here, before any
    /// comparison happens. Returns `None` for unrecognized tokens.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            Some(Self::All)
        } else {
            RiskLevel::from_token(trimmed).map(Self::Level)
        }
    }
}

/// Current filter selection.
///
/// Mutated only by explicit user selection; a snapshot reload re-applies the
/// current filter rather than resetting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Region predicate.
    pub region: RegionFilter,
    /// Risk level predicate.
    pub risk: RiskFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            region: RegionFilter::All,
            risk: RiskFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_tokens_parse_case_insensitively() {
        assert_eq!(RiskLevel::from_token("ALTO"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_token("Baixo"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_token("moderado"), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::from_token("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_token("desconhecido"), None);
    }

    #[test]
    fn medium_alias_maps_to_moderate() {
        assert_eq!(RiskLevel::from_token("medium"), Some(RiskLevel::Moderate));
        assert_eq!(
            RiskFilter::parse("medium"),
            Some(RiskFilter::Level(RiskLevel::Moderate))
        );
        assert_eq!(
            RiskFilter::parse("moderate"),
            Some(RiskFilter::Level(RiskLevel::Moderate))
        );
    }

    #[test]
    fn region_filter_parses_all_and_zones() {
        assert_eq!(RegionFilter::parse("all"), Some(RegionFilter::All));
        assert_eq!(RegionFilter::parse("ALL"), Some(RegionFilter::All));
        assert_eq!(RegionFilter::parse("3"), Some(RegionFilter::Zone(3)));
        assert_eq!(RegionFilter::parse("norte"), None);
    }

    #[test]
    fn alert_classification_matches_known_tokens() {
        assert_eq!(
            AlertSeverity::classify("Alerta ALTO para as próximas 24h"),
            AlertSeverity::High
        );
        assert_eq!(
            AlertSeverity::classify("Estágio de atenção"),
            AlertSeverity::Moderate
        );
        assert_eq!(
            AlertSeverity::classify("Sem alertas ativos"),
            AlertSeverity::Normal
        );
    }

    #[test]
    fn statistics_recompute_counts_by_level() {
        let mk = |name: &str, level: RiskLevel| RiskArea {
            name: name.to_string(),
            region: String::new(),
            geometry: None,
            centroid: FALLBACK_CENTROID,
            level,
            level_label: level.to_string(),
            score: 0.0,
            flood_probability_pct: 0.0,
            probability_label: None,
            color: level.default_color().to_string(),
            area_km2: None,
            recommendations: Vec::new(),
            critical_points: Vec::new(),
            neighborhoods: Vec::new(),
            variant: SchemaVariant::Area,
        };
        let areas = vec![
            mk("a", RiskLevel::High),
            mk("b", RiskLevel::High),
            mk("c", RiskLevel::Low),
        ];
        let stats = SnapshotStatistics::from_areas(&areas);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.high, 2);
        assert_eq!(stats.moderate, 0);
        assert_eq!(stats.low, 1);
    }
}
