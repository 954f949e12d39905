//! Normalizes raw area records into [`RiskArea`] values.
//!
//! Both payload schemas share the core fields (`nome`, `regiao`,
//! `nivel_risco`, `cor_risco`, `poligono`, optional `centro` and
//! `area_km2`); the differences — probability as number vs. string,
//! critical points, covered neighborhoods — are handled per field so one
//! normalizer serves both shapes.

use flood_map_geometry::{GeometryError, parse_point, ring_centroid, validate_ring};
use flood_map_risk_models::{FALLBACK_CENTROID, LatLng, RiskArea, RiskLevel, SchemaVariant};

use crate::NormalizeError;

/// Generic advisory shown when a record carries no recommendations of
/// its own.
pub const DEFAULT_RECOMMENDATIONS: [&str; 2] = [
    "Evite deslocamentos por áreas alagáveis durante chuvas fortes",
    "Siga as orientações da Defesa Civil",
];

/// Normalizes a single raw record into a [`RiskArea`].
///
/// Geometry and numeric fields degrade gracefully: an undrawable ring
/// becomes `None` (marker fallback downstream), missing numbers default to
/// zero, and an unrecognized risk level defaults to [`RiskLevel::Low`] —
/// the upstream service does the same, which can mask data-quality issues,
/// so the fallback is logged.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingName`] when the record has no usable
/// `nome`; the caller skips the record and continues the batch.
pub fn normalize_area(
    raw: &serde_json::Value,
    variant: SchemaVariant,
) -> Result<RiskArea, NormalizeError> {
    let name = raw
        .get("nome")
        .or_else(|| raw.get("name"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(NormalizeError::MissingName)?
        .to_string();

    let region = raw
        .get("regiao")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let level_label = raw
        .get("nivel_risco")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("baixo")
        .to_string();
    let level = RiskLevel::from_token(&level_label).unwrap_or_else(|| {
        log::warn!("Area '{name}': unrecognized risk level '{level_label}', defaulting to LOW");
        RiskLevel::Low
    });

    let geometry = raw
        .get("poligono")
        .and_then(serde_json::Value::as_array)
        .and_then(|points| match validate_ring(points) {
            Ok(ring) => Some(ring),
            Err(GeometryError::InsufficientPoints { kept }) => {
                log::warn!("Area '{name}': ring kept only {kept} valid points, using marker");
                None
            }
        });

    let centroid = raw
        .get("centro")
        .and_then(parse_point)
        .or_else(|| geometry.as_deref().and_then(ring_centroid))
        .unwrap_or(FALLBACK_CENTROID);

    let score = safe_float(raw.get("risco_atual")).unwrap_or(0.0).max(0.0);

    let raw_probability = raw.get("probabilidade_alagamento");
    let flood_probability_pct = safe_float(raw_probability).unwrap_or(0.0).clamp(0.0, 100.0);
    let probability_label = raw_probability
        .and_then(serde_json::Value::as_str)
        .map(|s| s.trim().to_string());

    let color = raw
        .get("cor_risco")
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(level.default_color())
        .to_string();

    let area_km2 = safe_float(raw.get("area_km2"));

    let mut recommendations = string_list(raw.get("recomendacoes"));
    if recommendations.is_empty() {
        recommendations = DEFAULT_RECOMMENDATIONS
            .iter()
            .map(ToString::to_string)
            .collect();
    }

    Ok(RiskArea {
        name,
        region,
        geometry,
        centroid,
        level,
        level_label,
        score,
        flood_probability_pct,
        probability_label,
        color,
        area_km2,
        recommendations,
        critical_points: string_list(raw.get("pontos_criticos")),
        neighborhoods: string_list(raw.get("bairros")),
        variant,
    })
}

/// Lenient numeric conversion: accepts JSON numbers and numeric strings
/// (with an optional trailing `%`), rejects everything non-finite.
fn safe_float(value: Option<&serde_json::Value>) -> Option<f64> {
    let value = value?;
    let parsed = value.as_f64().or_else(|| {
        value
            .as_str()
            .map(|s| s.trim().trim_end_matches('%').trim())
            .and_then(|s| s.parse().ok())
    })?;
    parsed.is_finite().then_some(parsed)
}

/// Extracts an array of non-empty strings, dropping anything else.
fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
