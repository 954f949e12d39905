//! Display attributes and markup blocks derived from a [`RiskArea`].
//!
//! Pure functions only — everything here is side-effect-free string
//! building consumed by the coordinator. Formatting intentionally differs
//! per schema variant: the neighborhood schema ships probability as a
//! number (shown as an integer percent), the area schema ships an already
//! formatted string that is preserved literally.

use flood_map_risk_models::{RiskArea, SchemaVariant};

/// Badge CSS class for an area, `risk-<level>`.
#[must_use]
pub fn badge_class(area: &RiskArea) -> &'static str {
    area.level.css_class()
}

/// Score formatted for display, three decimals.
#[must_use]
pub fn format_score(score: f64) -> String {
    format!("{score:.3}")
}

/// Flood probability formatted per schema variant.
#[must_use]
pub fn format_probability(area: &RiskArea) -> String {
    match area.variant {
        SchemaVariant::Neighborhood => format!("{:.0}%", area.flood_probability_pct),
        SchemaVariant::Area => area.probability_label.clone().unwrap_or_else(|| {
            format!("{:.1}%", area.flood_probability_pct)
        }),
    }
}

/// Abbreviated label for the fallback point marker.
///
/// The two frontends label markers differently — first name token vs. a
/// numeric score badge — and both behaviors are kept per variant.
#[must_use]
pub fn marker_label(area: &RiskArea) -> String {
    match area.variant {
        SchemaVariant::Neighborhood => area
            .name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
        SchemaVariant::Area => format!("{:.1}", area.score),
    }
}

/// Popup markup: header, risk block, details block, and either the
/// critical-points block (area schema) or the recommendations block.
#[must_use]
pub fn popup_html(area: &RiskArea) -> String {
    let mut html = format!(
        "<div class=\"popup {}\">\
         <h3>{}</h3>\
         <p class=\"popup-region\">{}</p>\
         <div class=\"popup-risk\">\
         <span class=\"badge {}\">{}</span>\
         <span class=\"popup-score\">Risco: {}</span>\
         <span class=\"popup-prob\">Prob. alagamento: {}</span>\
         </div>",
        badge_class(area),
        escape(&area.name),
        escape(&area.region),
        badge_class(area),
        escape(&area.level_label),
        format_score(area.score),
        format_probability(area),
    );

    let mut details = Vec::new();
    if let Some(km2) = area.area_km2 {
        details.push(format!("Área: {km2:.1} km²"));
    }
    if !area.neighborhoods.is_empty() {
        details.push(format!(
            "Bairros: {}",
            escape(&area.neighborhoods.join(", "))
        ));
    }
    if !details.is_empty() {
        html.push_str(&format!(
            "<p class=\"popup-details\">{}</p>",
            details.join(" · ")
        ));
    }

    if area.critical_points.is_empty() {
        html.push_str(&list_block("Recomendações", &area.recommendations));
    } else {
        html.push_str(&list_block("Pontos críticos", &area.critical_points));
    }

    html.push_str("</div>");
    html
}

/// Sidebar list card markup for an area.
#[must_use]
pub fn card_html(area: &RiskArea) -> String {
    format!(
        "<div class=\"area-card {}\" data-area=\"{}\">\
         <h4>{}</h4>\
         <span class=\"badge {}\">{}</span>\
         <p>{} · Prob.: {}</p>\
         </div>",
        badge_class(area),
        escape(&area.name),
        escape(&area.name),
        badge_class(area),
        escape(&area.level_label),
        escape(&area.region),
        format_probability(area),
    )
}

fn list_block(title: &str, items: &[String]) -> String {
    let lis: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape(item)))
        .collect();
    format!("<div class=\"popup-list\"><strong>{title}</strong><ul>{lis}</ul></div>")
}

/// Minimal HTML escaping for upstream free text.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
