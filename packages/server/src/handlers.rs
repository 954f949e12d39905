//! HTTP handler functions for the flood map API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use flood_map_loader::LoaderError;
use flood_map_render::RenderCoordinator;
use flood_map_risk_models::{
    FilterState, RegionFilter, RiskFilter, Snapshot, SnapshotStatistics,
};
use flood_map_server_models::{ApiHealth, FocusQueryParams, ViewQueryParams, ViewResponse};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/previsao`
///
/// Returns the current snapshot as-is, fetching on demand when the first
/// request races the initial load.
pub async fn previsao(state: web::Data<AppState>) -> HttpResponse {
    match current_snapshot(&state).await {
        Ok(snapshot) => HttpResponse::Ok().json(&*snapshot),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/view`
///
/// Returns the materialized dashboard view for the requested filter:
/// filtered map primitives and sidebar cards, plus the whole-snapshot
/// alert and statistics.
pub async fn view(state: web::Data<AppState>, params: web::Query<ViewQueryParams>) -> HttpResponse {
    let filter = match parse_filter(params.region.as_deref(), params.risk.as_deref()) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let snapshot = match current_snapshot(&state).await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(&e),
    };

    let mut coordinator = RenderCoordinator::new();
    coordinator.render_filtered(&snapshot, &filter, &state.engine);

    let statistics = snapshot
        .statistics
        .unwrap_or_else(|| SnapshotStatistics::from_areas(&snapshot.areas));

    HttpResponse::Ok().json(ViewResponse {
        general_alert: snapshot.general_alert.clone(),
        alert_severity: snapshot.alert_severity,
        statistics,
        filter,
        primitives: coordinator.primitives().to_vec(),
        cards: coordinator.cards().to_vec(),
        fetched_at: snapshot.fetched_at,
    })
}

/// `GET /api/focus`
///
/// Resolves a click on a map primitive or list card into the bounds to
/// fit and the popup to open, by stable area name within the same
/// filtered view.
pub async fn focus(
    state: web::Data<AppState>,
    params: web::Query<FocusQueryParams>,
) -> HttpResponse {
    let filter = match parse_filter(params.region.as_deref(), params.risk.as_deref()) {
        Ok(filter) => filter,
        Err(resp) => return resp,
    };

    let snapshot = match current_snapshot(&state).await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(&e),
    };

    let mut coordinator = RenderCoordinator::new();
    coordinator.render_filtered(&snapshot, &filter, &state.engine);

    coordinator.focus(&params.name).map_or_else(
        || {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Unknown area '{}'", params.name)
            }))
        },
        |action| HttpResponse::Ok().json(action),
    )
}

/// `POST /api/refresh`
///
/// Manual refresh trigger.
pub async fn refresh(state: web::Data<AppState>) -> HttpResponse {
    match state.loader.refresh().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "refreshed": true })),
        Err(e) => error_response(&e),
    }
}

/// Returns the current snapshot, fetching once if none is loaded yet.
///
/// # Panics
///
/// Panics if a successful refresh applied no snapshot, which would be a
/// loader invariant violation.
async fn current_snapshot(state: &AppState) -> Result<Arc<Snapshot>, LoaderError> {
    if let Some(snapshot) = state.loader.state().current() {
        return Ok(snapshot);
    }
    state.loader.refresh().await?;
    Ok(state
        .loader
        .state()
        .current()
        .expect("refresh succeeded without applying a snapshot"))
}

/// Parses the user's filter selections, defaulting both to `all`.
fn parse_filter(region: Option<&str>, risk: Option<&str>) -> Result<FilterState, HttpResponse> {
    let region_value = region.unwrap_or("all");
    let Some(region) = RegionFilter::parse(region_value) else {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid region filter '{region_value}'")
        })));
    };

    let risk_value = risk.unwrap_or("all");
    let Some(risk) = RiskFilter::parse(risk_value) else {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "error": format!("Invalid risk filter '{risk_value}'")
        })));
    };

    Ok(FilterState { region, risk })
}

/// Maps a loader failure to the retry-capable error banner body.
fn error_response(e: &LoaderError) -> HttpResponse {
    log::error!("Snapshot unavailable: {e}");
    HttpResponse::BadGateway().json(serde_json::json!({
        "error": e.to_string(),
        "retryable": e.is_retryable(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_risk_models::RiskLevel;

    #[test]
    fn filter_defaults_to_all_all() {
        let filter = parse_filter(None, None).unwrap();
        assert_eq!(filter.region, RegionFilter::All);
        assert_eq!(filter.risk, RiskFilter::All);
    }

    #[test]
    fn filter_accepts_zone_and_alias() {
        let filter = parse_filter(Some("3"), Some("medium")).unwrap();
        assert_eq!(filter.region, RegionFilter::Zone(3));
        assert_eq!(filter.risk, RiskFilter::Level(RiskLevel::Moderate));
    }

    #[test]
    fn filter_rejects_unknown_tokens() {
        assert!(parse_filter(Some("norte"), None).is_err());
        assert!(parse_filter(None, Some("extreme")).is_err());
    }
}
