#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the flood map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the internal snapshot types to allow independent evolution of the
//! API contract.

use chrono::{DateTime, Utc};
use flood_map_render::{ListCard, MapPrimitive};
use flood_map_risk_models::{AlertSeverity, FilterState, SnapshotStatistics};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Query parameters for the view endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQueryParams {
    /// Region selection: `all` or a numeric zone id.
    pub region: Option<String>,
    /// Risk selection: `all`, `low`, `medium`, `moderate`, or `high`.
    pub risk: Option<String>,
}

/// Query parameters for the focus endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusQueryParams {
    /// Area name to center on.
    pub name: String,
    /// Region selection the view was rendered with.
    pub region: Option<String>,
    /// Risk selection the view was rendered with.
    pub risk: Option<String>,
}

/// Fully materialized dashboard view.
///
/// Statistics and alert always describe the whole snapshot; only the
/// primitives and cards are filtered.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResponse {
    /// Free-text general alert.
    pub general_alert: String,
    /// Classified alert severity for banner styling.
    pub alert_severity: AlertSeverity,
    /// Aggregate counts over the full (unfiltered) snapshot.
    pub statistics: SnapshotStatistics,
    /// The filter the view was rendered with.
    pub filter: FilterState,
    /// Map primitives to draw, in render order.
    pub primitives: Vec<MapPrimitive>,
    /// Sidebar cards, same order as the primitives.
    pub cards: Vec<ListCard>,
    /// When the underlying snapshot was fetched.
    pub fetched_at: DateTime<Utc>,
}
