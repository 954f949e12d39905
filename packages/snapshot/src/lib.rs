#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Payload parsing and area normalization.
//!
//! Reconciles the two upstream payload schemas — the neighborhood-shaped
//! `bairros` array and the area-shaped `areas` array — into the shared
//! [`flood_map_risk_models::Snapshot`] type. Record-level problems are
//! logged and skipped; only a payload missing both area collections aborts
//! the whole parse.

pub mod normalize;
pub mod payload;

use thiserror::Error;

pub use normalize::{DEFAULT_RECOMMENDATIONS, normalize_area};
pub use payload::parse_snapshot;

/// Record-level normalization errors. Skip-and-continue, never fatal to
/// the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The record has no identifying name; without one it cannot be
    /// correlated between the map, the list, and click handlers.
    #[error("record has no 'nome' field and cannot be identified")]
    MissingName,
}

/// Payload-level errors. These abort the whole parse — no partial render
/// is attempted from a malformed payload.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The payload has neither an `areas` nor a `bairros` array.
    #[error("payload has no 'areas' or 'bairros' collection")]
    InvalidShape,

    /// The payload is not valid JSON at all.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
