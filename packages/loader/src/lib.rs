#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Snapshot fetching with stale-response protection.
//!
//! Fetch triggers (startup, the fixed-interval refresh, manual refresh)
//! are serialized by the caller, but an in-flight response is never
//! cancelled when a newer trigger fires. Arrival order is therefore not
//! trusted: every fetch takes a monotonic sequence number up front and a
//! response is applied only if its number beats the last applied one, so
//! a slow stale response can never overwrite newer state.
//!
//! When the upstream service is unreachable the loader applies an
//! embedded static dataset (compile-time, `include_str!`) so the map
//! still shows the historically known risk areas, and still reports the
//! fetch failure to the caller.

pub mod fallback;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use flood_map_risk_models::Snapshot;
use flood_map_snapshot::{SnapshotError, parse_snapshot};
use thiserror::Error;

/// Errors surfaced by a refresh attempt.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Network or HTTP failure reaching the upstream service.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream payload was fetched but is unusable.
    #[error("Payload error: {0}")]
    Payload(#[from] SnapshotError),
}

impl LoaderError {
    /// Whether a retry can plausibly succeed without an upstream fix.
    ///
    /// Fetch failures are transient; a payload with the wrong shape is
    /// not going to improve on retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }
}

/// The current snapshot plus the sequencing bookkeeping.
///
/// Single slot, swapped atomically: readers clone the `Arc<Snapshot>` and
/// keep a consistent view even while a newer snapshot lands.
#[derive(Debug, Default)]
pub struct SnapshotState {
    applied: Mutex<Applied>,
    next_seq: AtomicU64,
}

#[derive(Debug, Default)]
struct Applied {
    snapshot: Option<Arc<Snapshot>>,
    seq: u64,
}

impl SnapshotState {
    /// Creates an empty state with no snapshot loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the sequence number for a fetch about to start.
    ///
    /// Numbers start at 1; sequence 0 means "nothing applied yet".
    pub fn begin_fetch(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Applies a fetched snapshot unless a newer one already landed.
    ///
    /// Returns `false` (and logs) when the response is stale.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn apply_if_newer(&self, seq: u64, snapshot: Snapshot) -> bool {
        let mut applied = self.applied.lock().expect("snapshot state mutex poisoned");
        if seq <= applied.seq {
            log::warn!(
                "Discarding stale response (seq {seq}, already applied seq {})",
                applied.seq
            );
            return false;
        }
        applied.seq = seq;
        applied.snapshot = Some(Arc::new(snapshot));
        true
    }

    /// The currently applied snapshot, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.applied
            .lock()
            .expect("snapshot state mutex poisoned")
            .snapshot
            .clone()
    }
}

/// Fetches snapshots from the upstream forecast service.
pub struct SnapshotLoader {
    client: reqwest::Client,
    upstream_url: String,
    state: Arc<SnapshotState>,
}

impl SnapshotLoader {
    /// Creates a loader against `upstream_url`, sharing `state` with the
    /// consumers of the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`reqwest::Error`] if the HTTP client cannot be built.
    pub fn new(upstream_url: String, state: Arc<SnapshotState>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            upstream_url,
            state,
        })
    }

    /// The shared snapshot state.
    #[must_use]
    pub fn state(&self) -> &Arc<SnapshotState> {
        &self.state
    }

    /// Fetches, parses, and applies a fresh snapshot.
    ///
    /// On a network failure the embedded fallback dataset is applied under
    /// this fetch's sequence number (so an even older in-flight success
    /// can't displace it) and the failure is still reported. A payload
    /// with an invalid shape applies nothing — no partial render.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] for fetch failures and
    /// [`LoaderError::Payload`] for unusable payloads.
    pub async fn refresh(&self) -> Result<(), LoaderError> {
        let seq = self.state.begin_fetch();
        log::info!("Fetching snapshot (seq {seq}) from {}", self.upstream_url);

        let payload = match self.fetch_payload().await {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Snapshot fetch failed: {e}, applying static fallback");
                self.state.apply_if_newer(seq, fallback::fallback_snapshot());
                return Err(e);
            }
        };

        let snapshot = parse_snapshot(&payload)?;
        if self.state.apply_if_newer(seq, snapshot) {
            log::info!("Applied snapshot seq {seq}");
        }
        Ok(())
    }

    async fn fetch_payload(&self) -> Result<serde_json::Value, LoaderError> {
        let resp = self
            .client
            .get(&self.upstream_url)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flood_map_risk_models::{AlertSeverity, SchemaVariant};

    fn snapshot(alert: &str) -> Snapshot {
        Snapshot {
            general_alert: alert.to_string(),
            alert_severity: AlertSeverity::classify(alert),
            statistics: None,
            areas: Vec::new(),
            variant: SchemaVariant::Area,
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn sequence_numbers_are_monotonic() {
        let state = SnapshotState::new();
        let a = state.begin_fetch();
        let b = state.begin_fetch();
        assert!(b > a);
        assert_eq!(a, 1);
    }

    #[test]
    fn later_sequence_wins_regardless_of_arrival_order() {
        // Two refreshes start; the second-triggered one resolves first.
        let state = SnapshotState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert!(state.apply_if_newer(second, snapshot("newer")));
        // The earlier-triggered response arrives late and must be dropped.
        assert!(!state.apply_if_newer(first, snapshot("older")));

        assert_eq!(state.current().unwrap().general_alert, "newer");
    }

    #[test]
    fn in_order_responses_apply_normally() {
        let state = SnapshotState::new();
        let first = state.begin_fetch();
        assert!(state.apply_if_newer(first, snapshot("one")));
        let second = state.begin_fetch();
        assert!(state.apply_if_newer(second, snapshot("two")));
        assert_eq!(state.current().unwrap().general_alert, "two");
    }

    #[test]
    fn state_starts_empty() {
        assert!(SnapshotState::new().current().is_none());
    }
}
