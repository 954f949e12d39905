#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filtering and view materialization for the flood-risk map.
//!
//! Three layers, applied in order: [`filter::FilterEngine`] selects areas,
//! [`presentation`] turns each area into popup/card markup, and
//! [`coordinator::RenderCoordinator`] materializes the map primitives and
//! sidebar cards the frontend renders verbatim. Each render fully replaces
//! the previous one — snapshot and filter changes are replace-only, never
//! incremental diffs.

pub mod coordinator;
pub mod filter;
pub mod presentation;

pub use coordinator::{FocusAction, ListCard, MapPrimitive, RenderCoordinator};
pub use filter::FilterEngine;
