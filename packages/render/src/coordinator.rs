//! Materialized map/list view state.
//!
//! The coordinator owns the currently rendered set: one visual primitive
//! per area plus one sidebar card, in the same order. Every render is a
//! full clear-and-repopulate; given the same input it is idempotent and it
//! fully supersedes the prior render, so consumers never observe a mix of
//! old and new areas.

use flood_map_geometry::{Bounds, ring_bounds};
use flood_map_risk_models::{FilterState, LatLng, RiskArea, SchemaVariant, Snapshot};
use serde::Serialize;

use crate::filter::{FilterEngine, sort_by_score_desc};
use crate::presentation;

/// A single drawable map primitive.
///
/// Every named area produces exactly one: a filled polygon when its ring
/// validated, otherwise a fallback point marker at its centroid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MapPrimitive {
    /// A filled polygon styled by the area's risk color.
    #[serde(rename_all = "camelCase")]
    Polygon {
        /// Area name, the stable lookup key.
        name: String,
        /// Validated ring, `[lat, lng]` order.
        ring: Vec<LatLng>,
        /// Fill/stroke color.
        color: String,
        /// Popup markup opened on click.
        popup_html: String,
    },
    /// A fallback point marker for areas without drawable geometry.
    #[serde(rename_all = "camelCase")]
    Marker {
        /// Area name, the stable lookup key.
        name: String,
        /// Marker position (the area centroid).
        at: LatLng,
        /// Marker color.
        color: String,
        /// Abbreviated label shown on the marker.
        label: String,
        /// Popup markup opened on click.
        popup_html: String,
    },
}

impl MapPrimitive {
    /// The area name this primitive was drawn for.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Polygon { name, .. } | Self::Marker { name, .. } => name,
        }
    }
}

/// One sidebar list card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCard {
    /// Area name, the stable lookup key shared with the map primitive.
    pub name: String,
    /// Card markup.
    pub html: String,
}

/// Result of a click on a map primitive or list card: the bounds to fit
/// the view to and the popup to open.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAction {
    /// Area name.
    pub name: String,
    /// Bounds to fit the view to.
    pub bounds: Bounds,
    /// Popup markup to open.
    pub popup_html: String,
}

/// Owns the currently rendered area set.
#[derive(Debug, Default, Clone)]
pub struct RenderCoordinator {
    primitives: Vec<MapPrimitive>,
    cards: Vec<ListCard>,
}

impl RenderCoordinator {
    /// Creates an empty coordinator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primitives: Vec::new(),
            cards: Vec::new(),
        }
    }

    /// Filters a snapshot and renders the result.
    ///
    /// Area-shaped snapshots are additionally sorted by descending score
    /// before rendering (highest risk first); neighborhood-shaped snapshots
    /// keep payload order.
    pub fn render_filtered(
        &mut self,
        snapshot: &Snapshot,
        filter: &FilterState,
        engine: &FilterEngine,
    ) {
        let mut selected = engine.apply(&snapshot.areas, filter);
        if snapshot.variant == SchemaVariant::Area {
            sort_by_score_desc(&mut selected);
        }
        self.render(&selected);
    }

    /// Clears the prior render and draws `areas` in sequence order.
    ///
    /// Exactly one primitive and one card per area — never zero for a
    /// named area, polygon preferred, marker fallback.
    pub fn render(&mut self, areas: &[&RiskArea]) {
        self.primitives.clear();
        self.cards.clear();

        for area in areas {
            let popup_html = presentation::popup_html(area);
            let primitive = match area.geometry.as_ref().filter(|ring| !ring.is_empty()) {
                Some(ring) => MapPrimitive::Polygon {
                    name: area.name.clone(),
                    ring: ring.clone(),
                    color: area.color.clone(),
                    popup_html: popup_html.clone(),
                },
                None => MapPrimitive::Marker {
                    name: area.name.clone(),
                    at: area.centroid,
                    color: area.color.clone(),
                    label: presentation::marker_label(area),
                    popup_html: popup_html.clone(),
                },
            };
            self.primitives.push(primitive);
            self.cards.push(ListCard {
                name: area.name.clone(),
                html: presentation::card_html(area),
            });
        }

        log::debug!("Rendered {} primitive(s)", self.primitives.len());
    }

    /// Looks up an area by name and returns the center-and-open action.
    ///
    /// Both map clicks and list-card clicks resolve through this lookup —
    /// identity by stable name, not by captured references, so re-renders
    /// can never serve a stale target.
    #[must_use]
    pub fn focus(&self, name: &str) -> Option<FocusAction> {
        let primitive = self.primitives.iter().find(|p| p.name() == name)?;
        match primitive {
            MapPrimitive::Polygon {
                name,
                ring,
                popup_html,
                ..
            } => Some(FocusAction {
                name: name.clone(),
                bounds: ring_bounds(ring)?,
                popup_html: popup_html.clone(),
            }),
            MapPrimitive::Marker {
                name,
                at,
                popup_html,
                ..
            } => Some(FocusAction {
                name: name.clone(),
                bounds: Bounds::from_point(*at),
                popup_html: popup_html.clone(),
            }),
        }
    }

    /// Currently rendered map primitives, in render order.
    #[must_use]
    pub fn primitives(&self) -> &[MapPrimitive] {
        &self.primitives
    }

    /// Currently rendered list cards, in render order.
    #[must_use]
    pub fn cards(&self) -> &[ListCard] {
        &self.cards
    }

    /// Whether nothing is currently rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.cards.is_empty()
    }
}
