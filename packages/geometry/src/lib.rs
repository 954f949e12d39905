#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Polygon ring validation and derived geometry.
//!
//! Sanitizes the raw coordinate arrays shipped in the upstream payloads
//! into valid rings of finite WGS84 coordinates, and derives centroids and
//! bounding boxes from them. Coordinates are accepted as given — no range
//! clamping or reprojection.

use flood_map_risk_models::LatLng;
use geo::BoundingRect;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while validating raw geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// Fewer than three valid points survived filtering; the ring cannot be
    /// drawn as a polygon and the caller must fall back to a point marker.
    #[error("ring has only {kept} valid points, need at least 3")]
    InsufficientPoints {
        /// Number of points that survived filtering.
        kept: usize,
    },
}

/// Minimum number of valid points for a drawable polygon ring.
const MIN_RING_POINTS: usize = 3;

/// Validates a raw coordinate array into a polygon ring.
///
/// Keeps only entries that are 2-element arrays of finite numbers, read as
/// `[lat, lng]`. Anything else — short arrays, strings, nulls, NaN or
/// infinite components — is dropped and logged, never fatal. Colinearity is
/// not checked; three valid points are enough.
///
/// # Errors
///
/// Returns [`GeometryError::InsufficientPoints`] when fewer than three
/// points survive filtering.
pub fn validate_ring(raw: &[serde_json::Value]) -> Result<Vec<LatLng>, GeometryError> {
    let ring: Vec<LatLng> = raw.iter().filter_map(parse_point).collect();

    let dropped = raw.len() - ring.len();
    if dropped > 0 {
        log::warn!("Dropped {dropped} invalid point(s) from a {}-point ring", raw.len());
    }

    if ring.len() < MIN_RING_POINTS {
        return Err(GeometryError::InsufficientPoints { kept: ring.len() });
    }

    Ok(ring)
}

/// Parses a single raw point, requiring a 2-element finite numeric pair.
#[must_use]
pub fn parse_point(value: &serde_json::Value) -> Option<LatLng> {
    let pair = value.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let lat = pair[0].as_f64()?;
    let lng = pair[1].as_f64()?;
    if lat.is_finite() && lng.is_finite() {
        Some(LatLng::new(lat, lng))
    } else {
        None
    }
}

/// Arithmetic-mean centroid of a validated ring.
///
/// Matches the upstream service's centroid derivation: the plain mean of
/// the ring's latitudes and longitudes, not an area-weighted centroid.
/// Returns `None` for an empty ring.
#[must_use]
pub fn ring_centroid(ring: &[LatLng]) -> Option<LatLng> {
    if ring.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = ring.len() as f64;
    let lat = ring.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = ring.iter().map(|p| p.lng).sum::<f64>() / n;
    Some(LatLng::new(lat, lng))
}

/// A south-west / north-east bounding box, the shape map clients expect
/// for `fitBounds`-style view framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl Bounds {
    /// Degenerate bounds covering a single point.
    #[must_use]
    pub const fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }
}

/// Bounding box of a validated ring.
///
/// Returns `None` for an empty ring.
#[must_use]
pub fn ring_bounds(ring: &[LatLng]) -> Option<Bounds> {
    let line: geo::LineString<f64> = ring
        .iter()
        .map(|p| geo::coord! { x: p.lng, y: p.lat })
        .collect();
    let rect = line.bounding_rect()?;
    Some(Bounds {
        south_west: LatLng::new(rect.min().y, rect.min().x),
        north_east: LatLng::new(rect.max().y, rect.max().x),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn output_never_longer_than_input_and_always_finite() {
        let raw = vec![
            json!([-8.05, -34.88]),
            json!("junk"),
            json!([f64::NAN, -34.88]),
            json!([-8.06]),
            json!([-8.07, -34.9]),
            json!(null),
            json!([-8.08, -34.91]),
        ];
        let ring = validate_ring(&raw).unwrap();
        assert!(ring.len() <= raw.len());
        assert_eq!(ring.len(), 3);
        assert!(ring.iter().all(|p| p.lat.is_finite() && p.lng.is_finite()));
    }

    #[test]
    fn two_valid_points_are_insufficient() {
        let raw = vec![json!([-8.05, -34.88]), json!([-8.06, -34.89])];
        assert_eq!(
            validate_ring(&raw),
            Err(GeometryError::InsufficientPoints { kept: 2 })
        );
    }

    #[test]
    fn three_colinear_points_are_accepted() {
        // No area-degeneracy check: a zero-area ring still validates.
        let raw = vec![
            json!([-8.0, -34.88]),
            json!([-8.1, -34.88]),
            json!([-8.2, -34.88]),
        ];
        assert_eq!(validate_ring(&raw).unwrap().len(), 3);
    }

    #[test]
    fn infinite_components_are_dropped() {
        // serde_json can't represent infinity as a number literal, but a
        // point can still be short or non-numeric.
        let raw = vec![
            json!(["-8.05", "-34.88"]),
            json!([-8.05, -34.88, 12.0]),
            json!([-8.06, -34.89]),
        ];
        assert_eq!(
            validate_ring(&raw),
            Err(GeometryError::InsufficientPoints { kept: 1 })
        );
    }

    #[test]
    fn centroid_is_mean_of_coordinates() {
        let ring = vec![
            LatLng::new(-8.0, -34.8),
            LatLng::new(-8.2, -34.8),
            LatLng::new(-8.2, -35.0),
            LatLng::new(-8.0, -35.0),
        ];
        let centroid = ring_centroid(&ring).unwrap();
        assert!((centroid.lat - -8.1).abs() < 1e-9);
        assert!((centroid.lng - -34.9).abs() < 1e-9);
    }

    #[test]
    fn bounds_cover_the_ring() {
        let ring = vec![
            LatLng::new(-8.0, -34.8),
            LatLng::new(-8.2, -34.95),
            LatLng::new(-8.1, -35.0),
        ];
        let bounds = ring_bounds(&ring).unwrap();
        assert!((bounds.south_west.lat - -8.2).abs() < 1e-9);
        assert!((bounds.south_west.lng - -35.0).abs() < 1e-9);
        assert!((bounds.north_east.lat - -8.0).abs() < 1e-9);
        assert!((bounds.north_east.lng - -34.8).abs() < 1e-9);
    }

    #[test]
    fn empty_ring_has_no_centroid_or_bounds() {
        assert!(ring_centroid(&[]).is_none());
        assert!(ring_bounds(&[]).is_none());
    }
}
