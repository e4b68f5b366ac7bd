//! Geodesy helpers: bounding boxes and track length.
//!
//! Distances are geodesics on the WGS-84 ellipsoid via [`geo::Geodesic`],
//! which stays accurate for nearly antipodal points.

#[cfg(test)]
#[path = "geo_test.rs"]
mod geo_test;

use ::geo::{BoundingRect, Distance, Geodesic, LineString};
use serde::Serialize;

use crate::model::Point;

// =============================================================================
// BOUNDS
// =============================================================================

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let line: LineString<f64> = points.iter().map(|point| (point.longitude, point.latitude)).collect();
        let rect = line.bounding_rect()?;
        Some(Self { south: rect.min().y, west: rect.min().x, north: rect.max().y, east: rect.max().x })
    }
}

// =============================================================================
// DISTANCE
// =============================================================================

fn to_geo(point: Point) -> ::geo::Point<f64> {
    ::geo::Point::new(point.longitude, point.latitude)
}

/// Ellipsoidal distance between two points in meters.
#[must_use]
pub fn distance_m(from: Point, to: Point) -> f64 {
    Geodesic.distance(to_geo(from), to_geo(to))
}

/// Length of the path through `points` in order, in meters.
#[must_use]
pub fn track_length_m(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| distance_m(pair[0], pair[1]))
        .sum()
}
