//! Rendering adapter: the only code that issues drawing calls.
//!
//! Stateless. Every function takes the surface explicitly and returns the
//! handles it created; callers own the handles.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::color::Color;
use crate::geo::Bounds;
use crate::model::{Point, UserId};
use crate::scene::{LayerId, MapSurface, MarkerStyle, PathStyle, Shape, ShapeId};

const TRACK_MARKER_RADIUS: f64 = 5.0;
const TRACK_MARKER_FILL_OPACITY: f64 = 0.5;
const TRACK_STROKE_WEIGHT: f64 = 2.0;

#[must_use]
pub fn track_marker_style(color: Color) -> MarkerStyle {
    MarkerStyle {
        radius: TRACK_MARKER_RADIUS,
        fill_opacity: TRACK_MARKER_FILL_OPACITY,
        weight: TRACK_STROKE_WEIGHT,
        color: color.css(),
    }
}

#[must_use]
pub fn track_path_style(color: Color) -> PathStyle {
    PathStyle { weight: Some(TRACK_STROKE_WEIGHT), color: Some(color.css()) }
}

// =============================================================================
// TRACKS
// =============================================================================

/// Draw a stored track: one circle marker per point plus the connecting
/// path, each with a lazy popup for `user_id`, then fit the viewport to the
/// path.
///
/// Returns `None` without touching the surface when `points` is empty.
pub fn render_group<S: MapSurface + ?Sized>(
    surface: &mut S,
    user_id: UserId,
    points: &[Point],
    color: Color,
) -> Option<LayerId> {
    let bounds = Bounds::from_points(points)?;
    let layer = surface.add_group();

    let marker_style = track_marker_style(color);
    for point in points {
        let shape = Shape::CircleMarker { at: *point, style: marker_style.clone() };
        if let Some(marker) = surface.add_shape(layer, shape) {
            bind_lazy_popup(surface, layer, marker, user_id);
        }
    }

    let path = Shape::Polyline { points: points.to_vec(), style: track_path_style(color) };
    if let Some(path) = surface.add_shape(layer, path) {
        bind_lazy_popup(surface, layer, path, user_id);
    }

    surface.fit_bounds(bounds);
    Some(layer)
}

/// Detach a previously rendered group. Removing an absent group is a no-op.
pub fn remove_group<S: MapSurface + ?Sized>(surface: &mut S, layer: LayerId) -> bool {
    surface.remove_group(layer)
}

/// Bind an empty popup whose open event carries `user_id`.
pub fn bind_lazy_popup<S: MapSurface + ?Sized>(surface: &mut S, layer: LayerId, shape: ShapeId, user_id: UserId) -> bool {
    surface.bind_popup(layer, shape, user_id)
}

// =============================================================================
// DRAFT
// =============================================================================

/// Handles for the draft's layer group and its growing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftLayer {
    pub layer: LayerId,
    pub path: ShapeId,
}

/// Create the draft group with an empty default-styled path.
///
/// Returns `None` if the surface refused the path.
pub fn start_draft_layer<S: MapSurface + ?Sized>(surface: &mut S) -> Option<DraftLayer> {
    let layer = surface.add_group();
    let path = Shape::Polyline { points: Vec::new(), style: PathStyle::default() };
    match surface.add_shape(layer, path) {
        Some(path) => Some(DraftLayer { layer, path }),
        None => {
            surface.remove_group(layer);
            None
        }
    }
}

/// Drop a pin at `at` and extend the draft path through it.
pub fn add_draft_point<S: MapSurface + ?Sized>(surface: &mut S, draft: DraftLayer, at: Point) {
    surface.add_shape(draft.layer, Shape::Pin { at });
    surface.extend_polyline(draft.layer, draft.path, at);
}
