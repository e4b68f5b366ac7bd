//! Map capability surface and its retained in-memory implementation.
//!
//! [`MapSurface`] is everything the rest of the crate needs from a mapping
//! library: layer groups, circle/pin markers, polylines, lazy popups and
//! viewport fitting. A browser shell implements it over its map widget.
//! [`Scene`] implements it as plain data so the CLI can export it as GeoJSON
//! and the tests can inspect exactly what was drawn.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::geo::Bounds;
use crate::model::{Point, UserId};
use crate::popup::PopupOpened;

pub const DEFAULT_TILE_URL: &str = "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
pub const DEFAULT_TILE_ID: &str = "mapbox.streets";
pub const DEFAULT_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, \
     <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";
pub const DEFAULT_MAX_ZOOM: u8 = 18;
pub const DEFAULT_CENTER: Point = Point { latitude: 48.333_889, longitude: 10.898_333 };
pub const DEFAULT_ZOOM: u8 = 13;

// =============================================================================
// HANDLES & SHAPES
// =============================================================================

/// Opaque handle to a layer group placed on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId(u64);

/// Handle to a single shape inside a layer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ShapeId(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_opacity: f64,
    pub weight: f64,
    pub color: String,
}

/// Polyline styling. `color: None` leaves the surface's default stroke.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathStyle {
    pub weight: Option<f64>,
    pub color: Option<String>,
}

/// A drawable element inside a layer group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Styled circle, used for stored track points.
    CircleMarker { at: Point, style: MarkerStyle },
    /// Default pin marker, used for draft points.
    Pin { at: Point },
    /// Connected path through `points` in order.
    Polyline { points: Vec<Point>, style: PathStyle },
}

impl Shape {
    fn kind(&self) -> &'static str {
        match self {
            Self::CircleMarker { .. } => "circle_marker",
            Self::Pin { .. } => "pin",
            Self::Polyline { .. } => "polyline",
        }
    }
}

// =============================================================================
// SURFACE TRAIT
// =============================================================================

/// Capability surface of the underlying map.
///
/// Calls naming a layer or shape that is not on the map are no-ops and
/// report `false`/`None`.
pub trait MapSurface {
    /// Create an empty layer group and attach it to the map.
    fn add_group(&mut self) -> LayerId;

    /// Detach a layer group and everything in it.
    fn remove_group(&mut self, layer: LayerId) -> bool;

    fn has_group(&self, layer: LayerId) -> bool;

    fn add_shape(&mut self, layer: LayerId, shape: Shape) -> Option<ShapeId>;

    /// Append one vertex to an existing polyline.
    fn extend_polyline(&mut self, layer: LayerId, shape: ShapeId, at: Point) -> bool;

    /// Attach an empty popup that reports `user_id` when opened.
    fn bind_popup(&mut self, layer: LayerId, shape: ShapeId, user_id: UserId) -> bool;

    fn set_popup_content(&mut self, layer: LayerId, shape: ShapeId, content: String) -> bool;

    /// Move the viewport so `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: Bounds);
}

// =============================================================================
// BASE MAP
// =============================================================================

/// Raster tile source for the base map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    pub id: String,
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_TILE_URL.to_owned(),
            attribution: DEFAULT_ATTRIBUTION.to_owned(),
            max_zoom: DEFAULT_MAX_ZOOM,
            id: DEFAULT_TILE_ID.to_owned(),
            access_token: None,
        }
    }
}

impl TileLayer {
    /// Resolve the URL template for one tile.
    #[must_use]
    pub fn tile_url(&self, zoom: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
            .replace("{id}", &self.id)
            .replace("{accessToken}", self.access_token.as_deref().unwrap_or_default())
    }

    /// Web-Mercator tile containing `point`. Zoom is clamped to `max_zoom`.
    #[must_use]
    pub fn tile_for(&self, point: Point, zoom: u8) -> (u8, u32, u32) {
        let zoom = zoom.min(self.max_zoom);
        let n = 2_f64.powi(i32::from(zoom));
        let lat = point.latitude.clamp(-85.051_128, 85.051_128).to_radians();
        let x = (point.longitude + 180.0) / 360.0 * n;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * n;
        let max_index = n - 1.0;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamp = |v: f64| v.floor().clamp(0.0, max_index) as u32;
        (zoom, clamp(x), clamp(y))
    }
}

/// Initial map view and tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseMap {
    pub center: Point,
    pub zoom: u8,
    /// Double-click is reserved for draft authoring.
    pub double_click_zoom: bool,
    pub tiles: TileLayer,
}

impl Default for BaseMap {
    fn default() -> Self {
        Self { center: DEFAULT_CENTER, zoom: DEFAULT_ZOOM, double_click_zoom: false, tiles: TileLayer::default() }
    }
}

// =============================================================================
// SCENE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub user_id: UserId,
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedShape {
    pub id: ShapeId,
    pub shape: Shape,
    pub popup: Option<Popup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerGroup {
    pub shapes: Vec<PlacedShape>,
}

impl LayerGroup {
    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut PlacedShape> {
        self.shapes.iter_mut().find(|placed| placed.id == id)
    }
}

/// Current camera of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Viewport {
    Centered { center: Point, zoom: u8 },
    Fitted { bounds: Bounds },
}

/// Retained map model implementing [`MapSurface`].
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    base: BaseMap,
    groups: BTreeMap<LayerId, LayerGroup>,
    viewport: Viewport,
    #[serde(skip)]
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(BaseMap::default())
    }
}

impl Scene {
    #[must_use]
    pub fn new(base: BaseMap) -> Self {
        let viewport = Viewport::Centered { center: base.center, zoom: base.zoom };
        Self { base, groups: BTreeMap::new(), viewport, next_id: 1 }
    }

    #[must_use]
    pub fn base(&self) -> &BaseMap {
        &self.base
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn group(&self, layer: LayerId) -> Option<&LayerGroup> {
        self.groups.get(&layer)
    }

    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> impl Iterator<Item = (LayerId, &LayerGroup)> {
        self.groups.iter().map(|(id, group)| (*id, group))
    }

    /// Simulate the user opening the popup on a shape.
    ///
    /// Returns the event payload if the shape has a popup bound.
    #[must_use]
    pub fn open_popup(&self, layer: LayerId, shape: ShapeId) -> Option<PopupOpened> {
        let placed = self.groups.get(&layer)?.shapes.iter().find(|placed| placed.id == shape)?;
        let popup = placed.popup.as_ref()?;
        Some(PopupOpened { user_id: popup.user_id, layer, shape })
    }

    /// Export every layer as a GeoJSON `FeatureCollection`.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let mut features = Vec::new();
        for (layer, group) in &self.groups {
            for placed in &group.shapes {
                features.push(feature(*layer, placed));
            }
        }
        json!({ "type": "FeatureCollection", "features": features })
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn feature(layer: LayerId, placed: &PlacedShape) -> Value {
    let lng_lat = |p: &Point| json!([p.longitude, p.latitude]);
    let (geometry, color) = match &placed.shape {
        Shape::CircleMarker { at, style } => (json!({"type": "Point", "coordinates": lng_lat(at)}), Some(style.color.clone())),
        Shape::Pin { at } => (json!({"type": "Point", "coordinates": lng_lat(at)}), None),
        Shape::Polyline { points, style } => (
            json!({"type": "LineString", "coordinates": points.iter().map(lng_lat).collect::<Vec<_>>()}),
            style.color.clone(),
        ),
    };
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "layer": layer,
            "kind": placed.shape.kind(),
            "color": color,
            "user_id": placed.popup.as_ref().map(|popup| popup.user_id),
        },
    })
}

impl MapSurface for Scene {
    fn add_group(&mut self) -> LayerId {
        let layer = LayerId(self.next_id());
        self.groups.insert(layer, LayerGroup::default());
        layer
    }

    fn remove_group(&mut self, layer: LayerId) -> bool {
        self.groups.remove(&layer).is_some()
    }

    fn has_group(&self, layer: LayerId) -> bool {
        self.groups.contains_key(&layer)
    }

    fn add_shape(&mut self, layer: LayerId, shape: Shape) -> Option<ShapeId> {
        if !self.groups.contains_key(&layer) {
            return None;
        }
        let id = ShapeId(self.next_id());
        let group = self.groups.get_mut(&layer)?;
        group.shapes.push(PlacedShape { id, shape, popup: None });
        Some(id)
    }

    fn extend_polyline(&mut self, layer: LayerId, shape: ShapeId, at: Point) -> bool {
        let Some(placed) = self.groups.get_mut(&layer).and_then(|group| group.shape_mut(shape)) else {
            return false;
        };
        match &mut placed.shape {
            Shape::Polyline { points, .. } => {
                points.push(at);
                true
            }
            _ => false,
        }
    }

    fn bind_popup(&mut self, layer: LayerId, shape: ShapeId, user_id: UserId) -> bool {
        let Some(placed) = self.groups.get_mut(&layer).and_then(|group| group.shape_mut(shape)) else {
            return false;
        };
        placed.popup = Some(Popup { user_id, content: None });
        true
    }

    fn set_popup_content(&mut self, layer: LayerId, shape: ShapeId, content: String) -> bool {
        let Some(popup) = self
            .groups
            .get_mut(&layer)
            .and_then(|group| group.shape_mut(shape))
            .and_then(|placed| placed.popup.as_mut())
        else {
            return false;
        };
        popup.content = Some(content);
        true
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.viewport = Viewport::Fitted { bounds };
    }
}
