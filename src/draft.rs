//! The unsaved track being authored by double-clicking the map.
//!
//! There is one draft per controller. Its layer group is created on the
//! first point and reused until [`DraftSession::clear`].

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use std::time::SystemTime;

use crate::geo;
use crate::model::{CapturedPoint, Point};
use crate::render::{self, DraftLayer};
use crate::scene::MapSurface;

#[derive(Debug, Default)]
pub struct DraftSession {
    points: Vec<CapturedPoint>,
    layer: Option<DraftLayer>,
    /// Bumped by every [`DraftSession::clear`].
    epoch: u64,
}

impl DraftSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point captured now.
    pub fn record_point<S: MapSurface + ?Sized>(&mut self, surface: &mut S, at: Point) {
        self.record_point_at(surface, at, SystemTime::now());
    }

    /// Append a point with an explicit capture time.
    pub fn record_point_at<S: MapSurface + ?Sized>(&mut self, surface: &mut S, at: Point, captured_at: SystemTime) {
        if self.layer.is_none() {
            self.layer = render::start_draft_layer(surface);
        }
        if let Some(layer) = self.layer {
            render::add_draft_point(surface, layer, at);
        }
        self.points.push(CapturedPoint { point: at, captured_at });
        tracing::trace!(points = self.points.len(), "draft point recorded");
    }

    /// Detach the draft layer and forget every point. Idempotent.
    pub fn clear<S: MapSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(layer) = self.layer.take() {
            render::remove_group(surface, layer.layer);
        }
        self.points.clear();
        self.epoch += 1;
    }

    /// Forget the first `count` points, already saved, and redraw the rest.
    pub fn drop_submitted<S: MapSurface + ?Sized>(&mut self, surface: &mut S, count: usize) {
        if count >= self.points.len() {
            self.clear(surface);
            return;
        }
        let remaining = self.points.split_off(count);
        self.clear(surface);
        for captured in remaining {
            self.record_point_at(surface, captured.point, captured.captured_at);
        }
    }

    /// Changes whenever the draft is cleared, so a caller holding a prefix
    /// of the points can tell whether that prefix is still in place.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Coordinates in capture order, as sent to the service.
    #[must_use]
    pub fn points(&self) -> Vec<Point> {
        self.points.iter().map(|captured| captured.point).collect()
    }

    #[must_use]
    pub fn captured(&self) -> &[CapturedPoint] {
        &self.points
    }

    #[must_use]
    pub fn layer(&self) -> Option<DraftLayer> {
        self.layer
    }

    /// Geodesic length of the draft path in meters.
    #[must_use]
    pub fn length_m(&self) -> f64 {
        geo::track_length_m(&self.points())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
