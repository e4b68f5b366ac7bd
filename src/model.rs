//! Wire and domain types shared by every layer.
//!
//! JSON shapes follow the position-log service. That service prints protobuf
//! JSON, which drops zero-valued fields, so numeric fields default to zero
//! when absent.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Identifier of a user, assigned by the position-log service.
pub type UserId = u32;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl Point {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A draft point with its client-side capture time. Only `point` goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedPoint {
    pub point: Point,
    pub captured_at: SystemTime,
}

/// Summary statistics returned by `GET /users/{id}/trackLength`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    #[serde(rename = "numPoints", default)]
    pub num_points: u32,
    /// Track length in meters.
    #[serde(default)]
    pub length: f64,
}

impl TrackSummary {
    #[must_use]
    pub fn length_km(&self) -> f64 {
        self.length / 1000.0
    }
}

/// Body of `POST /users/{id}/points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogPointsRequest {
    #[serde(default)]
    pub points: Vec<Point>,
}

/// Suggested identifier for the next user: one past the largest existing id.
#[must_use]
pub fn next_user_id(users: &[UserId]) -> UserId {
    users
        .iter()
        .max()
        .map_or(0, |max| max.saturating_add(1))
}
