//! In-process position log implementing [`TrackApi`].
//!
//! Mirrors the service contract: users are listed in ascending order,
//! logging points appends to (and if needed creates) the user's track, and
//! every per-user read or delete on an unknown user is a 404.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{ApiError, TrackApi};
use crate::geo;
use crate::model::{Point, TrackSummary, UserId};

#[derive(Debug, Default)]
pub struct MemoryTrackApi {
    tracks: Mutex<BTreeMap<UserId, Vec<Point>>>,
}

impl MemoryTrackApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing tracks.
    #[must_use]
    pub fn with_tracks(tracks: impl IntoIterator<Item = (UserId, Vec<Point>)>) -> Self {
        Self { tracks: Mutex::new(tracks.into_iter().collect()) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<UserId, Vec<Point>>> {
        self.tracks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn track(&self, user_id: UserId) -> Result<Vec<Point>, ApiError> {
        self.lock()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait::async_trait]
impl TrackApi for MemoryTrackApi {
    async fn list_users(&self) -> Result<Vec<UserId>, ApiError> {
        Ok(self.lock().keys().copied().collect())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), ApiError> {
        self.lock()
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("user {user_id} not found")))
    }

    async fn create_points(&self, user_id: UserId, points: &[Point]) -> Result<(), ApiError> {
        self.lock()
            .entry(user_id)
            .or_default()
            .extend_from_slice(points);
        Ok(())
    }

    async fn fetch_points(&self, user_id: UserId) -> Result<Vec<Point>, ApiError> {
        self.track(user_id)
    }

    async fn fetch_summary(&self, user_id: UserId) -> Result<TrackSummary, ApiError> {
        let points = self.track(user_id)?;
        Ok(TrackSummary {
            num_points: u32::try_from(points.len()).unwrap_or(u32::MAX),
            length: geo::track_length_m(&points),
        })
    }
}
