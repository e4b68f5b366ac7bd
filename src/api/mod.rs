//! Position-log REST API: the five round trips the map needs.
//!
//! DESIGN
//! ======
//! [`TrackApi`] is the seam between the sync controller and the network.
//! [`http::HttpTrackApi`] talks to a running service with `reqwest`;
//! [`memory::MemoryTrackApi`] keeps the same contract in process.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-success statuses are distinct variants so
//! callers can tell "service unreachable" from "user does not exist".
//! Nothing here retries.

pub mod http;
pub mod memory;

pub use http::HttpTrackApi;
pub use memory::MemoryTrackApi;

use crate::model::{Point, TrackSummary, UserId};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by [`TrackApi`] operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (connect, timeout, body read).
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    pub const NOT_FOUND: u16 = 404;

    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::Status { status: Self::NOT_FOUND, body: what.into() }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: Self::NOT_FOUND, .. })
    }

    /// Whether the failure happened below HTTP (no status was received).
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Request(_))
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Client for the position-log service.
#[async_trait::async_trait]
pub trait TrackApi: Send + Sync {
    /// `GET /users`
    async fn list_users(&self) -> Result<Vec<UserId>, ApiError>;

    /// `DELETE /users/{id}`
    async fn delete_user(&self, user_id: UserId) -> Result<(), ApiError>;

    /// `POST /users/{id}/points`. Creates the user if it does not exist.
    async fn create_points(&self, user_id: UserId, points: &[Point]) -> Result<(), ApiError>;

    /// `GET /users/{id}/points`
    async fn fetch_points(&self, user_id: UserId) -> Result<Vec<Point>, ApiError>;

    /// `GET /users/{id}/trackLength`
    async fn fetch_summary(&self, user_id: UserId) -> Result<TrackSummary, ApiError>;
}
