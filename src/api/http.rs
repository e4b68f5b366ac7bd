//! `reqwest` implementation of [`TrackApi`].
//!
//! Thin HTTP wrapper. Response bodies are read as text and parsed by the
//! pure `parse_*` helpers so the parsing is testable without a server.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{ApiError, TrackApi};
use crate::config::ApiConfig;
use crate::model::{LogPointsRequest, Point, TrackSummary, UserId};

pub struct HttpTrackApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTrackApi {
    /// Build a client for the service at `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not http(s) or the HTTP client
    /// cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.send(self.http.get(self.url(path))).await?;
        parse_json(&text)
    }
}

#[async_trait::async_trait]
impl TrackApi for HttpTrackApi {
    async fn list_users(&self) -> Result<Vec<UserId>, ApiError> {
        tracing::debug!("fetching users");
        self.get_json("/users").await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), ApiError> {
        tracing::debug!(user_id, "deleting user");
        self.send(self.http.delete(self.url(&format!("/users/{user_id}"))))
            .await?;
        Ok(())
    }

    async fn create_points(&self, user_id: UserId, points: &[Point]) -> Result<(), ApiError> {
        tracing::debug!(user_id, points = points.len(), "logging points");
        let body = LogPointsRequest { points: points.to_vec() };
        self.send(
            self.http
                .post(self.url(&format!("/users/{user_id}/points")))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn fetch_points(&self, user_id: UserId) -> Result<Vec<Point>, ApiError> {
        tracing::debug!(user_id, "fetching points");
        self.get_json(&format!("/users/{user_id}/points")).await
    }

    async fn fetch_summary(&self, user_id: UserId) -> Result<TrackSummary, ApiError> {
        tracing::debug!(user_id, "fetching track length");
        self.get_json(&format!("/users/{user_id}/trackLength"))
            .await
    }
}

// =============================================================================
// PARSING
// =============================================================================

pub(crate) fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let has_host = trimmed
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty());
    if !has_scheme || !has_host {
        return Err(ApiError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
