//! Configuration parsed from environment variables.
//!
//! Every variable is optional. Absent values take the defaults below;
//! present but malformed values are errors.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;

use crate::model::Point;
use crate::scene::{BaseMap, DEFAULT_CENTER, DEFAULT_TILE_ID, DEFAULT_TILE_URL, DEFAULT_ZOOM, TileLayer};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeouts: ApiTimeouts,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), timeouts: ApiTimeouts::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub api: ApiConfig,
    pub map: BaseMap,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// - `TRACKMAP_BASE_URL`: position-log service root (default `http://localhost:8080`)
    /// - `TRACKMAP_REQUEST_TIMEOUT_SECS`: default 30
    /// - `TRACKMAP_CONNECT_TIMEOUT_SECS`: default 10
    /// - `TRACKMAP_MAP_CENTER`: `lat,lng` (default `48.333889,10.898333`)
    /// - `TRACKMAP_MAP_ZOOM`: default 13
    /// - `TRACKMAP_TILE_URL`: tile URL template
    /// - `TRACKMAP_TILE_ID`: tile set id (default `mapbox.streets`)
    /// - `TRACKMAP_TILE_ACCESS_TOKEN`: optional
    ///
    /// # Errors
    ///
    /// Returns an error naming the first malformed variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with an explicit variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first malformed variable.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("TRACKMAP_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let timeouts = ApiTimeouts {
            request_secs: parse_var(&lookup, "TRACKMAP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_var(&lookup, "TRACKMAP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?,
        };

        let center = match lookup("TRACKMAP_MAP_CENTER") {
            Some(raw) => {
                parse_lat_lng(&raw).ok_or(ConfigError::Invalid { var: "TRACKMAP_MAP_CENTER", value: raw })?
            }
            None => DEFAULT_CENTER,
        };
        let tiles = TileLayer {
            url_template: lookup("TRACKMAP_TILE_URL").unwrap_or_else(|| DEFAULT_TILE_URL.to_owned()),
            id: lookup("TRACKMAP_TILE_ID").unwrap_or_else(|| DEFAULT_TILE_ID.to_owned()),
            access_token: lookup("TRACKMAP_TILE_ACCESS_TOKEN").filter(|token| !token.is_empty()),
            ..TileLayer::default()
        };
        let zoom: u8 = parse_var(&lookup, "TRACKMAP_MAP_ZOOM", DEFAULT_ZOOM)?;
        if zoom > tiles.max_zoom {
            return Err(ConfigError::Invalid { var: "TRACKMAP_MAP_ZOOM", value: zoom.to_string() });
        }

        Ok(Self {
            api: ApiConfig { base_url, timeouts },
            map: BaseMap { center, zoom, tiles, ..BaseMap::default() },
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

/// Parse `lat,lng` in degrees.
#[must_use]
pub fn parse_lat_lng(raw: &str) -> Option<Point> {
    let (lat, lng) = raw.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lng.trim().parse().ok()?;
    let in_range = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
    in_range.then(|| Point::new(latitude, longitude))
}
