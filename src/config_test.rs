use std::collections::HashMap;

use super::*;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_vars_defaults() {
    let cfg = Config::from_vars(vars(&[])).unwrap();
    assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.api.timeouts, ApiTimeouts::default());
    assert_eq!(cfg.map, BaseMap::default());
    assert!(cfg.map.tiles.access_token.is_none());
}

#[test]
fn from_vars_overrides() {
    let cfg = Config::from_vars(vars(&[
        ("TRACKMAP_BASE_URL", "https://tracks.example/"),
        ("TRACKMAP_REQUEST_TIMEOUT_SECS", "42"),
        ("TRACKMAP_CONNECT_TIMEOUT_SECS", " 7 "),
        ("TRACKMAP_MAP_CENTER", "52.5, 13.4"),
        ("TRACKMAP_MAP_ZOOM", "9"),
        ("TRACKMAP_TILE_ID", "mapbox.outdoors"),
        ("TRACKMAP_TILE_ACCESS_TOKEN", "pk.test"),
    ]))
    .unwrap();

    assert_eq!(cfg.api.base_url, "https://tracks.example");
    assert_eq!(cfg.api.timeouts, ApiTimeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.map.center, Point::new(52.5, 13.4));
    assert_eq!(cfg.map.zoom, 9);
    assert_eq!(cfg.map.tiles.id, "mapbox.outdoors");
    assert_eq!(cfg.map.tiles.access_token.as_deref(), Some("pk.test"));
    assert!(!cfg.map.double_click_zoom);
}

#[test]
fn empty_access_token_is_none() {
    let cfg = Config::from_vars(vars(&[("TRACKMAP_TILE_ACCESS_TOKEN", "")])).unwrap();
    assert!(cfg.map.tiles.access_token.is_none());
}

#[test]
fn malformed_timeout_errors() {
    let err = Config::from_vars(vars(&[("TRACKMAP_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "TRACKMAP_REQUEST_TIMEOUT_SECS", value: "soon".into() });
    assert!(err.to_string().contains("TRACKMAP_REQUEST_TIMEOUT_SECS"));
}

#[test]
fn malformed_center_errors() {
    assert!(Config::from_vars(vars(&[("TRACKMAP_MAP_CENTER", "48.3")])).is_err());
    assert!(Config::from_vars(vars(&[("TRACKMAP_MAP_CENTER", "95,10")])).is_err());
}

#[test]
fn zoom_above_tile_max_errors() {
    assert!(Config::from_vars(vars(&[("TRACKMAP_MAP_ZOOM", "19")])).is_err());
}

#[test]
fn parse_lat_lng_accepts_spaces() {
    assert_eq!(parse_lat_lng(" 1.5 , -2.5 "), Some(Point::new(1.5, -2.5)));
    assert_eq!(parse_lat_lng("a,b"), None);
}
