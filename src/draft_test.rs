use std::time::{Duration, UNIX_EPOCH};

use super::*;
use crate::scene::{Scene, Shape};

#[test]
fn new_draft_is_empty_without_layer() {
    let draft = DraftSession::new();
    assert!(draft.is_empty());
    assert!(draft.layer().is_none());
    assert_eq!(draft.length_m(), 0.0);
}

#[test]
fn first_point_creates_layer_lazily() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    draft.record_point(&mut scene, Point::new(1.0, 2.0));

    let layer = draft.layer().unwrap();
    assert!(scene.has_group(layer.layer));
    assert_eq!(scene.group_count(), 1);
}

#[test]
fn later_points_reuse_layer() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    draft.record_point(&mut scene, Point::new(1.0, 2.0));
    let layer = draft.layer();
    draft.record_point(&mut scene, Point::new(3.0, 4.0));
    draft.record_point(&mut scene, Point::new(5.0, 6.0));

    assert_eq!(draft.layer(), layer);
    assert_eq!(scene.group_count(), 1);
    let group = scene.group(layer.unwrap().layer).unwrap();
    let pins = group.shapes.iter().filter(|placed| matches!(placed.shape, Shape::Pin { .. })).count();
    assert_eq!(pins, 3);
}

#[test]
fn points_keep_call_order() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    let expected: Vec<Point> = (0..5).map(|i| Point::new(f64::from(i), f64::from(-i))).collect();
    for point in &expected {
        draft.record_point(&mut scene, *point);
    }
    assert_eq!(draft.len(), 5);
    assert_eq!(draft.points(), expected);
}

#[test]
fn capture_time_stays_local() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    let at = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    draft.record_point_at(&mut scene, Point::new(1.0, 2.0), at);

    assert_eq!(draft.captured()[0].captured_at, at);
    let body = serde_json::to_value(crate::model::LogPointsRequest { points: draft.points() }).unwrap();
    assert_eq!(body, serde_json::json!({"points": [{"latitude": 1.0, "longitude": 2.0}]}));
}

#[test]
fn clear_resets_and_detaches() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    for i in 0..3 {
        draft.record_point(&mut scene, Point::new(f64::from(i), 0.0));
    }
    let layer = draft.layer().unwrap();

    draft.clear(&mut scene);
    assert_eq!(draft.len(), 0);
    assert!(draft.layer().is_none());
    assert!(!scene.has_group(layer.layer));

    draft.clear(&mut scene);
    assert!(draft.is_empty());
}

#[test]
fn record_after_clear_starts_new_layer() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    draft.record_point(&mut scene, Point::new(1.0, 1.0));
    let first = draft.layer().unwrap();
    draft.clear(&mut scene);
    draft.record_point(&mut scene, Point::new(2.0, 2.0));

    assert_ne!(draft.layer().unwrap(), first);
    assert_eq!(draft.len(), 1);
}

#[test]
fn length_uses_geodesic_distance() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    draft.record_point(&mut scene, Point::new(0.0, 0.0));
    draft.record_point(&mut scene, Point::new(0.0, 1.0));
    assert!((draft.length_m() - 111_319.5).abs() < 1.0);
}

#[test]
fn drop_submitted_keeps_later_points_and_redraws() {
    let mut scene = Scene::default();
    let mut draft = DraftSession::new();
    for i in 0..3 {
        draft.record_point(&mut scene, Point::new(f64::from(i), 0.0));
    }
    let old = draft.layer().unwrap();
    let epoch = draft.epoch();

    draft.drop_submitted(&mut scene, 2);
    assert_eq!(draft.points(), vec![Point::new(2.0, 0.0)]);
    assert!(!scene.has_group(old.layer));
    let layer = draft.layer().unwrap();
    let pins = scene
        .group(layer.layer)
        .unwrap()
        .shapes
        .iter()
        .filter(|placed| matches!(placed.shape, Shape::Pin { .. }))
        .count();
    assert_eq!(pins, 1);
    assert_ne!(draft.epoch(), epoch);

    draft.drop_submitted(&mut scene, 5);
    assert!(draft.is_empty());
    assert!(draft.layer().is_none());
    assert_eq!(scene.group_count(), 0);
}
