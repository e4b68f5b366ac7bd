use super::*;
use crate::color::color_of;
use crate::geo::Bounds;
use crate::scene::{Scene, Viewport};

fn track() -> Vec<Point> {
    vec![Point::new(48.33, 10.89), Point::new(48.34, 10.90), Point::new(48.35, 10.88)]
}

// =============================================================
// render_group
// =============================================================

#[test]
fn render_group_draws_marker_per_point_and_one_path() {
    let mut scene = Scene::default();
    let layer = render_group(&mut scene, 3, &track(), color_of(3, 7)).unwrap();

    let group = scene.group(layer).unwrap();
    assert_eq!(group.shapes.len(), 4);
    let markers = group
        .shapes
        .iter()
        .filter(|placed| matches!(placed.shape, Shape::CircleMarker { .. }))
        .count();
    assert_eq!(markers, 3);
    assert!(matches!(group.shapes[3].shape, Shape::Polyline { ref points, .. } if points.len() == 3));
}

#[test]
fn render_group_styles_with_user_color() {
    let mut scene = Scene::default();
    let color = color_of(3, 7);
    let layer = render_group(&mut scene, 3, &track(), color).unwrap();

    for placed in &scene.group(layer).unwrap().shapes {
        match &placed.shape {
            Shape::CircleMarker { style, .. } => {
                assert_eq!(style.color, color.css());
                assert_eq!(style.radius, 5.0);
                assert_eq!(style.fill_opacity, 0.5);
                assert_eq!(style.weight, 2.0);
            }
            Shape::Polyline { style, .. } => {
                assert_eq!(style.color.as_deref(), Some(color.css().as_str()));
                assert_eq!(style.weight, Some(2.0));
            }
            Shape::Pin { .. } => panic!("tracks do not use pins"),
        }
    }
}

#[test]
fn render_group_binds_popups_for_user() {
    let mut scene = Scene::default();
    let layer = render_group(&mut scene, 9, &track(), color_of(9, 9)).unwrap();
    let group = scene.group(layer).unwrap();
    assert!(group.shapes.iter().all(|placed| placed.popup.as_ref().map(|p| p.user_id) == Some(9)));
}

#[test]
fn render_group_fits_viewport_to_track() {
    let mut scene = Scene::default();
    render_group(&mut scene, 1, &track(), color_of(1, 1));
    assert_eq!(scene.viewport(), Viewport::Fitted { bounds: Bounds::from_points(&track()).unwrap() });
}

#[test]
fn render_group_empty_is_noop() {
    let mut scene = Scene::default();
    let before = scene.viewport();
    assert!(render_group(&mut scene, 1, &[], color_of(1, 1)).is_none());
    assert_eq!(scene.group_count(), 0);
    assert_eq!(scene.viewport(), before);
}

#[test]
fn remove_group_detaches_layer() {
    let mut scene = Scene::default();
    let layer = render_group(&mut scene, 1, &track(), color_of(1, 1)).unwrap();
    assert!(remove_group(&mut scene, layer));
    assert!(scene.group(layer).is_none());
    assert!(!remove_group(&mut scene, layer));
}

// =============================================================
// Draft layer
// =============================================================

#[test]
fn draft_layer_starts_with_empty_path() {
    let mut scene = Scene::default();
    let draft = start_draft_layer(&mut scene).unwrap();
    let group = scene.group(draft.layer).unwrap();
    assert_eq!(group.shapes.len(), 1);
    assert_eq!(group.shapes[0].shape, Shape::Polyline { points: vec![], style: PathStyle::default() });
}

#[test]
fn add_draft_point_adds_pin_and_extends_path() {
    let mut scene = Scene::default();
    let draft = start_draft_layer(&mut scene).unwrap();
    add_draft_point(&mut scene, draft, Point::new(1.0, 2.0));
    add_draft_point(&mut scene, draft, Point::new(3.0, 4.0));

    let group = scene.group(draft.layer).unwrap();
    let pins = group.shapes.iter().filter(|placed| matches!(placed.shape, Shape::Pin { .. })).count();
    assert_eq!(pins, 2);
    assert_eq!(
        group.shapes[0].shape,
        Shape::Polyline { points: vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)], style: PathStyle::default() }
    );
}
