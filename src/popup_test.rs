use super::*;

#[test]
fn track_info_lists_user_points_and_length() {
    let summary = TrackSummary { num_points: 15, length: 12_345.0 };
    let html = track_info_html(4, &summary);
    assert!(html.starts_with("<h3>Track info</h3>"));
    assert!(html.contains("<tr><td>User ID:</td><td>4</td></tr>"));
    assert!(html.contains("<tr><td>Number of points:</td><td>15</td></tr>"));
    assert!(html.contains("<tr><td>Track length:</td><td>12.3 km</td></tr>"));
}

#[test]
fn track_info_rounds_to_one_decimal() {
    let html = track_info_html(1, &TrackSummary { num_points: 2, length: 49.0 });
    assert!(html.contains("0.0 km"));
    let html = track_info_html(1, &TrackSummary { num_points: 2, length: 1_960.0 });
    assert!(html.contains("2.0 km"));
}
