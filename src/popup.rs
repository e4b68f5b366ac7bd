//! Lazy track-info popups.
//!
//! Popups are bound empty. When the user opens one, the surface emits a
//! [`PopupOpened`] payload; the sync controller fetches the track summary for
//! `user_id` and fills the content in with [`track_info_html`].

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

use crate::model::{TrackSummary, UserId};
use crate::scene::{LayerId, ShapeId};

/// Event payload for a popup being opened on a track shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupOpened {
    pub user_id: UserId,
    pub layer: LayerId,
    pub shape: ShapeId,
}

/// Popup body for a track: user id, point count and length in kilometers.
#[must_use]
pub fn track_info_html(user_id: UserId, summary: &TrackSummary) -> String {
    format!(
        "<h3>Track info</h3>\
         <table>\
         <tr><td>User ID:</td><td>{user_id}</td></tr>\
         <tr><td>Number of points:</td><td>{}</td></tr>\
         <tr><td>Track length:</td><td>{:.1} km</td></tr>\
         </table>",
        summary.num_points,
        summary.length_km(),
    )
}
