//! Per-user display colors spread across the hue wheel.
//!
//! Colors are never cached: the wheel is rescaled whenever the largest known
//! user id changes, so a user's color may shift after a list refresh.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;

use crate::model::UserId;

/// Saturation and lightness shared by every user color, in percent.
const SATURATION_PCT: u8 = 50;
const LIGHTNESS_PCT: u8 = 50;

/// Hue used when there is no range to spread over (largest id is 0).
pub const FALLBACK_HUE: f64 = 0.0;

/// An HSL color with fixed saturation and lightness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    hue: f64,
}

impl Color {
    /// Hue in degrees, always in `[0, 360)`.
    #[must_use]
    pub fn hue(&self) -> f64 {
        self.hue
    }

    /// CSS color specifier, e.g. `hsl(120, 50%, 50%)`.
    #[must_use]
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {SATURATION_PCT}%, {LIGHTNESS_PCT}%)", self.hue)
    }
}

/// Map `user_id` linearly onto the hue wheel, scaled by the largest known id.
#[must_use]
pub fn color_of(user_id: UserId, max_user_id: UserId) -> Color {
    if max_user_id == 0 {
        return Color { hue: FALLBACK_HUE };
    }
    let hue = 360.0 / f64::from(max_user_id) * f64::from(user_id);
    Color { hue: hue.rem_euclid(360.0) }
}
