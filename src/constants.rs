//! Sizing, color, and interaction constants for the slider.

use floem::peniko::Color;

/// Widget thickness across the direction of travel
pub const SLIDER_THICKNESS: f32 = 16.0;

/// Minimum widget length along the direction of travel
pub const MIN_LENGTH: f32 = 96.0;

/// Track thickness
pub const TRACK_THICKNESS: f64 = 4.0;

/// Thumb radius
pub const THUMB_RADIUS: f64 = 7.0;

/// Keyboard increment for continuous sliders, as a fraction of the range
pub const KEY_FRACTION: f64 = 0.01;

/// Identifier of the constraint that positions the thumb
pub const THUMB_PIN: &str = "slider.thumb.position";

pub const TRACK_COLOR: Color = Color::rgba8(0, 0, 0, 40);
pub const FILL_COLOR: Color = Color::rgb8(59, 130, 246);
pub const DISABLED_VEIL: Color = Color::rgba8(242, 242, 242, 150);
