//! 2D transform applied to the zoomable map image.

use serde::{Deserialize, Serialize};

/// Smallest displayed scale.
pub const MIN_SCALE: f64 = 1.0;

/// Largest displayed scale.
pub const MAX_SCALE: f64 = 3.0;

/// Scale + translation of the map image.
///
/// `scale` stays within [`MIN_SCALE`]..=[`MAX_SCALE`] whenever it is produced by
/// the [`PinchZoomController`](super::PinchZoomController).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Transform {
    /// Unzoomed, uncentered transform `(1, 0, 0)`.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    #[must_use]
    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Linear interpolation towards `target`; `t` is clamped to `0..=1`.
    #[must_use]
    pub fn lerp(&self, target: &Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            scale: self.scale + (target.scale - self.scale) * t,
            translate_x: self.translate_x + (target.translate_x - self.translate_x) * t,
            translate_y: self.translate_y + (target.translate_y - self.translate_y) * t,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Clamps a scale into the displayable range.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}
