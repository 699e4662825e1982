//! Timed snap-back to the identity transform.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Duration of the snap-back.
pub const SNAP_BACK_DURATION: Duration = Duration::from_millis(300);

/// Quadratic ease-in-out over `t` in `0..=1`.
#[must_use]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Animation from the released transform back to [`Transform::IDENTITY`].
///
/// The controller's state is already at identity when one of these is produced;
/// the animation only tells a renderer what to draw in between.
///
/// ```
/// use std::time::Duration;
/// use ecocampus::gesture::{SnapBackAnimation, Transform};
///
/// let anim = SnapBackAnimation::new(Transform::new(1.05, -4.0, 2.0));
/// assert_eq!(anim.sample(Duration::ZERO), Transform::new(1.05, -4.0, 2.0));
/// assert_eq!(anim.sample(Duration::from_secs(1)), Transform::IDENTITY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapBackAnimation {
    pub from: Transform,
    pub duration: Duration,
}

impl SnapBackAnimation {
    #[must_use]
    pub fn new(from: Transform) -> Self {
        Self {
            from,
            duration: SNAP_BACK_DURATION,
        }
    }

    /// Transform to display `elapsed` after the release.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> Transform {
        if self.is_finished(elapsed) {
            return Transform::IDENTITY;
        }
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from
            .lerp(&Transform::IDENTITY, ease_in_out_quad(progress))
    }

    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.duration.is_zero() || elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        assert_eq!(ease_in_out_quad(-3.0), 0.0);
        assert_eq!(ease_in_out_quad(7.0), 1.0);
    }

    #[test]
    fn easing_is_monotonic() {
        let samples: Vec<f64> = (0..=20).map(|i| ease_in_out_quad(f64::from(i) / 20.0)).collect();
        assert!(samples.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn sample_halfway_is_between() {
        let anim = SnapBackAnimation::new(Transform::new(1.08, -10.0, 6.0));
        let mid = anim.sample(Duration::from_millis(150));
        assert!(mid.scale < 1.08 && mid.scale > 1.0);
        assert!(mid.translate_x > -10.0 && mid.translate_x < 0.0);
        assert!(!anim.is_finished(Duration::from_millis(150)));
        assert!(anim.is_finished(SNAP_BACK_DURATION));
    }
}
