//! Pinch-zoom state machine for the campus map.
//!
//! The controller cycles `Idle -> Active -> Idle` for the lifetime of the view.
//! A gesture captures the committed transform as its baseline, every update
//! recomputes the live transform from that baseline, and the end of the gesture
//! commits the live transform. A commit below [`SNAP_BACK_THRESHOLD`] snaps both
//! transforms back to identity.
//!
//! Updates must be fed in arrival order; the committed transform accumulates
//! across gestures.

use serde::{Deserialize, Serialize};

use super::animation::SnapBackAnimation;
use super::transform::{clamp_scale, Transform, MIN_SCALE};

/// Committed scales below this snap back to identity on release.
pub const SNAP_BACK_THRESHOLD: f64 = 1.1;

/// Discrete gesture input from the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    Start,
    /// `ratio` is current finger distance over distance at gesture start; the
    /// focal point is the midpoint between fingers in view coordinates.
    Update {
        ratio: f64,
        focal_x: f64,
        focal_y: f64,
    },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Active {
        baseline: Transform,
    },
}

/// What a gesture event did to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// A gesture began from the given baseline.
    Started(Transform),
    /// The live transform changed.
    Updated(Transform),
    /// The gesture ended and the live transform was kept.
    Committed(Transform),
    /// The gesture ended near scale 1 and everything reset to identity.
    SnappedBack(SnapBackAnimation),
    /// End without an active gesture.
    Ignored,
}

/// Pinch-zoom controller owning one view's transform.
///
/// ```
/// use ecocampus::gesture::{PinchZoomController, Transform};
///
/// let mut zoom = PinchZoomController::new();
/// zoom.on_gesture_start();
/// zoom.on_gesture_update(2.0, 100.0, 100.0);
/// assert_eq!(zoom.transform(), Transform::new(2.0, -100.0, -100.0));
///
/// zoom.on_gesture_end();
/// assert_eq!(zoom.committed(), Transform::new(2.0, -100.0, -100.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PinchZoomController {
    live: Transform,
    committed: Transform,
    phase: GesturePhase,
}

impl PinchZoomController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform to draw right now.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.live
    }

    /// Transform committed at the end of the previous gesture.
    #[must_use]
    pub fn committed(&self) -> Transform {
        self.committed
    }

    #[must_use]
    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.phase, GesturePhase::Active { .. })
    }

    /// Dispatches a discrete event to the matching handler.
    pub fn handle(&mut self, event: GestureEvent) -> GestureOutcome {
        match event {
            GestureEvent::Start => self.on_gesture_start(),
            GestureEvent::Update {
                ratio,
                focal_x,
                focal_y,
            } => self.on_gesture_update(ratio, focal_x, focal_y),
            GestureEvent::End => self.on_gesture_end(),
        }
    }

    /// Begins a gesture using the committed transform as baseline.
    ///
    /// A start while already active restarts from the committed transform.
    pub fn on_gesture_start(&mut self) -> GestureOutcome {
        let baseline = self.committed;
        self.phase = GesturePhase::Active { baseline };
        tracing::trace!(scale = baseline.scale, "Pinch gesture started");
        GestureOutcome::Started(baseline)
    }

    /// Applies one pinch update.
    ///
    /// Scale is `baseline.scale * ratio` clamped to the displayable range. While
    /// zoomed in, translation keeps the focal point fixed using the raw `ratio`,
    /// so at the clamp boundary the position keeps following the fingers even
    /// though the scale does not. At scale 1 translation is left as is.
    ///
    /// Non-finite inputs are replaced: ratio by `1`, focal coordinates by `0`.
    pub fn on_gesture_update(&mut self, ratio: f64, focal_x: f64, focal_y: f64) -> GestureOutcome {
        let baseline = match self.phase {
            GesturePhase::Active { baseline } => baseline,
            GesturePhase::Idle => {
                self.on_gesture_start();
                self.committed
            }
        };

        let ratio = finite_or(ratio, 1.0);
        let focal_x = finite_or(focal_x, 0.0);
        let focal_y = finite_or(focal_y, 0.0);

        self.live.scale = clamp_scale(baseline.scale * ratio);
        if self.live.scale > MIN_SCALE {
            self.live.translate_x = baseline.translate_x + focal_x - focal_x * ratio;
            self.live.translate_y = baseline.translate_y + focal_y - focal_y * ratio;
        }

        GestureOutcome::Updated(self.live)
    }

    /// Ends the gesture and commits the live transform.
    pub fn on_gesture_end(&mut self) -> GestureOutcome {
        if !self.is_active() {
            return GestureOutcome::Ignored;
        }
        self.phase = GesturePhase::Idle;
        self.committed = self.live;

        if self.committed.scale < SNAP_BACK_THRESHOLD {
            let released = self.live;
            self.live = Transform::IDENTITY;
            self.committed = Transform::IDENTITY;
            tracing::debug!(scale = released.scale, "Pinch released near 1x, snapping back");
            return GestureOutcome::SnappedBack(SnapBackAnimation::new(released));
        }

        tracing::debug!(
            scale = self.committed.scale,
            translate_x = self.committed.translate_x,
            translate_y = self.committed.translate_y,
            "Pinch committed"
        );
        GestureOutcome::Committed(self.committed)
    }

    /// Drops any gesture and returns to identity without animating.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinch(zoom: &mut PinchZoomController, ratio: f64, fx: f64, fy: f64) -> GestureOutcome {
        zoom.on_gesture_start();
        zoom.on_gesture_update(ratio, fx, fy);
        zoom.on_gesture_end()
    }

    #[test]
    fn starts_idle_at_identity() {
        let zoom = PinchZoomController::new();
        assert_eq!(zoom.phase(), GesturePhase::Idle);
        assert!(zoom.transform().is_identity());
        assert!(zoom.committed().is_identity());
    }

    #[test]
    fn zoom_in_recenters_on_focal_point() {
        let mut zoom = PinchZoomController::new();
        zoom.on_gesture_start();
        zoom.on_gesture_update(2.0, 100.0, 100.0);
        assert_eq!(zoom.transform(), Transform::new(2.0, -100.0, -100.0));
        assert!(zoom.committed().is_identity(), "commit only on end");
    }

    #[test]
    fn scale_is_clamped_but_translation_uses_raw_ratio() {
        let mut zoom = PinchZoomController::new();
        zoom.on_gesture_start();
        zoom.on_gesture_update(5.0, 10.0, 20.0);
        let t = zoom.transform();
        assert_eq!(t.scale, 3.0);
        assert_eq!(t.translate_x, 10.0 - 50.0);
        assert_eq!(t.translate_y, 20.0 - 100.0);
    }

    #[test]
    fn zoom_out_below_one_leaves_translation() {
        let mut zoom = PinchZoomController::new();
        pinch(&mut zoom, 2.0, 100.0, 100.0);
        zoom.on_gesture_start();
        zoom.on_gesture_update(0.25, 40.0, 40.0);
        let t = zoom.transform();
        assert_eq!(t.scale, 1.0);
        assert_eq!((t.translate_x, t.translate_y), (-100.0, -100.0));
    }

    #[test]
    fn release_near_one_snaps_back() {
        let mut zoom = PinchZoomController::new();
        let outcome = pinch(&mut zoom, 1.05, 50.0, 50.0);
        match outcome {
            GestureOutcome::SnappedBack(anim) => assert_eq!(anim.from.scale, 1.05),
            other => panic!("expected snap back, got {other:?}"),
        }
        assert!(zoom.transform().is_identity());
        assert!(zoom.committed().is_identity());
        assert_eq!(zoom.phase(), GesturePhase::Idle);
    }

    #[test]
    fn release_above_threshold_is_kept() {
        let mut zoom = PinchZoomController::new();
        zoom.on_gesture_start();
        zoom.on_gesture_update(1.5, 0.0, 0.0);
        let before = zoom.transform();
        assert_eq!(zoom.on_gesture_end(), GestureOutcome::Committed(before));
        assert_eq!(zoom.transform(), before);
        assert_eq!(zoom.committed(), before);
    }

    #[test]
    fn next_gesture_builds_on_committed_baseline() {
        let mut zoom = PinchZoomController::new();
        pinch(&mut zoom, 1.5, 0.0, 0.0);
        zoom.on_gesture_start();
        zoom.on_gesture_update(1.5, 0.0, 0.0);
        assert_eq!(zoom.transform().scale, 2.25);
    }

    #[test]
    fn non_finite_inputs_are_sanitized() {
        let mut zoom = PinchZoomController::new();
        zoom.on_gesture_start();
        zoom.on_gesture_update(f64::NAN, f64::INFINITY, 3.0);
        assert_eq!(zoom.transform(), Transform::IDENTITY);

        zoom.on_gesture_update(2.0, f64::NAN, 3.0);
        assert_eq!(zoom.transform(), Transform::new(2.0, 0.0, -3.0));
    }

    #[test]
    fn update_while_idle_starts_gesture_and_end_while_idle_is_ignored() {
        let mut zoom = PinchZoomController::new();
        assert_eq!(zoom.on_gesture_end(), GestureOutcome::Ignored);

        zoom.handle(GestureEvent::Update {
            ratio: 2.0,
            focal_x: 0.0,
            focal_y: 0.0,
        });
        assert!(zoom.is_active());
        assert!(matches!(zoom.handle(GestureEvent::End), GestureOutcome::Committed(_)));
    }

    #[test]
    fn scale_stays_in_range_for_any_ratio() {
        let mut zoom = PinchZoomController::new();
        zoom.on_gesture_start();
        for ratio in [-4.0, 0.0, 0.3, 1.0, 2.9, 3.1, 1e9] {
            zoom.on_gesture_update(ratio, 12.0, 7.0);
            let scale = zoom.transform().scale;
            assert!((1.0..=3.0).contains(&scale), "ratio {ratio} gave {scale}");
        }
    }
}
