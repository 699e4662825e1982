//! Pinch-zoom gesture handling for the campus map.
//!
//! - [`transform`]: the scale/translation value and its bounds
//! - [`controller`]: the `Idle`/`Active` state machine
//! - [`animation`]: the snap-back played after a release near 1x

pub mod animation;
pub mod controller;
pub mod transform;

pub use animation::{ease_in_out_quad, SnapBackAnimation, SNAP_BACK_DURATION};
pub use controller::{
    GestureEvent, GestureOutcome, GesturePhase, PinchZoomController, SNAP_BACK_THRESHOLD,
};
pub use transform::{Transform, MAX_SCALE, MIN_SCALE};
