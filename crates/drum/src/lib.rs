//! Headless engine for a drag-rotated category drum.
//!
//! Categories sit on a virtual cylinder, one per [`SLOT_ANGLE`]. A vertical
//! drag turns the drum, release hands the remaining speed to an inertia
//! phase, and the drum finally eases onto the nearest slot. Hosts feed
//! pointer samples and frame ticks into a [`wheel::Wheel`] and draw whatever
//! [`layout::project`] returns.

pub mod categories;
pub mod inertia;
pub mod layout;
pub mod macros;
pub mod snap;
pub mod tracker;
pub mod wheel;

use serde::Deserialize;

pub const SLOT_ANGLE: f64 = 30.0;
pub const SENSITIVITY: f64 = 0.2; // degrees per pixel of drag
pub const MOVE_THRESHOLD: f64 = 2.0; // px before a press counts as a drag
pub const FRICTION: f64 = 0.95; // per frame, not time-compensated
pub const INERTIA_STEP_SCALE: f64 = 10.0;
pub const VELOCITY_EPSILON: f64 = 0.01;
pub const SNAP_DURATION_MS: f64 = 300.0;
pub const OVERSCAN_ANGLE: f64 = 100.0;
pub const VISIBLE_ANGLE: f64 = 90.0;
pub const CYLINDER_RADIUS: f64 = 120.0;

/// Behavioural knobs a host may override. Geometry stays fixed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub sensitivity: f64,
    pub friction: f64,
    pub snap_duration_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            sensitivity: SENSITIVITY,
            friction: FRICTION,
            snap_duration_ms: SNAP_DURATION_MS,
        }
    }
}

impl Tuning {
    /// Replaces values that would stall or blow up the animation with the
    /// defaults.
    pub fn validated(self) -> Self {
        let defaults = Self::default();

        let sensitivity = if self.sensitivity.is_finite() {
            self.sensitivity
        } else {
            log::warn!("Ignoring non-finite sensitivity {}", self.sensitivity);
            defaults.sensitivity
        };

        // friction >= 1 never decays below the threshold
        let friction = if self.friction.is_finite() && (0.0..1.0).contains(&self.friction) {
            self.friction
        } else {
            log::warn!("Friction {} outside [0, 1), using {}", self.friction, FRICTION);
            defaults.friction
        };

        let snap_duration_ms = if self.snap_duration_ms.is_finite() && self.snap_duration_ms >= 0.0
        {
            self.snap_duration_ms
        } else {
            log::warn!(
                "Invalid snap duration {}ms, using {}ms",
                self.snap_duration_ms,
                SNAP_DURATION_MS
            );
            defaults.snap_duration_ms
        };

        Self {
            sensitivity,
            friction,
            snap_duration_ms,
        }
    }
}
