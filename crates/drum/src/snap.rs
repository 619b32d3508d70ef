//! Settling onto a slot: target selection, cubic ease-out tween, and
//! resolution of the landed category.

use crate::SLOT_ANGLE;
use crate::categories::{Categories, Category, wrap_index};

/// Rounds to the nearest integer with ties going towards positive
/// infinity, so `-0.5` lands on `0` rather than `-1`.
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Nearest whole slot to `rotation`.
pub fn nearest_slot(rotation: f64) -> f64 {
    let slot = round_half_up(rotation / SLOT_ANGLE) * SLOT_ANGLE;
    // rounding up next to f64::MAX can overflow
    if slot.is_finite() { slot } else { rotation }
}

/// Rotation that puts `virtual_index` dead centre.
pub fn centering_rotation(virtual_index: i64) -> f64 {
    -(virtual_index as f64) * SLOT_ANGLE
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Category index under the centre line once the drum rests at `rotation`.
pub fn slot_index(rotation: f64, len: usize) -> Option<usize> {
    let raw = -round_half_up(rotation / SLOT_ANGLE);
    wrap_index(raw as i64, len)
}

/// The landed category, but only when it differs from `selected`.
pub fn resolve_change(
    categories: &Categories,
    rotation: f64,
    selected: Option<&Category>,
) -> Option<Category> {
    slot_index(rotation, categories.len())
        .and_then(|i| categories.get(i))
        .filter(|landed| selected != Some(*landed))
        .cloned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapIntent {
    /// Coasting ended; land on whatever slot is nearest.
    Settle,
    /// An item was clicked; bring it to the centre.
    Center { virtual_index: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapSample {
    pub rotation: f64,
    pub done: bool,
}

/// Time-based tween from the current rotation to a slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapAnimation {
    start: f64,
    target: f64,
    started_at_ms: f64,
    duration_ms: f64,
    pub intent: SnapIntent,
}

impl SnapAnimation {
    pub fn new(
        start: f64,
        target: f64,
        started_at_ms: f64,
        duration_ms: f64,
        intent: SnapIntent,
    ) -> Self {
        Self {
            start,
            target,
            started_at_ms,
            duration_ms,
            intent,
        }
    }

    pub fn settle(rotation: f64, now_ms: f64, duration_ms: f64) -> Self {
        Self::new(
            rotation,
            nearest_slot(rotation),
            now_ms,
            duration_ms,
            SnapIntent::Settle,
        )
    }

    pub fn center(rotation: f64, virtual_index: i64, now_ms: f64, duration_ms: f64) -> Self {
        Self::new(
            rotation,
            centering_rotation(virtual_index),
            now_ms,
            duration_ms,
            SnapIntent::Center { virtual_index },
        )
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn sample(&self, now_ms: f64) -> SnapSample {
        let progress = if self.duration_ms > 0.0 {
            ((now_ms - self.started_at_ms) / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            return SnapSample {
                rotation: self.target,
                done: true,
            };
        }

        let eased = ease_out_cubic(progress);
        SnapSample {
            rotation: self.start + (self.target - self.start) * eased,
            done: false,
        }
    }
}
