use crate::MOVE_THRESHOLD;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub y: f64,
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(y: f64, time_ms: f64) -> Self {
        Self { y, time_ms }
    }

    pub fn is_finite(&self) -> bool {
        self.y.is_finite() && self.time_ms.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    /// Mouse drags keep tracking outside the widget, so they hold a capture
    /// for their lifetime. Touch sequences stay bound to the widget.
    pub fn needs_capture(self) -> bool {
        matches!(self, Self::Mouse)
    }
}

/// Host-side resource that keeps pointer events flowing to the drum while a
/// mouse drag is in progress.
pub trait PointerCapture {
    fn release(&mut self);
}

/// Releases its capture exactly once, when dropped.
pub struct CaptureGuard(Option<Box<dyn PointerCapture>>);

impl CaptureGuard {
    pub fn new(capture: Box<dyn PointerCapture>) -> Self {
        Self(Some(capture))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_held(&self) -> bool {
        self.0.is_some()
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(mut capture) = self.0.take() {
            capture.release();
        }
    }
}

impl std::fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CaptureGuard").field(&self.is_held()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragRelease {
    pub moved: bool,
    pub velocity: f64,
}

/// Anchors and velocity sampling for one press-drag-release sequence.
#[derive(Debug)]
pub struct DragSession {
    pub kind: PointerKind,
    start_y: f64,
    start_rotation: f64,
    rotation: f64,
    last: PointerSample,
    velocity: f64,
    moved: bool,
    _capture: CaptureGuard,
}

impl DragSession {
    pub fn begin(
        kind: PointerKind,
        sample: PointerSample,
        rotation: f64,
        capture: CaptureGuard,
    ) -> Self {
        Self {
            kind,
            start_y: sample.y,
            start_rotation: rotation,
            rotation,
            last: sample,
            velocity: 0.0,
            moved: false,
            _capture: capture,
        }
    }

    /// Returns the rotation implied by the pointer's offset from the start.
    pub fn update(&mut self, sample: PointerSample, sensitivity: f64) -> f64 {
        if !sample.is_finite() {
            return self.rotation;
        }

        let delta_y = sample.y - self.start_y;
        if delta_y.abs() > MOVE_THRESHOLD {
            self.moved = true;
        }

        let dt = sample.time_ms - self.last.time_ms;
        if dt > 0.0 {
            let velocity = (sample.y - self.last.y) / dt;
            if velocity.is_finite() {
                self.velocity = velocity;
            }
            self.last = sample;
        }

        let rotation = self.start_rotation + delta_y * sensitivity;
        if rotation.is_finite() {
            self.rotation = rotation;
        }
        self.rotation
    }

    pub fn moved(&self) -> bool {
        self.moved
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Ends the session; the capture guard is released here.
    pub fn finish(self) -> DragRelease {
        DragRelease {
            moved: self.moved,
            velocity: self.velocity,
        }
    }
}
