use crate::Tuning;
use crate::categories::{Categories, Category};
use crate::inertia::{Inertia, InertiaStep};
use crate::layout::{self, VisibleItem};
use crate::snap::{self, SnapAnimation, SnapIntent};
use crate::tracker::{CaptureGuard, DragSession, PointerKind, PointerSample};
use strum::IntoStaticStr;

/// What the host should do with its frame callback after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameRequest {
    /// Leave the callback as it is.
    #[default]
    Keep,
    /// Make sure a frame callback is installed.
    Schedule,
    /// Remove the frame callback now.
    Cancel,
    /// Remove the current callback, then install a fresh one.
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WheelAction {
    pub should_redraw: bool,
    pub frame: FrameRequest,
    /// Newly landed category, set only when it differs from the selection.
    pub changed: Option<Category>,
}

impl WheelAction {
    fn none() -> Self {
        Self::default()
    }

    fn redraw(frame: FrameRequest) -> Self {
        Self {
            should_redraw: true,
            frame,
            changed: None,
        }
    }
}

#[derive(Debug, IntoStaticStr)]
pub enum Phase {
    Idle,
    Dragging(DragSession),
    Settling(Inertia),
    Snapping(SnapAnimation),
}

/// The drum and its animation context. Every rotation change goes through
/// one of the operations below.
#[derive(Debug)]
pub struct Wheel {
    categories: Categories,
    selected: Option<Category>,
    tuning: Tuning,
    rotation: f64,
    phase: Phase,
    // set by a drag that travelled past the threshold, cleared by the next press
    last_drag_moved: bool,
}

impl Wheel {
    pub fn new(categories: Categories, selected: Option<Category>, tuning: Tuning) -> Self {
        Self {
            categories,
            selected,
            tuning: tuning.validated(),
            rotation: 0.0,
            phase: Phase::Idle,
            last_drag_moved: false,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn selected(&self) -> Option<&Category> {
        self.selected.as_ref()
    }

    /// Whether the last completed press travelled far enough to count as a
    /// drag rather than a tap.
    pub fn last_drag_moved(&self) -> bool {
        self.last_drag_moved
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Settling(_) | Phase::Snapping(_))
    }

    pub fn items(&self) -> Vec<VisibleItem> {
        layout::project(self.rotation, &self.categories)
    }

    /// Updates the selection the drum compares against. The drum is not
    /// moved to show it: a selection changed from outside only affects
    /// whether the next landing counts as a change.
    pub fn set_selected(&mut self, selected: Option<Category>) {
        if let Some(category) = &selected {
            let resting = snap::slot_index(self.rotation, self.categories.len())
                .and_then(|i| self.categories.get(i));
            if resting != Some(category) {
                log::debug!(
                    "Selection '{}' set externally; drum stays on {:?}",
                    category,
                    resting.map(Category::as_str)
                );
            }
        }
        self.selected = selected;
    }

    fn enter(&mut self, phase: Phase) {
        let from: &'static str = (&self.phase).into();
        let to: &'static str = (&phase).into();
        if from != to {
            log::trace!("{} -> {}", from, to);
        }
        self.phase = phase;
    }

    pub fn pointer_down(
        &mut self,
        kind: PointerKind,
        sample: PointerSample,
        capture: CaptureGuard,
    ) -> WheelAction {
        if !sample.is_finite() {
            return WheelAction::none();
        }
        let interrupted = self.is_animating();
        self.last_drag_moved = false;

        // replacing the phase drops any previous session and its capture
        self.enter(Phase::Dragging(DragSession::begin(
            kind,
            sample,
            self.rotation,
            capture,
        )));

        WheelAction {
            should_redraw: false,
            frame: if interrupted {
                FrameRequest::Cancel
            } else {
                FrameRequest::Keep
            },
            changed: None,
        }
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> WheelAction {
        let Phase::Dragging(session) = &mut self.phase else {
            return WheelAction::none();
        };

        let rotation = session.update(sample, self.tuning.sensitivity);
        let changed = rotation != self.rotation;
        self.rotation = rotation;

        WheelAction {
            should_redraw: changed,
            ..WheelAction::none()
        }
    }

    pub fn pointer_up(&mut self) -> WheelAction {
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return WheelAction::none();
            }
        };

        let release = session.finish();
        self.last_drag_moved = release.moved;

        if release.moved {
            self.enter(Phase::Settling(Inertia::new(release.velocity)));
            WheelAction::redraw(FrameRequest::Schedule)
        } else {
            log::trace!("Dragging -> Idle (tap)");
            WheelAction::none()
        }
    }

    /// Centres the item at `virtual_index`. Ignored while a drag is live or
    /// when the press that produced this click was a drag.
    pub fn click(&mut self, virtual_index: i64, now_ms: f64) -> WheelAction {
        if self.last_drag_moved || self.is_dragging() || self.categories.is_empty() {
            return WheelAction::none();
        }

        let interrupted = self.is_animating();
        self.enter(Phase::Snapping(SnapAnimation::center(
            self.rotation,
            virtual_index,
            now_ms,
            self.tuning.snap_duration_ms,
        )));

        // a fresh chain replaces whatever was running
        WheelAction::redraw(if interrupted {
            FrameRequest::Restart
        } else {
            FrameRequest::Schedule
        })
    }

    /// Advances the running animation by one frame.
    pub fn tick(&mut self, now_ms: f64) -> WheelAction {
        match &mut self.phase {
            Phase::Settling(inertia) => {
                match inertia.step(&mut self.rotation, self.tuning.friction) {
                    InertiaStep::Continue => WheelAction::redraw(FrameRequest::Keep),
                    InertiaStep::Settled => {
                        let anim = SnapAnimation::settle(
                            self.rotation,
                            now_ms,
                            self.tuning.snap_duration_ms,
                        );
                        self.enter(Phase::Snapping(anim));
                        WheelAction::redraw(FrameRequest::Keep)
                    }
                }
            }
            Phase::Snapping(anim) => {
                let anim = *anim;
                let sample = anim.sample(now_ms);
                self.rotation = sample.rotation;

                if !sample.done {
                    return WheelAction::redraw(FrameRequest::Keep);
                }

                self.enter(Phase::Idle);
                WheelAction {
                    should_redraw: true,
                    frame: FrameRequest::Cancel,
                    changed: self.land(anim),
                }
            }
            Phase::Idle | Phase::Dragging(_) => WheelAction {
                frame: FrameRequest::Cancel,
                ..WheelAction::none()
            },
        }
    }

    fn land(&self, anim: SnapAnimation) -> Option<Category> {
        let changed = match anim.intent {
            SnapIntent::Settle => {
                snap::resolve_change(&self.categories, anim.target(), self.selected.as_ref())
            }
            SnapIntent::Center { virtual_index } => self
                .categories
                .wrapped(virtual_index)
                .filter(|&c| self.selected.as_ref() != Some(c))
                .cloned(),
        };

        if let Some(category) = &changed {
            log::info!("Landed on '{}'", category);
        }
        changed
    }

    /// Drops any drag session (releasing its capture) and any animation.
    pub fn cancel(&mut self) -> WheelAction {
        let was_busy = !matches!(self.phase, Phase::Idle);
        self.enter(Phase::Idle);
        WheelAction {
            should_redraw: false,
            frame: if was_busy {
                FrameRequest::Cancel
            } else {
                FrameRequest::Keep
            },
            changed: None,
        }
    }
}
