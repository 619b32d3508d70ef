use crate::{INERTIA_STEP_SCALE, VELOCITY_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InertiaStep {
    Continue,
    Settled,
}

/// Post-release coasting. One [`Inertia::step`] per animation frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia {
    velocity: f64,
}

impl Inertia {
    pub fn new(velocity: f64) -> Self {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        Self { velocity }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Decays the velocity and advances `rotation`, or reports that motion
    /// has died out. The decay is per frame, so the effective deceleration
    /// follows the display refresh rate.
    pub fn step(&mut self, rotation: &mut f64, friction: f64) -> InertiaStep {
        if self.velocity.abs() <= VELOCITY_EPSILON {
            return InertiaStep::Settled;
        }
        let velocity = self.velocity * friction;
        let next = *rotation + velocity * INERTIA_STEP_SCALE;
        if !next.is_finite() {
            // coasting any further would leave the representable range
            self.velocity = 0.0;
            return InertiaStep::Settled;
        }
        self.velocity = velocity;
        *rotation = next;
        InertiaStep::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FRICTION;

    #[test]
    fn test_velocity_decays_geometrically() {
        let mut inertia = Inertia::new(1.0);
        let mut rotation = 0.0;
        let mut expected = 1.0;

        for _ in 0..10 {
            assert_eq!(inertia.step(&mut rotation, FRICTION), InertiaStep::Continue);
            expected *= FRICTION;
        }
        assert!((inertia.velocity() - 0.95f64.powi(10)).abs() < 1e-12);
        assert_eq!(inertia.velocity(), expected);
    }

    #[test]
    fn test_settles_after_ninety_frames() {
        let mut inertia = Inertia::new(1.0);
        let mut rotation = 0.0;
        let mut frames = 0;

        while inertia.step(&mut rotation, FRICTION) == InertiaStep::Continue {
            frames += 1;
            assert!(frames < 1000, "inertia never settled");
        }

        assert_eq!(frames, 90);
        assert!(inertia.velocity().abs() <= VELOCITY_EPSILON);
        // geometric series: sum of v0 * 0.95^k * 10 for k = 1..=90
        let travelled: f64 = (1..=90).map(|k| 0.95f64.powi(k) * 10.0).sum();
        assert!((rotation - travelled).abs() < 1e-9);
    }

    #[test]
    fn test_negative_velocity_rotates_backwards() {
        let mut inertia = Inertia::new(-0.5);
        let mut rotation = 10.0;
        inertia.step(&mut rotation, FRICTION);
        assert!((rotation - (10.0 - 0.475 * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn test_negligible_velocity_settles_immediately() {
        let mut rotation = 3.0;
        for v in [0.0, 0.01, -0.01, f64::NAN] {
            let mut inertia = Inertia::new(v);
            assert_eq!(inertia.step(&mut rotation, FRICTION), InertiaStep::Settled);
        }
        assert_eq!(rotation, 3.0);
    }

    #[test]
    fn test_overflowing_step_settles_in_place() {
        let mut inertia = Inertia::new(1e308);
        let mut rotation = 2e307;
        assert_eq!(inertia.step(&mut rotation, FRICTION), InertiaStep::Settled);
        assert_eq!(rotation, 2e307);
        assert_eq!(inertia.velocity(), 0.0);
    }
}
