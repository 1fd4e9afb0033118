// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tweened scalar transitions.

use crate::time::{Duration, HostTime};

/// Easing applied to the normalized elapsed time of a [`Tween`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Curve {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic acceleration from rest.
    EaseIn,
    /// Quadratic deceleration to rest.
    EaseOut,
    /// Accelerates, then decelerates.
    EaseInOut,
}

impl Curve {
    /// Maps `t` in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u / 2.0
                }
            }
        }
    }
}

/// How a transition moves to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tween {
    /// Total length.
    pub duration: Duration,
    /// Easing.
    pub curve: Curve,
}

impl Tween {
    /// A tween of `duration` with the given curve.
    #[must_use]
    pub const fn new(duration: Duration, curve: Curve) -> Self {
        Self { duration, curve }
    }

    /// A linear tween.
    #[must_use]
    pub const fn linear(duration: Duration) -> Self {
        Self::new(duration, Curve::Linear)
    }
}

/// An in-flight tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ActiveTween {
    pub(crate) from: f64,
    pub(crate) to: f64,
    pub(crate) tween: Tween,
    /// Set by the first frame that observes the tween.
    pub(crate) started_at: Option<HostTime>,
}

/// What a single frame of an [`ActiveTween`] produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Step {
    /// Still running; emit an intermediate value.
    Running(f64),
    /// Reached the target.
    Done(f64),
}

impl ActiveTween {
    pub(crate) fn new(from: f64, to: f64, tween: Tween) -> Self {
        Self {
            from,
            to,
            tween,
            started_at: None,
        }
    }

    /// Samples the tween at `now`. The first sample anchors the start time.
    pub(crate) fn step(&mut self, now: HostTime) -> Step {
        let start = *self.started_at.get_or_insert(now);
        let t = self.tween.duration.fraction(now - start);
        if t >= 1.0 {
            return Step::Done(self.to);
        }
        let eased = self.tween.curve.apply(t);
        Step::Running(self.from + (self.to - self.from) * eased)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for curve in [Curve::Linear, Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut] {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} at 0");
            assert!((curve.apply(1.0) - 1.0).abs() < 1e-12, "{curve:?} at 1");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let c = Curve::EaseInOut;
        assert!((c.apply(0.5) - 0.5).abs() < 1e-12);
        assert!((c.apply(0.25) + c.apply(0.75) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ease_in_lags_linear() {
        assert!(Curve::EaseIn.apply(0.5) < 0.5);
        assert!(Curve::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn first_step_starts_at_from() {
        let mut a = ActiveTween::new(10.0, 20.0, Tween::linear(Duration(100)));
        assert_eq!(a.step(HostTime(500)), Step::Running(10.0));
        assert_eq!(a.step(HostTime(550)), Step::Running(15.0));
        assert_eq!(a.step(HostTime(600)), Step::Done(20.0));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let mut a = ActiveTween::new(0.0, 5.0, Tween::linear(Duration::ZERO));
        assert_eq!(a.step(HostTime(1)), Step::Done(5.0));
    }
}
