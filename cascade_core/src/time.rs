// Copyright 2026 the Cascade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame timestamps that drive transitions.
//!
//! The host samples its monotonic clock once per frame and hands the result
//! to [`Engine::advance`](crate::engine::Engine::advance) as a [`HostTime`].
//! Tweens measure their length in the same units with [`Duration`]. Nothing
//! in the engine reads a clock of its own; [`Timebase`] only exists so that
//! diagnostics can print microseconds.

use core::fmt;
use core::ops::Sub;

/// A frame timestamp in host clock ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// The raw tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Ticks elapsed since `start`; zero if `start` is later.
    ///
    /// A host clock may be resampled out of order across threads, so a
    /// frame that appears to precede its tween's start counts as its start.
    #[inline]
    #[must_use]
    pub const fn elapsed_since(self, start: Self) -> Duration {
        Duration(self.0.saturating_sub(start.0))
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, start: Self) -> Duration {
        self.elapsed_since(start)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

/// A tween length in host clock ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// No time at all; a tween of this length jumps.
    pub const ZERO: Self = Self(0);

    /// The raw tick count.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Whether a tween of this length finishes immediately.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Progress through `self` after `elapsed`, in `[0, 1]`.
    ///
    /// Returns `1.0` for [`Duration::ZERO`].
    #[must_use]
    pub fn fraction(self, elapsed: Self) -> f64 {
        if self.is_zero() {
            return 1.0;
        }
        (elapsed.0 as f64 / self.0 as f64).min(1.0)
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}

/// How many nanoseconds one host tick lasts, as `numer / denom`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Nanoseconds per `denom` ticks.
    pub numer: u32,
    /// Ticks per `numer` nanoseconds.
    pub denom: u32,
}

impl Timebase {
    /// One tick per nanosecond.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// One tick per microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a timebase of `numer / denom` nanoseconds per tick.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// `ticks` in whole nanoseconds, saturating at `u64::MAX`.
    #[inline]
    #[must_use]
    pub fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let nanos = u128::from(ticks) * u128::from(self.numer) / u128::from(self.denom);
        u64::try_from(nanos).unwrap_or(u64::MAX)
    }

    /// `time` in fractional microseconds, for display.
    #[inline]
    #[must_use]
    pub fn micros(self, time: HostTime) -> f64 {
        self.ticks_to_nanos(time.ticks()) as f64 / 1000.0
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ns per tick", self.numer, self.denom)
    }
}
