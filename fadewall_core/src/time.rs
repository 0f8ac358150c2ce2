// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host time and per-frame ticks.
//!
//! [`HostTime`] is a point in time in platform-native monotonic ticks and
//! [`Timebase`] converts those ticks to nanoseconds (`nanos = ticks * numer /
//! denom`). The fade ramp runs on real elapsed seconds, so the host loop
//! feeds it [`FrameTick`]s produced by a [`FrameClock`], or builds ticks
//! directly from an engine-supplied delta with [`FrameTick::from_delta`].

use core::fmt;

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the number of ticks elapsed since `earlier`, or zero if
    /// `earlier` is later than `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_ticks_since(self, earlier: Self) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds.
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where ticks are microseconds.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a new timebase.
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

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }

    /// Converts a tick count to seconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "frame deltas are far below f32 precision limits"
    )]
    pub fn ticks_to_secs(self, ticks: u64) -> f32 {
        (self.ticks_to_nanos(ticks) as f64 / 1e9) as f32
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// One host-loop update opportunity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Host time at which the tick was taken.
    pub now: HostTime,
    /// Real time elapsed since the previous tick, in seconds. Never negative
    /// and never NaN.
    pub delta_secs: f32,
}

impl FrameTick {
    /// Builds a tick from an engine-supplied delta.
    ///
    /// Negative and non-finite deltas are clamped to zero.
    #[must_use]
    pub fn from_delta(frame_index: u64, delta_secs: f32) -> Self {
        Self {
            frame_index,
            now: HostTime::default(),
            delta_secs: sanitize_delta(delta_secs),
        }
    }
}

/// Turns successive host timestamps into [`FrameTick`]s.
///
/// The first tick after construction (or [`reset`](Self::reset)) has a zero
/// delta, so a long pause before the first frame never jumps a fade.
#[derive(Clone, Debug)]
pub struct FrameClock {
    timebase: Timebase,
    last: Option<HostTime>,
    next_index: u64,
}

impl FrameClock {
    /// Creates a clock using `timebase` to convert ticks to seconds.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            last: None,
            next_index: 0,
        }
    }

    /// Produces the tick for host time `now`.
    ///
    /// A `now` earlier than the previous timestamp yields a zero delta.
    pub fn tick(&mut self, now: HostTime) -> FrameTick {
        let delta_secs = match self.last {
            Some(last) => self.timebase.ticks_to_secs(now.saturating_ticks_since(last)),
            None => 0.0,
        };
        self.last = Some(now);
        let frame_index = self.next_index;
        self.next_index += 1;
        FrameTick {
            frame_index,
            now,
            delta_secs: sanitize_delta(delta_secs),
        }
    }

    /// Forgets the previous timestamp, e.g. after the host was suspended.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

fn sanitize_delta(delta_secs: f32) -> f32 {
    if delta_secs.is_finite() && delta_secs > 0.0 {
        delta_secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        a > b - 1e-6 && a < b + 1e-6
    }

    #[test]
    fn timebase_conversions() {
        let tb = Timebase::new(125, 3);
        assert_eq!(tb.ticks_to_nanos(24_000_000), 1_000_000_000, "24 MHz → 1s");
        assert_eq!(tb.nanos_to_ticks(1_000_000_000), 24_000_000);
        assert!(approx(tb.ticks_to_secs(12_000_000), 0.5));
    }

    #[test]
    fn first_tick_has_zero_delta() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        let tick = clock.tick(HostTime(5_000_000_000));
        assert_eq!(tick.frame_index, 0);
        assert_eq!(tick.delta_secs, 0.0);
    }

    #[test]
    fn successive_ticks_measure_elapsed_time() {
        let mut clock = FrameClock::new(Timebase::MICROS);
        let _ = clock.tick(HostTime(1_000));
        let tick = clock.tick(HostTime(17_000));
        assert_eq!(tick.frame_index, 1);
        assert!(approx(tick.delta_secs, 0.016), "{}", tick.delta_secs);
    }

    #[test]
    fn backwards_time_clamps_to_zero() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        let _ = clock.tick(HostTime(1_000));
        let tick = clock.tick(HostTime(500));
        assert_eq!(tick.delta_secs, 0.0);
    }

    #[test]
    fn reset_drops_previous_timestamp() {
        let mut clock = FrameClock::new(Timebase::NANOS);
        let _ = clock.tick(HostTime(0));
        clock.reset();
        let tick = clock.tick(HostTime(10_000_000_000));
        assert_eq!(tick.delta_secs, 0.0);
        assert_eq!(tick.frame_index, 1, "frame counter keeps counting");
    }

    #[test]
    fn engine_delta_is_sanitized() {
        assert_eq!(FrameTick::from_delta(3, -0.5).delta_secs, 0.0);
        assert_eq!(FrameTick::from_delta(3, f32::NAN).delta_secs, 0.0);
        assert_eq!(FrameTick::from_delta(3, 0.02).delta_secs, 0.02);
    }
}
