// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear opacity ramp.
//!
//! Each channel drives one shared opacity value from one extreme to the
//! other at a constant rate in opacity units per second. There is no easing:
//! `next = clamp(opacity ± rate · Δt, 0, 1)`. Because the step is scaled by
//! elapsed real time, the fade takes the same wall-clock time at any frame
//! rate.

use crate::channel::FadeDirection;

/// Result of one ramp step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RampStep {
    /// Opacity after the step, in `[0, 1]`.
    pub opacity: f32,
    /// Whether the opacity reached the direction's terminal bound.
    pub reached_bound: bool,
}

/// A linear ramp with a fixed rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpacityRamp {
    rate: f32,
}

impl OpacityRamp {
    /// Creates a ramp advancing `rate` opacity units per second.
    #[must_use]
    pub const fn new(rate: f32) -> Self {
        Self { rate }
    }

    /// Returns the ramp rate in opacity units per second.
    #[must_use]
    pub const fn rate(&self) -> f32 {
        self.rate
    }

    /// Advances `opacity` towards the bound of `direction` by `delta_secs`.
    ///
    /// Out-of-range input opacity is clamped first, and a non-finite or
    /// negative delta counts as zero.
    #[must_use]
    pub fn step(&self, opacity: f32, direction: FadeDirection, delta_secs: f32) -> RampStep {
        let dt = if delta_secs.is_finite() && delta_secs > 0.0 {
            delta_secs
        } else {
            0.0
        };
        let amount = self.rate * dt;
        let current = clamp_unit(opacity);

        match direction {
            FadeDirection::In => {
                let next = current + amount;
                if next >= 1.0 {
                    RampStep {
                        opacity: 1.0,
                        reached_bound: true,
                    }
                } else {
                    RampStep {
                        opacity: next,
                        reached_bound: false,
                    }
                }
            }
            FadeDirection::Out => {
                let next = current - amount;
                if next <= 0.0 {
                    RampStep {
                        opacity: 0.0,
                        reached_bound: true,
                    }
                } else {
                    RampStep {
                        opacity: next,
                        reached_bound: false,
                    }
                }
            }
        }
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
