// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fade channels and fade directions.
//!
//! The coordinator runs two independent fade pipelines. A fadable picks one
//! of them at creation and never changes it:
//!
//! - [`FadeChannel::Plain`]: the object simply fades away and is hidden once
//!   fully faded out.
//! - [`FadeChannel::Highlight`]: the object fades towards an edge-only
//!   rendering and is parked on the frozen edge layer once fully faded out.

use core::fmt;

/// One of the two independent fade pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FadeChannel {
    /// Plain opacity fade; fully faded objects are hidden.
    Plain,
    /// Edge-highlight fade; fully faded objects keep their edges visible.
    Highlight,
}

impl FadeChannel {
    /// Both channels, in the order the coordinator services them each tick.
    pub const ALL: [Self; 2] = [Self::Plain, Self::Highlight];

    /// Returns a dense index suitable for per-channel arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Highlight => 1,
        }
    }

    /// Returns the channel that shows edges while fading.
    #[inline]
    #[must_use]
    pub const fn from_highlight(uses_highlight: bool) -> Self {
        if uses_highlight {
            Self::Highlight
        } else {
            Self::Plain
        }
    }

    /// Returns a short lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Highlight => "highlight",
        }
    }
}

impl fmt::Display for FadeChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which way an object is (or wants to be) fading.
///
/// Opacity tracks "how visible": a fade-out starts at `1.0` and counts down
/// to `0.0`, a fade-in starts at `0.0` and counts up to `1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FadeDirection {
    /// Towards fully visible.
    In,
    /// Towards fully faded.
    Out,
}

impl FadeDirection {
    /// Creates a direction from a "fading out" boolean.
    #[inline]
    #[must_use]
    pub const fn from_fade_out(fade_out: bool) -> Self {
        if fade_out { Self::Out } else { Self::In }
    }

    /// Returns `true` for [`FadeDirection::Out`].
    #[inline]
    #[must_use]
    pub const fn is_out(self) -> bool {
        matches!(self, Self::Out)
    }

    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::In => Self::Out,
            Self::Out => Self::In,
        }
    }

    /// Opacity at which a fresh cycle in this direction starts.
    #[inline]
    #[must_use]
    pub const fn start_opacity(self) -> f32 {
        match self {
            Self::In => 0.0,
            Self::Out => 1.0,
        }
    }

    /// Opacity at which a cycle in this direction is finished.
    #[inline]
    #[must_use]
    pub const fn target_opacity(self) -> f32 {
        match self {
            Self::In => 1.0,
            Self::Out => 0.0,
        }
    }
}

impl fmt::Display for FadeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::In => "in",
            Self::Out => "out",
        })
    }
}
