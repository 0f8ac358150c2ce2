// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fadable, renderable, and render-layer identity types.

use core::fmt;

/// A handle to a fadable in a [`FadableStore`](super::FadableStore).
///
/// Contains both a slot index and a generation counter so that handles held
/// by sensors or the coordinator are detected as stale once the fadable is
/// destroyed and its slot reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FadableId {
    /// Slot index into the store's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the store's generation for this slot.
    pub(crate) generation: u32,
}

impl FadableId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for FadableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FadableId({}@gen{})", self.idx, self.generation)
    }
}

/// An opaque reference to an engine-side drawable surface.
///
/// Renderables are owned by the host engine; the fade core only records the
/// layer and enabled state it wants each one to have.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderableId(pub u64);

impl fmt::Debug for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderableId({})", self.0)
    }
}

/// A render layer index, as used by engine culling masks.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderLayer(pub u8);

impl RenderLayer {
    /// Number of addressable layers (one bit each in a `u32` mask).
    pub const COUNT: u8 = 32;

    /// Returns the single-bit mask for this layer, or `0` if out of range.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u32 {
        if self.0 < Self::COUNT {
            1 << self.0
        } else {
            0
        }
    }
}

impl fmt::Debug for RenderLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RenderLayer({})", self.0)
    }
}
