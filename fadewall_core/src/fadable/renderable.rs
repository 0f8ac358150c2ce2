// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface routing state.

use crate::channel::{FadeChannel, FadeDirection};
use crate::config::LayerConfig;

use super::id::{RenderLayer, RenderableId};

/// Describes a renderable when registering a fadable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderableDesc {
    /// Engine handle of the surface.
    pub id: RenderableId,
    /// Layer the surface lives on outside of any fade.
    pub layer: RenderLayer,
    /// Whether the surface is drawn outside of any fade.
    pub enabled: bool,
    /// Whether the surface's scene object is active. Inactive surfaces are
    /// dropped when the fadable is created.
    pub active: bool,
}

impl RenderableDesc {
    /// Describes an active, enabled surface on `layer`.
    #[must_use]
    pub const fn new(id: RenderableId, layer: RenderLayer) -> Self {
        Self {
            id,
            layer,
            enabled: true,
            active: true,
        }
    }
}

/// A surface captured by a fadable, with its original and current routing.
///
/// The sequence of renderables of a fadable never changes shape after
/// creation; only `layer` and `enabled` are rewritten at cycle boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Renderable {
    /// Engine handle of the surface.
    pub id: RenderableId,
    /// Layer to restore once fully faded in.
    pub original_layer: RenderLayer,
    /// Enabled state to restore once fully faded in.
    pub original_enabled: bool,
    /// Current layer.
    pub layer: RenderLayer,
    /// Whether the surface is currently drawn.
    pub enabled: bool,
}

impl Renderable {
    pub(crate) const fn capture(desc: &RenderableDesc) -> Self {
        Self {
            id: desc.id,
            original_layer: desc.layer,
            original_enabled: desc.enabled,
            layer: desc.layer,
            enabled: desc.enabled,
        }
    }

    /// Routes the surface onto the transitional layer of `channel`.
    ///
    /// Plain fades also force the surface on, since a previous fade-out may
    /// have disabled it.
    pub(crate) fn enter_cycle(&mut self, channel: FadeChannel, layers: &LayerConfig) {
        self.layer = layers.transitional(channel);
        if channel == FadeChannel::Plain {
            self.enabled = true;
        }
    }

    /// Applies the end state of a finished cycle.
    pub(crate) fn complete_cycle(
        &mut self,
        channel: FadeChannel,
        direction: FadeDirection,
        layers: &LayerConfig,
    ) {
        match (direction, channel) {
            (FadeDirection::Out, FadeChannel::Plain) => self.enabled = false,
            (FadeDirection::Out, FadeChannel::Highlight) => {
                self.layer = layers.show_edges_frozen;
            }
            (FadeDirection::In, _) => {
                self.layer = self.original_layer;
                self.enabled = self.original_enabled;
            }
        }
    }

    /// Whether the surface currently renders as frozen edges.
    #[must_use]
    pub fn is_frozen(&self, layers: &LayerConfig) -> bool {
        self.layer == layers.show_edges_frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Renderable {
        Renderable::capture(&RenderableDesc::new(RenderableId(7), RenderLayer(2)))
    }

    #[test]
    fn plain_fade_out_then_in_restores() {
        let layers = LayerConfig::default();
        let mut r = surface();

        r.enter_cycle(FadeChannel::Plain, &layers);
        assert_eq!(r.layer, layers.fade);
        assert!(r.enabled);

        r.complete_cycle(FadeChannel::Plain, FadeDirection::Out, &layers);
        assert!(!r.enabled, "fully faded plain surfaces are hidden");

        r.enter_cycle(FadeChannel::Plain, &layers);
        assert!(r.enabled, "fade-in re-enables the surface");

        r.complete_cycle(FadeChannel::Plain, FadeDirection::In, &layers);
        assert_eq!(r.layer, RenderLayer(2));
        assert!(r.enabled);
    }

    #[test]
    fn highlight_fade_out_freezes_edges() {
        let layers = LayerConfig::default();
        let mut r = surface();

        r.enter_cycle(FadeChannel::Highlight, &layers);
        assert_eq!(r.layer, layers.show_edges);

        r.complete_cycle(FadeChannel::Highlight, FadeDirection::Out, &layers);
        assert!(r.is_frozen(&layers));
        assert!(r.enabled, "frozen surfaces still draw their edges");
    }

    #[test]
    fn fade_in_restores_original_enabled_state() {
        let layers = LayerConfig::default();
        let mut desc = RenderableDesc::new(RenderableId(1), RenderLayer(4));
        desc.enabled = false;
        let mut r = Renderable::capture(&desc);

        r.enter_cycle(FadeChannel::Plain, &layers);
        r.complete_cycle(FadeChannel::Plain, FadeDirection::In, &layers);
        assert!(!r.enabled);
        assert_eq!(r.layer, RenderLayer(4));
    }
}
