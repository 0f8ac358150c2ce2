// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinator configuration.
//!
//! The tunables are a ramp rate per channel and the three
//! render layers that transitional and fully faded objects are routed to.

use crate::channel::FadeChannel;
use crate::error::ConfigError;
use crate::fadable::RenderLayer;

/// Per-channel ramp settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelConfig {
    /// Opacity units per second. A rate of `6.0` completes a full fade in
    /// about 167 ms.
    pub rate: f32,
}

impl ChannelConfig {
    /// Default ramp rate in opacity units per second.
    pub const DEFAULT_RATE: f32 = 6.0;

    /// Creates a channel config with the given rate.
    #[must_use]
    pub const fn new(rate: f32) -> Self {
        Self { rate }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RATE)
    }
}

/// Render layers used to route renderables through a fade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerConfig {
    /// Layer for objects currently fading on the plain channel.
    pub fade: RenderLayer,
    /// Layer for objects currently fading on the highlight channel.
    pub show_edges: RenderLayer,
    /// Layer for highlight objects that have fully faded out and now render
    /// edges only.
    pub show_edges_frozen: RenderLayer,
}

impl LayerConfig {
    /// Creates a layer config.
    #[must_use]
    pub const fn new(
        fade: RenderLayer,
        show_edges: RenderLayer,
        show_edges_frozen: RenderLayer,
    ) -> Self {
        Self {
            fade,
            show_edges,
            show_edges_frozen,
        }
    }

    /// Returns the transitional layer for `channel`.
    #[must_use]
    pub const fn transitional(&self, channel: FadeChannel) -> RenderLayer {
        match channel {
            FadeChannel::Plain => self.fade,
            FadeChannel::Highlight => self.show_edges,
        }
    }
}

impl Default for LayerConfig {
    /// The top three layers of a 32-layer mask.
    fn default() -> Self {
        Self::new(RenderLayer(29), RenderLayer(30), RenderLayer(31))
    }
}

/// Configuration for the [`FadeCoordinator`](crate::coordinator::FadeCoordinator).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FadeConfig {
    /// Ramp settings for the plain channel.
    pub plain: ChannelConfig,
    /// Ramp settings for the highlight channel.
    pub highlight: ChannelConfig,
    /// Render layer routing.
    pub layers: LayerConfig,
}

impl FadeConfig {
    /// Creates a config using the same rate on both channels.
    #[must_use]
    pub const fn uniform(rate: f32, layers: LayerConfig) -> Self {
        Self {
            plain: ChannelConfig::new(rate),
            highlight: ChannelConfig::new(rate),
            layers,
        }
    }

    /// Returns the ramp settings for `channel`.
    #[must_use]
    pub const fn channel(&self, channel: FadeChannel) -> ChannelConfig {
        match channel {
            FadeChannel::Plain => self.plain,
            FadeChannel::Highlight => self.highlight,
        }
    }

    /// Checks rates and layer assignments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for ch in FadeChannel::ALL {
            let rate = self.channel(ch).rate;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigError::InvalidRate(rate));
            }
        }

        let layers = [
            self.layers.fade,
            self.layers.show_edges,
            self.layers.show_edges_frozen,
        ];
        for (i, layer) in layers.iter().enumerate() {
            if layer.0 >= RenderLayer::COUNT {
                return Err(ConfigError::LayerOutOfRange(layer.0));
            }
            if layers[..i].contains(layer) {
                return Err(ConfigError::DuplicateLayer(layer.0));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(FadeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_rates() {
        let mut config = FadeConfig::default();
        config.highlight.rate = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRate(0.0)));

        config.highlight.rate = f32::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRate(_))
        ));
    }

    #[test]
    fn rejects_shared_layers() {
        let layers = LayerConfig::new(RenderLayer(3), RenderLayer(4), RenderLayer(3));
        let config = FadeConfig::uniform(6.0, layers);
        assert_eq!(config.validate(), Err(ConfigError::DuplicateLayer(3)));
    }

    #[test]
    fn rejects_out_of_range_layers() {
        let layers = LayerConfig::new(RenderLayer(32), RenderLayer(4), RenderLayer(5));
        let config = FadeConfig::uniform(6.0, layers);
        assert_eq!(config.validate(), Err(ConfigError::LayerOutOfRange(32)));
    }

    #[test]
    fn transitional_layer_follows_channel() {
        let layers = LayerConfig::default();
        assert_eq!(layers.transitional(FadeChannel::Plain), layers.fade);
        assert_eq!(
            layers.transitional(FadeChannel::Highlight),
            layers.show_edges
        );
    }
}
