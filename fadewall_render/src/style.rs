// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge-highlight effect parameters.

/// A linear RGBA color with components in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a color.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Tunables of the edge-highlight effect.
///
/// Highlight-channel objects are drawn as detected edges over a translucent
/// fill. Below the screen-space `y_threshold` the effect blends back to the
/// plain model, so the ground around the player stays readable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    /// Color of detected edges.
    pub edge_color: Color,
    /// Color of the fill between edges.
    pub fill_color: Color,
    /// Lower bound of the fill alpha, so fully faded objects never vanish.
    pub min_fill_alpha: f32,
    /// Edge detection sensitivity, in `[0.1, 5]`.
    pub edge_detect_threshold: f32,
    /// Edge thickness in pixels, in `[1, 6]`.
    pub edge_radius: u8,
    /// Normalized screen-space height below which the effect is suppressed.
    pub y_threshold: f32,
}

impl EdgeStyle {
    /// The default look.
    pub const DEFAULT: Self = Self {
        edge_color: Color::WHITE,
        fill_color: Color::WHITE,
        min_fill_alpha: 0.23,
        edge_detect_threshold: 1.0,
        edge_radius: 2,
        y_threshold: 0.35,
    };

    /// Returns a copy with every field forced into its valid range.
    ///
    /// NaN values fall back to the defaults.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            edge_color: self.edge_color,
            fill_color: self.fill_color,
            min_fill_alpha: clamp_or(self.min_fill_alpha, 0.01, 1.0, Self::DEFAULT.min_fill_alpha),
            edge_detect_threshold: clamp_or(
                self.edge_detect_threshold,
                0.1,
                5.0,
                Self::DEFAULT.edge_detect_threshold,
            ),
            edge_radius: self.edge_radius.clamp(1, 6),
            y_threshold: clamp_or(self.y_threshold, 0.0, 1.0, Self::DEFAULT.y_threshold),
        }
    }

    /// Resolves the shader parameters of an edge pass drawn at `opacity`.
    #[must_use]
    pub fn params(&self, opacity: f32) -> EdgeParams {
        let style = self.clamped();
        let opacity = clamp_or(opacity, 0.0, 1.0, 0.0);
        EdgeParams {
            edge_color: style.edge_color,
            fill_color: style.fill_color,
            min_fill_alpha: style.min_fill_alpha,
            threshold: style.edge_detect_threshold,
            radius: f32::from(style.edge_radius),
            y_threshold: style.y_threshold,
            inv_opacity: 1.0 - opacity,
        }
    }
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shader parameters for one edge pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeParams {
    /// Color of detected edges.
    pub edge_color: Color,
    /// Color of the fill between edges.
    pub fill_color: Color,
    /// Lower bound of the fill alpha.
    pub min_fill_alpha: f32,
    /// Edge detection sensitivity.
    pub threshold: f32,
    /// Edge thickness in pixels.
    pub radius: f32,
    /// Normalized screen-space height below which the effect is suppressed.
    pub y_threshold: f32,
    /// Edge strength: `0` on a fully visible object, `1` once fully faded.
    pub inv_opacity: f32,
}

fn clamp_or(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(min, max) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_tunables() {
        let style = EdgeStyle {
            edge_detect_threshold: 9.0,
            edge_radius: 0,
            min_fill_alpha: f32::NAN,
            ..EdgeStyle::DEFAULT
        }
        .clamped();
        assert_eq!(style.edge_detect_threshold, 5.0);
        assert_eq!(style.edge_radius, 1);
        assert_eq!(style.min_fill_alpha, 0.23);
    }

    #[test]
    fn inverse_opacity_tracks_fade() {
        let style = EdgeStyle::default();
        assert_eq!(style.params(1.0).inv_opacity, 0.0);
        assert_eq!(style.params(0.0).inv_opacity, 1.0);
        assert_eq!(style.params(0.25).inv_opacity, 0.75);
        assert_eq!(style.params(0.0).radius, 2.0);
    }
}
