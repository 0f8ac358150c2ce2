// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: the fade passes and renderable updates for one frame.

use alloc::vec::Vec;

use fadewall_core::channel::FadeChannel;
use fadewall_core::config::LayerConfig;
use fadewall_core::coordinator::FadeCoordinator;
use fadewall_core::fadable::{FadableStore, RenderLayer, RenderableId, SurfaceChanges};

use crate::style::{EdgeParams, EdgeStyle};

/// Which fade pass a [`RenderPass`] realizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassKind {
    /// Plain-channel objects mid-fade, drawn at the plain opacity.
    PlainFade,
    /// Fully faded highlight objects, drawn as edges only.
    EdgesFrozen,
    /// Highlight-channel objects mid-fade, drawn at the highlight opacity.
    EdgesFading,
}

/// One layer-filtered draw pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPass {
    /// Which pass this is.
    pub kind: PassKind,
    /// The render layer the pass draws.
    pub layer: RenderLayer,
    /// Opacity the pass blends its objects in with.
    pub opacity: f32,
    /// Edge-effect parameters, for edge passes.
    pub edges: Option<EdgeParams>,
}

/// A renderable whose layer or enabled state must be pushed to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceUpdate {
    /// The engine surface.
    pub renderable: RenderableId,
    /// Layer it now lives on.
    pub layer: RenderLayer,
    /// Whether it is drawn.
    pub enabled: bool,
}

/// The passes and renderable updates for a single frame.
///
/// Passes are ordered plain fade, frozen edges, fading edges. A pass is only
/// present if its layer can hold content this frame.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Frame this plan was built for.
    pub frame_index: u64,
    /// Union of the three fade layers; what the fade passes cull against.
    pub culling_mask: u32,
    /// Draw passes in order.
    pub passes: Vec<RenderPass>,
    /// Renderable updates to apply before drawing.
    pub surfaces: Vec<SurfaceUpdate>,
}

impl RenderPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the plan for the coordinator's current state.
    ///
    /// `changes` is the result of the latest
    /// [`FadableStore::evaluate`] call.
    #[must_use]
    pub fn build(
        store: &FadableStore,
        coordinator: &FadeCoordinator,
        changes: &SurfaceChanges,
        style: &EdgeStyle,
    ) -> Self {
        let mut plan = Self::new();
        plan.build_into(store, coordinator, changes, style);
        plan
    }

    /// Like [`build`](Self::build), but reuses this plan's buffers.
    pub fn build_into(
        &mut self,
        store: &FadableStore,
        coordinator: &FadeCoordinator,
        changes: &SurfaceChanges,
        style: &EdgeStyle,
    ) {
        self.clear();
        let layers = coordinator.config().layers;
        self.frame_index = coordinator.frame_index();
        self.culling_mask = culling_mask(&layers);

        let plain = coordinator.cycle(FadeChannel::Plain);
        if plain.is_active() {
            self.passes.push(RenderPass {
                kind: PassKind::PlainFade,
                layer: layers.fade,
                opacity: plain.opacity(),
                edges: None,
            });
        }

        if store.any_frozen(&layers) {
            self.passes.push(RenderPass {
                kind: PassKind::EdgesFrozen,
                layer: layers.show_edges_frozen,
                opacity: 0.0,
                edges: Some(style.params(0.0)),
            });
        }

        let highlight = coordinator.cycle(FadeChannel::Highlight);
        if highlight.is_active() {
            let opacity = highlight.opacity();
            self.passes.push(RenderPass {
                kind: PassKind::EdgesFading,
                layer: layers.show_edges,
                opacity,
                edges: Some(style.params(opacity)),
            });
        }

        for &idx in &changes.surfaces {
            self.surfaces
                .extend(store.renderables_at(idx).iter().map(|r| SurfaceUpdate {
                    renderable: r.id,
                    layer: r.layer,
                    enabled: r.enabled,
                }));
        }
    }

    /// Returns the pass of the given kind, if present.
    #[must_use]
    pub fn pass(&self, kind: PassKind) -> Option<&RenderPass> {
        self.passes.iter().find(|p| p.kind == kind)
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.frame_index = 0;
        self.culling_mask = 0;
        self.passes.clear();
        self.surfaces.clear();
    }
}

/// Returns the culling mask covering the three fade layers.
#[must_use]
pub fn culling_mask(layers: &LayerConfig) -> u32 {
    layers.fade.mask() | layers.show_edges.mask() | layers.show_edges_frozen.mask()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadewall_core::config::FadeConfig;
    use fadewall_core::executor::NullExecutor;
    use fadewall_core::fadable::{FadableDesc, FadableId, RenderableDesc};
    use fadewall_core::time::FrameTick;
    use fadewall_core::trace::Tracer;

    struct Scene {
        store: FadableStore,
        coord: FadeCoordinator,
        frame: u64,
    }

    impl Scene {
        fn new() -> Self {
            Self {
                store: FadableStore::new(),
                coord: FadeCoordinator::new(FadeConfig::default()).unwrap(),
                frame: 0,
            }
        }

        fn occluder(&mut self, channel: FadeChannel, surface: u64) -> FadableId {
            let id = self.store.create(
                FadableDesc::new(channel)
                    .with_renderable(RenderableDesc::new(RenderableId(surface), RenderLayer(0))),
            );
            let _ = self
                .store
                .increase_collision(id, Some(&mut self.coord), &mut Tracer::none());
            id
        }

        fn tick(&mut self, dt: f32) -> RenderPlan {
            let tick = FrameTick::from_delta(self.frame, dt);
            self.frame += 1;
            self.coord
                .update(&mut self.store, &tick, &mut NullExecutor, &mut Tracer::none());
            let changes = self.store.evaluate();
            RenderPlan::build(&self.store, &self.coord, &changes, &EdgeStyle::DEFAULT)
        }
    }

    #[test]
    fn idle_plan_has_no_passes() {
        let mut scene = Scene::new();
        let plan = scene.tick(0.016);
        assert!(plan.passes.is_empty());
        assert!(plan.surfaces.is_empty());
        assert_eq!(plan.culling_mask, 0b111 << 29);
    }

    #[test]
    fn fading_channels_emit_passes_in_order() {
        let mut scene = Scene::new();
        let _ = scene.occluder(FadeChannel::Plain, 1);
        let _ = scene.occluder(FadeChannel::Highlight, 2);
        let plan = scene.tick(0.0);

        let kinds: Vec<_> = plan.passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [PassKind::PlainFade, PassKind::EdgesFading]);
        let layers = LayerConfig::default();
        assert_eq!(
            plan.surfaces,
            [
                SurfaceUpdate {
                    renderable: RenderableId(1),
                    layer: layers.fade,
                    enabled: true,
                },
                SurfaceUpdate {
                    renderable: RenderableId(2),
                    layer: layers.show_edges,
                    enabled: true,
                },
            ]
        );
        let edges = plan.pass(PassKind::EdgesFading).unwrap().edges.unwrap();
        assert_eq!(edges.inv_opacity, 0.0);
    }

    #[test]
    fn finished_highlight_fade_leaves_frozen_pass() {
        let mut scene = Scene::new();
        let _ = scene.occluder(FadeChannel::Highlight, 7);
        let _ = scene.tick(0.0);
        let plan = scene.tick(0.5);

        let kinds: Vec<_> = plan.passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [PassKind::EdgesFrozen]);
        let frozen = plan.pass(PassKind::EdgesFrozen).unwrap();
        assert_eq!(frozen.opacity, 0.0);
        assert_eq!(frozen.edges.unwrap().inv_opacity, 1.0);
        assert_eq!(
            plan.surfaces,
            [SurfaceUpdate {
                renderable: RenderableId(7),
                layer: LayerConfig::default().show_edges_frozen,
                enabled: true,
            }]
        );
    }
}
