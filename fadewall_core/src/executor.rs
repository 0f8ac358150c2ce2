// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render executor contract.
//!
//! The fade core never draws anything. A host-side *render executor* receives
//! the coordinator's per-channel opacity every tick and is notified when
//! fadables enter and leave cycles, so it can issue the draw calls that
//! realize the plain fade and the edge-highlight effect.
//!
//! # Crate boundaries
//!
//! `fadewall_core` owns the data model, the coordinator and this contract.
//! `fadewall_render` turns the same state into a backend-agnostic
//! `RenderPlan`. Engine glue implements [`RenderExecutor`] (usually by
//! building a plan in [`present`](RenderExecutor::present)) and calls
//! [`FadeWall::update`](crate::wall::FadeWall::update) once per frame.

use crate::channel::FadeChannel;
use crate::coordinator::FadeCoordinator;
use crate::fadable::{FadableId, FadableStore};

/// Realizes the coordinator's fade state on screen.
///
/// All methods default to no-ops so test doubles and partial integrations
/// only override what they need.
///
/// # Frame loop pseudocode
///
/// A typical frame callback wires the pieces together like this:
///
/// ```rust,ignore
/// fn on_frame(now: HostTime) {
///     let tick = clock.tick(now);
///
///     // Sensors first, so same-tick events collapse into one submission.
///     for (sensor, overlapping) in physics.trigger_overlaps() {
///         if overlapping {
///             wall.sensor_stay(sensor, &mut tracer);
///         } else {
///             wall.sensor_exit(sensor, &mut tracer);
///         }
///     }
///
///     // Coordinate: advance ramps, complete and start cycles.
///     wall.update(&tick, &mut executor, &mut tracer);
///
///     // Push renderable layer and enabled changes to the engine.
///     let changes = wall.store_mut().evaluate();
///     engine.apply_surfaces(wall.store(), &changes);
/// }
/// ```
pub trait RenderExecutor {
    /// Called once per member when a cycle binds it, after its renderables
    /// were routed onto the transitional layer.
    fn on_enter_cycle(&mut self, store: &FadableStore, fadable: FadableId, channel: FadeChannel) {
        _ = (store, fadable, channel);
    }

    /// Called with the channel's opacity when a cycle starts and after every
    /// ramp step.
    fn apply_opacity(&mut self, channel: FadeChannel, opacity: f32) {
        _ = (channel, opacity);
    }

    /// Called exactly once per member when its cycle finishes, after its
    /// renderables received their end state.
    fn on_cycle_complete(
        &mut self,
        store: &FadableStore,
        fadable: FadableId,
        channel: FadeChannel,
        finished_fading_out: bool,
    ) {
        _ = (store, fadable, channel, finished_fading_out);
    }

    /// Called at the end of every coordinator update with the final state of
    /// the tick.
    fn present(&mut self, store: &FadableStore, coordinator: &FadeCoordinator) {
        _ = (store, coordinator);
    }
}

/// A [`RenderExecutor`] that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullExecutor;

impl RenderExecutor for NullExecutor {}
