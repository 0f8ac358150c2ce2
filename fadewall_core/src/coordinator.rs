// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Batched fade coordination.
//!
//! The [`FadeCoordinator`] owns a pending set and one [`Cycle`] per
//! [`FadeChannel`]. Each channel loops `Idle → Cycling → Idle`:
//!
//! 1. **Idle** with pending fadables of the channel: pending entries that
//!    already rest in their desired state are dropped, then a direction is
//!    chosen (the flip of the previous one if anyone wants it, else the
//!    previous one again) and every pending fadable of the channel wanting
//!    that direction is bound to a new cycle at the direction's start
//!    opacity.
//! 2. **Cycling**: every tick the shared opacity takes one linear ramp step.
//!    When it reaches its bound, every member receives its end state exactly
//!    once and the channel goes idle. Members whose desired direction changed
//!    while the cycle ran go straight back to pending.
//!
//! A running cycle never admits new members. Requests arriving mid-cycle wait
//! for the next cycle of the channel, which bounds their latency by one full
//! ramp.

use alloc::vec::Vec;

use crate::channel::{FadeChannel, FadeDirection};
use crate::config::FadeConfig;
use crate::error::ConfigError;
use crate::executor::RenderExecutor;
use crate::fadable::{FadableId, FadableStore, FadePhase};
use crate::ramp::OpacityRamp;
use crate::time::{FrameTick, HostTime};
use crate::trace::{CycleCompleteEvent, CycleStartEvent, SubmitEvent, Tracer};

#[cfg(feature = "trace-rich")]
use crate::trace::{MemberChange, MemberEvent, OpacityStepEvent};

/// Whether a channel is running a cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    /// Waiting for pending fadables.
    #[default]
    Idle,
    /// Ramping the shared opacity.
    Cycling,
}

/// What the coordinator did with a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmitOutcome {
    /// Added to the pending set.
    Queued,
    /// Already pending; the request was folded into the existing entry.
    AlreadyQueued,
    /// The fadable is a member of a running cycle. It is re-examined when
    /// that cycle completes.
    Deferred,
    /// No coordinator is attached; the fadable keeps its last visual state.
    Detached,
}

impl SubmitOutcome {
    /// Returns a short snake-case name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::AlreadyQueued => "already_queued",
            Self::Deferred => "deferred",
            Self::Detached => "detached",
        }
    }
}

/// One channel's batched transition.
#[derive(Clone, Debug)]
pub struct Cycle {
    phase: CyclePhase,
    direction: FadeDirection,
    members: Vec<FadableId>,
    opacity: f32,
}

impl Cycle {
    fn new() -> Self {
        Self {
            phase: CyclePhase::Idle,
            // Everything starts visible, so the first cycle prefers "out".
            direction: FadeDirection::In,
            members: Vec::new(),
            opacity: FadeDirection::In.target_opacity(),
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Returns `true` while the cycle is ramping.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == CyclePhase::Cycling
    }

    /// Returns the direction of the running (or most recent) cycle.
    #[must_use]
    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Returns the fadables bound to the running cycle.
    #[must_use]
    pub fn members(&self) -> &[FadableId] {
        &self.members
    }

    /// Returns the shared opacity, in `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}

/// Batches fadable requests into per-channel fade cycles.
///
/// One coordinator exists per rendering context. It is passed explicitly to
/// the [`FadableStore`] counter operations and is usually owned by a
/// [`FadeWall`](crate::wall::FadeWall).
#[derive(Clone, Debug)]
pub struct FadeCoordinator {
    config: FadeConfig,
    ramps: [OpacityRamp; 2],
    pending: Vec<FadableId>,
    cycles: [Cycle; 2],
    frame_index: u64,
    now: HostTime,
}

impl FadeCoordinator {
    /// Creates a coordinator with both channels idle.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`FadeConfig::validate`].
    pub fn new(config: FadeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ramps: FadeChannel::ALL.map(|ch| OpacityRamp::new(config.channel(ch).rate)),
            pending: Vec::new(),
            cycles: [Cycle::new(), Cycle::new()],
            frame_index: 0,
            now: HostTime::default(),
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FadeConfig {
        &self.config
    }

    /// Returns the frame index of the most recent [`update`](Self::update).
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Returns the host time of the most recent [`update`](Self::update).
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Returns the fadables waiting for a cycle, in submission order.
    #[must_use]
    pub fn pending(&self) -> &[FadableId] {
        &self.pending
    }

    /// Returns whether `id` is waiting for a cycle.
    #[must_use]
    pub fn is_pending(&self, id: FadableId) -> bool {
        self.pending.contains(&id)
    }

    /// Returns the cycle of `channel`.
    #[must_use]
    pub fn cycle(&self, channel: FadeChannel) -> &Cycle {
        &self.cycles[channel.index()]
    }

    /// Returns the shared opacity of `channel`.
    #[must_use]
    pub fn opacity(&self, channel: FadeChannel) -> f32 {
        self.cycle(channel).opacity
    }

    /// Returns `true` if nothing is pending and no channel is cycling.
    #[must_use]
    pub fn is_quiescent(&self) -> bool {
        self.pending.is_empty() && self.cycles.iter().all(|c| !c.is_active())
    }

    /// Records a transition request for `id`.
    ///
    /// The direction and channel are read from the store. Submitting a
    /// fadable that is already pending or cycling does not create a second
    /// entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn submit(
        &mut self,
        store: &mut FadableStore,
        id: FadableId,
        tracer: &mut Tracer<'_>,
    ) -> SubmitOutcome {
        let outcome = match store.phase(id) {
            FadePhase::Queued => SubmitOutcome::AlreadyQueued,
            FadePhase::Cycling => SubmitOutcome::Deferred,
            FadePhase::Settled => {
                self.pending.push(id);
                store.set_phase(id, FadePhase::Queued);
                SubmitOutcome::Queued
            }
        };
        tracer.submit(&SubmitEvent {
            frame_index: self.frame_index,
            now: self.now,
            fadable: id,
            channel: store.channel(id),
            direction: store.desired(id),
            outcome,
        });
        outcome
    }

    /// Drops every reference to `id`. Called when a fadable is destroyed.
    pub fn forget(&mut self, id: FadableId) {
        self.pending.retain(|&p| p != id);
        for cycle in &mut self.cycles {
            cycle.members.retain(|&m| m != id);
        }
    }

    /// Releases all pending entries and cycle memberships, leaving every
    /// fadable free to resubmit.
    ///
    /// Used when the coordinator is torn down mid-flight. Cycle members are
    /// routed back to the resting state of their last completed cycle, and
    /// each interrupted cycle reports a [`CycleCompleteEvent`]. The executor
    /// is not notified.
    pub fn release_all(&mut self, store: &mut FadableStore, tracer: &mut Tracer<'_>) {
        let layers = self.config.layers;
        for &id in &self.pending {
            if store.is_alive(id) {
                store.set_phase(id, FadePhase::Settled);
            }
        }
        self.pending.clear();

        for channel in FadeChannel::ALL {
            let cycle = &mut self.cycles[channel.index()];
            let was_cycling = cycle.is_active();
            for &id in &cycle.members {
                if store.is_alive(id) {
                    let settled = store.settled(id);
                    store.complete_cycle(id, settled, &layers);
                }
            }
            if was_cycling {
                tracer.cycle_complete(&CycleCompleteEvent {
                    frame_index: self.frame_index,
                    now: self.now,
                    channel,
                    direction: cycle.direction,
                    members: count(&cycle.members),
                    requeued: 0,
                });
            }
            cycle.members.clear();
            cycle.phase = CyclePhase::Idle;
        }
    }

    /// Runs one tick for both channels, then hands the result to
    /// [`RenderExecutor::present`].
    ///
    /// A cycling channel takes one ramp step and completes if it reached its
    /// bound. An idle channel starts a new cycle if any pending fadable of
    /// that channel needs one; its ramp advances from the next tick.
    pub fn update(
        &mut self,
        store: &mut FadableStore,
        tick: &FrameTick,
        executor: &mut dyn RenderExecutor,
        tracer: &mut Tracer<'_>,
    ) {
        self.frame_index = tick.frame_index;
        self.now = tick.now;
        for channel in FadeChannel::ALL {
            match self.cycles[channel.index()].phase {
                CyclePhase::Cycling => {
                    self.advance(channel, store, tick.delta_secs, executor, tracer);
                }
                CyclePhase::Idle => self.try_start(channel, store, executor, tracer),
            }
        }
        executor.present(store, self);
    }

    fn advance(
        &mut self,
        channel: FadeChannel,
        store: &mut FadableStore,
        delta_secs: f32,
        executor: &mut dyn RenderExecutor,
        tracer: &mut Tracer<'_>,
    ) {
        let k = channel.index();
        let cycle = &mut self.cycles[k];
        let step = self.ramps[k].step(cycle.opacity, cycle.direction, delta_secs);
        cycle.opacity = step.opacity;
        executor.apply_opacity(channel, step.opacity);

        #[cfg(feature = "trace-rich")]
        tracer.opacity_step(&OpacityStepEvent {
            frame_index: self.frame_index,
            now: self.now,
            channel,
            direction: cycle.direction,
            opacity: step.opacity,
        });

        if step.reached_bound {
            self.complete(channel, store, executor, tracer);
        }
    }

    fn complete(
        &mut self,
        channel: FadeChannel,
        store: &mut FadableStore,
        executor: &mut dyn RenderExecutor,
        tracer: &mut Tracer<'_>,
    ) {
        let layers = self.config.layers;
        let cycle = &mut self.cycles[channel.index()];
        let direction = cycle.direction;
        let mut members = core::mem::take(&mut cycle.members);
        cycle.phase = CyclePhase::Idle;

        let mut requeued = 0_u32;
        for &id in &members {
            if !store.is_alive(id) {
                continue;
            }
            store.complete_cycle(id, direction, &layers);
            executor.on_cycle_complete(store, id, channel, direction.is_out());

            #[cfg(feature = "trace-rich")]
            tracer.member(&MemberEvent {
                frame_index: self.frame_index,
                now: self.now,
                channel,
                fadable: id,
                change: MemberChange::Completed,
            });

            if store.desired(id) != direction {
                self.pending.push(id);
                store.set_phase(id, FadePhase::Queued);
                requeued += 1;

                #[cfg(feature = "trace-rich")]
                tracer.member(&MemberEvent {
                    frame_index: self.frame_index,
                    now: self.now,
                    channel,
                    fadable: id,
                    change: MemberChange::Requeued,
                });
            }
        }

        tracer.cycle_complete(&CycleCompleteEvent {
            frame_index: self.frame_index,
            now: self.now,
            channel,
            direction,
            members: count(&members),
            requeued,
        });

        // Keep the allocation for the next cycle.
        members.clear();
        self.cycles[channel.index()].members = members;
    }

    fn try_start(
        &mut self,
        channel: FadeChannel,
        store: &mut FadableStore,
        executor: &mut dyn RenderExecutor,
        tracer: &mut Tracer<'_>,
    ) {
        #[cfg(feature = "trace-rich")]
        let (frame_index, now) = (self.frame_index, self.now);

        // Drop entries that need no transition: they would only pop.
        self.pending.retain(|&id| {
            if !store.is_alive(id) {
                return false;
            }
            if store.channel(id) != channel || store.desired(id) != store.settled(id) {
                return true;
            }
            store.set_phase(id, FadePhase::Settled);

            #[cfg(feature = "trace-rich")]
            tracer.member(&MemberEvent {
                frame_index,
                now,
                channel,
                fadable: id,
                change: MemberChange::Dropped,
            });

            false
        });

        let previous = self.cycles[channel.index()].direction;
        let wants = |direction: FadeDirection| {
            self.pending
                .iter()
                .any(|&id| store.channel(id) == channel && store.desired(id) == direction)
        };
        let direction = if wants(previous.flip()) {
            previous.flip()
        } else if wants(previous) {
            previous
        } else {
            return;
        };

        let mut members = core::mem::take(&mut self.cycles[channel.index()].members);
        members.clear();
        self.pending.retain(|&id| {
            if store.channel(id) == channel && store.desired(id) == direction {
                members.push(id);
                false
            } else {
                true
            }
        });

        let layers = self.config.layers;
        for &id in &members {
            store.enter_cycle(id, &layers);
            executor.on_enter_cycle(store, id, channel);

            #[cfg(feature = "trace-rich")]
            tracer.member(&MemberEvent {
                frame_index: self.frame_index,
                now: self.now,
                channel,
                fadable: id,
                change: MemberChange::Entered,
            });
        }

        let opacity = direction.start_opacity();
        tracer.cycle_start(&CycleStartEvent {
            frame_index: self.frame_index,
            now: self.now,
            channel,
            direction,
            members: count(&members),
            opacity,
        });

        let cycle = &mut self.cycles[channel.index()];
        cycle.phase = CyclePhase::Cycling;
        cycle.direction = direction;
        cycle.opacity = opacity;
        cycle.members = members;
        executor.apply_opacity(channel, opacity);
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "member lists are bounded by the number of live fadables, far below u32::MAX"
)]
fn count(members: &[FadableId]) -> u32 {
    members.len() as u32
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::executor::NullExecutor;
    use crate::fadable::{FadableDesc, RenderLayer, RenderableDesc, RenderableId};

    struct Fixture {
        store: FadableStore,
        coord: FadeCoordinator,
        frame: u64,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: FadableStore::new(),
                coord: FadeCoordinator::new(FadeConfig::default()).unwrap(),
                frame: 0,
            }
        }

        fn fadable(&mut self, channel: FadeChannel) -> FadableId {
            self.store.create(
                FadableDesc::new(channel)
                    .with_renderable(RenderableDesc::new(RenderableId(1), RenderLayer(0))),
            )
        }

        fn increase(&mut self, id: FadableId) -> Option<SubmitOutcome> {
            self.store
                .increase_collision(id, Some(&mut self.coord), &mut Tracer::none())
        }

        fn decrease(&mut self, id: FadableId) -> Option<SubmitOutcome> {
            self.store
                .decrease_collision(id, Some(&mut self.coord), &mut Tracer::none())
        }

        fn tick(&mut self, dt: f32) {
            let tick = FrameTick::from_delta(self.frame, dt);
            self.frame += 1;
            self.coord
                .update(&mut self.store, &tick, &mut NullExecutor, &mut Tracer::none());
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = FadeConfig::default();
        config.plain.rate = -1.0;
        assert!(matches!(
            FadeCoordinator::new(config),
            Err(ConfigError::InvalidRate(_))
        ));
    }

    #[test]
    fn submission_is_idempotent_while_pending() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        assert_eq!(f.increase(a), Some(SubmitOutcome::Queued));

        let outcome = f.coord.submit(&mut f.store, a, &mut Tracer::none());
        assert_eq!(outcome, SubmitOutcome::AlreadyQueued);
        assert_eq!(f.coord.pending(), [a]);
    }

    #[test]
    fn idle_tick_starts_cycle_at_full_visibility() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.016);

        let cycle = f.coord.cycle(FadeChannel::Plain);
        assert!(cycle.is_active());
        assert_eq!(cycle.direction(), FadeDirection::Out);
        assert_eq!(cycle.members(), [a]);
        assert_eq!(cycle.opacity(), 1.0, "ramp advances from the next tick");
        assert!(f.coord.pending().is_empty());
        assert_eq!(f.store.phase(a), FadePhase::Cycling);
    }

    #[test]
    fn cycle_completes_and_settles_members() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);
        for _ in 0..4 {
            f.tick(0.05);
        }
        assert!(!f.coord.cycle(FadeChannel::Plain).is_active());
        assert_eq!(f.coord.opacity(FadeChannel::Plain), 0.0);
        assert_eq!(f.store.settled(a), FadeDirection::Out);
        assert_eq!(f.store.phase(a), FadePhase::Settled);
        assert!(!f.store.renderables(a)[0].enabled);
        assert!(f.coord.is_quiescent());
    }

    #[test]
    fn running_cycle_admits_no_new_members() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let b = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);
        let _ = f.increase(b);
        f.tick(0.05);

        assert_eq!(f.coord.cycle(FadeChannel::Plain).members(), [a]);
        assert_eq!(f.coord.pending(), [b]);

        // Finish a's cycle; b starts on the following idle tick.
        for _ in 0..3 {
            f.tick(0.05);
        }
        assert!(!f.coord.cycle(FadeChannel::Plain).is_active());
        f.tick(0.05);
        let cycle = f.coord.cycle(FadeChannel::Plain);
        assert_eq!(cycle.members(), [b]);
        assert_eq!(
            cycle.direction(),
            FadeDirection::Out,
            "falls back to the previous direction when nobody wants the flip"
        );
    }

    #[test]
    fn mid_cycle_flip_is_requeued_at_completion() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);
        f.tick(0.1);
        assert_eq!(f.decrease(a), Some(SubmitOutcome::Deferred));
        assert_eq!(f.coord.cycle(FadeChannel::Plain).members(), [a]);

        f.tick(0.1);
        assert!(!f.coord.cycle(FadeChannel::Plain).is_active());
        assert_eq!(f.store.settled(a), FadeDirection::Out);
        assert_eq!(f.coord.pending(), [a]);

        f.tick(0.0);
        let cycle = f.coord.cycle(FadeChannel::Plain);
        assert_eq!(cycle.direction(), FadeDirection::In);
        assert_eq!(cycle.opacity(), 0.0);
    }

    #[test]
    fn settled_pending_entries_are_dropped() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        let _ = f.decrease(a);
        assert_eq!(f.coord.pending(), [a]);

        f.tick(0.016);
        assert!(f.coord.pending().is_empty());
        assert!(!f.coord.cycle(FadeChannel::Plain).is_active());
        assert_eq!(f.store.phase(a), FadePhase::Settled);
    }

    #[test]
    fn channels_cycle_independently() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let b = f.fadable(FadeChannel::Highlight);
        let _ = f.increase(a);
        f.tick(0.0);
        let _ = f.increase(b);
        f.tick(0.05);

        assert_eq!(f.coord.cycle(FadeChannel::Plain).members(), [a]);
        assert_eq!(f.coord.cycle(FadeChannel::Highlight).members(), [b]);
        assert!(f.coord.opacity(FadeChannel::Plain) < 1.0);
        assert_eq!(f.coord.opacity(FadeChannel::Highlight), 1.0);
    }

    #[test]
    fn forget_removes_every_reference() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let b = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);
        let _ = f.increase(b);

        f.coord.forget(a);
        f.coord.forget(b);
        assert!(f.coord.pending().is_empty());
        assert!(f.coord.cycle(FadeChannel::Plain).members().is_empty());
    }

    #[test]
    fn release_all_frees_fadables_to_resubmit() {
        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let b = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);
        let _ = f.increase(b);

        assert_eq!(f.store.renderables(a)[0].layer, f.coord.config().layers.fade);

        f.coord.release_all(&mut f.store, &mut Tracer::none());
        assert!(f.coord.is_quiescent());
        assert_eq!(f.store.phase(a), FadePhase::Settled);
        assert_eq!(f.store.phase(b), FadePhase::Settled);
        assert_eq!(
            f.store.renderables(a)[0].layer,
            RenderLayer(0),
            "interrupted members return to their resting layer"
        );
        assert!(f.store.renderables(a)[0].enabled);

        let outcome = f.coord.submit(&mut f.store, a, &mut Tracer::none());
        assert_eq!(outcome, SubmitOutcome::Queued);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn release_all_closes_interrupted_cycles() {
        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Ends(Vec<(FadeChannel, FadeDirection, u32)>);
        impl TraceSink for Ends {
            fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
                self.0.push((e.channel, e.direction, e.members));
            }
        }

        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Highlight);
        let _ = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        f.tick(0.0);

        let mut ends = Ends::default();
        f.coord.release_all(&mut f.store, &mut Tracer::new(&mut ends));
        assert_eq!(ends.0, [(FadeChannel::Highlight, FadeDirection::Out, 1)]);
    }

    #[test]
    fn executor_sees_every_boundary() {
        #[derive(Default)]
        struct Log {
            entered: Vec<FadableId>,
            completed: Vec<(FadableId, bool)>,
            opacities: Vec<f32>,
            presents: u32,
        }
        impl RenderExecutor for Log {
            fn on_enter_cycle(&mut self, _: &FadableStore, id: FadableId, _: FadeChannel) {
                self.entered.push(id);
            }
            fn apply_opacity(&mut self, _: FadeChannel, opacity: f32) {
                self.opacities.push(opacity);
            }
            fn on_cycle_complete(
                &mut self,
                _: &FadableStore,
                id: FadableId,
                _: FadeChannel,
                out: bool,
            ) {
                self.completed.push((id, out));
            }
            fn present(&mut self, _: &FadableStore, _: &FadeCoordinator) {
                self.presents += 1;
            }
        }

        let mut f = Fixture::new();
        let a = f.fadable(FadeChannel::Plain);
        let b = f.fadable(FadeChannel::Plain);
        let _ = f.increase(a);
        let _ = f.increase(b);

        let mut log = Log::default();
        for frame in 0..3 {
            let tick = FrameTick::from_delta(frame, 0.125);
            f.coord
                .update(&mut f.store, &tick, &mut log, &mut Tracer::none());
        }

        assert_eq!(log.entered, vec![a, b]);
        assert_eq!(log.completed, vec![(a, true), (b, true)]);
        assert_eq!(log.opacities, vec![1.0, 0.25, 0.0]);
        assert_eq!(log.presents, 3);
    }
}
