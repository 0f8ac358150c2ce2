// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted host loop and fade metrics for fade wall scenarios.
//!
//! [`FadeHarness`] plays the part of the host engine: it owns a
//! [`FadeWall`], advances a [`FrameClock`] by scripted deltas, records every
//! executor call in a [`RecordingExecutor`], rebuilds the [`RenderPlan`]
//! after each tick and feeds all trace events into [`FadeMetrics`].
//!
//! ```rust,ignore
//! let mut h = FadeHarness::new(FadeConfig::default())?;
//! let wall_piece = h.add_fadable(FadableDesc::new(FadeChannel::Plain));
//! h.increase_collision(wall_piece);
//! h.run_until_quiescent(1.0 / 60.0, 120);
//! assert_eq!(h.metrics().report().settled, 1);
//! ```

#![no_std]

extern crate alloc;

mod metrics;
mod recording;

pub use metrics::{FadeMetrics, MetricsReport};
pub use recording::{ExecutorCall, RecordingExecutor};

use fadewall_core::config::FadeConfig;
use fadewall_core::coordinator::SubmitOutcome;
use fadewall_core::error::ConfigError;
use fadewall_core::fadable::{FadableDesc, FadableId, SurfaceChanges};
use fadewall_core::time::{FrameClock, FrameTick, HostTime, Timebase};
use fadewall_core::trace::Tracer;
use fadewall_core::wall::FadeWall;
use fadewall_render::{EdgeStyle, RenderPlan};

/// Drives a [`FadeWall`] through a scripted frame sequence.
#[derive(Debug)]
pub struct FadeHarness {
    wall: FadeWall,
    executor: RecordingExecutor,
    metrics: FadeMetrics,
    clock: FrameClock,
    now: HostTime,
    style: EdgeStyle,
    changes: SurfaceChanges,
    plan: RenderPlan,
}

impl FadeHarness {
    /// Creates a harness around a fresh wall. Time starts at zero and is
    /// counted in nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` is invalid.
    pub fn new(config: FadeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            wall: FadeWall::new(config)?,
            executor: RecordingExecutor::new(),
            metrics: FadeMetrics::new(Timebase::NANOS),
            clock: FrameClock::new(Timebase::NANOS),
            now: HostTime(0),
            style: EdgeStyle::DEFAULT,
            changes: SurfaceChanges::default(),
            plan: RenderPlan::new(),
        })
    }

    /// The wall under test.
    #[must_use]
    pub fn wall(&self) -> &FadeWall {
        &self.wall
    }

    /// The executor log.
    #[must_use]
    pub fn executor(&self) -> &RecordingExecutor {
        &self.executor
    }

    /// Metrics gathered so far.
    #[must_use]
    pub fn metrics(&self) -> &FadeMetrics {
        &self.metrics
    }

    /// The render plan of the latest tick.
    #[must_use]
    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// Renderable changes reported by the latest tick.
    #[must_use]
    pub fn changes(&self) -> &SurfaceChanges {
        &self.changes
    }

    /// Host time of the latest tick.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Runs `f` against the wall with a tracer feeding the metrics.
    ///
    /// This is the way to reach sensor and coordinator operations that have
    /// no shortcut on the harness.
    pub fn drive<R>(&mut self, f: impl FnOnce(&mut FadeWall, &mut Tracer<'_>) -> R) -> R {
        let mut tracer = Tracer::new(&mut self.metrics);
        f(&mut self.wall, &mut tracer)
    }

    /// Registers a fadable.
    pub fn add_fadable(&mut self, desc: FadableDesc) -> FadableId {
        self.wall.add_fadable(desc)
    }

    /// Forwards [`FadeWall::increase_collision`].
    pub fn increase_collision(&mut self, id: FadableId) -> Option<SubmitOutcome> {
        self.drive(|wall, tracer| wall.increase_collision(id, tracer))
    }

    /// Forwards [`FadeWall::decrease_collision`].
    pub fn decrease_collision(&mut self, id: FadableId) -> Option<SubmitOutcome> {
        self.drive(|wall, tracer| wall.decrease_collision(id, tracer))
    }

    /// Forwards [`FadeWall::deactivate`].
    pub fn deactivate(&mut self, id: FadableId) -> Option<SubmitOutcome> {
        self.drive(|wall, tracer| wall.deactivate(id, tracer))
    }

    /// Forwards [`FadeWall::activate`].
    pub fn activate(&mut self, id: FadableId) {
        self.drive(|wall, tracer| wall.activate(id, tracer));
    }

    /// Advances time by `delta_secs` and runs one full host frame: the
    /// coordinator update, the renderable drain and the plan rebuild.
    ///
    /// Non-finite or negative deltas advance nothing.
    pub fn tick(&mut self, delta_secs: f32) -> FrameTick {
        let nanos = if delta_secs.is_finite() && delta_secs > 0.0 {
            secs_to_nanos(delta_secs)
        } else {
            0
        };
        self.now = HostTime(self.now.ticks().saturating_add(nanos));
        let tick = self.clock.tick(self.now);

        let mut tracer = Tracer::new(&mut self.metrics);
        self.wall.update(&tick, &mut self.executor, &mut tracer);
        drop(tracer);

        self.wall.store_mut().evaluate_into(&mut self.changes);
        match self.wall.coordinator() {
            Some(coordinator) => self.plan.build_into(
                self.wall.store(),
                coordinator,
                &self.changes,
                &self.style,
            ),
            None => self.plan.clear(),
        }
        self.metrics.observe(self.wall.store(), self.now);
        tick
    }

    /// Ticks at a constant delta until nothing is pending or cycling, at
    /// most `max_ticks` times. Returns the number of ticks run, or `None` if
    /// the wall was still busy afterwards.
    pub fn run_until_quiescent(&mut self, delta_secs: f32, max_ticks: u32) -> Option<u32> {
        for ran in 0..=max_ticks {
            if self.is_quiescent() {
                return Some(ran);
            }
            if ran == max_ticks {
                break;
            }
            let _ = self.tick(delta_secs);
        }
        None
    }

    fn is_quiescent(&self) -> bool {
        self.wall
            .coordinator()
            .is_none_or(fadewall_core::coordinator::FadeCoordinator::is_quiescent)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "scripted deltas are small and positive"
)]
fn secs_to_nanos(secs: f32) -> u64 {
    (f64::from(secs) * 1e9 + 0.5) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use fadewall_core::channel::{FadeChannel, FadeDirection};
    use fadewall_core::config::LayerConfig;
    use fadewall_core::fadable::{FadePhase, RenderLayer, RenderableDesc, RenderableId};
    use fadewall_core::sensor::{SensorMode, TriggerSensor};
    use fadewall_render::PassKind;

    const DT: f32 = 0.1;

    fn approx(a: f32, b: f32) -> bool {
        let d = a - b;
        d < 1e-5 && d > -1e-5
    }

    fn harness() -> FadeHarness {
        FadeHarness::new(FadeConfig::default()).unwrap()
    }

    fn occluder(h: &mut FadeHarness, channel: FadeChannel, surface: u64) -> FadableId {
        h.add_fadable(
            FadableDesc::new(channel)
                .with_renderable(RenderableDesc::new(RenderableId(surface), RenderLayer(4))),
        )
    }

    #[test]
    fn plain_and_highlight_fade_independently() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let b = occluder(&mut h, FadeChannel::Highlight, 2);

        assert_eq!(h.increase_collision(a), Some(SubmitOutcome::Queued));
        assert_eq!(h.increase_collision(b), Some(SubmitOutcome::Queued));

        let _ = h.tick(DT);
        let coord = h.wall().coordinator().unwrap();
        assert_eq!(coord.cycle(FadeChannel::Plain).members(), [a]);
        assert_eq!(coord.cycle(FadeChannel::Highlight).members(), [b]);
        let kinds: Vec<_> = h.plan().passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [PassKind::PlainFade, PassKind::EdgesFading]);

        assert_eq!(h.run_until_quiescent(DT, 10), Some(2));

        let layers = LayerConfig::default();
        let store = h.wall().store();
        let ra = store.renderables(a)[0];
        assert!(!ra.enabled, "plain fade-out hides the object");
        let rb = store.renderables(b)[0];
        assert!(rb.enabled);
        assert_eq!(rb.layer, layers.show_edges_frozen, "highlight freezes as edges");
        assert_eq!(h.executor().completions(a).collect::<Vec<_>>(), [true]);
        assert_eq!(h.executor().completions(b).collect::<Vec<_>>(), [true]);

        let kinds: Vec<_> = h.plan().passes.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, [PassKind::EdgesFrozen]);

        let report = h.metrics().report();
        assert_eq!(report.cycles_started, [1, 1]);
        assert_eq!(report.cycles_completed, [1, 1]);
        assert_eq!(report.settled, 2);
    }

    #[test]
    fn exit_mid_fade_waits_for_the_running_cycle() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let _ = h.increase_collision(a);
        let _ = h.tick(DT);
        let _ = h.tick(DT);
        let coord = h.wall().coordinator().unwrap();
        assert!(approx(coord.opacity(FadeChannel::Plain), 0.4));

        assert_eq!(h.decrease_collision(a), Some(SubmitOutcome::Deferred));
        assert!(!h.wall().store().desired_fade_out(a));
        let coord = h.wall().coordinator().unwrap();
        assert_eq!(coord.cycle(FadeChannel::Plain).members(), [a], "still bound");
        assert_eq!(coord.cycle(FadeChannel::Plain).direction(), FadeDirection::Out);

        // The fade-out runs to completion first.
        let _ = h.tick(DT);
        let store = h.wall().store();
        assert_eq!(store.settled(a), FadeDirection::Out);
        assert_eq!(store.phase(a), FadePhase::Queued, "requeued for fade-in");
        assert!(!store.renderables(a)[0].enabled);

        // Only then does the fade-in cycle pick it up.
        let _ = h.tick(DT);
        let coord = h.wall().coordinator().unwrap();
        assert_eq!(coord.cycle(FadeChannel::Plain).direction(), FadeDirection::In);
        assert_eq!(coord.cycle(FadeChannel::Plain).members(), [a]);

        assert!(h.run_until_quiescent(DT, 10).is_some());
        assert_eq!(h.executor().completions(a).collect::<Vec<_>>(), [true, false]);
        let r = h.wall().store().renderables(a)[0];
        assert!(r.enabled);
        assert_eq!(r.layer, RenderLayer(4), "restored");

        let opacities: Vec<f32> = h.executor().opacities(FadeChannel::Plain).collect();
        assert!(
            opacities.windows(2).filter(|w| w[1] > w[0]).count() >= 1,
            "fade-in ramps up: {opacities:?}"
        );
    }

    #[test]
    fn deactivation_mid_fade_waits_for_the_running_cycle() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let _ = h.increase_collision(a);
        let _ = h.tick(DT);
        let _ = h.tick(DT);
        let coord = h.wall().coordinator().unwrap();
        assert!(approx(coord.opacity(FadeChannel::Plain), 0.4));

        assert_eq!(h.deactivate(a), Some(SubmitOutcome::Deferred));
        let store = h.wall().store();
        assert!(!store.desired_fade_out(a), "deactivation forces visible");
        assert_eq!(store.overlap_count(a), 1);
        let coord = h.wall().coordinator().unwrap();
        assert_eq!(coord.cycle(FadeChannel::Plain).members(), [a], "still bound");
        assert_eq!(coord.cycle(FadeChannel::Plain).direction(), FadeDirection::Out);

        let _ = h.tick(DT);
        let store = h.wall().store();
        assert_eq!(store.settled(a), FadeDirection::Out, "fade-out is not cancelled");
        assert_eq!(store.phase(a), FadePhase::Queued);

        assert!(h.run_until_quiescent(DT, 10).is_some());
        assert_eq!(h.executor().completions(a).collect::<Vec<_>>(), [true, false]);
        let store = h.wall().store();
        assert_eq!(store.settled(a), FadeDirection::In);
        assert_eq!(store.deactivation_depth(a), 1);
        let r = store.renderables(a)[0];
        assert!(r.enabled);
        assert_eq!(r.layer, RenderLayer(4), "restored");
    }

    #[test]
    fn deactivation_nests() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let _ = h.increase_collision(a);
        assert!(h.run_until_quiescent(DT, 10).is_some());
        assert_eq!(h.wall().store().settled(a), FadeDirection::Out);

        let _ = h.deactivate(a);
        let _ = h.deactivate(a);
        assert!(h.run_until_quiescent(DT, 10).is_some());
        assert_eq!(h.wall().store().settled(a), FadeDirection::In, "forced visible");

        h.activate(a);
        let store = h.wall().store();
        assert_eq!(store.deactivation_depth(a), 1);
        assert!(!store.desired_fade_out(a), "one request still outstanding");

        h.activate(a);
        let store = h.wall().store();
        assert_eq!(store.deactivation_depth(a), 0);
        assert!(store.desired_fade_out(a), "collision control resumes");
        assert_eq!(store.overlap_count(a), 1);
    }

    #[test]
    fn sensors_collapse_same_tick_overlaps() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let sensors: Vec<_> = (0..3)
            .map(|_| {
                h.drive(|wall, _| {
                    let s = wall.add_sensor(TriggerSensor::new(SensorMode::Collision));
                    wall.bind_sensor(s, a).unwrap();
                    s
                })
            })
            .collect();

        for _ in 0..2 {
            for &s in &sensors {
                h.drive(|wall, tracer| wall.sensor_stay(s, tracer));
            }
        }
        assert_eq!(h.wall().store().overlap_count(a), 3);
        assert_eq!(h.metrics().report().submissions, 1);

        assert!(h.run_until_quiescent(DT, 10).is_some());
        assert_eq!(h.executor().entries(a), 1);
    }

    #[test]
    fn ramp_reaches_bound_in_expected_ticks() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Highlight, 1);
        let _ = h.increase_collision(a);
        // Start tick plus ceil(1 / (6 * 0.05)) = 4 ramp ticks.
        assert_eq!(h.run_until_quiescent(0.05, 20), Some(5));
        let opacities: Vec<f32> = h.executor().opacities(FadeChannel::Highlight).collect();
        assert_eq!(opacities.len(), 5);
        assert!(opacities.windows(2).all(|w| w[1] <= w[0]), "{opacities:?}");
        assert_eq!(opacities.last().copied(), Some(0.0));
    }

    #[test]
    fn detached_harness_keeps_visual_state() {
        let mut h = harness();
        let a = occluder(&mut h, FadeChannel::Plain, 1);
        let _ = h.increase_collision(a);
        let _ = h.tick(DT);
        let detached = h.drive(|wall, tracer| wall.detach_coordinator(tracer));
        assert!(detached.is_some());

        let _ = h.tick(DT);
        assert!(h.plan().passes.is_empty());
        assert_eq!(h.decrease_collision(a), Some(SubmitOutcome::Detached));
        assert_eq!(h.run_until_quiescent(DT, 3), Some(0));

        let r = h.wall().store().renderables(a)[0];
        assert_eq!(r.layer, RenderLayer(4), "interrupted fade is undone");
        assert_eq!(h.metrics().report().cycles_completed, [1, 0]);
    }
}
