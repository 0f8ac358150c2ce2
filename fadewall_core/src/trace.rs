// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the fade pipeline.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! store, the sensors and the coordinator call as things happen. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`OpacityStepEvent`] and
//!   [`MemberEvent`] plus the corresponding `TraceSink` methods. These fire
//!   per tick and per member, so they are much noisier than the rest.

use crate::channel::{FadeChannel, FadeDirection};
use crate::coordinator::SubmitOutcome;
use crate::fadable::FadableId;
use crate::sensor::{SensorId, SensorSignal};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A recovered, non-fatal inconsistency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// `activate` was called with no outstanding deactivation; the depth
    /// stayed at zero.
    UnbalancedActivate,
    /// `decrease_collision` was called with no outstanding overlap; the count
    /// stayed at zero.
    UnbalancedDecrease,
    /// An operation named a fadable that no longer exists.
    StaleFadable,
    /// A fadable wanted to submit while no coordinator was attached.
    MissingCoordinator,
}

impl AnomalyKind {
    /// Returns a short snake-case name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnbalancedActivate => "unbalanced_activate",
            Self::UnbalancedDecrease => "unbalanced_decrease",
            Self::StaleFadable => "stale_fadable",
            Self::MissingCoordinator => "missing_coordinator",
        }
    }
}

/// What happened to a single cycle member.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberChange {
    /// Bound to a starting cycle.
    Entered,
    /// Released by a finished cycle.
    Completed,
    /// Moved back to pending because its desired direction changed mid-cycle.
    Requeued,
    /// Dropped from pending because it already rests in its desired state.
    Dropped,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a fadable asks the coordinator for a transition.
#[derive(Clone, Copy, Debug)]
pub struct SubmitEvent {
    /// Frame of the last coordinator update (0 before the first one).
    pub frame_index: u64,
    /// Host time of the last coordinator update.
    pub now: HostTime,
    /// The submitting fadable.
    pub fadable: FadableId,
    /// The fadable's channel.
    pub channel: FadeChannel,
    /// The requested direction.
    pub direction: FadeDirection,
    /// What the coordinator did with the request.
    pub outcome: SubmitOutcome,
}

/// Emitted when a channel binds a batch of fadables to a new cycle.
#[derive(Clone, Copy, Debug)]
pub struct CycleStartEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Which channel started cycling.
    pub channel: FadeChannel,
    /// Direction of the new cycle.
    pub direction: FadeDirection,
    /// Number of bound members.
    pub members: u32,
    /// Opacity the ramp starts from.
    pub opacity: f32,
}

/// Emitted when a channel's ramp reaches its bound.
#[derive(Clone, Copy, Debug)]
pub struct CycleCompleteEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Which channel went idle.
    pub channel: FadeChannel,
    /// Direction of the finished cycle.
    pub direction: FadeDirection,
    /// Number of members released.
    pub members: u32,
    /// Members moved straight back to pending.
    pub requeued: u32,
}

/// Emitted when a sensor forwards a latched presence transition.
#[derive(Clone, Copy, Debug)]
pub struct SensorEvent {
    /// The reporting sensor.
    pub sensor: SensorId,
    /// The fadable the sensor is bound to.
    pub fadable: FadableId,
    /// The forwarded signal.
    pub signal: SensorSignal,
}

/// Emitted when an inconsistency is absorbed.
#[derive(Clone, Copy, Debug)]
pub struct AnomalyEvent {
    /// Frame of the last coordinator update (0 if unknown).
    pub frame_index: u64,
    /// Host time of the last coordinator update.
    pub now: HostTime,
    /// What went wrong.
    pub kind: AnomalyKind,
    /// The fadable involved, if any.
    pub fadable: Option<FadableId>,
}

/// Emitted for every ramp step of a cycling channel.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct OpacityStepEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Which channel stepped.
    pub channel: FadeChannel,
    /// Direction of the running cycle.
    pub direction: FadeDirection,
    /// Opacity after the step.
    pub opacity: f32,
}

/// Emitted per member at cycle boundaries.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct MemberEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Channel of the cycle.
    pub channel: FadeChannel,
    /// The member.
    pub fadable: FadableId,
    /// What happened to it.
    pub change: MemberChange,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the fade pipeline.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a fadable submits.
    fn on_submit(&mut self, e: &SubmitEvent) {
        _ = e;
    }

    /// Called when a cycle starts.
    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        _ = e;
    }

    /// Called when a cycle completes.
    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        _ = e;
    }

    /// Called when a sensor forwards a signal.
    fn on_sensor(&mut self, e: &SensorEvent) {
        _ = e;
    }

    /// Called when an inconsistency is absorbed.
    fn on_anomaly(&mut self, e: &AnomalyEvent) {
        _ = e;
    }

    /// Called for every ramp step (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_opacity_step(&mut self, e: &OpacityStepEvent) {
        _ = e;
    }

    /// Called per member at cycle boundaries (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_member(&mut self, e: &MemberEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`SubmitEvent`].
    #[inline]
    pub fn submit(&mut self, e: &SubmitEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_submit(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleStartEvent`].
    #[inline]
    pub fn cycle_start(&mut self, e: &CycleStartEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_start(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CycleCompleteEvent`].
    #[inline]
    pub fn cycle_complete(&mut self, e: &CycleCompleteEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_cycle_complete(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SensorEvent`].
    #[inline]
    pub fn sensor(&mut self, e: &SensorEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sensor(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AnomalyEvent`].
    #[inline]
    pub fn anomaly(&mut self, e: &AnomalyEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_anomaly(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OpacityStepEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn opacity_step(&mut self, e: &OpacityStepEvent) {
        if let Some(s) = &mut self.sink {
            s.on_opacity_step(e);
        }
    }

    /// Emits a [`MemberEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn member(&mut self, e: &MemberEvent) {
        if let Some(s) = &mut self.sink {
            s.on_member(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_start() -> CycleStartEvent {
        CycleStartEvent {
            frame_index: 42,
            now: HostTime(1_000_000),
            channel: FadeChannel::Plain,
            direction: FadeDirection::Out,
            members: 3,
            opacity: 1.0,
        }
    }

    #[test]
    fn anomaly_names_are_snake_case() {
        assert_eq!(AnomalyKind::UnbalancedActivate.as_str(), "unbalanced_activate");
        assert_eq!(AnomalyKind::MissingCoordinator.as_str(), "missing_coordinator");
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_cycle_start(&sample_start());
        sink.on_anomaly(&AnomalyEvent {
            frame_index: 0,
            now: HostTime::default(),
            kind: AnomalyKind::StaleFadable,
            fadable: None,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.cycle_start(&sample_start());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            starts: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_cycle_start(&mut self, e: &CycleStartEvent) {
                self.starts.push(e.frame_index);
            }
        }

        let mut sink = RecordingSink { starts: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.cycle_start(&sample_start());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.starts, &[42]);
    }
}
