// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Submission-to-settle latency and cycle counts.

use alloc::vec::Vec;

use fadewall_core::coordinator::SubmitOutcome;
use fadewall_core::fadable::{FadableId, FadableStore, FadePhase};
use fadewall_core::time::{HostTime, Timebase};
use fadewall_core::trace::{CycleCompleteEvent, CycleStartEvent, SubmitEvent, TraceSink};

/// Aggregated report returned by [`FadeMetrics::report`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricsReport {
    /// Submissions observed, debounced ones included.
    pub submissions: u64,
    /// Waits that ended with the fadable settled.
    pub settled: u64,
    /// Waits still open.
    pub outstanding: u64,
    /// Cycles started, indexed by [`FadeChannel::index`](fadewall_core::channel::FadeChannel::index).
    pub cycles_started: [u64; 2],
    /// Cycles completed, indexed like `cycles_started`.
    pub cycles_completed: [u64; 2],
    /// Mean seconds from first submission to settle.
    pub mean_latency_secs: f64,
    /// Worst seconds from first submission to settle.
    pub max_latency_secs: f64,
}

/// Tracks how long fadables take to settle after they submit.
///
/// Feed it trace events (it is a [`TraceSink`]) and call
/// [`observe`](Self::observe) after every tick. A fadable counts as settled
/// once it is neither pending nor cycling and rests in its desired state.
/// Repeated submissions while a wait is open keep the earliest start.
/// Detached submissions are ignored since nothing will ever settle them.
#[derive(Clone, Debug)]
pub struct FadeMetrics {
    timebase: Timebase,
    open: Vec<(FadableId, HostTime)>,
    submissions: u64,
    settled: u64,
    total_latency_secs: f64,
    max_latency_secs: f64,
    cycles_started: [u64; 2],
    cycles_completed: [u64; 2],
}

impl FadeMetrics {
    /// Creates empty metrics measuring time with `timebase`.
    #[must_use]
    pub fn new(timebase: Timebase) -> Self {
        Self {
            timebase,
            open: Vec::new(),
            submissions: 0,
            settled: 0,
            total_latency_secs: 0.0,
            max_latency_secs: 0.0,
            cycles_started: [0; 2],
            cycles_completed: [0; 2],
        }
    }

    /// Closes the wait of every fadable that has settled by `now`.
    ///
    /// Destroyed fadables are dropped without a sample.
    pub fn observe(&mut self, store: &FadableStore, now: HostTime) {
        let timebase = self.timebase;
        let mut closed = Vec::new();
        self.open.retain(|&(id, since)| {
            if !store.is_alive(id) {
                return false;
            }
            let done =
                store.phase(id) == FadePhase::Settled && store.settled(id) == store.desired(id);
            if done {
                let nanos = timebase.ticks_to_nanos(now.saturating_ticks_since(since));
                closed.push(nanos as f64 / 1e9);
            }
            !done
        });
        for latency in closed {
            self.settled += 1;
            self.total_latency_secs += latency;
            if latency > self.max_latency_secs {
                self.max_latency_secs = latency;
            }
        }
    }

    /// Returns whether `fadable` is still waiting to settle.
    #[must_use]
    pub fn is_waiting(&self, fadable: FadableId) -> bool {
        self.open.iter().any(|&(id, _)| id == fadable)
    }

    /// Summarizes everything observed so far.
    #[must_use]
    pub fn report(&self) -> MetricsReport {
        let mean = if self.settled == 0 {
            0.0
        } else {
            self.total_latency_secs / self.settled as f64
        };
        MetricsReport {
            submissions: self.submissions,
            settled: self.settled,
            outstanding: self.open.len() as u64,
            cycles_started: self.cycles_started,
            cycles_completed: self.cycles_completed,
            mean_latency_secs: mean,
            max_latency_secs: self.max_latency_secs,
        }
    }
}

impl TraceSink for FadeMetrics {
    fn on_submit(&mut self, e: &SubmitEvent) {
        if e.outcome == SubmitOutcome::Detached {
            return;
        }
        self.submissions = self.submissions.saturating_add(1);
        if !self.is_waiting(e.fadable) {
            self.open.push((e.fadable, e.now));
        }
    }

    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        self.cycles_started[e.channel.index()] += 1;
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        self.cycles_completed[e.channel.index()] += 1;
    }
}
