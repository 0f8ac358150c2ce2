// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use fadewall_core::fadable::FadableId;
use fadewall_core::time::{HostTime, Timebase};
use fadewall_core::trace::{
    AnomalyEvent, CycleCompleteEvent, CycleStartEvent, MemberChange, MemberEvent,
    OpacityStepEvent, SensorEvent, SubmitEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

fn fadable(id: FadableId) -> String {
    format!("{}@{}", id.index(), id.generation())
}

fn member_change_name(change: MemberChange) -> &'static str {
    match change {
        MemberChange::Entered => "entered",
        MemberChange::Completed => "completed",
        MemberChange::Requeued => "requeued",
        MemberChange::Dropped => "dropped",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_submit(&mut self, e: &SubmitEvent) {
        let _ = writeln!(
            self.writer,
            "[submit] frame={} at {:.3}ms fadable={} channel={} dir={} outcome={}",
            e.frame_index,
            self.host_ms(e.now),
            fadable(e.fadable),
            e.channel,
            e.direction,
            e.outcome.as_str(),
        );
    }

    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        let _ = writeln!(
            self.writer,
            "[cycle:start] frame={} at {:.3}ms channel={} dir={} members={} opacity={:.3}",
            e.frame_index,
            self.host_ms(e.now),
            e.channel,
            e.direction,
            e.members,
            e.opacity,
        );
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        let _ = writeln!(
            self.writer,
            "[cycle:end] frame={} at {:.3}ms channel={} dir={} members={} requeued={}",
            e.frame_index,
            self.host_ms(e.now),
            e.channel,
            e.direction,
            e.members,
            e.requeued,
        );
    }

    fn on_sensor(&mut self, e: &SensorEvent) {
        let _ = writeln!(
            self.writer,
            "[sensor] sensor={} fadable={} signal={}",
            e.sensor.index(),
            fadable(e.fadable),
            e.signal.as_str(),
        );
    }

    fn on_anomaly(&mut self, e: &AnomalyEvent) {
        let who = e.fadable.map_or_else(|| "-".to_owned(), fadable);
        let _ = writeln!(
            self.writer,
            "[anomaly] frame={} at {:.3}ms kind={} fadable={who}",
            e.frame_index,
            self.host_ms(e.now),
            e.kind.as_str(),
        );
    }

    fn on_opacity_step(&mut self, e: &OpacityStepEvent) {
        let _ = writeln!(
            self.writer,
            "[opacity] frame={} channel={} dir={} opacity={:.3}",
            e.frame_index, e.channel, e.direction, e.opacity,
        );
    }

    fn on_member(&mut self, e: &MemberEvent) {
        let _ = writeln!(
            self.writer,
            "[member] frame={} channel={} fadable={} {}",
            e.frame_index,
            e.channel,
            fadable(e.fadable),
            member_change_name(e.change),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fadewall_core::channel::{FadeChannel, FadeDirection};
    use fadewall_core::coordinator::SubmitOutcome;
    use fadewall_core::fadable::{FadableDesc, FadableStore};
    use fadewall_core::trace::AnomalyKind;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_submit() {
        let mut store = FadableStore::new();
        let id = store.create(FadableDesc::new(FadeChannel::Highlight));
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_submit(&SubmitEvent {
            frame_index: 3,
            now: HostTime(2_500_000),
            fadable: id,
            channel: FadeChannel::Highlight,
            direction: FadeDirection::Out,
            outcome: SubmitOutcome::Queued,
        });
        let out = output(sink);
        assert!(out.starts_with("[submit] frame=3 at 2.500ms"), "got: {out}");
        assert!(out.contains("fadable=0@0"), "got: {out}");
        assert!(out.contains("channel=highlight dir=out outcome=queued"), "got: {out}");
    }

    #[test]
    fn anomaly_without_fadable_prints_dash() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_anomaly(&AnomalyEvent {
            frame_index: 0,
            now: HostTime(1_000),
            kind: AnomalyKind::MissingCoordinator,
            fadable: None,
        });
        let out = output(sink);
        assert_eq!(
            out,
            "[anomaly] frame=0 at 1.000ms kind=missing_coordinator fadable=-\n"
        );
    }

    #[test]
    fn one_line_per_event() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        let start = CycleStartEvent {
            frame_index: 1,
            now: HostTime(0),
            channel: FadeChannel::Plain,
            direction: FadeDirection::Out,
            members: 2,
            opacity: 1.0,
        };
        sink.on_cycle_start(&start);
        sink.on_opacity_step(&OpacityStepEvent {
            frame_index: 2,
            now: HostTime(0),
            channel: FadeChannel::Plain,
            direction: FadeDirection::Out,
            opacity: 0.5,
        });
        sink.on_cycle_complete(&CycleCompleteEvent {
            frame_index: 3,
            now: HostTime(0),
            channel: FadeChannel::Plain,
            direction: FadeDirection::Out,
            members: 2,
            requeued: 1,
        });
        let out = output(sink);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("[cycle:start]"));
        assert!(lines[1].contains("opacity=0.500"));
        assert!(lines[2].ends_with("members=2 requeued=1"));
    }
}
