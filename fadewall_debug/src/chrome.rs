// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each channel gets its own track: a cycle is a `B`/`E` duration pair named
//! after its direction, opacity steps are a counter, and everything else is
//! an instant. Sensor events carry no timestamp of their own and are placed
//! at the time of the preceding timed event.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use fadewall_core::channel::{FadeChannel, FadeDirection};
use fadewall_core::time::Timebase;

use crate::recorder::{RecordedEvent, RecordedId, decode};

/// Track for events that do not belong to a channel.
const HOST_TID: u32 = 0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut cursor_us = 0.0;

    for recorded in decode(bytes) {
        if let Some(now) = recorded.now() {
            cursor_us = ticks_to_us(now.ticks(), timebase);
        }
        let ts = cursor_us;

        match recorded {
            RecordedEvent::Submit {
                frame_index,
                fadable,
                channel,
                direction,
                outcome,
                ..
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": "Submit",
                    "cat": "Fadable",
                    "ts": ts,
                    "pid": 0,
                    "tid": channel_tid(channel),
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "fadable": id_label(fadable),
                        "direction": direction.to_string(),
                        "outcome": outcome.as_str(),
                    }
                }));
            }
            RecordedEvent::CycleStart {
                frame_index,
                channel,
                direction,
                members,
                opacity,
                ..
            } => {
                events.push(json!({
                    "ph": "B",
                    "name": cycle_name(direction),
                    "cat": "Cycle",
                    "ts": ts,
                    "pid": 0,
                    "tid": channel_tid(channel),
                    "args": {
                        "frame_index": frame_index,
                        "members": members,
                        "opacity": opacity,
                    }
                }));
            }
            RecordedEvent::CycleComplete {
                frame_index,
                channel,
                direction,
                members,
                requeued,
                ..
            } => {
                events.push(json!({
                    "ph": "E",
                    "name": cycle_name(direction),
                    "cat": "Cycle",
                    "ts": ts,
                    "pid": 0,
                    "tid": channel_tid(channel),
                    "args": {
                        "frame_index": frame_index,
                        "members": members,
                        "requeued": requeued,
                    }
                }));
            }
            RecordedEvent::Sensor {
                sensor,
                fadable,
                signal,
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": signal.as_str(),
                    "cat": "Sensor",
                    "ts": ts,
                    "pid": 0,
                    "tid": HOST_TID,
                    "s": "t",
                    "args": {
                        "sensor": sensor,
                        "fadable": id_label(fadable),
                    }
                }));
            }
            RecordedEvent::Anomaly {
                frame_index,
                kind,
                fadable,
                ..
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": kind.as_str(),
                    "cat": "Anomaly",
                    "ts": ts,
                    "pid": 0,
                    "tid": HOST_TID,
                    "s": "g",
                    "args": {
                        "frame_index": frame_index,
                        "fadable": fadable.map(id_label),
                    }
                }));
            }
            RecordedEvent::OpacityStep {
                channel, opacity, ..
            } => {
                events.push(json!({
                    "ph": "C",
                    "name": format!("{channel} opacity"),
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": channel_tid(channel),
                    "args": {
                        "opacity": opacity,
                    }
                }));
            }
            RecordedEvent::Member {
                frame_index,
                channel,
                fadable,
                change,
                ..
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{change:?}"),
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": channel_tid(channel),
                    "s": "t",
                    "args": {
                        "frame_index": frame_index,
                        "fadable": id_label(fadable),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "two channels, index always fits"
)]
fn channel_tid(channel: FadeChannel) -> u32 {
    channel.index() as u32 + 1
}

fn cycle_name(direction: FadeDirection) -> &'static str {
    match direction {
        FadeDirection::In => "FadeIn",
        FadeDirection::Out => "FadeOut",
    }
}

fn id_label(id: RecordedId) -> String {
    format!("{}@{}", id.index, id.generation)
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use fadewall_core::config::FadeConfig;
    use fadewall_core::executor::NullExecutor;
    use fadewall_core::fadable::FadableDesc;
    use fadewall_core::time::{FrameClock, HostTime};
    use fadewall_core::trace::Tracer;
    use fadewall_core::wall::FadeWall;

    fn record_fade_out() -> Vec<u8> {
        let mut wall = FadeWall::new(FadeConfig::default()).unwrap();
        let id = wall.add_fadable(FadableDesc::new(FadeChannel::Highlight));
        let mut clock = FrameClock::new(Timebase::NANOS);
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            let _ = wall.increase_collision(id, &mut tracer);
            for i in 0..4_u64 {
                let tick = clock.tick(HostTime(i * 100_000_000));
                wall.update(&tick, &mut NullExecutor, &mut tracer);
            }
        }
        rec.into_bytes()
    }

    #[test]
    fn cycles_become_duration_events() {
        let mut out = Vec::new();
        export(&record_fade_out(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();

        let begin = parsed.iter().find(|e| e["ph"] == "B").unwrap();
        let end = parsed.iter().find(|e| e["ph"] == "E").unwrap();
        assert_eq!(begin["name"], "FadeOut");
        assert_eq!(end["name"], "FadeOut");
        assert_eq!(begin["tid"], 2, "highlight track");
        assert_eq!(begin["tid"], end["tid"]);
        assert!(end["ts"].as_f64().unwrap() > begin["ts"].as_f64().unwrap());
        assert!(parsed.iter().any(|e| e["ph"] == "C"), "opacity counter");
    }

    #[test]
    fn sensor_events_inherit_the_last_timestamp() {
        let mut wall = FadeWall::new(FadeConfig::default()).unwrap();
        let id = wall.add_fadable(FadableDesc::new(FadeChannel::Plain));
        let sensor = wall.add_sensor(fadewall_core::sensor::TriggerSensor::new(
            fadewall_core::sensor::SensorMode::Collision,
        ));
        wall.bind_sensor(sensor, id).unwrap();

        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            let mut clock = FrameClock::new(Timebase::NANOS);
            let tick = clock.tick(HostTime(5_000));
            wall.update(&tick, &mut NullExecutor, &mut tracer);
            wall.sensor_stay(sensor, &mut tracer);
        }

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        let sensor_event = parsed.iter().find(|e| e["cat"] == "Sensor").unwrap();
        let submit = parsed.iter().find(|e| e["name"] == "Submit").unwrap();
        assert_eq!(sensor_event["name"], "increase_collision");
        assert_eq!(sensor_event["ts"], 0.0, "nothing timed precedes it");
        assert_eq!(submit["ts"], 5.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
