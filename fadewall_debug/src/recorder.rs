// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Handles are stored by value, so decoded events carry a [`RecordedId`]
//! rather than a live [`FadableId`].

use fadewall_core::channel::{FadeChannel, FadeDirection};
use fadewall_core::coordinator::SubmitOutcome;
use fadewall_core::fadable::FadableId;
use fadewall_core::sensor::SensorSignal;
use fadewall_core::time::HostTime;
use fadewall_core::trace::{
    AnomalyEvent, AnomalyKind, CycleCompleteEvent, CycleStartEvent, MemberChange, MemberEvent,
    OpacityStepEvent, SensorEvent, SubmitEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SUBMIT: u8 = 1;
const TAG_CYCLE_START: u8 = 2;
const TAG_CYCLE_COMPLETE: u8 = 3;
const TAG_SENSOR: u8 = 4;
const TAG_ANOMALY: u8 = 5;
const TAG_OPACITY_STEP: u8 = 6;
const TAG_MEMBER: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_stamp(&mut self, frame_index: u64, now: HostTime) {
        self.write_u64(frame_index);
        self.write_u64(now.ticks());
    }

    fn write_fadable(&mut self, id: FadableId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_fadable(&mut self, id: Option<FadableId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_fadable(id);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
        }
    }

    fn write_channel(&mut self, c: FadeChannel) {
        self.write_u8(match c {
            FadeChannel::Plain => 0,
            FadeChannel::Highlight => 1,
        });
    }

    fn write_direction(&mut self, d: FadeDirection) {
        self.write_u8(match d {
            FadeDirection::In => 0,
            FadeDirection::Out => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_submit(&mut self, e: &SubmitEvent) {
        self.write_u8(TAG_SUBMIT);
        self.write_stamp(e.frame_index, e.now);
        self.write_fadable(e.fadable);
        self.write_channel(e.channel);
        self.write_direction(e.direction);
        self.write_u8(match e.outcome {
            SubmitOutcome::Queued => 0,
            SubmitOutcome::AlreadyQueued => 1,
            SubmitOutcome::Deferred => 2,
            SubmitOutcome::Detached => 3,
        });
    }

    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        self.write_u8(TAG_CYCLE_START);
        self.write_stamp(e.frame_index, e.now);
        self.write_channel(e.channel);
        self.write_direction(e.direction);
        self.write_u32(e.members);
        self.write_f32(e.opacity);
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        self.write_u8(TAG_CYCLE_COMPLETE);
        self.write_stamp(e.frame_index, e.now);
        self.write_channel(e.channel);
        self.write_direction(e.direction);
        self.write_u32(e.members);
        self.write_u32(e.requeued);
    }

    fn on_sensor(&mut self, e: &SensorEvent) {
        self.write_u8(TAG_SENSOR);
        self.write_u32(e.sensor.index());
        self.write_fadable(e.fadable);
        self.write_u8(match e.signal {
            SensorSignal::IncreaseCollision => 0,
            SensorSignal::DecreaseCollision => 1,
            SensorSignal::Deactivate => 2,
            SensorSignal::Activate => 3,
        });
    }

    fn on_anomaly(&mut self, e: &AnomalyEvent) {
        self.write_u8(TAG_ANOMALY);
        self.write_stamp(e.frame_index, e.now);
        self.write_u8(match e.kind {
            AnomalyKind::UnbalancedActivate => 0,
            AnomalyKind::UnbalancedDecrease => 1,
            AnomalyKind::StaleFadable => 2,
            AnomalyKind::MissingCoordinator => 3,
        });
        self.write_option_fadable(e.fadable);
    }

    fn on_opacity_step(&mut self, e: &OpacityStepEvent) {
        self.write_u8(TAG_OPACITY_STEP);
        self.write_stamp(e.frame_index, e.now);
        self.write_channel(e.channel);
        self.write_direction(e.direction);
        self.write_f32(e.opacity);
    }

    fn on_member(&mut self, e: &MemberEvent) {
        self.write_u8(TAG_MEMBER);
        self.write_stamp(e.frame_index, e.now);
        self.write_channel(e.channel);
        self.write_fadable(e.fadable);
        self.write_u8(match e.change {
            MemberChange::Entered => 0,
            MemberChange::Completed => 1,
            MemberChange::Requeued => 2,
            MemberChange::Dropped => 3,
        });
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A fadable handle as it was recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordedId {
    /// Slot index.
    pub index: u32,
    /// Generation counter.
    pub generation: u32,
}

impl From<FadableId> for RecordedId {
    fn from(id: FadableId) -> Self {
        Self {
            index: id.index(),
            generation: id.generation(),
        }
    }
}

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`SubmitEvent`].
    Submit {
        /// Frame of the last coordinator update.
        frame_index: u64,
        /// Host time of the last coordinator update.
        now: HostTime,
        /// The submitting fadable.
        fadable: RecordedId,
        /// Its channel.
        channel: FadeChannel,
        /// Requested direction.
        direction: FadeDirection,
        /// What the coordinator did.
        outcome: SubmitOutcome,
    },
    /// A [`CycleStartEvent`].
    CycleStart {
        /// Frame counter.
        frame_index: u64,
        /// Host time of the tick.
        now: HostTime,
        /// Cycling channel.
        channel: FadeChannel,
        /// Cycle direction.
        direction: FadeDirection,
        /// Bound members.
        members: u32,
        /// Start opacity.
        opacity: f32,
    },
    /// A [`CycleCompleteEvent`].
    CycleComplete {
        /// Frame counter.
        frame_index: u64,
        /// Host time of the tick.
        now: HostTime,
        /// Channel that went idle.
        channel: FadeChannel,
        /// Direction of the finished cycle.
        direction: FadeDirection,
        /// Released members.
        members: u32,
        /// Members moved back to pending.
        requeued: u32,
    },
    /// A [`SensorEvent`].
    Sensor {
        /// Raw sensor index.
        sensor: u32,
        /// Bound fadable.
        fadable: RecordedId,
        /// Forwarded signal.
        signal: SensorSignal,
    },
    /// An [`AnomalyEvent`].
    Anomaly {
        /// Frame of the last coordinator update.
        frame_index: u64,
        /// Host time of the last coordinator update.
        now: HostTime,
        /// What went wrong.
        kind: AnomalyKind,
        /// The fadable involved, if any.
        fadable: Option<RecordedId>,
    },
    /// An [`OpacityStepEvent`].
    OpacityStep {
        /// Frame counter.
        frame_index: u64,
        /// Host time of the tick.
        now: HostTime,
        /// Stepping channel.
        channel: FadeChannel,
        /// Cycle direction.
        direction: FadeDirection,
        /// Opacity after the step.
        opacity: f32,
    },
    /// A [`MemberEvent`].
    Member {
        /// Frame counter.
        frame_index: u64,
        /// Host time of the tick.
        now: HostTime,
        /// Cycle channel.
        channel: FadeChannel,
        /// The member.
        fadable: RecordedId,
        /// What happened to it.
        change: MemberChange,
    },
}

impl RecordedEvent {
    /// Returns the host time stamped on the event, if it carries one.
    #[must_use]
    pub fn now(&self) -> Option<HostTime> {
        match *self {
            Self::Submit { now, .. }
            | Self::CycleStart { now, .. }
            | Self::CycleComplete { now, .. }
            | Self::Anomaly { now, .. }
            | Self::OpacityStep { now, .. }
            | Self::Member { now, .. } => Some(now),
            Self::Sensor { .. } => None,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f32(&mut self) -> Option<f32> {
        self.read_u32().map(f32::from_bits)
    }

    fn read_stamp(&mut self) -> Option<(u64, HostTime)> {
        Some((self.read_u64()?, HostTime(self.read_u64()?)))
    }

    fn read_fadable(&mut self) -> Option<RecordedId> {
        Some(RecordedId {
            index: self.read_u32()?,
            generation: self.read_u32()?,
        })
    }

    fn read_option_fadable(&mut self) -> Option<Option<RecordedId>> {
        let present = self.read_u8()?;
        let id = self.read_fadable()?;
        Some(if present != 0 { Some(id) } else { None })
    }

    fn read_channel(&mut self) -> Option<FadeChannel> {
        Some(match self.read_u8()? {
            0 => FadeChannel::Plain,
            _ => FadeChannel::Highlight,
        })
    }

    fn read_direction(&mut self) -> Option<FadeDirection> {
        Some(match self.read_u8()? {
            0 => FadeDirection::In,
            _ => FadeDirection::Out,
        })
    }

    fn decode_submit(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::Submit {
            frame_index,
            now,
            fadable: self.read_fadable()?,
            channel: self.read_channel()?,
            direction: self.read_direction()?,
            outcome: match self.read_u8()? {
                0 => SubmitOutcome::Queued,
                1 => SubmitOutcome::AlreadyQueued,
                2 => SubmitOutcome::Deferred,
                _ => SubmitOutcome::Detached,
            },
        })
    }

    fn decode_cycle_start(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::CycleStart {
            frame_index,
            now,
            channel: self.read_channel()?,
            direction: self.read_direction()?,
            members: self.read_u32()?,
            opacity: self.read_f32()?,
        })
    }

    fn decode_cycle_complete(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::CycleComplete {
            frame_index,
            now,
            channel: self.read_channel()?,
            direction: self.read_direction()?,
            members: self.read_u32()?,
            requeued: self.read_u32()?,
        })
    }

    fn decode_sensor(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Sensor {
            sensor: self.read_u32()?,
            fadable: self.read_fadable()?,
            signal: match self.read_u8()? {
                0 => SensorSignal::IncreaseCollision,
                1 => SensorSignal::DecreaseCollision,
                2 => SensorSignal::Deactivate,
                _ => SensorSignal::Activate,
            },
        })
    }

    fn decode_anomaly(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::Anomaly {
            frame_index,
            now,
            kind: match self.read_u8()? {
                0 => AnomalyKind::UnbalancedActivate,
                1 => AnomalyKind::UnbalancedDecrease,
                2 => AnomalyKind::StaleFadable,
                _ => AnomalyKind::MissingCoordinator,
            },
            fadable: self.read_option_fadable()?,
        })
    }

    fn decode_opacity_step(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::OpacityStep {
            frame_index,
            now,
            channel: self.read_channel()?,
            direction: self.read_direction()?,
            opacity: self.read_f32()?,
        })
    }

    fn decode_member(&mut self) -> Option<RecordedEvent> {
        let (frame_index, now) = self.read_stamp()?;
        Some(RecordedEvent::Member {
            frame_index,
            now,
            channel: self.read_channel()?,
            fadable: self.read_fadable()?,
            change: match self.read_u8()? {
                0 => MemberChange::Entered,
                1 => MemberChange::Completed,
                2 => MemberChange::Requeued,
                _ => MemberChange::Dropped,
            },
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SUBMIT => self.decode_submit(),
            TAG_CYCLE_START => self.decode_cycle_start(),
            TAG_CYCLE_COMPLETE => self.decode_cycle_complete(),
            TAG_SENSOR => self.decode_sensor(),
            TAG_ANOMALY => self.decode_anomaly(),
            TAG_OPACITY_STEP => self.decode_opacity_step(),
            TAG_MEMBER => self.decode_member(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use fadewall_core::config::FadeConfig;
    use fadewall_core::executor::NullExecutor;
    use fadewall_core::fadable::FadableDesc;
    use fadewall_core::sensor::{SensorMode, TriggerSensor};
    use fadewall_core::time::FrameTick;
    use fadewall_core::trace::Tracer;
    use fadewall_core::wall::FadeWall;

    #[test]
    fn records_a_full_fade_out() {
        let mut wall = FadeWall::new(FadeConfig::default()).unwrap();
        let id = wall.add_fadable(FadableDesc::new(FadeChannel::Plain));
        let sensor = wall.add_sensor(TriggerSensor::new(SensorMode::Collision));
        wall.bind_sensor(sensor, id).unwrap();

        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            wall.sensor_stay(sensor, &mut tracer);
            for frame in 0..3 {
                let tick = FrameTick::from_delta(frame, 0.25);
                wall.update(&tick, &mut NullExecutor, &mut tracer);
            }
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        let expected_id = RecordedId::from(id);
        assert_eq!(
            events[0],
            RecordedEvent::Sensor {
                sensor: sensor.index(),
                fadable: expected_id,
                signal: SensorSignal::IncreaseCollision,
            }
        );
        assert!(matches!(
            events[1],
            RecordedEvent::Submit {
                fadable,
                direction: FadeDirection::Out,
                outcome: SubmitOutcome::Queued,
                ..
            } if fadable == expected_id
        ));
        assert!(events.iter().any(|e| matches!(
            e,
            RecordedEvent::CycleStart {
                channel: FadeChannel::Plain,
                members: 1,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            RecordedEvent::Member {
                change: MemberChange::Completed,
                ..
            }
        )));
        assert!(matches!(
            events.last(),
            Some(RecordedEvent::CycleComplete {
                direction: FadeDirection::Out,
                members: 1,
                requeued: 0,
                ..
            })
        ));
    }

    #[test]
    fn anomaly_without_fadable_survives_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_anomaly(&AnomalyEvent {
            frame_index: 9,
            now: HostTime(1_234),
            kind: AnomalyKind::MissingCoordinator,
            fadable: None,
        });
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::Anomaly {
                frame_index: 9,
                now: HostTime(1_234),
                kind: AnomalyKind::MissingCoordinator,
                fadable: None,
            }]
        );
        assert_eq!(events[0].now(), Some(HostTime(1_234)));
    }

    #[test]
    fn opacity_is_stored_bit_exact() {
        let mut rec = RecorderSink::new();
        rec.on_opacity_step(&OpacityStepEvent {
            frame_index: 4,
            now: HostTime(0),
            channel: FadeChannel::Highlight,
            direction: FadeDirection::In,
            opacity: 0.1 + 0.2,
        });
        match decode(rec.as_bytes()).next() {
            Some(RecordedEvent::OpacityStep { opacity, .. }) => {
                assert_eq!(opacity.to_bits(), (0.1_f32 + 0.2).to_bits());
            }
            other => panic!("expected OpacityStep, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_cycle_complete(&CycleCompleteEvent {
            frame_index: 1,
            now: HostTime(10),
            channel: FadeChannel::Plain,
            direction: FadeDirection::In,
            members: 3,
            requeued: 0,
        });
        let bytes = rec.into_bytes();
        assert_eq!(decode(&bytes).count(), 1);
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
