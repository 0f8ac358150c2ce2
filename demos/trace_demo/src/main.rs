// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated walk past occluding walls that exercises the tracing and
//! diagnostics pipeline.
//!
//! A probe walks left to right for 180 synthetic frames, passing behind a
//! plain wall, an edge-highlighted pillar and a doorway whose deactivation
//! zone keeps the pillar visible. Events go to both a
//! [`PrettyPrintSink`](fadewall_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](fadewall_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use kurbo::{Circle, Point, Rect};

use fadewall_core::channel::FadeChannel;
use fadewall_core::config::FadeConfig;
use fadewall_core::executor::NullExecutor;
use fadewall_core::fadable::{FadableDesc, RenderLayer, RenderableDesc, RenderableId};
use fadewall_core::sensor::{SensorMode, TriggerSensor};
use fadewall_core::time::{FrameClock, HostTime, Timebase};
use fadewall_core::trace::{
    AnomalyEvent, CycleCompleteEvent, CycleStartEvent, MemberEvent, OpacityStepEvent,
    SensorEvent, SubmitEvent, TraceSink, Tracer,
};
use fadewall_core::wall::FadeWall;

use fadewall_debug::pretty::PrettyPrintSink;
use fadewall_debug::recorder::RecorderSink;

const FRAME_COUNT: u64 = 180;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;
/// Probe speed in world units per frame.
const STEP: f64 = 0.1;

/// Forwards every event to two sinks.
struct Tee<'a> {
    first: &'a mut dyn TraceSink,
    second: &'a mut dyn TraceSink,
}

impl TraceSink for Tee<'_> {
    fn on_submit(&mut self, e: &SubmitEvent) {
        self.first.on_submit(e);
        self.second.on_submit(e);
    }

    fn on_cycle_start(&mut self, e: &CycleStartEvent) {
        self.first.on_cycle_start(e);
        self.second.on_cycle_start(e);
    }

    fn on_cycle_complete(&mut self, e: &CycleCompleteEvent) {
        self.first.on_cycle_complete(e);
        self.second.on_cycle_complete(e);
    }

    fn on_sensor(&mut self, e: &SensorEvent) {
        self.first.on_sensor(e);
        self.second.on_sensor(e);
    }

    fn on_anomaly(&mut self, e: &AnomalyEvent) {
        self.first.on_anomaly(e);
        self.second.on_anomaly(e);
    }

    fn on_opacity_step(&mut self, e: &OpacityStepEvent) {
        self.first.on_opacity_step(e);
        self.second.on_opacity_step(e);
    }

    fn on_member(&mut self, e: &MemberEvent) {
        self.first.on_member(e);
        self.second.on_member(e);
    }
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let mut recorder = RecorderSink::new();

    // -- scene -------------------------------------------------------------
    let mut wall = FadeWall::new(FadeConfig::default()).expect("default config is valid");

    let plain = wall.add_fadable(
        FadableDesc::new(FadeChannel::Plain)
            .with_renderable(RenderableDesc::new(RenderableId(1), RenderLayer(0))),
    );
    let pillar = wall.add_fadable(
        FadableDesc::new(FadeChannel::Highlight)
            .with_renderable(RenderableDesc::new(RenderableId(2), RenderLayer(0)))
            .with_renderable(RenderableDesc::new(RenderableId(3), RenderLayer(1))),
    );

    let zones = [
        (
            plain,
            TriggerSensor::new(SensorMode::Collision).with_zone(Rect::new(2.0, -1.0, 6.0, 1.0)),
        ),
        (
            pillar,
            TriggerSensor::new(SensorMode::Collision)
                .with_zone(Circle::new(Point::new(9.0, 0.0), 1.5)),
        ),
        (
            pillar,
            TriggerSensor::new(SensorMode::Deactivation)
                .with_zone(Rect::new(10.0, -1.0, 12.0, 1.0)),
        ),
    ];
    for (fadable, sensor) in zones {
        let id = wall.add_sensor(sensor);
        wall.bind_sensor(id, fadable)
            .expect("fresh sensors bind to live fadables");
    }

    // -- simulated loop ----------------------------------------------------
    let mut clock = FrameClock::new(timebase);
    let mut now_ticks: u64 = 1_000_000_000; // start at 1s
    let mut x = 0.0;

    for _ in 0..FRAME_COUNT {
        let mut tee = Tee {
            first: &mut pretty,
            second: &mut recorder,
        };
        let mut tracer = Tracer::new(&mut tee);

        let probe = Circle::new(Point::new(x, 0.0), 0.5);
        wall.observe_probe(&probe, &mut tracer);

        let tick = clock.tick(HostTime(now_ticks));
        wall.update(&tick, &mut NullExecutor, &mut tracer);
        let _ = wall.store_mut().evaluate();

        x += STEP;
        now_ticks += REFRESH_INTERVAL_NS;
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    fadewall_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
