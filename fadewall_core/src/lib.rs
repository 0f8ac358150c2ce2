// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion-fade coordination for real-time renderers.
//!
//! `fadewall_core` decides which scene objects ("fadables") fade out when
//! they occlude the player and which fade back in, batches simultaneous
//! requests into shared per-channel fade cycles, and drives one linear
//! opacity ramp per channel to completion. It is `no_std` compatible (with
//! `alloc`) and never draws anything itself.
//!
//! # Architecture
//!
//! ```text
//!   physics overlaps / probe zones
//!       │
//!       ▼
//!   TriggerSensor (latched) ──► FadableStore counters ──► FadeCoordinator::submit
//!                                                              │
//!                 ┌────────────────────────────────────────────┘
//!                 ▼
//!   FadeCoordinator::update(FrameTick) ──► RenderExecutor callbacks
//!                 │
//!                 ▼
//!   FadableStore::evaluate() ──► SurfaceChanges ──► engine layer/enabled updates
//! ```
//!
//! **[`fadable`]**: Struct-of-arrays fadable storage with generational
//! handles, overlap and deactivation counters, and renderable routing.
//!
//! **[`sensor`]** and **[`zone`]**: Latched presence sensors with optional
//! `kurbo` footprints.
//!
//! **[`coordinator`]**: The pending set and the per-channel
//! `Idle → Cycling → Idle` state machines.
//!
//! **[`ramp`]**: The frame-rate independent linear opacity ramp.
//!
//! **[`executor`]**: The [`RenderExecutor`](executor::RenderExecutor) seam
//! the coordinator drives.
//!
//! **[`wall`]**: The [`FadeWall`](wall::FadeWall) facade hosts talk to.
//!
//! **[`time`]**: Host time, timebases and per-frame ticks.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-tick
//!   opacity-step and per-member events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod dirty;
pub mod error;
pub mod executor;
pub mod fadable;
pub mod ramp;
pub mod sensor;
pub mod time;
pub mod trace;
pub mod wall;
pub mod zone;
