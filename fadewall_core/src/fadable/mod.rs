// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fadable data model.
//!
//! A *fadable* is a scene object that can be faded out when it occludes the
//! player. Each fadable has:
//!
//! - An identity ([`FadableId`]), a generational handle that becomes stale
//!   when the fadable is destroyed.
//! - A fixed [`FadeChannel`](crate::channel::FadeChannel).
//! - Overlap and deactivation counters, from which the *desired* direction is
//!   derived: fade out iff nothing deactivated it and at least one sensor
//!   reports an overlap.
//! - The renderables it owns, each with its original and current routing.
//!
//! Fadables are stored in struct-of-arrays layout. The counter operations
//! (`increase_collision`, `decrease_collision`, `deactivate`, `activate`)
//! live in the `control` submodule and take the coordinator explicitly, so
//! a fadable never holds a reference to it.

mod control;
mod evaluate;
mod id;
mod renderable;
mod store;

pub use evaluate::SurfaceChanges;
pub use id::{FadableId, RenderLayer, RenderableId};
pub use renderable::{Renderable, RenderableDesc};
pub use store::{FadableDesc, FadableStore, FadePhase};
