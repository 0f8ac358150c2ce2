// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-plan definitions for fade wall passes.
//!
//! This crate provides the intermediate representation between
//! [`fadewall_core`]'s coordinator state and backend-specific rendering. It
//! defines:
//!
//! - [`RenderPass`]: one layer-filtered draw pass with its opacity and, for
//!   edge passes, the edge-effect parameters
//! - [`RenderPlan`]: the ordered passes, culling mask and renderable updates
//!   for one frame
//! - [`EdgeStyle`] and [`EdgeParams`]: the tunables of the edge-highlight
//!   effect and their per-pass resolution

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod plan;
mod style;

pub use plan::{PassKind, RenderPass, RenderPlan, SurfaceUpdate, culling_mask};
pub use style::{Color, EdgeParams, EdgeStyle};
