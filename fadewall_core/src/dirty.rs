// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The [`FadableStore`](crate::fadable::FadableStore) tracks which fadables
//! need their engine-side surfaces rewritten (via [`understory_dirty`]). Both
//! channels are local-only: a fadable has no parent or children, so marks
//! never propagate.
//!
//! Callers never query dirty state directly. Each
//! [`FadableStore::evaluate`](crate::fadable::FadableStore::evaluate) call
//! drains all channels and surfaces the results as
//! [`SurfaceChanges`](crate::fadable::SurfaceChanges).

use understory_dirty::Channel;

/// Renderable layer or enabled state changed at a cycle boundary.
pub const SURFACES: Channel = Channel::new(0);

/// A fadable was created or destroyed.
pub const TOPOLOGY: Channel = Channel::new(1);
