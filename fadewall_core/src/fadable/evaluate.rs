// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface change collection.
//!
//! Cycle boundaries rewrite renderable layers and enabled flags inside the
//! store. [`FadableStore::evaluate`] drains the dirty channels and reports
//! which fadables were touched so the host engine can push only those
//! surfaces.
//!
//! [`SurfaceChanges`] uses raw slot indices (`u32`) rather than
//! [`FadableId`](super::FadableId) handles, so hosts read renderables through
//! [`renderables_at`](super::FadableStore::renderables_at) without paying for
//! generation checks.

use alloc::vec::Vec;

use super::store::FadableStore;
use crate::dirty;

/// The set of changes produced by a single [`FadableStore::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct SurfaceChanges {
    /// Fadables whose renderables changed layer or enabled state.
    pub surfaces: Vec<u32>,
    /// Fadables created since the last evaluate.
    pub added: Vec<u32>,
    /// Fadables destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any fadable was created or destroyed.
    pub topology_changed: bool,
}

impl SurfaceChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl FadableStore {
    /// Drains dirty state and returns the set of changes since the last call.
    pub fn evaluate(&mut self) -> SurfaceChanges {
        let mut changes = SurfaceChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut SurfaceChanges) {
        changes.clear();

        let surfaces: Vec<u32> = self
            .dirty
            .drain(dirty::SURFACES)
            .deterministic()
            .run()
            .collect();
        // A slot freed after being marked has nothing left to push.
        changes.surfaces = surfaces
            .into_iter()
            .filter(|&idx| self.alive[idx as usize])
            .collect();

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}
