// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays fadable storage with allocation and state queries.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::channel::{FadeChannel, FadeDirection};
use crate::config::LayerConfig;
use crate::coordinator::FadeCoordinator;
use crate::dirty;

use super::id::FadableId;
use super::renderable::{Renderable, RenderableDesc};

/// Where a fadable currently stands with respect to the coordinator.
///
/// A fadable is in exactly one of these phases, which is how the store
/// upholds "pending XOR in one cycle XOR neither".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FadePhase {
    /// Not waiting for and not part of any transition.
    #[default]
    Settled,
    /// Submitted to the coordinator, waiting for a cycle to pick it up.
    Queued,
    /// Bound to the active cycle of its channel.
    Cycling,
}

/// Describes a fadable when registering it with a [`FadableStore`].
#[derive(Clone, Debug)]
pub struct FadableDesc {
    /// Which fade pipeline the fadable participates in. Fixed for its
    /// lifetime.
    pub channel: FadeChannel,
    /// Surfaces to fade. Inactive entries are dropped.
    pub renderables: Vec<RenderableDesc>,
}

impl FadableDesc {
    /// Creates a description with no renderables.
    #[must_use]
    pub fn new(channel: FadeChannel) -> Self {
        Self {
            channel,
            renderables: Vec::new(),
        }
    }

    /// Adds a renderable.
    #[must_use]
    pub fn with_renderable(mut self, desc: RenderableDesc) -> Self {
        self.renderables.push(desc);
        self
    }
}

/// Struct-of-arrays storage for all fadables.
///
/// Fadables are addressed by [`FadableId`] handles. Destroyed fadables are
/// recycled via a free list, and generation counters prevent stale handle
/// access.
#[derive(Debug)]
pub struct FadableStore {
    // -- Fade state --
    pub(crate) channel: Vec<FadeChannel>,
    pub(crate) overlap_count: Vec<u32>,
    pub(crate) deactivation_depth: Vec<u32>,
    pub(crate) desired: Vec<FadeDirection>,
    pub(crate) visual: Vec<FadeDirection>,
    pub(crate) phase: Vec<FadePhase>,

    // -- Surfaces --
    pub(crate) renderables: Vec<Vec<Renderable>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for FadableStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FadableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channel: Vec::new(),
            overlap_count: Vec::new(),
            deactivation_depth: Vec::new(),
            desired: Vec::new(),
            visual: Vec::new(),
            phase: Vec::new(),
            renderables: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Registers a fadable and returns its handle.
    ///
    /// The fadable starts fully visible with no overlaps and no deactivation
    /// requests. Its renderables are captured once, here.
    pub fn create(&mut self, desc: FadableDesc) -> FadableId {
        let surfaces: Vec<Renderable> = desc
            .renderables
            .iter()
            .filter(|r| r.active)
            .map(Renderable::capture)
            .collect();

        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.channel[i] = desc.channel;
            self.overlap_count[i] = 0;
            self.deactivation_depth[i] = 0;
            self.desired[i] = FadeDirection::In;
            self.visual[i] = FadeDirection::In;
            self.phase[i] = FadePhase::Settled;
            self.renderables[i] = surfaces;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.channel.push(desc.channel);
            self.overlap_count.push(0);
            self.deactivation_depth.push(0);
            self.desired.push(FadeDirection::In);
            self.visual.push(FadeDirection::In);
            self.phase.push(FadePhase::Settled);
            self.renderables.push(surfaces);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        FadableId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Frees a fadable's slot and drops it from the coordinator's pending
    /// set and cycles, so no dangling handle survives.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy(&mut self, id: FadableId, coordinator: Option<&mut FadeCoordinator>) {
        self.validate(id);
        if let Some(coordinator) = coordinator {
            coordinator.forget(id);
        }
        let i = id.idx as usize;

        self.dirty.remove_key(id.idx);

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.alive[i] = false;
        self.renderables[i].clear();
        self.phase[i] = FadePhase::Settled;

        self.free_list.push(id.idx);
        self.pending_removed.push(id.idx);
        self.dirty.mark(id.idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live fadable.
    #[must_use]
    pub fn is_alive(&self, id: FadableId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live fadables.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Returns an iterator over the handles of all live fadables, in slot
    /// order.
    pub fn ids(&self) -> impl Iterator<Item = FadableId> + '_ {
        (0..self.len).filter_map(|idx| self.id_at(idx))
    }

    /// Returns the handle for raw slot `idx`, if that slot is live.
    #[must_use]
    pub fn id_at(&self, idx: u32) -> Option<FadableId> {
        (idx < self.len && self.alive[idx as usize]).then(|| FadableId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    // -- Property getters --

    /// Returns the fade channel of a fadable.
    #[must_use]
    pub fn channel(&self, id: FadableId) -> FadeChannel {
        self.validate(id);
        self.channel[id.idx as usize]
    }

    /// Returns whether the fadable uses the edge-highlight channel.
    #[must_use]
    pub fn uses_highlight(&self, id: FadableId) -> bool {
        self.channel(id) == FadeChannel::Highlight
    }

    /// Returns how many sensors currently report an overlap.
    #[must_use]
    pub fn overlap_count(&self, id: FadableId) -> u32 {
        self.validate(id);
        self.overlap_count[id.idx as usize]
    }

    /// Returns the number of outstanding deactivation requests.
    #[must_use]
    pub fn deactivation_depth(&self, id: FadableId) -> u32 {
        self.validate(id);
        self.deactivation_depth[id.idx as usize]
    }

    /// Returns whether at least one deactivation request is outstanding.
    #[must_use]
    pub fn is_deactivated(&self, id: FadableId) -> bool {
        self.deactivation_depth(id) > 0
    }

    /// Returns the direction most recently requested of the coordinator.
    #[must_use]
    pub fn desired(&self, id: FadableId) -> FadeDirection {
        self.validate(id);
        self.desired[id.idx as usize]
    }

    /// Returns whether the fadable wants to be faded out.
    #[must_use]
    pub fn desired_fade_out(&self, id: FadableId) -> bool {
        self.desired(id).is_out()
    }

    /// Returns the direction of the last completed cycle, i.e. whether the
    /// fadable currently rests fully visible ([`FadeDirection::In`]) or fully
    /// faded ([`FadeDirection::Out`]).
    #[must_use]
    pub fn settled(&self, id: FadableId) -> FadeDirection {
        self.validate(id);
        self.visual[id.idx as usize]
    }

    /// Returns the coordinator phase of a fadable.
    #[must_use]
    pub fn phase(&self, id: FadableId) -> FadePhase {
        self.validate(id);
        self.phase[id.idx as usize]
    }

    /// Returns the renderables of a fadable.
    #[must_use]
    pub fn renderables(&self, id: FadableId) -> &[Renderable] {
        self.validate(id);
        &self.renderables[id.idx as usize]
    }

    /// Returns the renderables at raw slot `idx` (as found in
    /// [`SurfaceChanges`](super::SurfaceChanges)), skipping generation
    /// validation. Freed slots have no renderables.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn renderables_at(&self, idx: u32) -> &[Renderable] {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.renderables[idx as usize]
    }

    /// Returns whether any live renderable is parked on the frozen edge
    /// layer.
    #[must_use]
    pub fn any_frozen(&self, layers: &LayerConfig) -> bool {
        self.renderables
            .iter()
            .flatten()
            .any(|r| r.is_frozen(layers))
    }

    // -- Coordinator hooks --

    pub(crate) fn set_phase(&mut self, id: FadableId, phase: FadePhase) {
        self.validate(id);
        self.phase[id.idx as usize] = phase;
    }

    /// Binds the fadable to a cycle and reroutes its surfaces onto the
    /// transitional layer.
    pub(crate) fn enter_cycle(&mut self, id: FadableId, layers: &LayerConfig) {
        self.validate(id);
        let i = id.idx as usize;
        let channel = self.channel[i];
        self.phase[i] = FadePhase::Cycling;
        for r in &mut self.renderables[i] {
            r.enter_cycle(channel, layers);
        }
        self.dirty.mark(id.idx, dirty::SURFACES);
    }

    /// Releases the fadable from a finished cycle and applies the end state
    /// to its surfaces.
    pub(crate) fn complete_cycle(
        &mut self,
        id: FadableId,
        direction: FadeDirection,
        layers: &LayerConfig,
    ) {
        self.validate(id);
        let i = id.idx as usize;
        let channel = self.channel[i];
        self.phase[i] = FadePhase::Settled;
        self.visual[i] = direction;
        for r in &mut self.renderables[i] {
            r.complete_cycle(channel, direction, layers);
        }
        self.dirty.mark(id.idx, dirty::SURFACES);
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: FadableId) {
        assert!(
            self.is_alive(id),
            "stale FadableId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }
}
