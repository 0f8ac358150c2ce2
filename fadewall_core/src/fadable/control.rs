// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap and deactivation counters.
//!
//! The desired direction is `Out` iff the fadable is not deactivated and at
//! least one sensor reports an overlap. It is recomputed whenever either
//! counter crosses zero, and a change is submitted to the coordinator.
//! Submissions are debounced while the fadable is already pending or
//! cycling.

use crate::channel::FadeDirection;
use crate::coordinator::{FadeCoordinator, SubmitOutcome};
use crate::time::HostTime;
use crate::trace::{AnomalyEvent, AnomalyKind, SubmitEvent, Tracer};

use super::id::FadableId;
use super::store::FadableStore;

impl FadableStore {
    /// Records one more overlapping sensor.
    ///
    /// On the `0 → 1` transition the desired direction is recomputed and, if
    /// it changed, submitted. Returns the submission outcome, if any.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn increase_collision(
        &mut self,
        id: FadableId,
        coordinator: Option<&mut FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) -> Option<SubmitOutcome> {
        self.validate(id);
        let i = id.idx as usize;
        self.overlap_count[i] = self.overlap_count[i].saturating_add(1);
        if self.overlap_count[i] == 1 {
            self.refresh_desired(id, coordinator, tracer)
        } else {
            None
        }
    }

    /// Records one fewer overlapping sensor, clamping at zero.
    ///
    /// On the `1 → 0` transition the desired direction is recomputed and, if
    /// it changed, submitted. Decreasing a zero count is absorbed and traced
    /// as [`AnomalyKind::UnbalancedDecrease`].
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn decrease_collision(
        &mut self,
        id: FadableId,
        coordinator: Option<&mut FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) -> Option<SubmitOutcome> {
        self.validate(id);
        let i = id.idx as usize;
        if self.overlap_count[i] == 0 {
            anomaly(tracer, coordinator.as_deref(), AnomalyKind::UnbalancedDecrease, id);
            return None;
        }
        self.overlap_count[i] -= 1;
        if self.overlap_count[i] == 0 {
            self.refresh_desired(id, coordinator, tracer)
        } else {
            None
        }
    }

    /// Forces the fadable fully visible until a matching
    /// [`activate`](Self::activate). Calls nest.
    ///
    /// Always submits, even if the fadable is already visible. The overlap
    /// count is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn deactivate(
        &mut self,
        id: FadableId,
        coordinator: Option<&mut FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) -> SubmitOutcome {
        self.validate(id);
        let i = id.idx as usize;
        self.deactivation_depth[i] = self.deactivation_depth[i].saturating_add(1);
        self.desired[i] = FadeDirection::In;
        self.submit(id, coordinator, tracer)
    }

    /// Lifts one deactivation request, clamping at zero.
    ///
    /// When the depth reaches zero the desired direction follows the overlap
    /// count again, but nothing is submitted: the next collision transition
    /// drives the fadable. Activating a fadable that is not deactivated is
    /// absorbed and traced as [`AnomalyKind::UnbalancedActivate`].
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    pub fn activate(
        &mut self,
        id: FadableId,
        coordinator: Option<&FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) {
        self.validate(id);
        let i = id.idx as usize;
        if self.deactivation_depth[i] == 0 {
            anomaly(tracer, coordinator, AnomalyKind::UnbalancedActivate, id);
            return;
        }
        self.deactivation_depth[i] -= 1;
        if self.deactivation_depth[i] == 0 {
            self.desired[i] = self.compute_desired(i);
        }
    }

    fn compute_desired(&self, i: usize) -> FadeDirection {
        FadeDirection::from_fade_out(self.deactivation_depth[i] == 0 && self.overlap_count[i] > 0)
    }

    fn refresh_desired(
        &mut self,
        id: FadableId,
        coordinator: Option<&mut FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) -> Option<SubmitOutcome> {
        let i = id.idx as usize;
        let next = self.compute_desired(i);
        if next == self.desired[i] {
            return None;
        }
        self.desired[i] = next;
        Some(self.submit(id, coordinator, tracer))
    }

    fn submit(
        &mut self,
        id: FadableId,
        coordinator: Option<&mut FadeCoordinator>,
        tracer: &mut Tracer<'_>,
    ) -> SubmitOutcome {
        if let Some(coordinator) = coordinator {
            return coordinator.submit(self, id, tracer);
        }
        anomaly(tracer, None, AnomalyKind::MissingCoordinator, id);
        tracer.submit(&SubmitEvent {
            frame_index: 0,
            now: HostTime::default(),
            fadable: id,
            channel: self.channel(id),
            direction: self.desired(id),
            outcome: SubmitOutcome::Detached,
        });
        SubmitOutcome::Detached
    }
}

fn anomaly(
    tracer: &mut Tracer<'_>,
    coordinator: Option<&FadeCoordinator>,
    kind: AnomalyKind,
    id: FadableId,
) {
    tracer.anomaly(&AnomalyEvent {
        frame_index: coordinator.map_or(0, FadeCoordinator::frame_index),
        now: coordinator.map_or(HostTime::default(), FadeCoordinator::now),
        kind,
        fadable: Some(id),
    });
}
