// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A render executor that logs every call it receives.

use alloc::vec::Vec;

use fadewall_core::channel::FadeChannel;
use fadewall_core::coordinator::FadeCoordinator;
use fadewall_core::executor::RenderExecutor;
use fadewall_core::fadable::{FadableId, FadableStore};

/// One call received by a [`RecordingExecutor`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ExecutorCall {
    /// [`RenderExecutor::on_enter_cycle`].
    EnterCycle {
        /// The bound member.
        fadable: FadableId,
        /// Its channel.
        channel: FadeChannel,
    },
    /// [`RenderExecutor::apply_opacity`].
    Opacity {
        /// The stepping channel.
        channel: FadeChannel,
        /// The applied opacity.
        opacity: f32,
    },
    /// [`RenderExecutor::on_cycle_complete`].
    CycleComplete {
        /// The released member.
        fadable: FadableId,
        /// Its channel.
        channel: FadeChannel,
        /// Whether the cycle faded out.
        finished_fading_out: bool,
    },
    /// [`RenderExecutor::present`].
    Present {
        /// Frame of the presented tick.
        frame_index: u64,
    },
}

/// Test double that records executor calls in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingExecutor {
    calls: Vec<ExecutorCall>,
}

impl RecordingExecutor {
    /// Creates an executor with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    #[must_use]
    pub fn calls(&self) -> &[ExecutorCall] {
        &self.calls
    }

    /// Opacities applied to `channel`, in order.
    pub fn opacities(&self, channel: FadeChannel) -> impl Iterator<Item = f32> + '_ {
        self.calls.iter().filter_map(move |call| match *call {
            ExecutorCall::Opacity { channel: c, opacity } if c == channel => Some(opacity),
            _ => None,
        })
    }

    /// Completion notifications for `fadable`, as `finished_fading_out`
    /// flags.
    pub fn completions(&self, fadable: FadableId) -> impl Iterator<Item = bool> + '_ {
        self.calls.iter().filter_map(move |call| match *call {
            ExecutorCall::CycleComplete {
                fadable: f,
                finished_fading_out,
                ..
            } if f == fadable => Some(finished_fading_out),
            _ => None,
        })
    }

    /// Number of times `fadable` entered a cycle.
    #[must_use]
    pub fn entries(&self, fadable: FadableId) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ExecutorCall::EnterCycle { fadable: f, .. } if *f == fadable))
            .count()
    }

    /// Clears the log.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderExecutor for RecordingExecutor {
    fn on_enter_cycle(&mut self, _store: &FadableStore, fadable: FadableId, channel: FadeChannel) {
        self.calls.push(ExecutorCall::EnterCycle { fadable, channel });
    }

    fn apply_opacity(&mut self, channel: FadeChannel, opacity: f32) {
        self.calls.push(ExecutorCall::Opacity { channel, opacity });
    }

    fn on_cycle_complete(
        &mut self,
        _store: &FadableStore,
        fadable: FadableId,
        channel: FadeChannel,
        finished_fading_out: bool,
    ) {
        self.calls.push(ExecutorCall::CycleComplete {
            fadable,
            channel,
            finished_fading_out,
        });
    }

    fn present(&mut self, _store: &FadableStore, coordinator: &FadeCoordinator) {
        self.calls.push(ExecutorCall::Present {
            frame_index: coordinator.frame_index(),
        });
    }
}
