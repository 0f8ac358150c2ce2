// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Latched trigger sensors.
//!
//! Physics reports "still overlapping" on every tick while a collider stays
//! inside a trigger. A [`TriggerSensor`] turns that stream into exactly one
//! signal per overlap start and one per overlap end by latching a boolean,
//! never by counting events.
//!
//! A sensor either drives its fadable's overlap count
//! ([`SensorMode::Collision`]) or its deactivation depth
//! ([`SensorMode::Deactivation`]). The mode is fixed at construction.

use alloc::vec::Vec;
use core::fmt;

use crate::error::BindError;
use crate::fadable::FadableId;
use crate::zone::TriggerZone;

/// Which fadable counter a sensor drives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SensorMode {
    /// Overlap start and end increase and decrease the overlap count.
    #[default]
    Collision,
    /// Overlap start and end deactivate and activate the fadable, forcing it
    /// visible while the overlap lasts.
    Deactivation,
}

/// A latched transition forwarded to a fadable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SensorSignal {
    /// Overlap started on a collision sensor.
    IncreaseCollision,
    /// Overlap ended on a collision sensor.
    DecreaseCollision,
    /// Overlap started on a deactivation sensor.
    Deactivate,
    /// Overlap ended on a deactivation sensor.
    Activate,
}

impl SensorSignal {
    /// Returns a short snake-case name for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IncreaseCollision => "increase_collision",
            Self::DecreaseCollision => "decrease_collision",
            Self::Deactivate => "deactivate",
            Self::Activate => "activate",
        }
    }
}

/// Handle to a sensor in a [`SensorSet`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensorId(pub(crate) u32);

impl SensorId {
    /// Returns the raw slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SensorId({})", self.0)
    }
}

/// A presence detector bound to at most one fadable.
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerSensor {
    mode: SensorMode,
    fadable: Option<FadableId>,
    latched: bool,
    zone: Option<TriggerZone>,
}

impl TriggerSensor {
    /// Creates an unbound sensor without a zone.
    #[must_use]
    pub const fn new(mode: SensorMode) -> Self {
        Self {
            mode,
            fadable: None,
            latched: false,
            zone: None,
        }
    }

    /// Gives the sensor a footprint for
    /// [`FadeWall::observe_probe`](crate::wall::FadeWall::observe_probe).
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<TriggerZone>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Returns the sensor's mode.
    #[must_use]
    pub const fn mode(&self) -> SensorMode {
        self.mode
    }

    /// Returns the bound fadable.
    #[must_use]
    pub const fn fadable(&self) -> Option<FadableId> {
        self.fadable
    }

    /// Returns whether an overlap is currently latched.
    #[must_use]
    pub const fn is_latched(&self) -> bool {
        self.latched
    }

    /// Returns the sensor's footprint, if any.
    #[must_use]
    pub const fn zone(&self) -> Option<&TriggerZone> {
        self.zone.as_ref()
    }

    /// Binds the sensor to `fadable`.
    ///
    /// Binding is set-once: binding the same fadable again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::AlreadyBound`] if the sensor reports to a
    /// different fadable.
    pub fn bind(&mut self, fadable: FadableId) -> Result<(), BindError> {
        match self.fadable {
            Some(current) if current != fadable => Err(BindError::AlreadyBound { current }),
            _ => {
                self.fadable = Some(fadable);
                Ok(())
            }
        }
    }

    /// Handles a "still overlapping" notification.
    ///
    /// Returns a signal only on the first notification of an overlap. An
    /// unbound sensor never latches.
    pub fn stay(&mut self) -> Option<(FadableId, SensorSignal)> {
        let fadable = self.fadable?;
        if self.latched {
            return None;
        }
        self.latched = true;
        let signal = match self.mode {
            SensorMode::Collision => SensorSignal::IncreaseCollision,
            SensorMode::Deactivation => SensorSignal::Deactivate,
        };
        Some((fadable, signal))
    }

    /// Handles an "overlap ended" notification.
    ///
    /// Returns a signal only if an overlap was latched.
    pub fn exit(&mut self) -> Option<(FadableId, SensorSignal)> {
        let fadable = self.fadable?;
        if !self.latched {
            return None;
        }
        self.latched = false;
        let signal = match self.mode {
            SensorMode::Collision => SensorSignal::DecreaseCollision,
            SensorMode::Deactivation => SensorSignal::Activate,
        };
        Some((fadable, signal))
    }
}

/// Slot storage for sensors.
///
/// Removed slots are never reused, so a [`SensorId`] can never alias a newer
/// sensor.
#[derive(Clone, Debug, Default)]
pub struct SensorSet {
    slots: Vec<Option<TriggerSensor>>,
}

impl SensorSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Adds a sensor and returns its handle.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sensor counts stay far below u32::MAX"
    )]
    pub fn insert(&mut self, sensor: TriggerSensor) -> SensorId {
        let id = SensorId(self.slots.len() as u32);
        self.slots.push(Some(sensor));
        id
    }

    /// Removes a sensor, returning it if it existed.
    pub fn remove(&mut self, id: SensorId) -> Option<TriggerSensor> {
        self.slots.get_mut(id.0 as usize)?.take()
    }

    /// Returns a sensor.
    #[must_use]
    pub fn get(&self, id: SensorId) -> Option<&TriggerSensor> {
        self.slots.get(id.0 as usize)?.as_ref()
    }

    /// Returns a sensor mutably.
    pub fn get_mut(&mut self, id: SensorId) -> Option<&mut TriggerSensor> {
        self.slots.get_mut(id.0 as usize)?.as_mut()
    }

    /// Returns the number of live sensors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Returns `true` if no sensor is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over live sensors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorId, &TriggerSensor)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| Some((slot_id(i), s.as_ref()?)))
    }

    /// Returns the ids of live sensors bound to `fadable`.
    pub fn bound_to(&self, fadable: FadableId) -> impl Iterator<Item = SensorId> + '_ {
        self.iter()
            .filter(move |(_, s)| s.fadable == Some(fadable))
            .map(|(id, _)| id)
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "slot indices were created from u32 handles"
)]
fn slot_id(i: usize) -> SensorId {
    SensorId(i as u32)
}
