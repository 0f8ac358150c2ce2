// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing facade.
//!
//! [`FadeWall`] owns the fadable store, the sensors and the (optional)
//! coordinator, and wires sensor signals to fadable counters. Every entry
//! point checks handle liveness first: stale handles are absorbed and traced
//! as [`AnomalyKind::StaleFadable`] instead of panicking.

use alloc::vec::Vec;

use kurbo::Circle;

use crate::config::FadeConfig;
use crate::coordinator::{FadeCoordinator, SubmitOutcome};
use crate::error::{BindError, ConfigError};
use crate::executor::RenderExecutor;
use crate::fadable::{FadableDesc, FadableId, FadableStore};
use crate::sensor::{SensorId, SensorSet, SensorSignal, TriggerSensor};
use crate::time::{FrameTick, HostTime};
use crate::trace::{AnomalyEvent, AnomalyKind, SensorEvent, Tracer};

/// Fadables, sensors and the coordinator of one rendering context.
#[derive(Debug)]
pub struct FadeWall {
    store: FadableStore,
    sensors: SensorSet,
    coordinator: Option<FadeCoordinator>,
}

impl FadeWall {
    /// Creates a wall with an attached coordinator.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`FadeConfig::validate`].
    pub fn new(config: FadeConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            store: FadableStore::new(),
            sensors: SensorSet::new(),
            coordinator: Some(FadeCoordinator::new(config)?),
        })
    }

    /// Returns the fadable store.
    #[must_use]
    pub fn store(&self) -> &FadableStore {
        &self.store
    }

    /// Returns the fadable store mutably, e.g. to call
    /// [`FadableStore::evaluate`].
    pub fn store_mut(&mut self) -> &mut FadableStore {
        &mut self.store
    }

    /// Returns the sensors.
    #[must_use]
    pub fn sensors(&self) -> &SensorSet {
        &self.sensors
    }

    /// Returns the attached coordinator.
    #[must_use]
    pub fn coordinator(&self) -> Option<&FadeCoordinator> {
        self.coordinator.as_ref()
    }

    // -- Fadables --

    /// Registers a fadable.
    pub fn add_fadable(&mut self, desc: FadableDesc) -> FadableId {
        self.store.create(desc)
    }

    /// Destroys a fadable and the sensors bound to it.
    ///
    /// Returns `false` (and traces an anomaly) if the handle is stale.
    pub fn remove_fadable(&mut self, id: FadableId, tracer: &mut Tracer<'_>) -> bool {
        if !self.check_alive(id, tracer) {
            return false;
        }
        let bound: Vec<SensorId> = self.sensors.bound_to(id).collect();
        for sensor in bound {
            let _ = self.sensors.remove(sensor);
        }
        self.store.destroy(id, self.coordinator.as_mut());
        true
    }

    /// Records one more overlapping sensor on `id`.
    pub fn increase_collision(
        &mut self,
        id: FadableId,
        tracer: &mut Tracer<'_>,
    ) -> Option<SubmitOutcome> {
        if !self.check_alive(id, tracer) {
            return None;
        }
        self.store
            .increase_collision(id, self.coordinator.as_mut(), tracer)
    }

    /// Records one fewer overlapping sensor on `id`.
    pub fn decrease_collision(
        &mut self,
        id: FadableId,
        tracer: &mut Tracer<'_>,
    ) -> Option<SubmitOutcome> {
        if !self.check_alive(id, tracer) {
            return None;
        }
        self.store
            .decrease_collision(id, self.coordinator.as_mut(), tracer)
    }

    /// Forces `id` visible until a matching [`activate`](Self::activate).
    pub fn deactivate(&mut self, id: FadableId, tracer: &mut Tracer<'_>) -> Option<SubmitOutcome> {
        if !self.check_alive(id, tracer) {
            return None;
        }
        Some(self.store.deactivate(id, self.coordinator.as_mut(), tracer))
    }

    /// Lifts one deactivation request from `id`.
    pub fn activate(&mut self, id: FadableId, tracer: &mut Tracer<'_>) {
        if self.check_alive(id, tracer) {
            self.store.activate(id, self.coordinator.as_ref(), tracer);
        }
    }

    // -- Sensors --

    /// Adds a sensor, which may already be bound.
    pub fn add_sensor(&mut self, sensor: TriggerSensor) -> SensorId {
        self.sensors.insert(sensor)
    }

    /// Binds a sensor to a fadable.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnknownSensor`] or [`BindError::StaleFadable`]
    /// for dead handles, and [`BindError::AlreadyBound`] if the sensor
    /// already reports to another fadable.
    pub fn bind_sensor(&mut self, sensor: SensorId, fadable: FadableId) -> Result<(), BindError> {
        if !self.store.is_alive(fadable) {
            return Err(BindError::StaleFadable(fadable));
        }
        self.sensors
            .get_mut(sensor)
            .ok_or(BindError::UnknownSensor(sensor))?
            .bind(fadable)
    }

    /// Removes a sensor. A latched overlap is ended first so the fadable's
    /// counters stay balanced.
    pub fn remove_sensor(
        &mut self,
        sensor: SensorId,
        tracer: &mut Tracer<'_>,
    ) -> Option<TriggerSensor> {
        self.sensor_exit(sensor, tracer);
        self.sensors.remove(sensor)
    }

    /// Forwards a "still overlapping" notification.
    pub fn sensor_stay(&mut self, sensor: SensorId, tracer: &mut Tracer<'_>) {
        let signal = self.sensors.get_mut(sensor).and_then(TriggerSensor::stay);
        if let Some((fadable, signal)) = signal {
            self.dispatch(sensor, fadable, signal, tracer);
        }
    }

    /// Forwards an "overlap ended" notification.
    pub fn sensor_exit(&mut self, sensor: SensorId, tracer: &mut Tracer<'_>) {
        let signal = self.sensors.get_mut(sensor).and_then(TriggerSensor::exit);
        if let Some((fadable, signal)) = signal {
            self.dispatch(sensor, fadable, signal, tracer);
        }
    }

    /// Tests every zoned sensor against `probe` and forwards stay or exit
    /// notifications accordingly. Call once per tick, before
    /// [`update`](Self::update).
    pub fn observe_probe(&mut self, probe: &Circle, tracer: &mut Tracer<'_>) {
        let hits: Vec<(SensorId, bool)> = self
            .sensors
            .iter()
            .filter_map(|(id, s)| Some((id, s.zone()?.overlaps(probe))))
            .collect();
        for (sensor, inside) in hits {
            if inside {
                self.sensor_stay(sensor, tracer);
            } else {
                self.sensor_exit(sensor, tracer);
            }
        }
    }

    fn dispatch(
        &mut self,
        sensor: SensorId,
        fadable: FadableId,
        signal: SensorSignal,
        tracer: &mut Tracer<'_>,
    ) {
        tracer.sensor(&SensorEvent {
            sensor,
            fadable,
            signal,
        });
        match signal {
            SensorSignal::IncreaseCollision => {
                let _ = self.increase_collision(fadable, tracer);
            }
            SensorSignal::DecreaseCollision => {
                let _ = self.decrease_collision(fadable, tracer);
            }
            SensorSignal::Deactivate => {
                let _ = self.deactivate(fadable, tracer);
            }
            SensorSignal::Activate => self.activate(fadable, tracer),
        }
    }

    // -- Coordinator --

    /// Runs one coordinator tick. Does nothing while detached.
    pub fn update(
        &mut self,
        tick: &FrameTick,
        executor: &mut dyn RenderExecutor,
        tracer: &mut Tracer<'_>,
    ) {
        if let Some(coordinator) = &mut self.coordinator {
            coordinator.update(&mut self.store, tick, executor, tracer);
        }
    }

    /// Tears down the coordinator.
    ///
    /// Fadables keep the visual state of their last completed cycle, and
    /// members of an interrupted cycle are routed back to it. Pending and
    /// cycling markers are cleared, so later events submit afresh once a
    /// coordinator is attached again. Until then submissions are no-ops.
    pub fn detach_coordinator(&mut self, tracer: &mut Tracer<'_>) -> Option<FadeCoordinator> {
        let mut coordinator = self.coordinator.take()?;
        coordinator.release_all(&mut self.store, tracer);
        Some(coordinator)
    }

    /// Installs a coordinator, returning the released previous one.
    pub fn attach_coordinator(
        &mut self,
        coordinator: FadeCoordinator,
        tracer: &mut Tracer<'_>,
    ) -> Option<FadeCoordinator> {
        let previous = self.detach_coordinator(tracer);
        self.coordinator = Some(coordinator);
        previous
    }

    fn check_alive(&self, id: FadableId, tracer: &mut Tracer<'_>) -> bool {
        if self.store.is_alive(id) {
            return true;
        }
        let coordinator = self.coordinator.as_ref();
        tracer.anomaly(&AnomalyEvent {
            frame_index: coordinator.map_or(0, FadeCoordinator::frame_index),
            now: coordinator.map_or(HostTime::default(), FadeCoordinator::now),
            kind: AnomalyKind::StaleFadable,
            fadable: Some(id),
        });
        false
    }
}
