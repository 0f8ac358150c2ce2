// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Nothing in the fade core is fatal. The only fallible operations are
//! configuration validation and sensor binding; everything else is absorbed
//! locally and surfaced as an [`AnomalyEvent`](crate::trace::AnomalyEvent).

use core::fmt;

use crate::fadable::FadableId;
use crate::sensor::SensorId;

/// Invalid [`FadeConfig`](crate::config::FadeConfig) values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConfigError {
    /// A channel's ramp rate is not a finite, strictly positive number.
    InvalidRate(f32),
    /// A render layer index does not fit in a 32-bit layer mask.
    LayerOutOfRange(u8),
    /// Two of the fade layers share the same index.
    DuplicateLayer(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRate(rate) => {
                write!(f, "ramp rate must be finite and positive (got {rate})")
            }
            Self::LayerOutOfRange(layer) => {
                write!(f, "render layer {layer} is out of range (max 31)")
            }
            Self::DuplicateLayer(layer) => {
                write!(f, "render layer {layer} is used by more than one fade stage")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors from binding a sensor to a fadable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindError {
    /// The sensor already reports to a different fadable.
    AlreadyBound {
        /// The fadable the sensor is bound to.
        current: FadableId,
    },
    /// The sensor handle does not name a live sensor.
    UnknownSensor(SensorId),
    /// The fadable handle is stale.
    StaleFadable(FadableId),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyBound { current } => {
                write!(f, "sensor is already bound to {current:?}")
            }
            Self::UnknownSensor(id) => write!(f, "no live sensor {id:?}"),
            Self::StaleFadable(id) => write!(f, "{id:?} is not alive"),
        }
    }
}

impl core::error::Error for BindError {}
