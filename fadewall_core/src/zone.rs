// Copyright 2026 the Fadewall Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger zone geometry.
//!
//! Zones are footprints on the ground plane. A moving probe (usually the
//! player's collider, projected to a circle) overlaps a zone when the two
//! shapes intersect; touching edges count as overlap.

use kurbo::{Circle, Point, Rect, Shape};

/// The footprint of a trigger sensor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerZone {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A circle.
    Circle(Circle),
}

impl TriggerZone {
    /// Returns whether `probe` intersects the zone.
    #[must_use]
    pub fn overlaps(&self, probe: &Circle) -> bool {
        let r2 = probe.radius * probe.radius;
        match self {
            Self::Rect(rect) => {
                let rect = rect.abs();
                let closest = Point::new(
                    probe.center.x.clamp(rect.x0, rect.x1),
                    probe.center.y.clamp(rect.y0, rect.y1),
                );
                (probe.center - closest).hypot2() <= r2
            }
            Self::Circle(circle) => {
                let reach = circle.radius + probe.radius;
                (probe.center - circle.center).hypot2() <= reach * reach
            }
        }
    }

    /// Returns the smallest rectangle containing the zone.
    #[must_use]
    pub fn bounding_box(&self) -> Rect {
        match self {
            Self::Rect(rect) => rect.abs(),
            Self::Circle(circle) => circle.bounding_box(),
        }
    }
}

impl From<Rect> for TriggerZone {
    fn from(rect: Rect) -> Self {
        Self::Rect(rect)
    }
}

impl From<Circle> for TriggerZone {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}
