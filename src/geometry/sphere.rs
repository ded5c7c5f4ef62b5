use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::paralgram::Paralgram;
use crate::config::SPHERE_AXIS_EPSILON;

/// Sphere used as the broad-phase volume of local lights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    origin: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(origin: Vec3, radius: f32) -> Self {
        Self { origin, radius }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.origin.distance_squared(point) <= self.radius * self.radius
    }

    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let reach = self.radius + other.radius;
        self.origin.distance_squared(other.origin) <= reach * reach
    }

    /// Tests the sphere against the three face slabs of `paralgram`.
    ///
    /// Only the box's own faces can separate it from a sphere, so three axes
    /// suffice. A face normal that degenerates (flat box) is replaced by the
    /// matching side direction, and skipped if that is zero as well. A box
    /// collapsed to a point is tested as that point.
    pub fn intersects_paralgram(&self, paralgram: &Paralgram) -> bool {
        let relative = self.origin - paralgram.center;
        let normals = paralgram.face_normals();
        let sides = paralgram.side_directions.to_array();
        let mut tested_axes = 0;

        for (normal, side) in normals.iter().zip(sides.iter()) {
            let axis = match usable_axis(*normal).or_else(|| usable_axis(*side)) {
                Some(axis) => axis,
                None => continue,
            };
            tested_axes += 1;

            let half_extent = paralgram.projected_radius(axis);
            let distance = relative.dot(axis);
            if distance.abs() > half_extent + self.radius {
                return false;
            }
        }

        tested_axes > 0 || self.contains_point(paralgram.center)
    }
}

fn usable_axis(direction: Vec3) -> Option<Vec3> {
    if direction.length_squared() <= SPHERE_AXIS_EPSILON {
        return None;
    }
    direction.try_normalize()
}
