use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::geometry::Paralgram;

/// Number of planes bounding a view frustum.
pub const FRUSTUM_PLANE_COUNT: usize = 6;

/// Plane `normal·p + distance = 0` with the normal pointing into the kept
/// half-space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::ZERO,
            distance: 0.0,
        }
    }
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Builds a plane from `(a, b, c, d)` coefficients, rescaled so the
    /// normal has unit length. A zero normal is kept as is.
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = coefficients.truncate();
        let length = normal.length();
        if length <= f32::EPSILON {
            return Self::new(normal, coefficients.w);
        }
        Self::new(normal / length, coefficients.w / length)
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    /// True when the whole box lies in the negative half-space.
    #[inline]
    pub fn is_fully_outside(&self, paralgram: &Paralgram) -> bool {
        let (_, max) = paralgram.project_onto_axis(self.normal);
        max + self.distance < 0.0
    }
}

/// Conservative view-frustum test built on [`Paralgram`] projections.
///
/// A box is rejected only when it lies entirely outside one plane; boxes near
/// frustum corners may be kept although they are invisible.
#[derive(Debug, Clone, Default)]
pub struct FrustumCulling {
    frustum_planes: [Plane; FRUSTUM_PLANE_COUNT],
    parallel: bool,
}

impl FrustumCulling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts the planes of a column-major clip matrix (`projection * view`)
    /// with a `[0, 1]` depth range.
    pub fn from_view_projection(view_projection: Mat4) -> Self {
        let mut culling = Self::new();
        culling.set_view_projection(view_projection);
        culling
    }

    pub fn set_view_projection(&mut self, view_projection: Mat4) {
        let row0 = view_projection.row(0);
        let row1 = view_projection.row(1);
        let row2 = view_projection.row(2);
        let row3 = view_projection.row(3);

        self.set_frustum_planes([
            Plane::from_coefficients(row3 + row0), // left
            Plane::from_coefficients(row3 - row0), // right
            Plane::from_coefficients(row3 + row1), // bottom
            Plane::from_coefficients(row3 - row1), // top
            Plane::from_coefficients(row2),        // near
            Plane::from_coefficients(row3 - row2), // far
        ]);
    }

    pub fn set_frustum_planes(&mut self, planes: [Plane; FRUSTUM_PLANE_COUNT]) {
        self.frustum_planes = planes;
    }

    pub fn frustum_planes(&self) -> &[Plane; FRUSTUM_PLANE_COUNT] {
        &self.frustum_planes
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn is_inside_frustum(&self, paralgram: &Paralgram) -> bool {
        !self
            .frustum_planes
            .iter()
            .any(|plane| plane.is_fully_outside(paralgram))
    }

    /// Visibility flag for every box, in input order.
    pub fn cull(&self, paralgrams: &[Paralgram]) -> Vec<bool> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if self.parallel {
                return paralgrams
                    .par_iter()
                    .map(|paralgram| self.is_inside_frustum(paralgram))
                    .collect();
            }
        }

        paralgrams
            .iter()
            .map(|paralgram| self.is_inside_frustum(paralgram))
            .collect()
    }

    /// Indices of the boxes that survive culling, ascending.
    pub fn visible_indices(&self, paralgrams: &[Paralgram]) -> Vec<usize> {
        let visible: Vec<usize> = self
            .cull(paralgrams)
            .into_iter()
            .enumerate()
            .filter_map(|(index, inside)| inside.then_some(index))
            .collect();
        log::trace!(
            "frustum culling kept {} of {} instances",
            visible.len(),
            paralgrams.len()
        );
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_planes_keep_everything() {
        let culling = FrustumCulling::new();
        let far_away = Paralgram::axis_aligned(Vec3::splat(1.0e6), Vec3::ONE);
        assert!(culling.is_inside_frustum(&far_away));
    }

    #[test]
    fn plane_normalization() {
        let plane = Plane::from_coefficients(Vec4::new(0.0, 2.0, 0.0, 4.0));
        assert_eq!(plane.normal, Vec3::Y);
        assert_eq!(plane.distance, 2.0);
        assert_eq!(plane.signed_distance(Vec3::new(0.0, -2.0, 0.0)), 0.0);
    }

    #[test]
    fn box_straddling_plane_is_not_outside() {
        let plane = Plane::new(Vec3::X, 0.0);
        assert!(!plane.is_fully_outside(&Paralgram::axis_aligned(Vec3::ZERO, Vec3::ONE)));
        let behind = Paralgram::axis_aligned(Vec3::new(-3.0, 0.0, 0.0), Vec3::ONE);
        assert!(plane.is_fully_outside(&behind));
    }

    #[test]
    fn orthographic_frustum_bounds() {
        let projection = Mat4::orthographic_rh(-1.0, 1.0, -1.0, 1.0, 0.0, 10.0);
        let culling = FrustumCulling::from_view_projection(projection);
        let in_view = Paralgram::axis_aligned(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5));
        let behind = Paralgram::axis_aligned(Vec3::new(0.0, 0.0, 5.0), Vec3::splat(0.5));
        let beside = Paralgram::axis_aligned(Vec3::new(4.0, 0.0, -5.0), Vec3::splat(0.5));
        assert!(culling.is_inside_frustum(&in_view));
        assert!(!culling.is_inside_frustum(&behind));
        assert!(!culling.is_inside_frustum(&beside));
    }
}
