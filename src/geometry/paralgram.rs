use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// The three half-extent edge vectors of a [`Paralgram`].
///
/// They are neither required to be orthogonal nor normalized, and a zero
/// vector is a valid (flat) axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideDirections {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl SideDirections {
    pub fn new(u: Vec3, v: Vec3, w: Vec3) -> Self {
        Self { u, v, w }
    }

    pub fn to_array(self) -> [Vec3; 3] {
        [self.u, self.v, self.w]
    }
}

impl Default for SideDirections {
    fn default() -> Self {
        Self {
            u: Vec3::ZERO,
            v: Vec3::ZERO,
            w: Vec3::ZERO,
        }
    }
}

/// Oriented parallelepiped: the Minkowski sum `center ± u ± v ± w`.
///
/// This is the primitive every culling and clustering test is built on. It is a
/// plain value type; transforming it produces a new box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Paralgram {
    pub center: Vec3,
    pub side_directions: SideDirections,
}

impl Paralgram {
    pub fn new(center: Vec3, u: Vec3, v: Vec3, w: Vec3) -> Self {
        Self {
            center,
            side_directions: SideDirections::new(u, v, w),
        }
    }

    /// Box with orthogonal, axis-aligned half extents.
    pub fn axis_aligned(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(
            center,
            Vec3::new(half_extents.x, 0.0, 0.0),
            Vec3::new(0.0, half_extents.y, 0.0),
            Vec3::new(0.0, 0.0, half_extents.z),
        )
    }

    /// Applies an affine matrix: the center moves as a point, the side
    /// directions as vectors (translation ignored).
    pub fn transform(&self, matrix: &Mat4) -> Paralgram {
        let SideDirections { u, v, w } = self.side_directions;
        Paralgram::new(
            matrix.transform_point3(self.center),
            matrix.transform_vector3(u),
            matrix.transform_vector3(v),
            matrix.transform_vector3(w),
        )
    }

    /// Half-width of the support interval along `axis`.
    #[inline]
    pub fn projected_radius(&self, axis: Vec3) -> f32 {
        let SideDirections { u, v, w } = self.side_directions;
        u.dot(axis).abs() + v.dot(axis).abs() + w.dot(axis).abs()
    }

    /// Support interval `(min, max)` of the box along `axis`.
    ///
    /// The axis does not need to be normalized: a longer axis scales the
    /// center projection and the radius alike, so interval overlap is
    /// unaffected.
    #[inline]
    pub fn project_onto_axis(&self, axis: Vec3) -> (f32, f32) {
        let center = self.center.dot(axis);
        let radius = self.projected_radius(axis);
        (center - radius, center + radius)
    }

    /// Unnormalized normals of the faces opposite `u`, `v` and `w`.
    pub fn face_normals(&self) -> [Vec3; 3] {
        let SideDirections { u, v, w } = self.side_directions;
        [v.cross(w), w.cross(u), u.cross(v)]
    }

    /// Separating Axis Theorem over the 15 candidate axes of two boxes.
    ///
    /// Touching boxes count as intersecting. Degenerate (zero) axes project
    /// both boxes onto `[0, 0]` and therefore never separate them.
    pub fn intersects(&self, other: &Paralgram) -> bool {
        let lhs_faces = self.face_normals();
        let rhs_faces = other.face_normals();

        for axis in lhs_faces.iter().chain(rhs_faces.iter()) {
            if self.is_separating_axis(other, *axis) {
                return false;
            }
        }

        let lhs_edges = self.side_directions.to_array();
        let rhs_edges = other.side_directions.to_array();
        for lhs_edge in &lhs_edges {
            for rhs_edge in &rhs_edges {
                if self.is_separating_axis(other, lhs_edge.cross(*rhs_edge)) {
                    return false;
                }
            }
        }

        true
    }

    #[inline]
    fn is_separating_axis(&self, other: &Paralgram, axis: Vec3) -> bool {
        let (lhs_min, lhs_max) = self.project_onto_axis(axis);
        let (rhs_min, rhs_max) = other.project_onto_axis(axis);
        !(lhs_max >= rhs_min && rhs_max >= lhs_min)
    }

    /// `2·(|u×v| + |u×w| + |v×w|)`, measured on the half-extent vectors.
    ///
    /// This is a quarter of the full surface of the box; it is only used to
    /// compare boxes against each other.
    pub fn surface_area(&self) -> f32 {
        let SideDirections { u, v, w } = self.side_directions;
        2.0 * (u.cross(v).length() + u.cross(w).length() + v.cross(w).length())
    }

    pub fn volume(&self) -> f32 {
        let SideDirections { u, v, w } = self.side_directions;
        8.0 * u.dot(v.cross(w)).abs()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let SideDirections { u, v, w } = self.side_directions;
        let c = self.center;
        [
            c - u - v - w,
            c + u - v - w,
            c - u + v - w,
            c + u + v - w,
            c - u - v + w,
            c + u - v + w,
            c - u + v + w,
            c + u + v + w,
        ]
    }

    /// Point containment against the three face slabs.
    ///
    /// Exact for boxes with three independent side directions; flat boxes are
    /// only checked on their non-degenerate faces.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.face_normals().iter().all(|normal| {
            let (min, max) = self.project_onto_axis(*normal);
            let projected = point.dot(*normal);
            projected >= min && projected <= max
        })
    }
}
