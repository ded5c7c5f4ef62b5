use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::paralgram::Paralgram;
use crate::utils::math::{covariance, symmetric_eigen};

/// Oriented bounding box. It carries no state beyond its [`Paralgram`], only
/// extra constructors.
pub type Obb = Paralgram;

/// Axis-aligned bounding box used as input for [`Obb::from_aabb`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for &p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

impl Paralgram {
    /// Zero-extent box at the origin, a placeholder until real geometry is known.
    pub fn empty() -> Obb {
        Paralgram::default()
    }

    pub fn from_aabb(aabb: &Aabb) -> Obb {
        if aabb.is_empty() {
            return Self::empty();
        }
        Paralgram::axis_aligned(aabb.center(), aabb.extent())
    }

    /// Fits a tight box around a point cloud.
    ///
    /// Four frames are measured: the world axes, the principal axes of the
    /// point covariance, a frame built from the widest point pair and one built
    /// from the edges meeting at an extreme point. The one with the smallest
    /// surface wins, earlier candidates win ties. Extents are measured from the
    /// points themselves and padded by a rounding margin, so every point is
    /// contained.
    pub fn from_points(points: &[Vec3]) -> Obb {
        if points.is_empty() {
            return Self::empty();
        }

        let reach = points
            .iter()
            .fold(0.0f32, |reach, point| reach.max(point.length()));
        let margin = reach * FIT_MARGIN_EPSILONS * f32::EPSILON;

        let mut best = fit_in_frame(points, Mat3::IDENTITY, margin);
        let mut best_area = best.surface_area();

        let (_, principal_axes) = symmetric_eigen(covariance(points));
        let candidates = [
            Some(principal_axes),
            diameter_frame(points),
            corner_frame(points),
        ];
        for frame in candidates.into_iter().flatten() {
            let candidate = fit_in_frame(points, orthonormalize(frame), margin);
            let area = candidate.surface_area();
            if area < best_area {
                best = candidate;
                best_area = area;
            }
        }

        log::trace!(
            "fitted obb around {} points, surface {:.4}",
            points.len(),
            best_area
        );
        best
    }

    pub fn from_triangles(triangles: &[[Vec3; 3]]) -> Obb {
        let points: Vec<Vec3> = triangles.iter().flatten().copied().collect();
        Self::from_points(&points)
    }

    /// Same as [`Obb::from_triangles`] for an indexed triangle list.
    ///
    /// Only vertices referenced by an index take part in the fit; out of range
    /// indices are ignored.
    pub fn from_indexed_triangles(vertices: &[Vec3], indices: &[[u32; 3]]) -> Obb {
        let points: Vec<Vec3> = indices
            .iter()
            .flatten()
            .filter_map(|&index| vertices.get(index as usize).copied())
            .collect();
        Self::from_points(&points)
    }
}

/// Multiples of `f32::EPSILON`, relative to the farthest point from the
/// origin, added to every fitted half extent. Covers the rounding of the local
/// coordinates, the rebuilt center and the face normals derived from the box.
const FIT_MARGIN_EPSILONS: f32 = 64.0;

/// Squared sine below which an edge counts as parallel to the first one.
const CORNER_PARALLEL_TOLERANCE: f32 = 1e-6;

/// Box aligned to the orthonormal columns of `frame` enclosing all points,
/// each half extent grown by `margin`.
fn fit_in_frame(points: &[Vec3], frame: Mat3, margin: f32) -> Obb {
    let axes = [frame.x_axis, frame.y_axis, frame.z_axis];
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for point in points {
        let local = Vec3::new(point.dot(axes[0]), point.dot(axes[1]), point.dot(axes[2]));
        min = min.min(local);
        max = max.max(local);
    }

    let mid = (min + max) * 0.5;
    let half = (max - min) * 0.5 + Vec3::splat(margin);
    Paralgram::new(
        frame * mid,
        axes[0] * half.x,
        axes[1] * half.y,
        axes[2] * half.z,
    )
}

/// Gram-Schmidt pass so candidate frames are orthonormal to rounding.
fn orthonormalize(frame: Mat3) -> Mat3 {
    let x = frame.x_axis.try_normalize().unwrap_or(Vec3::X);
    let y = (frame.y_axis - x * frame.y_axis.dot(x))
        .try_normalize()
        .unwrap_or_else(|| x.any_orthonormal_vector());
    Mat3::from_cols(x, y, x.cross(y))
}

fn farthest_from(points: &[Vec3], origin: Vec3) -> Vec3 {
    points
        .iter()
        .copied()
        .fold((origin, 0.0f32), |(best, best_dist), p| {
            let dist = p.distance_squared(origin);
            if dist > best_dist {
                (p, dist)
            } else {
                (best, best_dist)
            }
        })
        .0
}

/// Frame whose first axis spans the (approximate) widest point pair.
fn diameter_frame(points: &[Vec3]) -> Option<Mat3> {
    let a = farthest_from(points, points[0]);
    let b = farthest_from(points, a);
    let primary = (b - a).try_normalize()?;

    let mut best_offset = Vec3::ZERO;
    let mut best_dist = 0.0f32;
    for p in points {
        let rel = *p - a;
        let offset = rel - primary * rel.dot(primary);
        let dist = offset.length_squared();
        if dist > best_dist {
            best_dist = dist;
            best_offset = offset;
        }
    }
    let secondary = best_offset
        .try_normalize()
        .unwrap_or_else(|| primary.any_orthonormal_vector());
    let tertiary = primary.cross(secondary);
    Some(Mat3::from_cols(primary, secondary, tertiary))
}

/// Frame spanned by the two shortest independent edges leaving an extreme
/// point. For the corners of a box (or of a flat rectangle) these are the box's
/// own edges, which the covariance cannot recover when the box is a cube.
fn corner_frame(points: &[Vec3]) -> Option<Mat3> {
    let corner = farthest_from(points, points[0]);

    let mut primary: Option<(Vec3, f32)> = None;
    for p in points {
        let dist = p.distance_squared(corner);
        if dist > 0.0 && !matches!(primary, Some((_, best)) if best <= dist) {
            primary = Some((*p - corner, dist));
        }
    }
    let primary = primary?.0.try_normalize()?;

    let mut secondary: Option<(Vec3, f32)> = None;
    for p in points {
        let rel = *p - corner;
        let dist = rel.length_squared();
        let offset = rel - primary * rel.dot(primary);
        if offset.length_squared() <= dist * CORNER_PARALLEL_TOLERANCE {
            continue;
        }
        if !matches!(secondary, Some((_, best)) if best <= dist) {
            secondary = Some((offset, dist));
        }
    }
    let secondary = match secondary {
        Some((offset, _)) => offset.try_normalize()?,
        None => primary.any_orthonormal_vector(),
    };
    Some(Mat3::from_cols(primary, secondary, primary.cross(secondary)))
}
