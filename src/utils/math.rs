//! Additional math helpers layered on top of `glam`.

use glam::{Mat3, Vec3};

const JACOBI_MAX_ROTATIONS: usize = 32;
const JACOBI_EPSILON: f32 = 1e-12;

/// Covariance matrix of a point cloud around its mean.
pub fn covariance(points: &[Vec3]) -> Mat3 {
    if points.is_empty() {
        return Mat3::ZERO;
    }

    let inv_count = 1.0 / points.len() as f32;
    let mean = points.iter().copied().sum::<Vec3>() * inv_count;

    let mut xx = 0.0;
    let mut xy = 0.0;
    let mut xz = 0.0;
    let mut yy = 0.0;
    let mut yz = 0.0;
    let mut zz = 0.0;
    for p in points {
        let d = *p - mean;
        xx += d.x * d.x;
        xy += d.x * d.y;
        xz += d.x * d.z;
        yy += d.y * d.y;
        yz += d.y * d.z;
        zz += d.z * d.z;
    }

    Mat3::from_cols(
        Vec3::new(xx, xy, xz) * inv_count,
        Vec3::new(xy, yy, yz) * inv_count,
        Vec3::new(xz, yz, zz) * inv_count,
    )
}

/// Eigen-decomposition of a symmetric 3×3 matrix by Jacobi rotations.
///
/// Returns the eigenvalues and a matrix whose orthonormal columns are the
/// matching eigenvectors. Only the symmetric part of the input is read.
pub fn symmetric_eigen(matrix: Mat3) -> (Vec3, Mat3) {
    // a[col][row]; symmetric, so the layout does not matter.
    let mut a = matrix.to_cols_array_2d();
    let mut v = Mat3::IDENTITY.to_cols_array_2d();

    for _ in 0..JACOBI_MAX_ROTATIONS {
        let (p, q) = largest_off_diagonal(&a);
        if a[p][q].abs() <= JACOBI_EPSILON {
            break;
        }

        let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
        let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
        let c = 1.0 / (t * t + 1.0).sqrt();
        let s = t * c;

        for row in a.iter_mut() {
            let (kp, kq) = (row[p], row[q]);
            row[p] = c * kp - s * kq;
            row[q] = s * kp + c * kq;
        }
        for k in 0..3 {
            let (pk, qk) = (a[p][k], a[q][k]);
            a[p][k] = c * pk - s * qk;
            a[q][k] = s * pk + c * qk;
        }
        for row in v.iter_mut() {
            let (kp, kq) = (row[p], row[q]);
            row[p] = c * kp - s * kq;
            row[q] = s * kp + c * kq;
        }
    }

    let eigenvalues = Vec3::new(a[0][0], a[1][1], a[2][2]);
    // v[row][col]: eigenvectors are the columns.
    let eigenvectors = Mat3::from_cols(
        Vec3::new(v[0][0], v[1][0], v[2][0]),
        Vec3::new(v[0][1], v[1][1], v[2][1]),
        Vec3::new(v[0][2], v[1][2], v[2][2]),
    );
    (eigenvalues, eigenvectors)
}

fn largest_off_diagonal(a: &[[f32; 3]; 3]) -> (usize, usize) {
    let mut best = (0, 1);
    for (p, q) in [(0, 2), (1, 2)] {
        if a[p][q].abs() > a[best.0][best.1].abs() {
            best = (p, q);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Quat;

    #[test]
    fn diagonal_matrix_is_its_own_decomposition() {
        let (values, vectors) = symmetric_eigen(Mat3::from_diagonal(Vec3::new(3.0, 2.0, 1.0)));
        assert_eq!(values, Vec3::new(3.0, 2.0, 1.0));
        assert_eq!(vectors, Mat3::IDENTITY);
    }

    #[test]
    fn recovers_rotated_principal_axes() {
        let rotation = Mat3::from_quat(Quat::from_rotation_y(0.7) * Quat::from_rotation_z(0.3));
        let matrix =
            rotation * Mat3::from_diagonal(Vec3::new(9.0, 4.0, 1.0)) * rotation.transpose();
        let (values, vectors) = symmetric_eigen(matrix);

        for i in 0..3 {
            let column = vectors.col(i);
            let mapped = matrix * column;
            assert_relative_eq!(mapped.x, column.x * values[i], epsilon = 1e-3);
            assert_relative_eq!(mapped.y, column.y * values[i], epsilon = 1e-3);
            assert_relative_eq!(mapped.z, column.z * values[i], epsilon = 1e-3);
            assert_relative_eq!(column.length(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn covariance_of_line_has_single_direction() {
        let points: Vec<Vec3> = (0..5).map(|i| Vec3::X * i as f32).collect();
        let cov = covariance(&points);
        assert_relative_eq!(cov.x_axis.x, 2.0);
        assert_eq!(cov.y_axis.y, 0.0);
        assert_eq!(cov.z_axis.z, 0.0);
    }
}
