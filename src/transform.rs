//! Coordinate transformation between element local and global axes
//!
//! Lambda is a 3x3 matrix whose rows are the local axes expressed in global
//! coordinates, so that `local = lambda * global`.

use crate::error::{FEAError, FEAResult};
use crate::math::{block_diagonal, Mat, Mat3, Vec3, Vector};
use crate::results::{Displacement, Force};

/// Rotation between local and global axes of one element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformManager {
    lambda: Mat3,
}

impl TransformManager {
    pub fn new(lambda: Mat3) -> Self {
        Self { lambda }
    }

    pub fn identity() -> Self {
        Self::new(Mat3::identity())
    }

    pub fn lambda(&self) -> &Mat3 {
        &self.lambda
    }

    pub fn from_axes(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self::new(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
    }

    /// Local axes of a two node bar.
    ///
    /// Local x runs from `start` to `end`. For non-vertical members local z is
    /// `x cross Y` (horizontal) and local y completes the triad; vertical
    /// members use fixed axes. `web_rotation` then rotates y and z about x.
    pub fn bar(start: Vec3, end: Vec3, web_rotation: f64, tol: f64) -> FEAResult<Self> {
        let d = end - start;
        let length = d.norm();
        if length < tol {
            return Err(FEAError::degenerate("bar has zero length"));
        }

        // Direction cosines for local x-axis (along member)
        let x = d / length;

        let (y, z) = if x.x.abs() < tol && x.z.abs() < tol {
            // Vertical member
            if x.y > 0.0 {
                (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0))
            } else {
                (Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.0, 0.0))
            }
        } else {
            let z = x.cross(&Vec3::y()).normalize();
            (z.cross(&x), z)
        };

        // Apply web rotation about local x-axis
        let (c, s) = (web_rotation.cos(), web_rotation.sin());
        let y_rot = y * c + z * s;
        let z_rot = -y * s + z * c;

        Ok(Self::from_axes(x, y_rot, z_rot))
    }

    /// Local axes of a triangle from its edge midpoints
    pub fn triangle(p: &[Vec3; 3], tol: f64) -> FEAResult<Self> {
        let ii = (p[0] + p[1]) / 2.0;
        let jj = (p[1] + p[2]) / 2.0;
        let kk = (p[2] + p[0]) / 2.0;

        let vx = jj - kk;
        let vr = ii - p[2];
        Self::planar(vx, vr, tol)
    }

    /// Local axes of a quadrilateral from its edge midpoints
    pub fn quad(p: &[Vec3; 4], tol: f64) -> FEAResult<Self> {
        let mid = |a: usize, b: usize| (p[a] + p[b]) / 2.0;
        let vx = mid(1, 2) - mid(3, 0);
        let vr = mid(2, 3) - mid(0, 1);
        Self::planar(vx, vr, tol)
    }

    fn planar(vx: Vec3, vr: Vec3, tol: f64) -> FEAResult<Self> {
        let vz = vx.cross(&vr);
        if vx.norm() < tol || vz.norm() < tol {
            return Err(FEAError::degenerate("planar element has zero area"));
        }
        let vy = vz.cross(&vx);
        Ok(Self::from_axes(vx.normalize(), vy.normalize(), vz.normalize()))
    }

    pub fn global_to_local_vector(&self, v: &Vec3) -> Vec3 {
        self.lambda * v
    }

    pub fn local_to_global_vector(&self, v: &Vec3) -> Vec3 {
        self.lambda.transpose() * v
    }

    pub fn force_to_local(&self, f: &Force) -> Force {
        Force::from_vectors(
            self.global_to_local_vector(&f.forces()),
            self.global_to_local_vector(&f.moments()),
        )
    }

    pub fn force_to_global(&self, f: &Force) -> Force {
        Force::from_vectors(
            self.local_to_global_vector(&f.forces()),
            self.local_to_global_vector(&f.moments()),
        )
    }

    pub fn displacement_to_local(&self, d: &Displacement) -> Displacement {
        Displacement::from_vectors(
            self.global_to_local_vector(&d.translations()),
            self.global_to_local_vector(&d.rotations()),
        )
    }

    pub fn displacement_to_global(&self, d: &Displacement) -> Displacement {
        Displacement::from_vectors(
            self.local_to_global_vector(&d.translations()),
            self.local_to_global_vector(&d.rotations()),
        )
    }

    /// Block diagonal `T` for `node_count` nodes with six DOFs each
    pub fn expanded(&self, node_count: usize) -> Mat {
        block_diagonal(&self.lambda, 2 * node_count)
    }

    fn check_square(&self, k: &Mat) -> FEAResult<usize> {
        let n = k.nrows();
        if n != k.ncols() || n % 6 != 0 || n == 0 {
            return Err(FEAError::DimensionError {
                expected: (6 * (n / 6).max(1), 6 * (n / 6).max(1)),
                actual: k.shape(),
            });
        }
        Ok(n / 6)
    }

    /// `T^T * K * T`
    pub fn to_global_matrix(&self, k: &Mat) -> FEAResult<Mat> {
        let t = self.expanded(self.check_square(k)?);
        Ok(t.transpose() * k * t)
    }

    /// `T * K * T^T`
    pub fn to_local_matrix(&self, k: &Mat) -> FEAResult<Mat> {
        let t = self.expanded(self.check_square(k)?);
        Ok(&t * k * t.transpose())
    }

    /// Canonical local vector to global, `T^T * v`
    pub fn to_global_vector(&self, v: &Vector) -> FEAResult<Vector> {
        if v.len() % 6 != 0 {
            return Err(FEAError::DimensionError {
                expected: (6 * (v.len() / 6 + 1), 1),
                actual: (v.len(), 1),
            });
        }
        Ok(self.expanded(v.len() / 6).transpose() * v)
    }

    /// Canonical global vector to local, `T * v`
    pub fn to_local_vector(&self, v: &Vector) -> FEAResult<Vector> {
        if v.len() % 6 != 0 {
            return Err(FEAError::DimensionError {
                expected: (6 * (v.len() / 6 + 1), 1),
                actual: (v.len(), 1),
            });
        }
        Ok(self.expanded(v.len() / 6) * v)
    }
}

impl Default for TransformManager {
    fn default() -> Self {
        Self::identity()
    }
}
