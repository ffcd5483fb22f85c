//! Mathematical utilities for element formulation

pub mod gauss;
pub mod polynomial;
pub mod shape_functions;

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};

pub use gauss::{gauss_legendre, gauss_point_count, GaussPoint, GaussianIntegrator};
pub use polynomial::Polynomial;
pub use shape_functions::{beam_shape_functions, linear_shape_functions, BarEndFixity, BeamShapeSet, LinearShapeSet};

pub type Mat = DMatrix<f64>;
pub type Vector = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// A point in the iso-parametric space of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IsoPoint {
    pub xi: f64,
    pub eta: f64,
    pub lambda: f64,
}

impl IsoPoint {
    pub fn new(xi: f64, eta: f64, lambda: f64) -> Self {
        Self { xi, eta, lambda }
    }

    /// Point on a one dimensional element
    pub fn on_line(xi: f64) -> Self {
        Self::new(xi, 0.0, 0.0)
    }

    /// Point on a planar element
    pub fn on_plane(xi: f64, eta: f64) -> Self {
        Self::new(xi, eta, 0.0)
    }
}

/// Check that `value` lies in `[min, max]` within `tol`
pub fn check_domain(value: f64, min: f64, max: f64, tol: f64) -> FEAResult<()> {
    if !value.is_finite() || value < min - tol || value > max + tol {
        return Err(FEAError::DomainError { value, min, max });
    }
    Ok(())
}

/// Largest absolute asymmetry `|K_ij - K_ji|` of a square matrix
pub fn max_asymmetry(k: &Mat) -> f64 {
    let n = k.nrows().min(k.ncols());
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            worst = worst.max((k[(i, j)] - k[(j, i)]).abs());
        }
    }
    worst
}

/// Largest absolute diagonal term
pub fn max_abs_diagonal(k: &Mat) -> f64 {
    k.diagonal().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Block diagonal matrix with `count` copies of `block`
pub fn block_diagonal(block: &Mat3, count: usize) -> Mat {
    let mut t = Mat::zeros(3 * count, 3 * count);
    for i in 0..count {
        t.fixed_view_mut::<3, 3>(3 * i, 3 * i).copy_from(block);
    }
    t
}

/// Inverse of a 2x2 or 3x3 jacobian together with its determinant
pub fn invert_jacobian(j: &Mat, tol: f64) -> FEAResult<(Mat, f64)> {
    if j.nrows() != j.ncols() {
        return Err(FEAError::DimensionError {
            expected: (j.nrows(), j.nrows()),
            actual: (j.nrows(), j.ncols()),
        });
    }
    let det = j.determinant();
    if det.abs() < tol {
        return Err(FEAError::degenerate(format!(
            "jacobian determinant {det:e} is zero"
        )));
    }
    let inv = j
        .clone()
        .try_inverse()
        .ok_or_else(|| FEAError::degenerate("jacobian is not invertible"))?;
    Ok((inv, det))
}
