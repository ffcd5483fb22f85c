//! Timoshenko bending of a two node bar with interdependent interpolation
//!
//! Deflection and rotation use the exact shape functions of a uniform shear
//! deformable beam, parameterized by `phi = 12 EI / (kGA L^2)` with the shear
//! area `kA` taken at mid length. Bending about y mirrors bending about z
//! with the rotation DOFs negated.

use super::bar::{self, bar_end_fixity, bar_jacobian};
use super::{BeamDirection, ElementHelper, HelperKind, IsoDomain};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::math::{IsoPoint, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy)]
pub struct TimoshenkoBeamHelper {
    pub direction: BeamDirection,
}

/// Shape function values and their derivative with respect to `s = x / L`
struct ShapeRow {
    values: [f64; 4],
    ds: [f64; 4],
}

impl TimoshenkoBeamHelper {
    pub fn new(direction: BeamDirection) -> Self {
        Self { direction }
    }

    /// `(EI, kGA)` at `xi`
    pub fn rigidities_at(&self, elm: &Element, xi: f64) -> FEAResult<(f64, f64)> {
        let (sec, mat) = bar::properties_at(elm, xi)?;
        Ok(match self.direction {
            BeamDirection::Y => (mat.ex * sec.iy, mat.gxy * sec.az),
            BeamDirection::Z => (mat.ex * sec.iz, mat.gxy * sec.ay),
        })
    }

    /// Shear flexibility parameter
    pub fn phi(&self, elm: &Element) -> FEAResult<f64> {
        let l = elm.length()?;
        let (ei, kga) = self.rigidities_at(elm, 0.0)?;
        if kga <= 0.0 {
            return Err(FEAError::unsupported("Timoshenko beam with zero shear area"));
        }
        Ok(12.0 * ei / (kga * l * l))
    }

    /// Deflection and rotation rows for bending about z
    fn z_rows(&self, elm: &Element, xi: f64) -> FEAResult<(ShapeRow, ShapeRow)> {
        let l = elm.length()?;
        let phi = self.phi(elm)?;
        let den = 1.0 + phi;
        let s = (xi + 1.0) / 2.0;
        let (s2, s3) = (s * s, s * s * s);

        let v = ShapeRow {
            values: [
                (2.0 * s3 - 3.0 * s2 - phi * s + 1.0 + phi) / den,
                l * (s3 - (2.0 + phi / 2.0) * s2 + (1.0 + phi / 2.0) * s) / den,
                (-2.0 * s3 + 3.0 * s2 + phi * s) / den,
                l * (s3 - (1.0 - phi / 2.0) * s2 - (phi / 2.0) * s) / den,
            ],
            ds: [
                (6.0 * s2 - 6.0 * s - phi) / den,
                l * (3.0 * s2 - (4.0 + phi) * s + 1.0 + phi / 2.0) / den,
                (-6.0 * s2 + 6.0 * s + phi) / den,
                l * (3.0 * s2 - (2.0 - phi) * s - phi / 2.0) / den,
            ],
        };
        let theta = ShapeRow {
            values: [
                6.0 * (s2 - s) / (den * l),
                (3.0 * s2 - (4.0 + phi) * s + 1.0 + phi) / den,
                -6.0 * (s2 - s) / (den * l),
                (3.0 * s2 - (2.0 - phi) * s) / den,
            ],
            ds: [
                6.0 * (2.0 * s - 1.0) / (den * l),
                (6.0 * s - 4.0 - phi) / den,
                -6.0 * (2.0 * s - 1.0) / (den * l),
                (6.0 * s - 2.0 + phi) / den,
            ],
        };
        Ok((v, theta))
    }

    /// Mirror for bending about y: rotation columns and rotation rows negated
    fn mirrored(&self, mut m: Mat, rotation_rows: &[usize]) -> Mat {
        if self.direction == BeamDirection::Y {
            m.column_mut(1).neg_mut();
            m.column_mut(3).neg_mut();
            for r in rotation_rows {
                m.row_mut(*r).neg_mut();
            }
        }
        m
    }
}

impl ElementHelper for TimoshenkoBeamHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::TimoshenkoBeam(self.direction)
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        self.direction.dofs()
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Line
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        bar::check_bar(elm, "Timoshenko beam")?;
        let dofs = self.direction.dofs();
        if !bar_end_fixity(elm, dofs[0], dofs[1]).is_fully_fixed() {
            return Err(FEAError::unsupported(
                "Timoshenko beam with released bending DOFs",
            ));
        }
        self.phi(elm)?;
        Ok(())
    }

    /// Rows `[v, theta]`, the interdependent interpolation
    fn n_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        bar::check_xi(elm, iso)?;
        let (v, t) = self.z_rows(elm, iso.xi)?;
        let mut n = Mat::zeros(2, 4);
        for c in 0..4 {
            n[(0, c)] = v.values[c];
            n[(1, c)] = t.values[c];
        }
        Ok(self.mirrored(n, &[1]))
    }

    /// Rows `[dtheta/dx, dv/dx - theta]`
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        bar::check_xi(elm, iso)?;
        let l = elm.length()?;
        let (v, t) = self.z_rows(elm, iso.xi)?;
        let mut b = Mat::zeros(2, 4);
        for c in 0..4 {
            b[(0, c)] = t.ds[c] / l;
            b[(1, c)] = v.ds[c] / l - t.values[c];
        }
        Ok(self.mirrored(b, &[0]))
    }

    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (ei, kga) = self.rigidities_at(elm, iso.xi)?;
        Ok(Mat::from_diagonal(&Vector::from_vec(vec![ei, kga])))
    }

    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_diagonal(&Vector::from_vec(vec![mat.rho * sec.a, 0.0])))
    }

    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_diagonal(&Vector::from_vec(vec![mat.mu * sec.a, 0.0])))
    }

    fn j_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, bar_jacobian(elm)?))
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        self.n_matrix_at(elm, iso)
    }

    fn n_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([3, 0, 0])
    }

    fn b_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 0, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn property_order(&self, elm: &Element) -> FEAResult<[usize; 3]> {
        bar::property_order(elm)
    }

    /// Moment from curvature, shear from shear strain
    fn local_internal_force_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Force> {
        let strains = self.b_matrix_at(elm, iso)? * u;
        let (ei, kga) = self.rigidities_at(elm, iso.xi)?;

        let mut force = Force::zero();
        match self.direction {
            BeamDirection::Y => {
                force.my = ei * strains[0];
                force.fz = kga * strains[1];
            }
            BeamDirection::Z => {
                force.mz = ei * strains[0];
                force.fy = kga * strains[1];
            }
        }
        Ok(force)
    }
}
