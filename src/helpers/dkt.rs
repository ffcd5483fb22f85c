//! Discrete Kirchhoff triangle, thin plate bending of a three node element
//!
//! Rotations follow the right hand rule about the local axes, so a
//! deflection `w` has `Rx = dw/dy` and `Ry = -dw/dx`. Curvatures are
//! returned as `-[w,xx, w,yy, 2 w,xy]`.

use super::planar::{self, deflection_interpolation};
use super::{plane_stress_matrix, ElementHelper, HelperKind, IsoDomain};
use crate::elements::{Element, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{IsoPoint, Mat, Vec3, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy, Default)]
pub struct DktHelper;

/// Edge coefficients `(p, q, r, t)` of the edge `(x, y)`
fn edge_coefficients(x: f64, y: f64) -> (f64, f64, f64, f64) {
    let l2 = x * x + y * y;
    (-6.0 * x / l2, 3.0 * x * y / l2, 3.0 * y * y / l2, -6.0 * y / l2)
}

impl DktHelper {
    fn local_corners(elm: &Element) -> FEAResult<[Vec3; 3]> {
        let nodes = elm.local_node_coordinates()?;
        match nodes.as_slice() {
            [a, b, c] => Ok([*a, *b, *c]),
            _ => Err(FEAError::unsupported("DKT needs three nodes")),
        }
    }
}

impl ElementHelper for DktHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Dkt
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dz, Dof::Rx, Dof::Ry]
    }

    fn interpolated_dofs(&self) -> &'static [Dof] {
        &[Dof::Dz]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Triangle
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        planar::check_planar(elm, Topology::Triangle3, "DKT")?;
        let [p1, p2, p3] = Self::local_corners(elm)?;
        let tol = elm.options().geometry_tolerance;
        for (a, b) in [(p2, p3), (p3, p1), (p1, p2)] {
            if (a - b).norm() < tol {
                return Err(FEAError::degenerate("triangle has coincident nodes"));
            }
        }
        let two_a = (p3.x - p1.x) * (p1.y - p2.y) - (p1.x - p2.x) * (p3.y - p1.y);
        if two_a.abs() < tol {
            return Err(FEAError::degenerate("triangle has zero area"));
        }
        Ok(())
    }

    fn n_matrix_at(&self, _elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(deflection_interpolation(IsoDomain::Triangle, iso))
    }

    /// Curvature rows in terms of `[Dz, Rx, Ry]` at the three nodes
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let [p1, p2, p3] = Self::local_corners(elm)?;
        let (xi, eta) = (iso.xi, iso.eta);

        let (x23, y23) = (p2.x - p3.x, p2.y - p3.y);
        let (x31, y31) = (p3.x - p1.x, p3.y - p1.y);
        let (x12, y12) = (p1.x - p2.x, p1.y - p2.y);

        let (p4, q4, r4, t4) = edge_coefficients(x23, y23);
        let (p5, q5, r5, t5) = edge_coefficients(x31, y31);
        let (p6, q6, r6, t6) = edge_coefficients(x12, y12);

        let a = 1.0 - 2.0 * xi;
        let b = 1.0 - 2.0 * eta;

        #[rustfmt::skip]
        let hx_xi = [
            p6 * a + (p5 - p6) * eta, q6 * a - (q5 + q6) * eta, -4.0 + 6.0 * (xi + eta) + r6 * a - eta * (r5 + r6),
            -p6 * a + eta * (p4 + p6), q6 * a - eta * (q6 - q4), -2.0 + 6.0 * xi + r6 * a + eta * (r4 - r6),
            -eta * (p5 + p4), eta * (q4 - q5), -eta * (r5 - r4),
        ];
        #[rustfmt::skip]
        let hy_xi = [
            t6 * a + eta * (t5 - t6), 1.0 + r6 * a - eta * (r5 + r6), -q6 * a + eta * (q5 + q6),
            -t6 * a + eta * (t4 + t6), -1.0 + r6 * a + eta * (r4 - r6), -q6 * a - eta * (q4 - q6),
            -eta * (t4 + t5), eta * (r4 - r5), -eta * (q4 - q5),
        ];
        #[rustfmt::skip]
        let hx_eta = [
            -p5 * b - xi * (p6 - p5), q5 * b - xi * (q5 + q6), -4.0 + 6.0 * (xi + eta) + r5 * b - xi * (r5 + r6),
            xi * (p4 + p6), xi * (q4 - q6), -xi * (r6 - r4),
            p5 * b - xi * (p4 + p5), q5 * b + xi * (q4 - q5), -2.0 + 6.0 * eta + r5 * b + xi * (r4 - r5),
        ];
        #[rustfmt::skip]
        let hy_eta = [
            -t5 * b - xi * (t6 - t5), 1.0 + r5 * b - xi * (r5 + r6), -q5 * b + xi * (q5 + q6),
            xi * (t4 + t6), xi * (r4 - r6), -xi * (q4 - q6),
            t5 * b - xi * (t4 + t5), -1.0 + r5 * b + xi * (r4 - r5), -q5 * b - xi * (q4 - q5),
        ];

        // signed twice the area
        let two_a = x31 * y12 - x12 * y31;

        let mut bm = Mat::zeros(3, 9);
        for i in 0..9 {
            bm[(0, i)] = (y31 * hx_xi[i] + y12 * hx_eta[i]) / two_a;
            bm[(1, i)] = (-x31 * hy_xi[i] - x12 * hy_eta[i]) / two_a;
            bm[(2, i)] = (-x31 * hx_xi[i] - x12 * hx_eta[i] + y31 * hy_xi[i] + y12 * hy_eta[i]) / two_a;
        }
        Ok(bm)
    }

    /// Flexural rigidity `t^3 / 12 * D`
    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(plane_stress_matrix(&mat) * (t.powi(3) / 12.0))
    }

    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(Mat::from_element(1, 1, mat.rho * t))
    }

    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(Mat::from_element(1, 1, mat.mu * t))
    }

    fn j_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        planar::jacobian(elm, IsoDomain::Triangle, iso)
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        self.n_matrix_at(elm, iso)
    }

    fn n_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 1, 0])
    }

    fn b_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 1, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn local_internal_force_at(&self, _elm: &Element, _u: &Vector, _iso: IsoPoint) -> FEAResult<Force> {
        Err(FEAError::unsupported(
            "plate internal force, use local_stress_at for bending moments",
        ))
    }
}
