//! Discrete Kirchhoff quadrilateral, thin plate bending of a four node element
//!
//! Same rotation and curvature conventions as the DKT triangle. The normal
//! rotations vary quadratically along the edges through the mid-side
//! functions `N5..N8`.

use super::planar::{self, deflection_interpolation};
use super::{plane_stress_matrix, ElementHelper, HelperKind, IsoDomain};
use crate::elements::{Element, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{invert_jacobian, IsoPoint, Mat, Vec3, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy, Default)]
pub struct DkqHelper;

/// Coefficients of one edge `ij`
#[derive(Debug, Clone, Copy)]
struct EdgeTerms {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
}

impl EdgeTerms {
    fn new(pi: Vec3, pj: Vec3) -> Self {
        let (x, y) = (pi.x - pj.x, pi.y - pj.y);
        let l2 = x * x + y * y;
        Self {
            a: -x / l2,
            b: 0.75 * x * y / l2,
            c: (0.25 * x * x - 0.5 * y * y) / l2,
            d: -y / l2,
            e: (0.25 * y * y - 0.5 * x * x) / l2,
        }
    }
}

/// Edges meeting at each corner, as indices into `N5..N8`
const CORNER_EDGES: [(usize, usize); 4] = [(4, 7), (5, 4), (6, 5), (7, 6)];

/// Derivatives of the eight serendipity functions with respect to xi and eta
fn serendipity_derivatives(xi: f64, eta: f64) -> ([f64; 8], [f64; 8]) {
    let n_xi = [
        0.25 * (2.0 * xi + eta) * (1.0 - eta),
        0.25 * (2.0 * xi - eta) * (1.0 - eta),
        0.25 * (2.0 * xi + eta) * (1.0 + eta),
        0.25 * (2.0 * xi - eta) * (1.0 + eta),
        -xi * (1.0 - eta),
        0.5 * (1.0 - eta * eta),
        -xi * (1.0 + eta),
        -0.5 * (1.0 - eta * eta),
    ];
    let n_eta = [
        0.25 * (2.0 * eta + xi) * (1.0 - xi),
        0.25 * (2.0 * eta - xi) * (1.0 + xi),
        0.25 * (2.0 * eta + xi) * (1.0 + xi),
        0.25 * (2.0 * eta - xi) * (1.0 - xi),
        -0.5 * (1.0 - xi * xi),
        -eta * (1.0 + xi),
        0.5 * (1.0 - xi * xi),
        -eta * (1.0 - xi),
    ];
    (n_xi, n_eta)
}

/// Rotation fields `Hx`, `Hy` evaluated with one set of serendipity values
fn h_vectors(edges: &[EdgeTerms; 4], n: &[f64; 8]) -> ([f64; 12], [f64; 12]) {
    let mut hx = [0.0; 12];
    let mut hy = [0.0; 12];
    for (i, &(k, m)) in CORNER_EDGES.iter().enumerate() {
        let (ek, em) = (edges[k - 4], edges[m - 4]);
        let (nk, nm) = (n[k], n[m]);

        hx[3 * i] = 1.5 * (ek.a * nk - em.a * nm);
        hx[3 * i + 1] = ek.b * nk + em.b * nm;
        hx[3 * i + 2] = n[i] - ek.c * nk - em.c * nm;

        hy[3 * i] = 1.5 * (ek.d * nk - em.d * nm);
        hy[3 * i + 1] = -n[i] + ek.e * nk + em.e * nm;
        hy[3 * i + 2] = -ek.b * nk - em.b * nm;
    }
    (hx, hy)
}

impl DkqHelper {
    fn local_corners(elm: &Element) -> FEAResult<[Vec3; 4]> {
        let nodes = elm.local_node_coordinates()?;
        match nodes.as_slice() {
            [a, b, c, d] => Ok([*a, *b, *c, *d]),
            _ => Err(FEAError::unsupported("DKQ needs four nodes")),
        }
    }
}

impl ElementHelper for DkqHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Dkq
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dz, Dof::Rx, Dof::Ry]
    }

    fn interpolated_dofs(&self) -> &'static [Dof] {
        &[Dof::Dz]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Rectangle
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        planar::check_planar(elm, Topology::Quad4, "DKQ")?;
        let p = Self::local_corners(elm)?;
        let tol = elm.options().geometry_tolerance;
        for i in 0..4 {
            if (p[i] - p[(i + 1) % 4]).norm() < tol {
                return Err(FEAError::degenerate("quad has coincident nodes"));
            }
        }
        let dets: Vec<f64> = IsoDomain::Rectangle
            .node_locations()
            .into_iter()
            .map(|iso| self.det_j_at(elm, iso))
            .collect::<FEAResult<_>>()?;
        if !(dets.iter().all(|d| *d > tol) || dets.iter().all(|d| *d < -tol)) {
            return Err(FEAError::degenerate("quad is concave or has collapsed corners"));
        }
        Ok(())
    }

    fn n_matrix_at(&self, _elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(deflection_interpolation(IsoDomain::Rectangle, iso))
    }

    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let p = Self::local_corners(elm)?;
        let edges = [
            EdgeTerms::new(p[0], p[1]),
            EdgeTerms::new(p[1], p[2]),
            EdgeTerms::new(p[2], p[3]),
            EdgeTerms::new(p[3], p[0]),
        ];

        let (n_xi, n_eta) = serendipity_derivatives(iso.xi, iso.eta);
        let (hx_xi, hy_xi) = h_vectors(&edges, &n_xi);
        let (hx_eta, hy_eta) = h_vectors(&edges, &n_eta);

        let j = self.j_matrix_at(elm, iso)?;
        let (inv, _) = invert_jacobian(&j, elm.options().geometry_tolerance)?;
        let (j11, j12, j21, j22) = (inv[(0, 0)], inv[(0, 1)], inv[(1, 0)], inv[(1, 1)]);

        let mut b = Mat::zeros(3, 12);
        for i in 0..12 {
            b[(0, i)] = j11 * hx_xi[i] + j12 * hx_eta[i];
            b[(1, i)] = j21 * hy_xi[i] + j22 * hy_eta[i];
            b[(2, i)] = j11 * hy_xi[i] + j12 * hy_eta[i] + j21 * hx_xi[i] + j22 * hx_eta[i];
        }
        Ok(b)
    }

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
        planar::jacobian(elm, IsoDomain::Rectangle, iso)
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        self.n_matrix_at(elm, iso)
    }

    fn n_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 1, 0])
    }

    fn b_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([2, 2, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 1, 0])
    }

    fn local_internal_force_at(&self, _elm: &Element, _u: &Vector, _iso: IsoPoint) -> FEAResult<Force> {
        Err(FEAError::unsupported(
            "plate internal force, use local_stress_at for bending moments",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Node, PlanarSection};
    use crate::math::max_asymmetry;
    use approx::assert_relative_eq;

    fn plate(corners: [(f64, f64); 4]) -> Element {
        Element::quad(31, corners.map(|(x, y)| Node::new(x, y, 0.0)))
            .with_planar_section(PlanarSection::new(0.02))
            .with_material(Material::isotropic(210e9, 0.3, 7850.0))
    }

    fn nodal(elm: &Element, f: impl Fn(f64, f64) -> [f64; 3]) -> Vector {
        let nodes = elm.local_node_coordinates().unwrap();
        Vector::from_iterator(12, nodes.iter().flat_map(|p| f(p.x, p.y)))
    }

    #[test]
    fn test_square_has_three_rigid_modes() {
        let elm = plate([(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let k = DkqHelper.local_stiffness_matrix(&elm).unwrap();
        assert!(max_asymmetry(&k) < 1e-9 * k.amax());

        let eig = k.symmetric_eigenvalues();
        let scale = eig.amax();
        assert_eq!(eig.iter().filter(|v| v.abs() < 1e-9 * scale).count(), 3);
    }

    #[test]
    fn test_distorted_quad_patch() {
        let elm = plate([(0.0, 0.0), (2.0, 0.3), (2.2, 1.9), (-0.1, 1.5)]);
        let iso = IsoPoint::on_plane(0.3, -0.2);
        let b = DkqHelper.b_matrix_at(&elm, iso).unwrap();

        for m in [
            nodal(&elm, |_, _| [1.0, 0.0, 0.0]),
            nodal(&elm, |_, y| [y, 1.0, 0.0]),
            nodal(&elm, |x, _| [-x, 0.0, 1.0]),
        ] {
            assert!((&b * m).amax() < 1e-12);
        }

        let bend = &b * nodal(&elm, |x, _| [0.5 * x * x, 0.0, -x]);
        assert_relative_eq!(bend[0], -1.0, epsilon = 1e-10);
        assert!(bend[1].abs() < 1e-10 && bend[2].abs() < 1e-10);
    }

    #[test]
    fn test_uniform_moment_resultant() {
        let elm = plate([(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (0.0, 1.0)]);
        let u = nodal(&elm, |_, y| [0.5 * y * y, y, 0.0]);
        let m = DkqHelper
            .local_stress_at(&elm, &u, IsoPoint::on_plane(0.1, 0.6))
            .unwrap();
        let d = 210e9 * 0.02f64.powi(3) / (12.0 * (1.0 - 0.09));
        assert_relative_eq!(m[1], -d, max_relative = 1e-9);
        assert_relative_eq!(m[0], -0.3 * d, max_relative = 1e-9);
    }
}
