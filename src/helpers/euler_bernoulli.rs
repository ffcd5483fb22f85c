//! Euler-Bernoulli bending of a two node bar in one plane

use log::warn;

use super::bar::{self, bar_end_fixity, bar_jacobian};
use super::{BeamDirection, ElementHelper, HelperKind, IsoDomain};
use crate::elements::Element;
use crate::error::FEAResult;
use crate::math::{beam_shape_functions, BeamShapeSet, IsoPoint, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

/// Cubic Hermite beam; end releases select the shape functions
#[derive(Debug, Clone, Copy)]
pub struct EulerBernoulliBeamHelper {
    pub direction: BeamDirection,
}

impl EulerBernoulliBeamHelper {
    pub fn new(direction: BeamDirection) -> Self {
        Self { direction }
    }

    fn shape(&self, elm: &Element) -> &'static BeamShapeSet {
        let dofs = self.direction.dofs();
        beam_shape_functions(bar_end_fixity(elm, dofs[0], dofs[1]))
    }

    /// Bending rigidity at `xi`
    pub fn ei_at(&self, elm: &Element, xi: f64) -> FEAResult<f64> {
        let (sec, mat) = bar::properties_at(elm, xi)?;
        let i = match self.direction {
            BeamDirection::Y => sec.iy,
            BeamDirection::Z => sec.iz,
        };
        Ok(mat.ex * i)
    }
}

impl ElementHelper for EulerBernoulliBeamHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::EulerBernoulliBeam(self.direction)
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        self.direction.dofs()
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Line
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        bar::check_bar(elm, "Euler-Bernoulli beam")?;
        let dofs = self.direction.dofs();
        if bar_end_fixity(elm, dofs[0], dofs[1]).key() == 0 {
            warn!("element {}: every {:?} bending DOF released", elm.id(), self.direction);
        }
        Ok(())
    }

    /// Rows `[v, dv/dx, d2v/dx2, d3v/dx3]` of the deflection
    fn n_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        bar::check_xi(elm, iso)?;
        let j = bar_jacobian(elm)?;
        let s = self.shape(elm);
        let r = self.direction.rotation_sign() * j;
        let xi = iso.xi;

        let mut n = Mat::zeros(4, 4);
        for order in 0..4 {
            let scale = j.powi(-(order as i32));
            n[(order, 0)] = s.n1.evaluate_derivative(xi, order) * scale;
            n[(order, 1)] = s.m1.evaluate_derivative(xi, order) * scale * r;
            n[(order, 2)] = s.n2.evaluate_derivative(xi, order) * scale;
            n[(order, 3)] = s.m2.evaluate_derivative(xi, order) * scale * r;
        }
        Ok(n)
    }

    /// Curvature row `d2v/dx2`
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(self.n_matrix_at(elm, iso)?.rows(2, 1).into_owned())
    }

    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, self.ei_at(elm, iso.xi)?))
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

    /// Rows `[deflection, rotation]`
    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let n = self.n_matrix_at(elm, iso)?;
        let mut out = n.rows(0, 2).into_owned();
        let sign = self.direction.rotation_sign();
        out.row_mut(1).scale_mut(sign);
        Ok(out)
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

    /// Bending moment and shear at `iso`
    fn local_internal_force_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Force> {
        let f = self.n_matrix_at(elm, iso)? * u;
        let ei = self.ei_at(elm, iso.xi)?;

        let mut force = Force::zero();
        match self.direction {
            BeamDirection::Y => {
                force.my = -ei * f[2];
                force.fz = -ei * f[3];
            }
            BeamDirection::Z => {
                force.mz = ei * f[2];
                force.fy = -ei * f[3];
            }
        }
        Ok(force)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CrossSectionProperties, EndRelease, Material, Node};
    use approx::assert_relative_eq;

    const E: f64 = 200e9;
    const I: f64 = 1e-4;
    const L: f64 = 4.0;

    fn beam() -> Element {
        Element::bar(3, Node::new(0.0, 0.0, 0.0), Node::new(L, 0.0, 0.0))
            .with_section(CrossSectionProperties::new(1e-2, I, I, 1e-5))
            .with_material(Material::isotropic(E, 0.3, 7850.0))
    }

    #[test]
    fn test_fixed_fixed_stiffness() {
        let k = EulerBernoulliBeamHelper::new(BeamDirection::Z)
            .local_stiffness_matrix(&beam())
            .unwrap();
        let ei = E * I;
        assert_relative_eq!(k[(0, 0)], 12.0 * ei / L.powi(3), max_relative = 1e-12);
        assert_relative_eq!(k[(0, 1)], 6.0 * ei / L.powi(2), max_relative = 1e-12);
        assert_relative_eq!(k[(1, 1)], 4.0 * ei / L, max_relative = 1e-12);
        assert_relative_eq!(k[(1, 3)], 2.0 * ei / L, max_relative = 1e-12);

        let ky = EulerBernoulliBeamHelper::new(BeamDirection::Y)
            .local_stiffness_matrix(&beam())
            .unwrap();
        assert_relative_eq!(ky[(0, 1)], -6.0 * ei / L.powi(2), max_relative = 1e-12);
        assert_relative_eq!(ky[(1, 1)], 4.0 * ei / L, max_relative = 1e-12);
    }

    #[test]
    fn test_rigid_rotation_has_no_force() {
        for dir in [BeamDirection::Y, BeamDirection::Z] {
            let h = EulerBernoulliBeamHelper::new(dir);
            let k = h.local_stiffness_matrix(&beam()).unwrap();
            let theta = 1e-3;
            // slope of the deflection is sign * theta
            let s = dir.rotation_sign();
            let u = Vector::from_vec(vec![0.0, theta, s * theta * L, theta]);
            assert!((k * u).amax() < 1e-6);
        }
    }

    #[test]
    fn test_hinged_both_ends_has_no_bending_stiffness() {
        let elm = beam()
            .with_start_release(EndRelease::hinged())
            .with_end_release(EndRelease::hinged());
        let k = EulerBernoulliBeamHelper::new(BeamDirection::Z)
            .local_stiffness_matrix(&elm)
            .unwrap();
        assert!(k.amax() < 1e-9);
    }

    #[test]
    fn test_consistent_mass() {
        let m = EulerBernoulliBeamHelper::new(BeamDirection::Z)
            .local_mass_matrix(&beam())
            .unwrap();
        let c = 7850.0 * 1e-2 * L / 420.0;
        assert_relative_eq!(m[(0, 0)], 156.0 * c, max_relative = 1e-12);
        assert_relative_eq!(m[(0, 1)], 22.0 * L * c, max_relative = 1e-12);
        assert_relative_eq!(m[(0, 2)], 54.0 * c, max_relative = 1e-12);
        assert_relative_eq!(m[(1, 3)], -3.0 * L * L * c, max_relative = 1e-12);
    }

    #[test]
    fn test_kronecker_delta() {
        let h = EulerBernoulliBeamHelper::new(BeamDirection::Y);
        let elm = beam();
        let start = h.interpolation_at(&elm, IsoPoint::on_line(-1.0)).unwrap();
        let end = h.interpolation_at(&elm, IsoPoint::on_line(1.0)).unwrap();
        for c in 0..4 {
            assert_relative_eq!(start[(0, c)], if c == 0 { 1.0 } else { 0.0 }, epsilon = 1e-12);
            assert_relative_eq!(start[(1, c)], if c == 1 { 1.0 } else { 0.0 }, epsilon = 1e-12);
            assert_relative_eq!(end[(0, c)], if c == 2 { 1.0 } else { 0.0 }, epsilon = 1e-12);
            assert_relative_eq!(end[(1, c)], if c == 3 { 1.0 } else { 0.0 }, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cantilever_tip_load_moment() {
        // tip deflection of P L^3 / 3EI with tip rotation P L^2 / 2EI
        let p = 1000.0;
        let ei = E * I;
        let u = Vector::from_vec(vec![0.0, 0.0, p * L.powi(3) / (3.0 * ei), p * L * L / (2.0 * ei)]);
        let h = EulerBernoulliBeamHelper::new(BeamDirection::Z);
        let f = h.local_internal_force_at(&beam(), &u, IsoPoint::on_line(-1.0)).unwrap();
        assert_relative_eq!(f.mz, p * L, max_relative = 1e-10);
        assert_relative_eq!(f.fy, p, max_relative = 1e-10);
    }
}
