//! Constant strain triangle, membrane behavior of a three node element

use super::planar::{self, in_plane_interpolation, membrane_b};
use super::{membrane_matrix, ElementHelper, HelperKind, IsoDomain};
use crate::elements::{Element, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{IsoPoint, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy, Default)]
pub struct CstHelper;

impl ElementHelper for CstHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Cst
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dx, Dof::Dy]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Triangle
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        planar::check_planar(elm, Topology::Triangle3, "CST")?;
        let det = self.det_j_at(elm, IsoPoint::on_plane(0.0, 0.0))?;
        if det.abs() < elm.options().geometry_tolerance {
            return Err(FEAError::degenerate("triangle has zero area"));
        }
        Ok(())
    }

    fn n_matrix_at(&self, _elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(in_plane_interpolation(IsoDomain::Triangle, iso))
    }

    /// Constant over the element
    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        membrane_b(elm, IsoDomain::Triangle, iso)
    }

    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(membrane_matrix(&mat, elm.planar_section()?.formulation)? * t)
    }

    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(Mat::identity(2, 2) * (mat.rho * t))
    }

    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (t, mat) = planar::properties_at(elm, iso)?;
        Ok(Mat::identity(2, 2) * (mat.mu * t))
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
        Ok([0, 0, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn local_internal_force_at(&self, _elm: &Element, _u: &Vector, _iso: IsoPoint) -> FEAResult<Force> {
        Err(FEAError::unsupported(
            "membrane internal force, use local_stress_at for membrane stresses",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Node, PlanarSection};
    use crate::math::max_asymmetry;
    use approx::assert_relative_eq;

    fn triangle(nu: f64) -> Element {
        Element::triangle(
            7,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
            ],
        )
        .with_planar_section(PlanarSection::new(0.02))
        .with_material(Material::isotropic(100e9, nu, 2500.0))
    }

    #[test]
    fn test_corner_stiffness() {
        let k = CstHelper.local_stiffness_matrix(&triangle(0.0)).unwrap();
        // area 1/2 with b1 = c1 = -1 at the right angle corner
        assert_relative_eq!(k[(0, 0)], 0.75 * 100e9 * 0.02, max_relative = 1e-12);
        assert!(max_asymmetry(&k) < 1e-3);
    }

    #[test]
    fn test_rigid_modes() {
        let elm = triangle(0.25);
        let k = CstHelper.local_stiffness_matrix(&elm).unwrap();
        let nodes = elm.local_node_coordinates().unwrap();

        let tx = Vector::from_vec(vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert!((&k * tx).amax() < 1e-3);

        let rot = Vector::from_iterator(6, nodes.iter().flat_map(|p| [-p.y, p.x]));
        assert!((&k * rot).amax() < 1e-3);
    }

    #[test]
    fn test_mass_sums_to_total() {
        let m = CstHelper.local_mass_matrix(&triangle(0.3)).unwrap();
        let total: f64 = m.iter().sum();
        // two translational directions
        assert_relative_eq!(total, 2.0 * 2500.0 * 0.02 * 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_uniform_stretch_stress() {
        let elm = triangle(0.0);
        let nodes = elm.local_node_coordinates().unwrap();
        let u = Vector::from_iterator(6, nodes.iter().flat_map(|p| [1e-4 * p.x, 0.0]));
        let s = CstHelper.local_stress_at(&elm, &u, IsoPoint::on_plane(0.2, 0.2)).unwrap();
        assert_relative_eq!(s[0], 100e9 * 1e-4 * 0.02, max_relative = 1e-10);
        assert!(s[1].abs() < 1e-3);
    }

    #[test]
    fn test_plane_strain_stretch_stress() {
        let (e, nu, t) = (100e9, 0.3, 0.02);
        let elm = triangle(nu).with_planar_section(PlanarSection::plane_strain(t));
        let nodes = elm.local_node_coordinates().unwrap();
        let u = Vector::from_iterator(6, nodes.iter().flat_map(|p| [1e-4 * p.x, 0.0]));
        let s = CstHelper.local_stress_at(&elm, &u, IsoPoint::on_plane(0.3, 0.3)).unwrap();
        let k = e / ((1.0 + nu) * (1.0 - 2.0 * nu));
        assert_relative_eq!(s[0], k * (1.0 - nu) * 1e-4 * t, max_relative = 1e-10);
        assert_relative_eq!(s[1], k * nu * 1e-4 * t, max_relative = 1e-10);

        let stress_state = triangle(nu);
        let k_strain = CstHelper.local_stiffness_matrix(&elm).unwrap();
        let k_stress = CstHelper.local_stiffness_matrix(&stress_state).unwrap();
        assert!(k_strain[(0, 0)] > k_stress[(0, 0)]);
    }

    #[test]
    fn test_collinear_nodes_are_degenerate() {
        let elm = Element::triangle(
            8,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(2.0, 0.0, 0.0),
            ],
        )
        .with_planar_section(PlanarSection::new(0.02))
        .with_material(Material::isotropic(100e9, 0.3, 2500.0));
        assert!(CstHelper.local_stiffness_matrix(&elm).is_err());
    }
}
