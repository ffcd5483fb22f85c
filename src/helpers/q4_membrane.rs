//! Bilinear four node membrane

use super::planar::{self, in_plane_interpolation, membrane_b};
use super::{membrane_matrix, ElementHelper, HelperKind, IsoDomain};
use crate::elements::{Element, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{IsoPoint, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

#[derive(Debug, Clone, Copy, Default)]
pub struct Q4MembraneHelper;

impl ElementHelper for Q4MembraneHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Q4Membrane
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dx, Dof::Dy]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Rectangle
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        planar::check_planar(elm, Topology::Quad4, "Q4 membrane")?;
        // a convex quad has a positive jacobian at every corner
        let signs: Vec<f64> = IsoDomain::Rectangle
            .node_locations()
            .into_iter()
            .map(|iso| self.det_j_at(elm, iso))
            .collect::<FEAResult<_>>()?;
        let tol = elm.options().geometry_tolerance;
        if !(signs.iter().all(|d| *d > tol) || signs.iter().all(|d| *d < -tol)) {
            return Err(FEAError::degenerate("quad is concave or has collapsed corners"));
        }
        Ok(())
    }

    fn n_matrix_at(&self, _elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(in_plane_interpolation(IsoDomain::Rectangle, iso))
    }

    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        membrane_b(elm, IsoDomain::Rectangle, iso)
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
        planar::jacobian(elm, IsoDomain::Rectangle, iso)
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
        Ok([1, 1, 0])
    }

    fn local_internal_force_at(&self, _elm: &Element, _u: &Vector, _iso: IsoPoint) -> FEAResult<Force> {
        Err(FEAError::unsupported(
            "membrane internal force, use local_stress_at for membrane stresses",
        ))
    }
}
