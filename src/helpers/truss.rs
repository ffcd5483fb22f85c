//! Axial behavior of a two node bar

use log::warn;

use super::bar::{self, bar_jacobian};
use super::{ElementHelper, HelperKind, IsoDomain};
use crate::elements::Element;
use crate::error::FEAResult;
use crate::math::{linear_shape_functions, IsoPoint, LinearShapeSet, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

/// Axial stiffness `EA` with linear interpolation of Dx
#[derive(Debug, Clone, Copy, Default)]
pub struct TrussHelper;

impl TrussHelper {
    fn shape(elm: &Element) -> &'static LinearShapeSet {
        linear_shape_functions(
            elm.start_release().constraint(Dof::Dx),
            elm.end_release().constraint(Dof::Dx),
        )
    }
}

impl ElementHelper for TrussHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Truss
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Dx]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Line
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        bar::check_bar(elm, "truss")?;
        if elm.start_release().dx.is_released() && elm.end_release().dx.is_released() {
            warn!("element {}: both axial DOFs released, truss has no stiffness", elm.id());
        }
        Ok(())
    }

    /// Rows `[N, dN/dx]`
    fn n_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        bar::check_xi(elm, iso)?;
        let j = bar_jacobian(elm)?;
        let s = Self::shape(elm);
        let xi = iso.xi;

        #[rustfmt::skip]
        let n = Mat::from_row_slice(2, 2, &[
            s.n1.evaluate(xi), s.n2.evaluate(xi),
            s.n1.evaluate_derivative(xi, 1) / j, s.n2.evaluate_derivative(xi, 1) / j,
        ]);
        Ok(n)
    }

    fn b_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let n = self.n_matrix_at(elm, iso)?;
        Ok(n.rows(1, 1).into_owned())
    }

    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.ex * sec.a))
    }

    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.rho * sec.a))
    }

    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.mu * sec.a))
    }

    fn j_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, bar_jacobian(elm)?))
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let n = self.n_matrix_at(elm, iso)?;
        Ok(n.rows(0, 1).into_owned())
    }

    fn n_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([1, 0, 0])
    }

    fn b_max_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn det_j_order(&self, _elm: &Element) -> FEAResult<[usize; 3]> {
        Ok([0, 0, 0])
    }

    fn property_order(&self, elm: &Element) -> FEAResult<[usize; 3]> {
        bar::property_order(elm)
    }

    /// Axial force, tension positive
    fn local_internal_force_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Force> {
        let strain = (self.b_matrix_at(elm, iso)? * u)[0];
        let ea = self.d_matrix_at(elm, iso)?[(0, 0)];
        Ok(Force::new(ea * strain, 0.0, 0.0, 0.0, 0.0, 0.0))
    }
}
