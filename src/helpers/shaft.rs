//! Torsional behavior of a two node bar

use log::warn;

use super::bar::{self, bar_jacobian};
use super::{ElementHelper, HelperKind, IsoDomain};
use crate::elements::Element;
use crate::error::FEAResult;
use crate::math::{linear_shape_functions, IsoPoint, LinearShapeSet, Mat, Vector};
use crate::permutation::Dof;
use crate::results::Force;

/// Torsional stiffness `GJ` with linear interpolation of Rx
#[derive(Debug, Clone, Copy, Default)]
pub struct ShaftHelper;

impl ShaftHelper {
    fn shape(elm: &Element) -> &'static LinearShapeSet {
        linear_shape_functions(
            elm.start_release().constraint(Dof::Rx),
            elm.end_release().constraint(Dof::Rx),
        )
    }
}

impl ElementHelper for ShaftHelper {
    fn kind(&self) -> HelperKind {
        HelperKind::Shaft
    }

    fn dofs_per_node(&self) -> &'static [Dof] {
        &[Dof::Rx]
    }

    fn domain(&self) -> IsoDomain {
        IsoDomain::Line
    }

    fn check(&self, elm: &Element) -> FEAResult<()> {
        bar::check_bar(elm, "shaft")?;
        if elm.start_release().rx.is_released() && elm.end_release().rx.is_released() {
            warn!("element {}: both torsional DOFs released, shaft has no stiffness", elm.id());
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
        Ok(self.n_matrix_at(elm, iso)?.rows(1, 1).into_owned())
    }

    fn d_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.gxy * sec.j))
    }

    fn rho_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.rho * sec.j))
    }

    fn mu_matrix_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        let (sec, mat) = bar::properties_at(elm, iso.xi)?;
        Ok(Mat::from_element(1, 1, mat.mu * sec.j))
    }

    fn j_matrix_at(&self, elm: &Element, _iso: IsoPoint) -> FEAResult<Mat> {
        Ok(Mat::from_element(1, 1, bar_jacobian(elm)?))
    }

    fn interpolation_at(&self, elm: &Element, iso: IsoPoint) -> FEAResult<Mat> {
        Ok(self.n_matrix_at(elm, iso)?.rows(0, 1).into_owned())
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

    /// Torque `GJ * dtheta/dx`
    fn local_internal_force_at(&self, elm: &Element, u: &Vector, iso: IsoPoint) -> FEAResult<Force> {
        let twist_rate = (self.b_matrix_at(elm, iso)? * u)[0];
        let gj = self.d_matrix_at(elm, iso)?[(0, 0)];
        Ok(Force::new(0.0, 0.0, 0.0, gj * twist_rate, 0.0, 0.0))
    }
}
