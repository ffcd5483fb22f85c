//! Distributed loads on fixed-fixed Euler-Bernoulli beams

use log::debug;

use super::{
    bar_internal_force, bar_load_displacement, bar_load_resultant, breakpoints, ends_fixed,
    has_uniform_properties, LineLoad, LoadHandler,
};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::helpers::{BeamDirection, ElementHelper, HelperKind};
use crate::loads::ElementalLoad;
use crate::math::{gauss_legendre, IsoPoint, Mat, Vec3, Vector};
use crate::permutation::Dof;
use crate::results::{Displacement, Force};

fn beam_direction(helper: &dyn ElementHelper) -> Option<BeamDirection> {
    match helper.kind() {
        HelperKind::EulerBernoulliBeam(d) => Some(d),
        _ => None,
    }
}

fn direction_of(helper: &dyn ElementHelper) -> FEAResult<BeamDirection> {
    beam_direction(helper)
        .ok_or_else(|| FEAError::unsupported(format!("{:?} is not an Euler-Bernoulli beam", helper.kind())))
}

/// Uniform load on a beam with constant EI and both ends fixed.
///
/// Fixed end forces `qL/2` and `qL^2/12`, deflection `q x^2 (L - x)^2 / (24 EI)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerBernoulliUniformHandler;

impl EulerBernoulliUniformHandler {
    /// Transverse intensity in the bending plane, length and EI
    fn terms(elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> FEAResult<(f64, f64, f64)> {
        let dir = direction_of(helper)?;
        let ElementalLoad::Uniform(u) = load else {
            return Err(FEAError::unsupported("Euler-Bernoulli uniform handler needs a uniform load"));
        };
        let q = u.local_intensity(&elm.transformation()?)?;
        let sec = elm.bar_section()?.properties_at(0.0)?;
        let e = elm.material()?.properties_at(0.0)?.ex;
        Ok(match dir {
            BeamDirection::Y => (q.z, elm.length()?, e * sec.iy),
            BeamDirection::Z => (q.y, elm.length()?, e * sec.iz),
        })
    }
}

impl LoadHandler for EulerBernoulliUniformHandler {
    fn name(&self) -> &'static str {
        "Euler-Bernoulli uniform"
    }

    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        beam_direction(helper).is_some()
            && matches!(load, ElementalLoad::Uniform(_))
            && has_uniform_properties(elm)
            && ends_fixed(elm, helper)
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let (q, l, _) = Self::terms(elm, helper, load)?;
        let (v, m) = (q * l / 2.0, q * l * l / 12.0);
        Ok(match direction_of(helper)? {
            BeamDirection::Y => vec![
                Force::new(0.0, 0.0, v, 0.0, -m, 0.0),
                Force::new(0.0, 0.0, v, 0.0, m, 0.0),
            ],
            BeamDirection::Z => vec![
                Force::new(0.0, v, 0.0, 0.0, 0.0, m),
                Force::new(0.0, v, 0.0, 0.0, 0.0, -m),
            ],
        })
    }

    fn local_load_internal_force_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Force> {
        let eq = self.local_equivalent_nodal_loads(elm, helper, load)?;
        bar_internal_force(elm, helper, load, &eq, iso.xi)
    }

    fn local_load_displacement_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        let (q, l, ei) = Self::terms(elm, helper, load)?;
        if ei <= 0.0 {
            return Err(FEAError::InvalidInput(format!("bending rigidity is {ei}")));
        }
        let x = (iso.xi + 1.0) * l / 2.0;
        let d = q * x * x * (l - x).powi(2) / (24.0 * ei);
        let slope = q * x * (l - x) * (l - 2.0 * x) / (12.0 * ei);
        Ok(match direction_of(helper)? {
            BeamDirection::Y => Displacement::new(0.0, 0.0, d, 0.0, -slope, 0.0),
            BeamDirection::Z => Displacement::new(0.0, d, 0.0, 0.0, 0.0, slope),
        })
    }
}

/// Distributed load on a fixed-fixed beam whose EI varies along it.
///
/// The start reactions follow from zero slope and deflection at the far end,
/// integrating `M / EI` with the exact `EI` at the Gauss points that the
/// load displacement recovery also uses. The far end reactions follow from
/// equilibrium.
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerBernoulliNonUniformHandler;

impl EulerBernoulliNonUniformHandler {
    /// `1 / EI` at `xi`
    fn flexibility_at(elm: &Element, dir: BeamDirection, xi: f64) -> FEAResult<f64> {
        let sec = elm.bar_section()?.properties_at(xi)?;
        let e = elm.material()?.properties_at(xi)?.ex;
        let ei = match dir {
            BeamDirection::Y => e * sec.iy,
            BeamDirection::Z => e * sec.iz,
        };
        if ei <= 0.0 {
            return Err(FEAError::InvalidInput(format!("bending rigidity is {ei} at xi = {xi}")));
        }
        Ok(1.0 / ei)
    }

    /// Forces the supports apply on the beam, `[start, end]`
    fn reactions(elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> FEAResult<[Force; 2]> {
        let dir = direction_of(helper)?;
        let line = LineLoad::from_load(elm, load)?
            .ok_or_else(|| FEAError::unsupported("non-uniform beam handler needs a distributed load"))?;
        let l = elm.length()?;
        let j = l / 2.0;
        let (force_dof, moment_dof, arm_sign) = match dir {
            BeamDirection::Y => (Dof::Dz, Dof::Ry, -1.0),
            BeamDirection::Z => (Dof::Dy, Dof::Rz, 1.0),
        };

        let points = gauss_legendre(elm.options().bar_gauss_points)?;
        let mut cuts = vec![-1.0, 1.0];
        cuts.extend(breakpoints(load).into_iter().filter(|b| *b > -1.0 && *b < 1.0));
        cuts.sort_by(f64::total_cmp);

        // rows: end slope and end deflection; columns: unit start force and moment
        let mut a = Mat::zeros(2, 2);
        let mut rhs = Vector::zeros(2);
        for w in cuts.windows(2) {
            let (lo, hi) = (w[0], w[1]);
            if hi <= lo {
                continue;
            }
            let (mid, half) = ((lo + hi) / 2.0, (hi - lo) / 2.0);
            for gp in points {
                let s = mid + half * gp.coord;
                let cut = Vec3::new((s + 1.0) * j, 0.0, 0.0);
                let flex = gp.weight * half * j * Self::flexibility_at(elm, dir, s)?;
                let m_load = (-line.resultant_up_to(s, j).move_to(Vec3::zeros(), cut)).component(moment_dof);
                for (k, wk) in [1.0, cut.x].into_iter().enumerate() {
                    a[(k, 0)] += flex * wk * arm_sign * cut.x;
                    a[(k, 1)] -= flex * wk;
                    rhs[k] -= flex * wk * m_load;
                }
            }
        }
        debug!(
            "element {}: non-uniform beam compatibility over {} spans",
            elm.id(),
            cuts.len() - 1
        );

        let sol = a
            .lu()
            .solve(&rhs)
            .ok_or_else(|| FEAError::MathError("singular beam compatibility system".into()))?;
        let mut start = [0.0; 6];
        start[force_dof.index()] = sol[0];
        start[moment_dof.index()] = sol[1];
        let start = Force::from_array(start);

        let total = bar_load_resultant(elm, load, 1.0)?;
        let end_force = -(total.forces() + start.forces());
        let arm = Vec3::new(l, 0.0, 0.0);
        let end_moment = -(total.moments() + start.moments() + arm.cross(&end_force));
        let end = Force::from_vectors(end_force, end_moment);

        let dofs = helper.dofs_per_node();
        Ok([start.masked(dofs), end.masked(dofs)])
    }
}

impl LoadHandler for EulerBernoulliNonUniformHandler {
    fn name(&self) -> &'static str {
        "Euler-Bernoulli non-uniform"
    }

    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        beam_direction(helper).is_some()
            && load.is_distributed()
            && !has_uniform_properties(elm)
            && ends_fixed(elm, helper)
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let [start, end] = Self::reactions(elm, helper, load)?;
        Ok(vec![-start, -end])
    }

    fn local_load_internal_force_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Force> {
        let eq = self.local_equivalent_nodal_loads(elm, helper, load)?;
        bar_internal_force(elm, helper, load, &eq, iso.xi)
    }

    fn local_load_displacement_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        let eq = self.local_equivalent_nodal_loads(elm, helper, load)?;
        bar_load_displacement(elm, helper, load, &eq, iso.xi)
    }
}
