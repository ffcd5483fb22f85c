//! Load handlers
//!
//! Each handler covers one family of (helper, load) pairs. [`handler_for`]
//! walks [`HANDLERS`] in order and returns the first one whose `can_handle`
//! accepts the pair, so the closed form handlers shadow the general ones.
//!
//! Bar handlers share the segment equilibrium used for internal forces and the
//! curvature integration used for displacements of fixed-fixed members.

mod concentrated;
mod distributed;
mod euler_bernoulli;
mod inert;
mod planar;
mod truss;

use std::fmt;

use super::{ElementalLoad, PartialNonUniformLoad};
use crate::elements::{DofConstraint, Element};
use crate::error::{FEAError, FEAResult};
use crate::helpers::{BeamDirection, ElementHelper, HelperKind};
use crate::math::{gauss_legendre, IsoPoint, Mat, Polynomial, Vec3, Vector};
use crate::permutation::Dof;
use crate::results::{Displacement, Force};

pub use concentrated::BarConcentratedHandler;
pub use distributed::BarDistributedHandler;
pub use euler_bernoulli::{EulerBernoulliNonUniformHandler, EulerBernoulliUniformHandler};
pub use inert::InertHandler;
pub use planar::{PlanarConcentratedHandler, PlanarUniformHandler};
pub use truss::{TrussImposedStrainHandler, TrussUniformHandler};

/// Converts one kind of load on one kind of helper
pub trait LoadHandler: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// True when this handler formulates `load` for `helper`
    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool;

    /// Equivalent nodal loads in local axes, one force per node, restricted to
    /// the helper's DOFs
    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>>;

    /// Internal force at `iso` caused by `load` with every node held fixed
    fn local_load_internal_force_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Force>;

    /// Displacement at `iso` caused by `load` with every node held fixed
    fn local_load_displacement_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Displacement>;
}

/// Every handler, in dispatch order
pub static HANDLERS: [&dyn LoadHandler; 9] = [
    &TrussUniformHandler,
    &TrussImposedStrainHandler,
    &InertHandler,
    &BarConcentratedHandler,
    &EulerBernoulliUniformHandler,
    &EulerBernoulliNonUniformHandler,
    &BarDistributedHandler,
    &PlanarUniformHandler,
    &PlanarConcentratedHandler,
];

/// First handler that accepts `load` on `helper`
pub fn handler_for(
    elm: &Element,
    helper: &dyn ElementHelper,
    load: &ElementalLoad,
) -> FEAResult<&'static dyn LoadHandler> {
    HANDLERS
        .iter()
        .copied()
        .find(|h| h.can_handle(elm, helper, load))
        .ok_or_else(|| {
            FEAError::unsupported(format!(
                "no handler for a {} load on {:?}",
                load.kind_name(),
                helper.kind()
            ))
        })
}

/// Section and material along the bar are constant
fn has_uniform_properties(elm: &Element) -> bool {
    match (elm.bar_section(), elm.material()) {
        (Ok(s), Ok(m)) => s.is_uniform() && m.is_uniform(),
        _ => false,
    }
}

/// Every helper DOF is fixed at both ends
fn ends_fixed(elm: &Element, helper: &dyn ElementHelper) -> bool {
    helper.dofs_per_node().iter().all(|d| {
        elm.start_release().constraint(*d) == DofConstraint::Fixed
            && elm.end_release().constraint(*d) == DofConstraint::Fixed
    })
}

/// Helper DOF vector spread into one force per node
fn nodal_forces(elm: &Element, helper: &dyn ElementHelper, f: &Vector) -> FEAResult<Vec<Force>> {
    let order = helper.dof_order(elm);
    if order.len() != f.len() {
        return Err(FEAError::DimensionError {
            expected: (order.len(), 1),
            actual: (f.len(), 1),
        });
    }
    let mut arr = vec![[0.0; 6]; elm.node_count()];
    for (ld, v) in order.iter().zip(f.iter()) {
        arr[ld.node][ld.dof.index()] += v;
    }
    Ok(arr.into_iter().map(Force::from_array).collect())
}

/// Components of a six entry record at the helper's interpolated DOFs
fn interpolated_components(helper: &dyn ElementHelper, values: [f64; 6]) -> Mat {
    let dofs = helper.interpolated_dofs();
    Mat::from_iterator(dofs.len(), 1, dofs.iter().map(|d| values[d.index()]))
}

/// Distributed load on a bar reduced to local axes
#[derive(Debug, Clone)]
struct LineLoad {
    /// Unit direction in local axes
    direction: Vec3,
    /// Intensity as a polynomial of xi
    severity: Polynomial,
    start_xi: f64,
    end_xi: f64,
}

impl LineLoad {
    fn from_load(elm: &Element, load: &ElementalLoad) -> FEAResult<Option<Self>> {
        let t = elm.transformation()?;
        Ok(match load {
            ElementalLoad::Uniform(u) => {
                let q = u.local_intensity(&t)?;
                let magnitude = q.norm();
                let direction = if magnitude > 0.0 { q / magnitude } else { Vec3::x() };
                Some(Self {
                    direction,
                    severity: Polynomial::constant(magnitude),
                    start_xi: -1.0,
                    end_xi: 1.0,
                })
            }
            ElementalLoad::PartialNonUniform(p) => Some(Self::from_partial(elm, p)?),
            _ => None,
        })
    }

    fn from_partial(elm: &Element, p: &PartialNonUniformLoad) -> FEAResult<Self> {
        let tol = elm.options().iso_tolerance;
        p.validate(tol)?;
        Ok(Self {
            direction: p.local_direction(&elm.transformation()?)?,
            severity: p.severity.clone(),
            start_xi: p.start_xi.max(-1.0),
            end_xi: p.end_xi.min(1.0),
        })
    }

    /// Force per unit length at `xi`
    fn intensity_at(&self, xi: f64) -> Vec3 {
        if xi < self.start_xi || xi > self.end_xi {
            Vec3::zeros()
        } else {
            self.direction * self.severity.evaluate(xi)
        }
    }

    /// Resultant of the part of the load left of `xi`, about the start node
    fn resultant_up_to(&self, xi: f64, j: f64) -> Force {
        let (a, b) = (self.start_xi, self.end_xi.min(xi));
        if b <= a {
            return Force::zero();
        }
        let force = self.severity.integrate(a, b) * j;
        // arm x(xi) = j * (xi + 1)
        let moment = (&self.severity * &Polynomial::linear(j, j)).integrate(a, b) * j;
        Force::from_vectors(
            self.direction * force,
            Vec3::x().cross(&self.direction) * moment,
        )
    }
}

/// Iso coordinates where the load's internal force is not smooth
fn breakpoints(load: &ElementalLoad) -> Vec<f64> {
    match load {
        ElementalLoad::PartialNonUniform(p) => vec![p.start_xi, p.end_xi],
        ElementalLoad::Concentrated(c) => vec![c.iso_location.xi],
        _ => Vec::new(),
    }
}

/// Resultant about the start node of the part of `load` left of `xi`
fn bar_load_resultant(elm: &Element, load: &ElementalLoad, xi: f64) -> FEAResult<Force> {
    let length = elm.length()?;
    match load {
        ElementalLoad::Concentrated(c) => {
            let at = c.iso_location.xi;
            if at < xi {
                let f = c.local_force(&elm.transformation()?);
                let arm = Vec3::new((at + 1.0) * length / 2.0, 0.0, 0.0);
                Ok(f.move_to(arm, Vec3::zeros()))
            } else {
                Ok(Force::zero())
            }
        }
        ElementalLoad::ImposedStrain(_) => Ok(Force::zero()),
        _ => Ok(LineLoad::from_load(elm, load)?
            .map(|l| l.resultant_up_to(xi, length / 2.0))
            .unwrap_or_default()),
    }
}

/// Internal force at `xi` of a bar loaded by `load` and held at its nodes by
/// the reactions `-equivalent`.
///
/// Sums the nodal reactions strictly left of the cut and the load passed so
/// far, and returns the force the right part exerts on the left one.
fn bar_internal_force(
    elm: &Element,
    helper: &dyn ElementHelper,
    load: &ElementalLoad,
    equivalent: &[Force],
    xi: f64,
) -> FEAResult<Force> {
    let length = elm.length()?;
    let origin = Vec3::zeros();
    let mut left = Force::zero();
    for (node_xi, f) in [-1.0, 1.0].into_iter().zip(equivalent) {
        if node_xi < xi {
            let at = Vec3::new((node_xi + 1.0) * length / 2.0, 0.0, 0.0);
            left += (-*f).move_to(at, origin);
        }
    }
    left += bar_load_resultant(elm, load, xi)?;
    let cut = Vec3::new((xi + 1.0) * length / 2.0, 0.0, 0.0);
    Ok((-left.move_to(origin, cut)).masked(helper.dofs_per_node()))
}

fn positive(value: f64, what: &str, xi: f64) -> FEAResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(FEAError::InvalidInput(format!("{what} is {value} at xi = {xi}")))
    }
}

/// Bending moment, shear force, EI and shear rigidity of one bending plane
fn bending_terms(elm: &Element, dir: BeamDirection, f: &Force, xi: f64) -> FEAResult<[f64; 4]> {
    let sec = elm.bar_section()?.properties_at(xi)?;
    let mat = elm.material()?.properties_at(xi)?;
    Ok(match dir {
        BeamDirection::Y => [f.my, f.fz, mat.ex * sec.iy, mat.gxy * sec.az],
        BeamDirection::Z => [f.mz, f.fy, mat.ex * sec.iz, mat.gxy * sec.ay],
    })
}

/// Displacement at `xi` of a fixed-fixed bar under `load`, integrating the
/// strains of the internal force from the start node.
fn bar_load_displacement(
    elm: &Element,
    helper: &dyn ElementHelper,
    load: &ElementalLoad,
    equivalent: &[Force],
    xi: f64,
) -> FEAResult<Displacement> {
    let kind = helper.kind();
    if !ends_fixed(elm, helper) {
        return Err(FEAError::unsupported(format!(
            "load displacement of {kind:?} needs both ends fixed"
        )));
    }
    let j = elm.length()? / 2.0;
    let x = (xi + 1.0) * j;

    let mut cuts = vec![-1.0, xi];
    cuts.extend(breakpoints(load).into_iter().filter(|b| *b > -1.0 && *b < xi));
    cuts.sort_by(f64::total_cmp);
    let points = gauss_legendre(elm.options().bar_gauss_points)?;

    // slope, first moment of curvature, shear strain
    let (mut i0, mut i1, mut is) = (0.0, 0.0, 0.0);
    for w in cuts.windows(2) {
        let (a, b) = (w[0], w[1]);
        if b <= a {
            continue;
        }
        let (mid, half) = ((a + b) / 2.0, (b - a) / 2.0);
        for gp in points {
            let s = mid + half * gp.coord;
            let weight = gp.weight * half * j;
            let f = bar_internal_force(elm, helper, load, equivalent, s)?;
            match kind {
                HelperKind::Truss => {
                    let sec = elm.bar_section()?.properties_at(s)?;
                    let ea = positive(elm.material()?.properties_at(s)?.ex * sec.a, "EA", s)?;
                    i0 += weight * f.fx / ea;
                }
                HelperKind::Shaft => {
                    let sec = elm.bar_section()?.properties_at(s)?;
                    let gj = positive(elm.material()?.properties_at(s)?.gxy * sec.j, "GJ", s)?;
                    i0 += weight * f.mx / gj;
                }
                HelperKind::EulerBernoulliBeam(dir) | HelperKind::TimoshenkoBeam(dir) => {
                    let [m, v, ei, gas] = bending_terms(elm, dir, &f, s)?;
                    let kappa = m / positive(ei, "EI", s)?;
                    i0 += weight * kappa;
                    i1 += weight * (x - (s + 1.0) * j) * kappa;
                    if matches!(kind, HelperKind::TimoshenkoBeam(_)) {
                        is += weight * v / positive(gas, "shear rigidity", s)?;
                    }
                }
                _ => {
                    return Err(FEAError::unsupported(format!(
                        "load displacement by integration on {kind:?}"
                    )))
                }
            }
        }
    }

    let mut d = [0.0; 6];
    match kind {
        HelperKind::Truss => d[Dof::Dx.index()] = i0,
        HelperKind::Shaft => d[Dof::Rx.index()] = i0,
        HelperKind::EulerBernoulliBeam(BeamDirection::Z) | HelperKind::TimoshenkoBeam(BeamDirection::Z) => {
            d[Dof::Dy.index()] = i1 + is;
            d[Dof::Rz.index()] = i0;
        }
        _ => {
            d[Dof::Dz.index()] = -i1 + is;
            d[Dof::Ry.index()] = i0;
        }
    }
    Ok(Displacement::from_array(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CrossSectionProperties, EndRelease, Material, Node};
    use crate::helpers::{EulerBernoulliBeamHelper, ShaftHelper, TrussHelper};
    use crate::loads::{ConcentratedLoad, CoordinateSystem, ImposedStrainLoad, UniformLoad};
    use approx::assert_relative_eq;

    fn beam() -> Element {
        Element::bar(1, Node::new(0.0, 0.0, 0.0), Node::new(4.0, 0.0, 0.0))
            .with_section(CrossSectionProperties::rectangular(0.2, 0.4))
            .with_material(Material::isotropic(30e9, 0.2, 2500.0))
    }

    fn name_for(elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> &'static str {
        handler_for(elm, helper, load).map(|h| h.name()).unwrap_or("none")
    }

    #[test]
    fn test_dispatch_order() {
        let elm = beam();
        let uniform: ElementalLoad = UniformLoad::local(Vec3::y(), -10.0).into();
        let strain: ElementalLoad = ImposedStrainLoad::new(1e-4).into();
        let point: ElementalLoad = ConcentratedLoad::new(
            Force::new(0.0, -5.0, 0.0, 0.0, 0.0, 0.0),
            IsoPoint::on_line(0.2),
            CoordinateSystem::Local,
        )
        .into();
        let beam_z = EulerBernoulliBeamHelper::new(BeamDirection::Z);

        assert_eq!(name_for(&elm, &TrussHelper, &uniform), "truss uniform");
        assert_eq!(name_for(&elm, &TrussHelper, &strain), "truss imposed strain");
        assert_eq!(name_for(&elm, &beam_z, &strain), "inert");
        assert_eq!(name_for(&elm, &ShaftHelper, &uniform), "inert");
        assert_eq!(name_for(&elm, &beam_z, &point), "bar concentrated");
        assert_eq!(name_for(&elm, &beam_z, &uniform), "Euler-Bernoulli uniform");

        let hinged = beam().with_end_release(EndRelease::hinged());
        assert_eq!(name_for(&hinged, &beam_z, &uniform), "bar distributed");
    }

    #[test]
    fn test_no_handler_is_unsupported() {
        let strain: ElementalLoad = ImposedStrainLoad::new(1e-4).into();
        let plate = Element::triangle(
            2,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
            ],
        );
        let helpers = plate.helpers().unwrap();
        let err = handler_for(&plate, helpers[0].as_ref(), &strain).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_resultant_of_partial_load() {
        let line = LineLoad {
            direction: Vec3::y(),
            severity: Polynomial::constant(3.0),
            start_xi: 0.0,
            end_xi: 1.0,
        };
        // L = 4: loaded on x in [2, 4]
        let r = line.resultant_up_to(1.0, 2.0);
        assert_relative_eq!(r.fy, 6.0, epsilon = 1e-12);
        assert_relative_eq!(r.mz, 18.0, epsilon = 1e-12);
        assert_eq!(line.resultant_up_to(-0.5, 2.0), Force::zero());
        assert_relative_eq!(line.intensity_at(0.5).y, 3.0, epsilon = 1e-14);
        assert_eq!(line.intensity_at(-0.5), Vec3::zeros());
    }

    #[test]
    fn test_internal_force_excludes_node_at_cut() {
        let elm = beam();
        let load: ElementalLoad = UniformLoad::local(Vec3::y(), -10.0).into();
        let eq = vec![Force::new(0.0, -20.0, 0.0, 0.0, 0.0, 0.0); 2];
        let f = bar_internal_force(&elm, &EulerBernoulliBeamHelper::new(BeamDirection::Z), &load, &eq, -1.0)
            .unwrap();
        assert_eq!(f, Force::zero());
    }
}
