//! Consistent nodal loads of distributed loads on bars

use log::debug;

use super::{
    bar_internal_force, bar_load_displacement, interpolated_components, nodal_forces, LineLoad,
    LoadHandler,
};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::helpers::{ElementHelper, HelperKind};
use crate::loads::ElementalLoad;
use crate::math::{gauss_point_count, GaussianIntegrator, IsoPoint, Vec3};
use crate::results::{Displacement, Force};

/// Distributed load on any bar helper: `integral of N^T q |J|` over the
/// loaded span, whatever the end releases
#[derive(Debug, Clone, Copy, Default)]
pub struct BarDistributedHandler;

impl LoadHandler for BarDistributedHandler {
    fn name(&self) -> &'static str {
        "bar distributed"
    }

    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        let kind = helper.kind();
        let uniform_section = elm.bar_section().map(|s| s.is_uniform()).unwrap_or(false);
        kind.is_bar()
            && load.is_distributed()
            && (!matches!(kind, HelperKind::TimoshenkoBeam(_)) || uniform_section)
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let line = LineLoad::from_load(elm, load)?
            .ok_or_else(|| FEAError::unsupported("bar distributed handler needs a distributed load"))?;
        let degree = helper.n_max_order(elm)?[0] + line.severity.degree();
        let points = gauss_point_count(degree);
        debug!(
            "element {}: {:?} distributed load with {points} gauss points",
            elm.id(),
            helper.kind()
        );

        let nodal = GaussianIntegrator::line(line.start_xi, line.end_xi, points).integrate(|xi, _, _| {
            let iso = IsoPoint::on_line(xi);
            let q: Vec3 = line.intensity_at(xi);
            let values = [q.x, q.y, q.z, 0.0, 0.0, 0.0];
            let n = helper.interpolation_at(elm, iso)?;
            let det = helper.det_j_at(elm, iso)?;
            Ok(n.transpose() * interpolated_components(helper, values) * det.abs())
        })?;
        nodal_forces(elm, helper, &nodal.column(0).into_owned())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{
        BarSection, CrossSectionProperties, EndRelease, Material, Node, PolynomialSection,
    };
    use crate::helpers::{BeamDirection, EulerBernoulliBeamHelper, TimoshenkoBeamHelper, TrussHelper};
    use crate::loads::{CoordinateSystem, PartialNonUniformLoad, UniformLoad};
    use approx::assert_relative_eq;

    fn beam() -> Element {
        Element::bar(6, Node::new(0.0, 0.0, 0.0), Node::new(4.0, 0.0, 0.0))
            .with_section(CrossSectionProperties::rectangular(0.3, 0.5))
            .with_material(Material::isotropic(30e9, 0.2, 2500.0))
    }

    #[test]
    fn test_propped_cantilever_end_forces() {
        let elm = beam().with_end_release(EndRelease::hinged());
        let helper = EulerBernoulliBeamHelper::new(BeamDirection::Z);
        let load: ElementalLoad = UniformLoad::local(Vec3::y(), -6.0).into();
        let f = BarDistributedHandler
            .local_equivalent_nodal_loads(&elm, &helper, &load)
            .unwrap();
        // fixed-pinned: 5qL/8, 3qL/8, qL^2/8 at the fixed end
        assert_relative_eq!(f[0].fy, -6.0 * 4.0 * 5.0 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(f[1].fy, -6.0 * 4.0 * 3.0 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(f[0].mz, -6.0 * 16.0 / 8.0, max_relative = 1e-12);
        assert_relative_eq!(f[1].mz, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_triangular_load_on_fixed_beam() {
        let elm = beam();
        let helper = EulerBernoulliBeamHelper::new(BeamDirection::Z);
        let load: ElementalLoad =
            PartialNonUniformLoad::triangular(Vec3::y(), -9.0, -1.0, 1.0, CoordinateSystem::Local)
                .unwrap()
                .into();
        let f = BarDistributedHandler
            .local_equivalent_nodal_loads(&elm, &helper, &load)
            .unwrap();
        // 3qL/20 and qL^2/30 at the light end, 7qL/20 and qL^2/20 at the heavy end
        let (q, l) = (-9.0, 4.0);
        assert_relative_eq!(f[0].fy, 3.0 * q * l / 20.0, max_relative = 1e-12);
        assert_relative_eq!(f[1].fy, 7.0 * q * l / 20.0, max_relative = 1e-12);
        assert_relative_eq!(f[0].mz, q * l * l / 30.0, max_relative = 1e-12);
        assert_relative_eq!(f[1].mz, -q * l * l / 20.0, max_relative = 1e-12);
    }

    #[test]
    fn test_partial_axial_load() {
        let elm = beam();
        let load: ElementalLoad = PartialNonUniformLoad::new(
            Vec3::x(),
            crate::math::Polynomial::constant(2.0),
            0.0,
            1.0,
            CoordinateSystem::Local,
        )
        .into();
        let f = BarDistributedHandler
            .local_equivalent_nodal_loads(&elm, &TrussHelper, &load)
            .unwrap();
        // 4 kN over the far half; centroid at x = 3
        assert_relative_eq!(f[0].fx, 1.0, max_relative = 1e-12);
        assert_relative_eq!(f[1].fx, 3.0, max_relative = 1e-12);

        let n = BarDistributedHandler
            .local_load_internal_force_at(&elm, &TrussHelper, &load, IsoPoint::on_line(-0.5))
            .unwrap();
        assert_relative_eq!(n.fx, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_timoshenko_needs_uniform_section() {
        let tapered = BarSection::Polynomial(PolynomialSection::tapered(
            CrossSectionProperties::rectangular(0.3, 0.5),
            CrossSectionProperties::rectangular(0.3, 0.7),
        ));
        let elm = beam().with_section(tapered);
        let helper = TimoshenkoBeamHelper::new(BeamDirection::Z);
        let load: ElementalLoad = UniformLoad::local(Vec3::y(), -1.0).into();
        assert!(!BarDistributedHandler.can_handle(&elm, &helper, &load));
        assert!(BarDistributedHandler.can_handle(&beam(), &helper, &load));
    }

    #[test]
    fn test_timoshenko_uniform_load_fixed_end_forces() {
        // shear flexibility does not change fixed end forces of a uniform load
        let elm = beam();
        let helper = TimoshenkoBeamHelper::new(BeamDirection::Z);
        let load: ElementalLoad = UniformLoad::local(Vec3::y(), -5.0).into();
        let f = BarDistributedHandler
            .local_equivalent_nodal_loads(&elm, &helper, &load)
            .unwrap();
        assert_relative_eq!(f[0].fy, -10.0, max_relative = 1e-10);
        assert_relative_eq!(f[0].mz, -5.0 * 16.0 / 12.0, max_relative = 1e-10);

        // midspan deflection adds q L^2 / (8 k G A) to the bending part
        let d = BarDistributedHandler
            .local_load_displacement_at(&elm, &helper, &load, IsoPoint::on_line(0.0))
            .unwrap();
        let sec = CrossSectionProperties::rectangular(0.3, 0.5);
        let mat = crate::elements::MaterialProperties::isotropic(30e9, 0.2, 2500.0);
        let bending = -5.0 * 256.0 / (384.0 * mat.ex * sec.iz);
        let shear = -5.0 * 16.0 / (8.0 * mat.gxy * sec.ay);
        assert_relative_eq!(d.dy, bending + shear, max_relative = 1e-9);
    }
}
