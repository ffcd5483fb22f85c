//! Surface, body and point loads on planar and solid elements

use super::{interpolated_components, nodal_forces, LoadHandler};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::helpers::{ElementHelper, HelperKind};
use crate::loads::{ConcentratedLoad, ElementalLoad};
use crate::math::IsoPoint;
use crate::results::{Displacement, Force};

fn is_planar_or_solid(kind: HelperKind) -> bool {
    matches!(
        kind,
        HelperKind::Cst
            | HelperKind::Q4Membrane
            | HelperKind::Dkt
            | HelperKind::Dkq
            | HelperKind::Tetrahedron
    )
}

/// Uniform load on a membrane (in-plane components), a plate (normal
/// component) or a tetrahedron (body force): `integral of N^T q |J|`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarUniformHandler;

impl LoadHandler for PlanarUniformHandler {
    fn name(&self) -> &'static str {
        "planar uniform"
    }

    fn can_handle(&self, _elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        is_planar_or_solid(helper.kind()) && matches!(load, ElementalLoad::Uniform(_))
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let ElementalLoad::Uniform(u) = load else {
            return Err(FEAError::unsupported("planar uniform handler needs a uniform load"));
        };
        let q = u.local_intensity(&elm.transformation()?)?;
        let components = interpolated_components(helper, [q.x, q.y, q.z, 0.0, 0.0, 0.0]);

        let n_order = helper.n_max_order(elm)?;
        let det_order = helper.det_j_order(elm)?;
        let degrees = std::array::from_fn(|i| n_order[i] + det_order[i]);
        let nodal = helper.domain().integrator(degrees).integrate(|xi, eta, gamma| {
            let iso = IsoPoint::new(xi, eta, gamma);
            let n = helper.interpolation_at(elm, iso)?;
            let det = helper.det_j_at(elm, iso)?;
            Ok(n.transpose() * &components * det.abs())
        })?;
        nodal_forces(elm, helper, &nodal.column(0).into_owned())
    }

    fn local_load_internal_force_at(
        &self,
        _elm: &Element,
        helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Force> {
        Err(FEAError::unsupported(format!(
            "internal force of a surface load on {:?}",
            helper.kind()
        )))
    }

    fn local_load_displacement_at(
        &self,
        _elm: &Element,
        helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        Err(FEAError::unsupported(format!(
            "displacement of a surface load on {:?}",
            helper.kind()
        )))
    }
}

/// Point force on a membrane, plate or tetrahedron: `N(iso)^T f`.
///
/// Nodal rotations carry no interpolated field here, so a point moment
/// (including a drilling moment) is not accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarConcentratedHandler;

impl PlanarConcentratedHandler {
    fn point_load(load: &ElementalLoad) -> FEAResult<&ConcentratedLoad> {
        match load {
            ElementalLoad::Concentrated(c) => Ok(c),
            _ => Err(FEAError::unsupported("planar concentrated handler needs a concentrated load")),
        }
    }
}

impl LoadHandler for PlanarConcentratedHandler {
    fn name(&self) -> &'static str {
        "planar concentrated"
    }

    fn can_handle(&self, _elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        match load {
            ElementalLoad::Concentrated(c) => {
                is_planar_or_solid(helper.kind()) && c.force.moments().norm() == 0.0
            }
            _ => false,
        }
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let c = Self::point_load(load)?;
        if c.force.moments().norm() != 0.0 {
            return Err(FEAError::unsupported(format!(
                "point moment on {:?}",
                helper.kind()
            )));
        }
        let iso = c.iso_location;
        helper.domain().check(iso, elm.options().iso_tolerance)?;

        let f = c.local_force(&elm.transformation()?);
        let n = helper.interpolation_at(elm, iso)?;
        let nodal = n.transpose() * interpolated_components(helper, f.to_array());
        nodal_forces(elm, helper, &nodal.column(0).into_owned())
    }

    fn local_load_internal_force_at(
        &self,
        _elm: &Element,
        helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Force> {
        Err(FEAError::unsupported(format!(
            "internal force of a point load on {:?}",
            helper.kind()
        )))
    }

    fn local_load_displacement_at(
        &self,
        _elm: &Element,
        helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        Err(FEAError::unsupported(format!(
            "displacement of a point load on {:?}",
            helper.kind()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Node, PlanarSection};
    use crate::helpers::{CstHelper, DkqHelper, DktHelper, TetrahedronHelper};
    use crate::loads::{CoordinateSystem, UniformLoad};
    use crate::math::Vec3;
    use approx::assert_relative_eq;

    fn triangle() -> Element {
        Element::triangle(
            12,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(3.0, 0.0, 0.0),
                Node::new(0.0, 2.0, 0.0),
            ],
        )
        .with_planar_section(PlanarSection::new(0.1))
        .with_material(Material::isotropic(30e9, 0.2, 2500.0))
    }

    #[test]
    fn test_pressure_on_plate_triangle() {
        let elm = triangle();
        let load: ElementalLoad = UniformLoad::local(Vec3::z(), -6.0).into();
        let f = PlanarUniformHandler
            .local_equivalent_nodal_loads(&elm, &DktHelper, &load)
            .unwrap();
        // area 3, a third to each corner
        for node in &f {
            assert_relative_eq!(node.fz, -6.0, max_relative = 1e-12);
            assert_eq!(node.mx, 0.0);
        }
    }

    #[test]
    fn test_in_plane_load_on_membrane() {
        let elm = triangle();
        // local axes of a counter clockwise XY triangle flip y and z
        let load: ElementalLoad = UniformLoad::global(Vec3::new(1.0, 1.0, 1.0), 3.0_f64.sqrt() * 2.0).into();
        let f = PlanarUniformHandler
            .local_equivalent_nodal_loads(&elm, &CstHelper, &load)
            .unwrap();
        let total: Force = f.iter().copied().sum();
        assert_relative_eq!(total.fx, 6.0, max_relative = 1e-12);
        assert_relative_eq!(total.fy, -6.0, max_relative = 1e-12);
        assert_eq!(total.fz, 0.0);
    }

    #[test]
    fn test_pressure_on_square_plate() {
        let elm = Element::quad(
            13,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(2.0, 0.0, 0.0),
                Node::new(2.0, 2.0, 0.0),
                Node::new(0.0, 2.0, 0.0),
            ],
        )
        .with_planar_section(PlanarSection::new(0.1))
        .with_material(Material::isotropic(30e9, 0.2, 2500.0));
        let load: ElementalLoad = UniformLoad::local(Vec3::z(), 5.0).into();
        let f = PlanarUniformHandler
            .local_equivalent_nodal_loads(&elm, &DkqHelper, &load)
            .unwrap();
        for node in &f {
            assert_relative_eq!(node.fz, 5.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_body_force_on_tetrahedron() {
        let elm = Element::tetrahedron(
            14,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
                Node::new(0.0, 0.0, 1.0),
            ],
        )
        .with_material(Material::isotropic(1e9, 0.25, 1000.0));
        let load: ElementalLoad = UniformLoad::downward(24.0).into();
        let f = PlanarUniformHandler
            .local_equivalent_nodal_loads(&elm, &TetrahedronHelper, &load)
            .unwrap();
        // volume 1/6, a quarter to each node
        for node in &f {
            assert_relative_eq!(node.fy, -1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_surface_load_has_no_internal_force() {
        let elm = triangle();
        let load: ElementalLoad = UniformLoad::local(Vec3::z(), -6.0).into();
        let err = PlanarUniformHandler
            .local_load_internal_force_at(&elm, &DktHelper, &load, IsoPoint::on_plane(0.2, 0.2))
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    fn point(force: Force, iso: IsoPoint) -> ElementalLoad {
        ConcentratedLoad::new(force, iso, CoordinateSystem::Local).into()
    }

    #[test]
    fn test_point_force_at_membrane_centroid() {
        let elm = triangle();
        let load = point(Force::new(9.0, -3.0, 0.0, 0.0, 0.0, 0.0), IsoPoint::on_plane(1.0 / 3.0, 1.0 / 3.0));
        assert!(PlanarConcentratedHandler.can_handle(&elm, &CstHelper, &load));
        let f = PlanarConcentratedHandler
            .local_equivalent_nodal_loads(&elm, &CstHelper, &load)
            .unwrap();
        for node in &f {
            assert_relative_eq!(node.fx, 3.0, max_relative = 1e-12);
            assert_relative_eq!(node.fy, -1.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_point_force_on_plate_sums_to_force() {
        let elm = triangle();
        let load = point(Force::new(0.0, 0.0, -12.0, 0.0, 0.0, 0.0), IsoPoint::on_plane(0.6, 0.1));
        let f = PlanarConcentratedHandler
            .local_equivalent_nodal_loads(&elm, &DktHelper, &load)
            .unwrap();
        let total: Force = f.iter().copied().sum();
        assert_relative_eq!(total.fz, -12.0, max_relative = 1e-12);
        // linear interpolation weights 0.3, 0.6, 0.1
        assert_relative_eq!(f[1].fz, -7.2, max_relative = 1e-12);
        assert_eq!(total.fx, 0.0);
    }

    #[test]
    fn test_point_force_on_tetrahedron_node() {
        let elm = Element::tetrahedron(
            15,
            [
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 0.0),
                Node::new(0.0, 0.0, 1.0),
            ],
        )
        .with_material(Material::isotropic(1e9, 0.25, 1000.0));
        let load = point(Force::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0), IsoPoint::new(0.0, 0.0, 1.0));
        let f = PlanarConcentratedHandler
            .local_equivalent_nodal_loads(&elm, &TetrahedronHelper, &load)
            .unwrap();
        assert_relative_eq!(f[3].fz, 3.0, max_relative = 1e-12);
        assert_relative_eq!(f[3].fy, 2.0, max_relative = 1e-12);
        assert_eq!(f[0].fx, 0.0);
    }

    #[test]
    fn test_point_moment_and_outside_point_rejected() {
        let elm = triangle();
        let drilling = point(Force::new(0.0, 0.0, 0.0, 0.0, 0.0, 5.0), IsoPoint::on_plane(0.2, 0.2));
        assert!(!PlanarConcentratedHandler.can_handle(&elm, &CstHelper, &drilling));
        assert!(PlanarConcentratedHandler
            .local_equivalent_nodal_loads(&elm, &CstHelper, &drilling)
            .unwrap_err()
            .is_unsupported());

        let outside = point(Force::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0), IsoPoint::on_plane(0.8, 0.8));
        let err = PlanarConcentratedHandler
            .local_equivalent_nodal_loads(&elm, &CstHelper, &outside)
            .unwrap_err();
        assert!(matches!(err, FEAError::DomainError { .. }));
    }
}
