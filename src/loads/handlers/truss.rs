//! Closed form axial loads on a truss

use super::{bar_internal_force, ends_fixed, has_uniform_properties, nodal_forces, LoadHandler};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::helpers::{ElementHelper, HelperKind};
use crate::loads::ElementalLoad;
use crate::math::{IsoPoint, Vector};
use crate::results::{Displacement, Force};

fn axial_rigidity(elm: &Element) -> FEAResult<f64> {
    let ea = elm.material()?.properties_at(0.0)?.ex * elm.bar_section()?.properties_at(0.0)?.a;
    if ea <= 0.0 {
        return Err(FEAError::InvalidInput(format!("axial rigidity is {ea}")));
    }
    Ok(ea)
}

/// Uniform axial load on a truss fixed at both ends
#[derive(Debug, Clone, Copy, Default)]
pub struct TrussUniformHandler;

impl TrussUniformHandler {
    /// Axial intensity and length
    fn axial(elm: &Element, load: &ElementalLoad) -> FEAResult<(f64, f64)> {
        let ElementalLoad::Uniform(u) = load else {
            return Err(FEAError::unsupported("truss uniform handler needs a uniform load"));
        };
        Ok((u.local_intensity(&elm.transformation()?)?.x, elm.length()?))
    }
}

impl LoadHandler for TrussUniformHandler {
    fn name(&self) -> &'static str {
        "truss uniform"
    }

    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        helper.kind() == HelperKind::Truss
            && matches!(load, ElementalLoad::Uniform(_))
            && has_uniform_properties(elm)
            && ends_fixed(elm, helper)
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        _helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let (qx, l) = Self::axial(elm, load)?;
        let end = Force::new(qx * l / 2.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        Ok(vec![end; 2])
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

    /// `u = q x (L - x) / (2 EA)`
    fn local_load_displacement_at(
        &self,
        elm: &Element,
        _helper: &dyn ElementHelper,
        load: &ElementalLoad,
        iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        let (qx, l) = Self::axial(elm, load)?;
        let x = (iso.xi + 1.0) * l / 2.0;
        let u = qx * x * (l - x) / (2.0 * axial_rigidity(elm)?);
        Ok(Displacement::new(u, 0.0, 0.0, 0.0, 0.0, 0.0))
    }
}

/// Imposed axial strain on a truss with uniform section and material
#[derive(Debug, Clone, Copy, Default)]
pub struct TrussImposedStrainHandler;

impl LoadHandler for TrussImposedStrainHandler {
    fn name(&self) -> &'static str {
        "truss imposed strain"
    }

    fn can_handle(&self, elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        helper.kind() == HelperKind::Truss
            && matches!(load, ElementalLoad::ImposedStrain(_))
            && has_uniform_properties(elm)
    }

    /// `B^T EA eps L`, so a released end takes no load
    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let ElementalLoad::ImposedStrain(s) = load else {
            return Err(FEAError::unsupported("imposed strain handler needs an imposed strain"));
        };
        let b = helper.b_matrix_at(elm, IsoPoint::on_line(0.0))?;
        let f: Vector = b.row(0).transpose() * (s.strain * axial_rigidity(elm)? * elm.length()?);
        nodal_forces(elm, helper, &f)
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

    /// Zero: the fixed nodes prevent any axial movement
    fn local_load_displacement_at(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        if !ends_fixed(elm, helper) {
            return Err(FEAError::unsupported(
                "imposed strain displacement needs both truss ends fixed",
            ));
        }
        Ok(Displacement::zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CrossSectionProperties, DofConstraint, EndRelease, Material, Node};
    use crate::helpers::TrussHelper;
    use crate::loads::{ImposedStrainLoad, UniformLoad};
    use crate::math::Vec3;
    use crate::permutation::Dof;
    use approx::assert_relative_eq;

    fn bar() -> Element {
        Element::bar(3, Node::new(0.0, 0.0, 0.0), Node::new(0.0, 0.0, 5.0))
            .with_section(CrossSectionProperties::new(0.01, 1e-5, 1e-5, 2e-5))
            .with_material(Material::isotropic(200e9, 0.3, 7850.0))
    }

    #[test]
    fn test_uniform_axial_load() {
        let elm = bar();
        // vertical bar: local x is global Z
        let load: ElementalLoad = UniformLoad::global(Vec3::z(), 4.0).into();
        let f = TrussUniformHandler
            .local_equivalent_nodal_loads(&elm, &TrussHelper, &load)
            .unwrap();
        assert_relative_eq!(f[0].fx, 10.0, epsilon = 1e-12);
        assert_relative_eq!(f[1].fx, 10.0, epsilon = 1e-12);

        let n = TrussUniformHandler
            .local_load_internal_force_at(&elm, &TrussHelper, &load, IsoPoint::on_line(0.0))
            .unwrap();
        assert_relative_eq!(n.fx, 0.0, epsilon = 1e-9);
        let n = TrussUniformHandler
            .local_load_internal_force_at(&elm, &TrussHelper, &load, IsoPoint::on_line(-0.6))
            .unwrap();
        // x = 1: N = q L / 2 - q x
        assert_relative_eq!(n.fx, 6.0, epsilon = 1e-9);

        let u = TrussUniformHandler
            .local_load_displacement_at(&elm, &TrussHelper, &load, IsoPoint::on_line(0.0))
            .unwrap();
        assert_relative_eq!(u.dx, 4.0 * 2.5 * 2.5 / (2.0 * 200e9 * 0.01), max_relative = 1e-12);
    }

    #[test]
    fn test_imposed_strain_on_fixed_truss() {
        let elm = bar();
        let load: ElementalLoad = ImposedStrainLoad::new(1e-3).into();
        let ea = 200e9 * 0.01;
        let f = TrussImposedStrainHandler
            .local_equivalent_nodal_loads(&elm, &TrussHelper, &load)
            .unwrap();
        assert_relative_eq!(f[0].fx, -1e-3 * ea, max_relative = 1e-12);
        assert_relative_eq!(f[1].fx, 1e-3 * ea, max_relative = 1e-12);

        let n = TrussImposedStrainHandler
            .local_load_internal_force_at(&elm, &TrussHelper, &load, IsoPoint::on_line(0.4))
            .unwrap();
        assert_relative_eq!(n.fx, -1e-3 * ea, max_relative = 1e-12);

        let d = TrussImposedStrainHandler
            .local_load_displacement_at(&elm, &TrussHelper, &load, IsoPoint::on_line(0.4))
            .unwrap();
        assert_eq!(d, Displacement::zero());
    }

    #[test]
    fn test_imposed_strain_on_sliding_truss() {
        let elm = bar().with_end_release(EndRelease::fixed().with(Dof::Dx, DofConstraint::Released));
        let load: ElementalLoad = ImposedStrainLoad::new(1e-3).into();
        let f = TrussImposedStrainHandler
            .local_equivalent_nodal_loads(&elm, &TrussHelper, &load)
            .unwrap();
        assert_relative_eq!(f[0].fx, 0.0, epsilon = 1e-9);
        assert_relative_eq!(f[1].fx, 0.0, epsilon = 1e-9);
        assert!(TrussImposedStrainHandler
            .local_load_displacement_at(&elm, &TrussHelper, &load, IsoPoint::on_line(0.0))
            .unwrap_err()
            .is_unsupported());
    }
}
