//! Point forces and moments on bars

use super::{
    bar_internal_force, bar_load_displacement, interpolated_components, nodal_forces, LoadHandler,
};
use crate::elements::Element;
use crate::error::{FEAError, FEAResult};
use crate::helpers::ElementHelper;
use crate::loads::{ConcentratedLoad, ElementalLoad};
use crate::math::IsoPoint;
use crate::results::{Displacement, Force};

/// Concentrated load on any bar helper: `N(xi)^T f`
#[derive(Debug, Clone, Copy, Default)]
pub struct BarConcentratedHandler;

impl BarConcentratedHandler {
    fn point_load(load: &ElementalLoad) -> FEAResult<&ConcentratedLoad> {
        match load {
            ElementalLoad::Concentrated(c) => Ok(c),
            _ => Err(FEAError::unsupported("bar concentrated handler needs a concentrated load")),
        }
    }
}

impl LoadHandler for BarConcentratedHandler {
    fn name(&self) -> &'static str {
        "bar concentrated"
    }

    fn can_handle(&self, _elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        helper.kind().is_bar() && matches!(load, ElementalLoad::Concentrated(_))
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        helper: &dyn ElementHelper,
        load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        let c = Self::point_load(load)?;
        let iso = IsoPoint::on_line(c.iso_location.xi);
        helper.domain().check(iso, elm.options().iso_tolerance)?;

        let f = c.local_force(&elm.transformation()?);
        let n = helper.interpolation_at(elm, iso)?;
        let nodal = n.transpose() * interpolated_components(helper, f.to_array());
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
