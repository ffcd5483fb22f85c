use super::LoadHandler;
use crate::elements::Element;
use crate::error::FEAResult;
use crate::helpers::{ElementHelper, HelperKind};
use crate::loads::ElementalLoad;
use crate::math::IsoPoint;
use crate::results::{Displacement, Force};

/// Loads a helper cannot feel: axial strain on a shaft or beam, distributed
/// forces on a shaft. They contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertHandler;

impl LoadHandler for InertHandler {
    fn name(&self) -> &'static str {
        "inert"
    }

    fn can_handle(&self, _elm: &Element, helper: &dyn ElementHelper, load: &ElementalLoad) -> bool {
        let kind = helper.kind();
        match load {
            ElementalLoad::ImposedStrain(_) => kind.is_bar() && kind != HelperKind::Truss,
            ElementalLoad::Uniform(_) | ElementalLoad::PartialNonUniform(_) => kind == HelperKind::Shaft,
            ElementalLoad::Concentrated(_) => false,
        }
    }

    fn local_equivalent_nodal_loads(
        &self,
        elm: &Element,
        _helper: &dyn ElementHelper,
        _load: &ElementalLoad,
    ) -> FEAResult<Vec<Force>> {
        Ok(vec![Force::zero(); elm.node_count()])
    }

    fn local_load_internal_force_at(
        &self,
        _elm: &Element,
        _helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Force> {
        Ok(Force::zero())
    }

    fn local_load_displacement_at(
        &self,
        _elm: &Element,
        _helper: &dyn ElementHelper,
        _load: &ElementalLoad,
        _iso: IsoPoint,
    ) -> FEAResult<Displacement> {
        Ok(Displacement::zero())
    }
}
