//! Geometry and property access shared by the two node bar helpers

use crate::elements::{CrossSectionProperties, Element, MaterialProperties, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{check_domain, BarEndFixity, IsoPoint};
use crate::permutation::Dof;

/// `dx / dxi` of a two node bar, half its length
pub fn bar_jacobian(elm: &Element) -> FEAResult<f64> {
    Ok(elm.length()? / 2.0)
}

/// Fixity of one translation/rotation pair at both ends
pub fn bar_end_fixity(elm: &Element, translation: Dof, rotation: Dof) -> BarEndFixity {
    BarEndFixity {
        start_translation: elm.start_release().constraint(translation),
        start_rotation: elm.start_release().constraint(rotation),
        end_translation: elm.end_release().constraint(translation),
        end_rotation: elm.end_release().constraint(rotation),
    }
}

pub(super) fn check_bar(elm: &Element, helper: &str) -> FEAResult<()> {
    if elm.topology() != Topology::Bar2 || elm.node_count() != 2 {
        return Err(FEAError::unsupported(format!(
            "{helper} needs a two node bar, got {:?} with {} nodes",
            elm.topology(),
            elm.node_count()
        )));
    }
    elm.bar_section()?;
    elm.material()?;
    elm.length()?;
    Ok(())
}

pub(super) fn check_xi(elm: &Element, iso: IsoPoint) -> FEAResult<()> {
    check_domain(iso.xi, -1.0, 1.0, elm.options().iso_tolerance)
}

/// Section and material at `xi`
pub(super) fn properties_at(
    elm: &Element,
    xi: f64,
) -> FEAResult<(CrossSectionProperties, MaterialProperties)> {
    Ok((
        elm.bar_section()?.properties_at(xi)?,
        elm.material()?.properties_at(xi)?,
    ))
}

/// Combined polynomial degree of section and material along the bar
pub(super) fn property_order(elm: &Element) -> FEAResult<[usize; 3]> {
    let n = elm.bar_section()?.max_function_order() + elm.material()?.max_function_order();
    Ok([n, 0, 0])
}
