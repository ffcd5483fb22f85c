//! Element matrices for many elements at once
//!
//! Every element is formulated independently on the rayon pool. The first
//! failing element aborts the batch and its error carries the element id.

use log::debug;
use rayon::prelude::*;

use crate::elements::Element;
use crate::error::FEAResult;
use crate::loads::ElementalLoad;
use crate::math::Mat;
use crate::results::Force;

/// Which matrix a batch computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixRequest {
    LocalStiffness,
    LocalMass,
    LocalDamping,
    GlobalStiffness,
    GlobalMass,
    GlobalDamping,
}

impl MatrixRequest {
    fn compute(self, elm: &Element) -> FEAResult<Mat> {
        match self {
            MatrixRequest::LocalStiffness => elm.local_stiffness_matrix(),
            MatrixRequest::LocalMass => elm.local_mass_matrix(),
            MatrixRequest::LocalDamping => elm.local_damping_matrix(),
            MatrixRequest::GlobalStiffness => elm.global_stiffness_matrix(),
            MatrixRequest::GlobalMass => elm.global_mass_matrix(),
            MatrixRequest::GlobalDamping => elm.global_damping_matrix(),
        }
    }
}

/// One matrix per element, in input order
pub fn compute_matrices(elements: &[Element], request: MatrixRequest) -> FEAResult<Vec<Mat>> {
    debug!("{:?} for {} elements", request, elements.len());
    elements.par_iter().map(|elm| request.compute(elm)).collect()
}

pub fn global_stiffness_matrices(elements: &[Element]) -> FEAResult<Vec<Mat>> {
    compute_matrices(elements, MatrixRequest::GlobalStiffness)
}

pub fn global_mass_matrices(elements: &[Element]) -> FEAResult<Vec<Mat>> {
    compute_matrices(elements, MatrixRequest::GlobalMass)
}

/// Global equivalent nodal loads of one load applied to every element
pub fn global_equivalent_nodal_loads(
    elements: &[Element],
    load: &ElementalLoad,
) -> FEAResult<Vec<Vec<Force>>> {
    elements
        .par_iter()
        .map(|elm| elm.global_equivalent_nodal_loads(load))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Behavior, CrossSectionProperties, Material, Node};
    use crate::error::ElementId;
    use crate::loads::UniformLoad;
    use approx::assert_relative_eq;

    fn bars(count: u32) -> Vec<Element> {
        (0..count)
            .map(|i| {
                let x = f64::from(i);
                Element::bar(i, Node::new(x, 0.0, 0.0), Node::new(x + 1.0 + x / 10.0, 0.0, 0.0))
                    .with_section(CrossSectionProperties::new(0.01, 1e-5, 2e-5, 3e-6))
                    .with_material(Material::steel())
            })
            .collect()
    }

    #[test]
    fn test_batch_matches_serial() {
        let elements = bars(16);
        let batch = compute_matrices(&elements, MatrixRequest::LocalStiffness).unwrap();
        assert_eq!(batch.len(), elements.len());
        for (elm, k) in elements.iter().zip(&batch) {
            let serial = elm.local_stiffness_matrix().unwrap();
            assert_relative_eq!(*k, serial);
        }
    }

    #[test]
    fn test_failing_element_is_reported() {
        let mut elements = bars(4);
        elements.push(
            Element::bar(99, Node::new(0.0, 0.0, 0.0), Node::new(0.0, 0.0, 0.0))
                .with_section(CrossSectionProperties::new(0.01, 1e-5, 2e-5, 3e-6))
                .with_material(Material::steel()),
        );
        let err = global_stiffness_matrices(&elements).unwrap_err();
        assert_eq!(err.element_id(), Some(ElementId(99)));
    }

    #[test]
    fn test_batch_loads() {
        let elements: Vec<Element> = bars(3)
            .into_iter()
            .map(|e| e.with_behavior(Behavior::TRUSS))
            .collect();
        let load: ElementalLoad = UniformLoad::global(crate::math::Vec3::x(), 2.0).into();
        let loads = global_equivalent_nodal_loads(&elements, &load).unwrap();
        for (elm, f) in elements.iter().zip(&loads) {
            let l = elm.length().unwrap();
            assert_relative_eq!(f[0].fx + f[1].fx, 2.0 * l, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(global_mass_matrices(&[]).unwrap().is_empty());
    }
}
