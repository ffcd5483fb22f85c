//! FEA Elements - finite element formulation in native Rust
//!
//! This library derives the element-level quantities of a 3D structural
//! model, leaving global assembly and the solver to the caller:
//! - Element stiffness, mass and damping matrices (local and global axes)
//! - Bars: truss, shaft, Euler-Bernoulli and Timoshenko beams with end releases
//! - Planar: CST and Q4 membranes, DKT and DKQ plates, flat shells
//! - Solids: linear tetrahedron
//! - Equivalent nodal loads and internal force recovery
//!
//! ## Example
//! ```rust
//! use fea_elements::prelude::*;
//!
//! let beam = Element::bar(1, Node::new(0.0, 0.0, 0.0), Node::new(5.0, 0.0, 0.0))
//!     .with_section(CrossSectionProperties::rectangular(0.3, 0.5))
//!     .with_material(Material::isotropic(30e9, 0.2, 2500.0));
//!
//! let k = beam.global_stiffness_matrix().unwrap();
//! assert_eq!(k.nrows(), 12);
//!
//! let load: ElementalLoad = UniformLoad::downward(10e3).into();
//! let forces = beam.global_equivalent_nodal_loads(&load).unwrap();
//! assert!((forces[0].fy + 25e3).abs() < 1e-6);
//! ```

pub mod batch;
pub mod elements;
pub mod error;
pub mod helpers;
pub mod loads;
pub mod math;
pub mod options;
pub mod permutation;
pub mod results;
pub mod transform;

// Re-export common types
pub mod prelude {
    pub use crate::batch::{compute_matrices, MatrixRequest};
    pub use crate::elements::{
        BarSection, Behavior, CrossSectionProperties, DofConstraint, Element, EndRelease,
        Material, MaterialProperties, MembraneFormulation, Node, PlanarSection,
        PolynomialSection, Topology,
    };
    pub use crate::error::{ElementId, FEAError, FEAResult};
    pub use crate::helpers::{BeamDirection, ElementHelper, HelperKind};
    pub use crate::loads::{
        ConcentratedLoad, CoordinateSystem, ElementalLoad, ImposedStrainLoad,
        PartialNonUniformLoad, UniformLoad,
    };
    pub use crate::math::{IsoPoint, Mat, Mat3, Polynomial, Vec3, Vector};
    pub use crate::options::FormulationOptions;
    pub use crate::permutation::Dof;
    pub use crate::results::{Displacement, Force};
}
