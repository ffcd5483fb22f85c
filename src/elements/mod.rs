//! Element data model

mod behavior;
mod element;
mod end_release;
mod material;
mod node;
mod section;

pub use behavior::Behavior;
pub use element::{Element, Topology};
pub use end_release::{DofConstraint, EndRelease};
pub use material::{Material, MaterialProperties, PolynomialMaterial};
pub use node::Node;
pub use section::{
    BarSection, CrossSectionProperties, MembraneFormulation, PlanarSection, PolynomialSection,
};
