//! Structural entities of the truss model

mod element;
mod material;
mod node;
mod section;

pub use element::{Element, TRUSS_ELEMENT_TYPE};
pub use material::{Material, MaterialCatalog};
pub use node::{Node, NodeId};
pub use section::{Section, SectionPolicy};
