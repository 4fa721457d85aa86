//! Mesh representation.
//!
//! Arena store of nodes and linear simplex elements, addressed by typed
//! indices, with node-to-element connectivity for neighbour queries.

mod node;
mod potential_mesh;

pub use node::{Node, NodeFlags};
pub use potential_mesh::PotentialMesh;
