//! Strongly-typed domain types for safer APIs.
//!
//! - Index newtypes keep element, node and equation indices apart
//! - [`Dimension`] fixes the simplex shape (triangle or tetrahedron)
//!
//! # Example
//!
//! ```
//! use potflow_rs::types::{Dimension, ElementIndex, NodeIndex};
//!
//! let e = ElementIndex::new(4);
//! let n = NodeIndex::new(4);
//! assert_eq!(e.get(), n.get());
//! assert_eq!(Dimension::Three.n_nodes(), 4);
//! ```

mod dimension;
mod indices;

pub use dimension::Dimension;
pub use indices::{ElementIndex, EquationId, NodeIndex};
