//! Error types for element setup, assembly and postprocessing.
//!
//! All failures are local and synchronous. They are returned to the calling
//! assembly loop, which decides whether to abort the solve or skip the element.

use thiserror::Error;

use crate::geometry::GeometryError;
use crate::types::{ElementIndex, NodeIndex};

/// Result alias for element operations.
pub type ElementResult<T> = Result<T, ElementError>;

/// Errors raised by per-element operations.
#[derive(Debug, Error)]
pub enum ElementError {
    /// Degenerate or inverted element geometry.
    #[error("Element {element}: invalid geometry: {source}")]
    Geometry {
        element: ElementIndex,
        #[source]
        source: GeometryError,
    },

    /// Upwind element accessed before resolution, or on an inlet element.
    #[error("Element {element}: no upwind element ({reason})")]
    MissingUpwindElement {
        element: ElementIndex,
        reason: &'static str,
    },

    /// The upwind element does not share exactly N-1 nodes with the element.
    #[error(
        "Element {element}: expected exactly one node of upwind element {upwind} outside the element, found {found}"
    )]
    UnresolvedAdditionalNode {
        element: ElementIndex,
        upwind: ElementIndex,
        found: usize,
    },

    /// A required nodal value or dof is absent.
    #[error("Node {node}: missing nodal data '{field}'")]
    MissingNodalData { node: NodeIndex, field: &'static str },

    /// Wake distance array does not match the node count.
    #[error("Element {element}: expected {expected} wake distances, got {actual}")]
    DistanceCount {
        element: ElementIndex,
        expected: usize,
        actual: usize,
    },

    /// Wake distance is NaN or infinite.
    #[error("Element {element}: wake distance {value} at local node {local} is not finite")]
    NonFiniteDistance {
        element: ElementIndex,
        local: usize,
        value: f64,
    },

    /// Solution increment does not cover every equation.
    #[error("Increment has {actual} entries, the system has {expected} equations")]
    IncrementLength { expected: usize, actual: usize },

    /// Connectivity size does not match the mesh dimension.
    #[error("Element {element}: expected {expected} nodes, got {actual}")]
    NodeCount {
        element: ElementIndex,
        expected: usize,
        actual: usize,
    },

    /// Element index outside the element store.
    #[error("Element {element} is not in the mesh ({len} elements)")]
    UnknownElement { element: ElementIndex, len: usize },

    /// Node index outside the node store.
    #[error("Node {node} is not in the mesh ({len} nodes)")]
    UnknownNode { node: NodeIndex, len: usize },

    /// Free-stream conditions cannot drive the element.
    #[error("Invalid free-stream conditions: {0}")]
    InvalidFreeStream(String),
}

impl ElementError {
    /// Attach an element index to a geometry failure.
    pub fn geometry(element: ElementIndex, source: GeometryError) -> Self {
        Self::Geometry { element, source }
    }

    /// Returns `true` for failures that indicate a broken calling contract
    /// rather than bad input data.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            ElementError::MissingUpwindElement { .. } | ElementError::UnknownElement { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_element() {
        let err = ElementError::MissingUpwindElement {
            element: ElementIndex::new(7),
            reason: "inlet element",
        };
        assert_eq!(err.to_string(), "Element E7: no upwind element (inlet element)");
        assert!(err.is_contract_violation());

        let err = ElementError::MissingNodalData {
            node: NodeIndex::new(3),
            field: "auxiliary potential",
        };
        assert!(err.to_string().contains("N3"));
        assert!(!err.is_contract_violation());
    }

    #[test]
    fn test_geometry_error_keeps_source() {
        use std::error::Error;

        let err = ElementError::geometry(
            ElementIndex::new(1),
            GeometryError::Degenerate { measure: 0.0 },
        );
        assert!(err.source().is_some());
    }
}
