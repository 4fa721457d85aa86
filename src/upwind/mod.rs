//! Upwind element discovery.
//!
//! Each non-wake element looks up the neighbour sharing its upwind facet once,
//! at initialisation, and caches the result as an [`UpwindLink`](crate::element::UpwindLink).
//! Elements on the inflow boundary have no such neighbour and become inlets.

mod locator;

pub use locator::{additional_node, UpwindLocator};

use crate::types::{ElementIndex, NodeIndex};

/// Adjacency queries needed by the upwind search.
pub trait NeighborQuery {
    /// Elements incident to any of the given nodes, in a stable order.
    fn candidates(&self, facet_nodes: &[NodeIndex]) -> Vec<ElementIndex>;

    /// Global node indices of an element.
    fn element_nodes(&self, element: ElementIndex) -> &[NodeIndex];
}
