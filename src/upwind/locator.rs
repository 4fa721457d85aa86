//! Upwind facet selection and upstream neighbour search.

use tracing::{debug, trace};

use super::NeighborQuery;
use crate::element::{PotentialElement, UpwindLink};
use crate::error::{ElementError, ElementResult};
use crate::geometry::SimplexGeometry;
use crate::types::{ElementIndex, NodeIndex};

/// Upwind neighbour search.
///
/// The upwind facet is the facet whose outward normal has the most negative
/// projection on the free-stream velocity: flow enters the element through it.
/// The upwind element is the first other element (in candidate order) whose
/// nodes include every node of that facet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpwindLocator {
    /// Projections within `tie_tolerance * |V∞|` of the minimum count as tied.
    /// Ties resolve to the lowest facet index.
    pub tie_tolerance: f64,
}

impl Default for UpwindLocator {
    fn default() -> Self {
        Self {
            tie_tolerance: 1e-12,
        }
    }
}

impl UpwindLocator {
    /// Create a locator with the default tie tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative tie tolerance.
    pub fn with_tie_tolerance(mut self, tie_tolerance: f64) -> Self {
        self.tie_tolerance = tie_tolerance;
        self
    }

    /// Local index of the upwind facet (the facet opposite that local node).
    pub fn upwind_facet(&self, geometry: &SimplexGeometry, velocity: &[f64; 3]) -> usize {
        let d = geometry.dim.n_coords();
        let projections: Vec<f64> = (0..geometry.dim.n_facets())
            .map(|f| {
                let normal = geometry.facet_normal(f);
                (0..d).map(|k| normal[k] * velocity[k]).sum()
            })
            .collect();

        let min = projections.iter().copied().fold(f64::INFINITY, f64::min);
        let speed = velocity[..d].iter().map(|v| v * v).sum::<f64>().sqrt();
        let tol = self.tie_tolerance * speed.max(f64::MIN_POSITIVE);

        let mut tied = projections
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p - min <= tol)
            .map(|(f, _)| f);
        let facet = tied.next().unwrap_or(0);
        let others: Vec<usize> = tied.collect();
        if !others.is_empty() {
            debug!(
                facet,
                tied_with = ?others,
                projection = min,
                "upwind facet tie, using lowest facet index"
            );
        }
        facet
    }

    /// Search the upstream neighbour of an element.
    ///
    /// Returns [`UpwindLink::Inlet`] when no other element shares the upwind facet.
    pub fn locate<Q: NeighborQuery + ?Sized>(
        &self,
        element: ElementIndex,
        nodes: &[NodeIndex],
        geometry: &SimplexGeometry,
        velocity: &[f64; 3],
        query: &Q,
    ) -> UpwindLink {
        let facet = self.upwind_facet(geometry, velocity);
        let mut facet_nodes: Vec<NodeIndex> =
            geometry.facet_local_nodes(facet).map(|i| nodes[i]).collect();
        facet_nodes.sort_unstable();

        let mut candidate_nodes = Vec::with_capacity(nodes.len());
        for candidate in query.candidates(&facet_nodes) {
            if candidate == element {
                continue;
            }
            candidate_nodes.clear();
            candidate_nodes.extend_from_slice(query.element_nodes(candidate));
            candidate_nodes.sort_unstable();
            if includes(&candidate_nodes, &facet_nodes) {
                trace!(%element, upwind = %candidate, facet, "upwind element found");
                return UpwindLink::Element(candidate);
            }
        }

        trace!(%element, facet, "no upwind element, inlet");
        UpwindLink::Inlet
    }

    /// Resolve and cache the upwind link of an element.
    ///
    /// The search runs only while the link is unset; later calls return the
    /// cached link.
    pub fn resolve<Q: NeighborQuery + ?Sized>(
        &self,
        element: &PotentialElement,
        geometry: &SimplexGeometry,
        velocity: &[f64; 3],
        query: &Q,
    ) -> UpwindLink {
        if let Some(link) = element.upwind_link() {
            return link;
        }
        let link = self.locate(element.id(), element.nodes(), geometry, velocity, query);
        element.cache_upwind(link)
    }
}

/// The node of the upwind element that does not belong to the element.
///
/// The upwind element shares a facet with the element, so exactly one of its
/// nodes lies outside; anything else is a broken mesh precondition.
pub fn additional_node<Q: NeighborQuery + ?Sized>(
    element: &PotentialElement,
    query: &Q,
) -> ElementResult<NodeIndex> {
    let upwind = element.upwind_element()?;
    let mut outside = query
        .element_nodes(upwind)
        .iter()
        .copied()
        .filter(|n| !element.nodes().contains(n));

    match (outside.next(), outside.next()) {
        (Some(node), None) => Ok(node),
        (first, _) => Err(ElementError::UnresolvedAdditionalNode {
            element: element.id(),
            upwind,
            found: first.map_or(0, |_| 2 + outside.count()),
        }),
    }
}

/// Whether sorted `haystack` contains every element of sorted `needle`.
pub(crate) fn includes<T: Ord>(haystack: &[T], needle: &[T]) -> bool {
    let mut hay = haystack.iter();
    needle.iter().all(|n| hay.any(|h| h == n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::PotentialMesh;

    fn locate_all(mesh: &PotentialMesh, velocity: [f64; 3]) -> Vec<UpwindLink> {
        let locator = UpwindLocator::default();
        mesh.elements()
            .iter()
            .map(|e| {
                let geom = mesh.element_geometry(e.id()).unwrap();
                locator.resolve(e, &geom, &velocity, mesh)
            })
            .collect()
    }

    #[test]
    fn test_includes() {
        assert!(includes(&[1, 3, 5, 7], &[3, 7]));
        assert!(includes(&[1, 3, 5], &[]));
        assert!(!includes(&[1, 3, 5], &[2]));
        assert!(!includes(&[3, 5], &[1, 3]));
    }

    #[test]
    fn test_upwind_facet_of_unit_cell() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let locator = UpwindLocator::default();
        let v = [1.0, 0.0, 0.0];

        // [v0, v1, v2]: flow enters through the diagonal, opposite v1
        let g0 = mesh.element_geometry(ElementIndex::new(0)).unwrap();
        assert_eq!(locator.upwind_facet(&g0, &v), 1);

        // [v0, v2, v3]: flow enters through x = 0, opposite v2
        let g1 = mesh.element_geometry(ElementIndex::new(1)).unwrap();
        assert_eq!(locator.upwind_facet(&g1, &v), 1);
    }

    #[test]
    fn test_tie_resolves_to_lowest_facet() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let g1 = mesh.element_geometry(ElementIndex::new(1)).unwrap();
        // Normals (0, 1) and (-1, 0) project equally on (1, -1)
        let facet = UpwindLocator::default().upwind_facet(&g1, &[1.0, -1.0, 0.0]);
        assert_eq!(facet, 0);
    }

    #[test]
    fn test_unit_cell_links() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let links = locate_all(&mesh, [1.0, 0.0, 0.0]);
        assert_eq!(links[0], UpwindLink::Element(ElementIndex::new(1)));
        assert_eq!(links[1], UpwindLink::Inlet);
    }

    #[test]
    fn test_every_element_resolves() {
        let mesh = PotentialMesh::structured_triangles(0.0, 2.0, 0.0, 1.0, 4, 3);
        let links = locate_all(&mesh, [0.8, 0.3, 0.0]);
        for (elem, link) in mesh.elements().iter().zip(&links) {
            assert_eq!(elem.upwind_link(), Some(*link));
            if let UpwindLink::Element(upwind) = link {
                assert_ne!(*upwind, elem.id());
            }
        }
        // Only elements on the inflow boundary are inlets
        let inlets = links.iter().filter(|l| **l == UpwindLink::Inlet).count();
        assert!(inlets > 0 && inlets < mesh.n_elements());
    }

    #[test]
    fn test_search_is_idempotent() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 3, 3);
        let locator = UpwindLocator::default();
        let v = [1.0, 0.2, 0.0];
        for elem in mesh.elements() {
            let geom = mesh.element_geometry(elem.id()).unwrap();
            let fresh = locator.locate(elem.id(), elem.nodes(), &geom, &v, &mesh);
            let again = locator.locate(elem.id(), elem.nodes(), &geom, &v, &mesh);
            assert_eq!(fresh, again);
        }
    }

    #[test]
    fn test_additional_node() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        locate_all(&mesh, [1.0, 0.0, 0.0]);
        let node = additional_node(mesh.element(ElementIndex::new(0)), &mesh).unwrap();
        assert_eq!(node, NodeIndex::new(3));

        let inlet = mesh.element(ElementIndex::new(1));
        assert!(matches!(
            additional_node(inlet, &mesh),
            Err(ElementError::MissingUpwindElement { .. })
        ));
    }

    #[test]
    fn test_additional_node_requires_shared_facet() {
        let mesh = PotentialMesh::structured_triangles(0.0, 2.0, 0.0, 1.0, 2, 1);
        // Elements 0 and 2 share a single node
        let elem = mesh.element(ElementIndex::new(0));
        elem.cache_upwind(UpwindLink::Element(ElementIndex::new(2)));
        assert!(matches!(
            additional_node(elem, &mesh),
            Err(ElementError::UnresolvedAdditionalNode { found: 2, .. })
        ));
    }
}
