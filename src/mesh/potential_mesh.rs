//! Element and node store for simplex potential flow meshes.
//!
//! The mesh owns every node and element. Elements refer to nodes and to
//! their upwind neighbour by index only, so the adjacency graph may contain
//! cycles without any ownership cycle.
//!
//! Node-to-element connectivity is maintained incrementally and answers the
//! neighbour-candidate queries of the upwind search.

use super::node::Node;
use crate::element::PotentialElement;
use crate::error::{ElementError, ElementResult};
use crate::geometry::SimplexGeometry;
use crate::types::{Dimension, ElementIndex, NodeIndex};
use crate::upwind::NeighborQuery;

/// Simplex mesh of potential flow elements.
#[derive(Clone, Debug)]
pub struct PotentialMesh {
    dim: Dimension,
    nodes: Vec<Node>,
    elements: Vec<PotentialElement>,
    /// node_to_elements[n] = elements containing node n, ascending
    node_to_elements: Vec<Vec<ElementIndex>>,
}

impl PotentialMesh {
    /// Create an empty mesh.
    pub fn new(dim: Dimension) -> Self {
        Self {
            dim,
            nodes: Vec::new(),
            elements: Vec::new(),
            node_to_elements: Vec::new(),
        }
    }

    /// Build a mesh from node positions and element connectivity.
    pub fn from_connectivity(
        dim: Dimension,
        positions: &[[f64; 3]],
        connectivity: &[Vec<usize>],
    ) -> ElementResult<Self> {
        let mut mesh = Self::new(dim);
        for &p in positions {
            mesh.add_node(p);
        }
        for elem in connectivity {
            mesh.add_element(elem.iter().map(|&n| NodeIndex::new(n)).collect())?;
        }
        Ok(mesh)
    }

    /// Uniform triangulation of [x0, x1] × [y0, y1].
    ///
    /// Each of the nx × ny cells is split along its (v0, v2) diagonal into two
    /// counter-clockwise triangles: [v0, v1, v2] and [v0, v2, v3].
    pub fn structured_triangles(x0: f64, x1: f64, y0: f64, y1: f64, nx: usize, ny: usize) -> Self {
        assert!(nx > 0 && ny > 0, "Need at least one cell in each direction");
        assert!(x1 > x0 && y1 > y0, "Invalid domain bounds");

        let dx = (x1 - x0) / nx as f64;
        let dy = (y1 - y0) / ny as f64;

        let mut mesh = Self::new(Dimension::Two);
        for j in 0..=ny {
            for i in 0..=nx {
                mesh.add_node([x0 + i as f64 * dx, y0 + j as f64 * dy, 0.0]);
            }
        }

        for j in 0..ny {
            for i in 0..nx {
                let v0 = j * (nx + 1) + i;
                let v1 = v0 + 1;
                let v2 = v1 + (nx + 1);
                let v3 = v0 + (nx + 1);
                mesh.push_element([v0, v1, v2].map(NodeIndex::new).to_vec());
                mesh.push_element([v0, v2, v3].map(NodeIndex::new).to_vec());
            }
        }
        mesh
    }

    /// Uniform tetrahedralisation of the unit-spaced box [0, nx] × [0, ny] × [0, nz]
    /// scaled by `h`.
    ///
    /// Every cube is split into the six Kuhn tetrahedra along its main
    /// diagonal; node order is fixed up so every tetrahedron is positively
    /// oriented.
    pub fn structured_tetrahedra(nx: usize, ny: usize, nz: usize, h: f64) -> Self {
        assert!(nx > 0 && ny > 0 && nz > 0, "Need at least one cell in each direction");
        assert!(h > 0.0, "Cell size must be positive");

        let node_id = |i: usize, j: usize, k: usize| (k * (ny + 1) + j) * (nx + 1) + i;

        let mut mesh = Self::new(Dimension::Three);
        for k in 0..=nz {
            for j in 0..=ny {
                for i in 0..=nx {
                    mesh.add_node([i as f64 * h, j as f64 * h, k as f64 * h]);
                }
            }
        }

        const PATHS: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    for path in PATHS {
                        let mut corner = [i, j, k];
                        let mut tet = vec![NodeIndex::new(node_id(i, j, k))];
                        for axis in path {
                            corner[axis] += 1;
                            tet.push(NodeIndex::new(node_id(corner[0], corner[1], corner[2])));
                        }
                        let coords: Vec<[f64; 3]> =
                            tet.iter().map(|&n| mesh.nodes[n].position).collect();
                        let negative = SimplexGeometry::compute(&coords)
                            .map(|g| g.signed_volume < 0.0)
                            .unwrap_or(false);
                        if negative {
                            tet.swap(2, 3);
                        }
                        mesh.push_element(tet);
                    }
                }
            }
        }
        mesh
    }

    /// Spatial dimension.
    #[inline]
    pub fn dim(&self) -> Dimension {
        self.dim
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn n_elements(&self) -> usize {
        self.elements.len()
    }

    /// Add a node at rest.
    pub fn add_node(&mut self, position: [f64; 3]) -> NodeIndex {
        self.nodes.push(Node::new(position));
        self.node_to_elements.push(Vec::new());
        NodeIndex::new(self.nodes.len() - 1)
    }

    /// Add an element on existing nodes.
    pub fn add_element(&mut self, nodes: Vec<NodeIndex>) -> ElementResult<ElementIndex> {
        let id = ElementIndex::new(self.elements.len());
        if nodes.len() != self.dim.n_nodes() {
            return Err(ElementError::NodeCount {
                element: id,
                expected: self.dim.n_nodes(),
                actual: nodes.len(),
            });
        }
        if let Some(&node) = nodes.iter().find(|n| n.get() >= self.nodes.len()) {
            return Err(ElementError::UnknownNode {
                node,
                len: self.nodes.len(),
            });
        }
        Ok(self.push_element(nodes))
    }

    fn push_element(&mut self, nodes: Vec<NodeIndex>) -> ElementIndex {
        let id = ElementIndex::new(self.elements.len());
        for &n in &nodes {
            self.node_to_elements[n].push(id);
        }
        self.elements.push(PotentialElement::new(id, nodes));
        id
    }

    /// Node by index.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> &Node {
        &self.nodes[node]
    }

    /// Mutable node by index.
    #[inline]
    pub fn node_mut(&mut self, node: NodeIndex) -> &mut Node {
        &mut self.nodes[node]
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Element by index.
    #[inline]
    pub fn element(&self, element: ElementIndex) -> &PotentialElement {
        &self.elements[element]
    }

    /// Element by index, failing instead of panicking when out of range.
    pub fn try_element(&self, element: ElementIndex) -> ElementResult<&PotentialElement> {
        self.elements
            .get(element.get())
            .ok_or(ElementError::UnknownElement {
                element,
                len: self.elements.len(),
            })
    }

    /// Mutable element by index.
    #[inline]
    pub fn element_mut(&mut self, element: ElementIndex) -> &mut PotentialElement {
        &mut self.elements[element]
    }

    #[inline]
    pub fn elements(&self) -> &[PotentialElement] {
        &self.elements
    }

    /// All elements containing a node, ascending.
    #[inline]
    pub fn elements_at_node(&self, node: NodeIndex) -> &[ElementIndex] {
        &self.node_to_elements[node]
    }

    /// Coordinates of an element's nodes, in local order.
    pub fn element_coordinates(&self, element: ElementIndex) -> Vec<[f64; 3]> {
        self.elements[element]
            .nodes()
            .iter()
            .map(|&n| self.nodes[n].position)
            .collect()
    }

    /// Shape data of an element.
    pub fn element_geometry(&self, element: ElementIndex) -> ElementResult<SimplexGeometry> {
        SimplexGeometry::compute(&self.element_coordinates(element))
            .map_err(|source| ElementError::geometry(element, source))
    }

    /// Flag an element as crossed by the wake, with one signed distance per node.
    ///
    /// Every node of the element is marked as a wake-side node and receives an
    /// auxiliary potential.
    pub fn mark_wake_element(
        &mut self,
        element: ElementIndex,
        distances: Vec<f64>,
    ) -> ElementResult<()> {
        let elem = &mut self.elements[element];
        elem.set_wake_distances(distances)?;
        elem.flags.wake = true;
        for n in elem.nodes().to_vec() {
            let node = &mut self.nodes[n];
            node.flags.on_wake_side = true;
            node.ensure_auxiliary();
        }
        Ok(())
    }

    /// Flag a node as a trailing-edge node; it receives an auxiliary potential.
    pub fn mark_trailing_edge(&mut self, node: NodeIndex) {
        let node = &mut self.nodes[node];
        node.flags.trailing_edge = true;
        node.ensure_auxiliary();
    }

    /// Flag every non-wake element touching a trailing-edge node as a Kutta element.
    ///
    /// Returns the number of elements flagged.
    pub fn mark_kutta_elements(&mut self) -> usize {
        let mut count = 0;
        for elem in &mut self.elements {
            if elem.flags.wake {
                continue;
            }
            if elem
                .nodes()
                .iter()
                .any(|&n| self.nodes[n].flags.trailing_edge)
            {
                elem.flags.kutta = true;
                count += 1;
            }
        }
        count
    }

    /// Primary potential of a node.
    #[inline]
    pub fn potential(&self, node: NodeIndex) -> f64 {
        self.nodes[node].potential
    }

    /// Auxiliary potential of a node, failing if the node has none.
    pub fn auxiliary_potential(&self, node: NodeIndex) -> ElementResult<f64> {
        self.nodes[node]
            .auxiliary_potential
            .ok_or(ElementError::MissingNodalData {
                node,
                field: "auxiliary potential",
            })
    }

    /// Potential jump written by the last postprocessing step.
    #[inline]
    pub fn potential_jump(&self, node: NodeIndex) -> Option<f64> {
        self.nodes[node].potential_jump
    }
}

impl NeighborQuery for PotentialMesh {
    fn candidates(&self, facet_nodes: &[NodeIndex]) -> Vec<ElementIndex> {
        let mut candidates: Vec<ElementIndex> = facet_nodes
            .iter()
            .flat_map(|&n| self.node_to_elements[n].iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    fn element_nodes(&self, element: ElementIndex) -> &[NodeIndex] {
        self.elements[element].nodes()
    }
}
