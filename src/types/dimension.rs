//! Spatial dimension of a simplex mesh.

/// Spatial dimension of the mesh.
///
/// Only linear simplices are supported: triangles in 2D and tetrahedra in 3D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Triangles (3 nodes, 3 edges)
    Two,
    /// Tetrahedra (4 nodes, 4 faces)
    Three,
}

impl Dimension {
    /// Number of spatial coordinates.
    #[inline]
    pub const fn n_coords(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    /// Number of nodes of a linear simplex (N = dim + 1).
    #[inline]
    pub const fn n_nodes(self) -> usize {
        self.n_coords() + 1
    }

    /// Number of boundary facets (edges in 2D, faces in 3D).
    ///
    /// Facet `f` is the one opposite local node `f`.
    #[inline]
    pub const fn n_facets(self) -> usize {
        self.n_nodes()
    }

    /// Dimension implied by a simplex node count.
    pub fn from_node_count(n_nodes: usize) -> Option<Self> {
        match n_nodes {
            3 => Some(Dimension::Two),
            4 => Some(Dimension::Three),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplex_counts() {
        assert_eq!(Dimension::Two.n_nodes(), 3);
        assert_eq!(Dimension::Three.n_nodes(), 4);
        assert_eq!(Dimension::Two.n_facets(), 3);
        assert_eq!(Dimension::Three.n_coords(), 3);
    }

    #[test]
    fn test_from_node_count() {
        assert_eq!(Dimension::from_node_count(3), Some(Dimension::Two));
        assert_eq!(Dimension::from_node_count(4), Some(Dimension::Three));
        assert_eq!(Dimension::from_node_count(8), None);
    }
}
