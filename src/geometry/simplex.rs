//! Linear simplex geometry: shape functions, gradients and measure.
//!
//! Shape functions of the reference simplex:
//!
//! N_0 = 1 - ξ_1 - ... - ξ_d,  N_k = ξ_k
//!
//! The Jacobian J[i][j] = ∂x_j/∂ξ_i = X[i+1][j] - X[0][j] is constant per
//! element, so physical gradients are ∇N = J^{-1} ∇_ξ N and the measure is
//! |det J| / d!.
//!
//! Facet `f` is the facet opposite local node `f`. Its outward normal is
//! parallel to -∇N_f, since N_f vanishes on the facet and grows toward node f.

use faer::{linalg::solvers::Solve, Mat};
use thiserror::Error;

use crate::types::Dimension;

/// Relative tolerance below which an element is considered degenerate.
const DEGENERATE_TOL: f64 = 1e-12;

/// Error type for simplex geometry evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    /// Zero (or numerically zero) measure.
    #[error("degenerate simplex with measure {measure:e}")]
    Degenerate { measure: f64 },

    /// Clockwise / negatively oriented simplex.
    #[error("inverted simplex with signed measure {measure:e}")]
    Inverted { measure: f64 },

    /// Not a triangle or tetrahedron.
    #[error("unsupported simplex with {0} nodes")]
    UnsupportedNodeCount(usize),

    /// Level-set value that places a node on neither side.
    #[error("non-finite level-set value {value} at local node {local}")]
    NonFiniteLevelSet { local: usize, value: f64 },
}

/// Geometry data of one linear simplex.
///
/// Shape functions are linear, so their gradients are constant over the
/// element and the centroid values are all 1/N.
#[derive(Clone, Debug)]
pub struct SimplexGeometry {
    /// Spatial dimension
    pub dim: Dimension,
    /// Shape function gradients: dn_dx[(i, k)] = ∂N_i/∂x_k (n_nodes × dim)
    pub dn_dx: Mat<f64>,
    /// Unsigned measure (area in 2D, volume in 3D)
    pub volume: f64,
    /// Signed measure; negative for inverted node ordering
    pub signed_volume: f64,
}

impl SimplexGeometry {
    /// Evaluate shape data for a triangle (3 coordinates) or tetrahedron (4).
    ///
    /// In 2D the z component of each coordinate is ignored.
    pub fn compute(coordinates: &[[f64; 3]]) -> Result<Self, GeometryError> {
        let dim = Dimension::from_node_count(coordinates.len())
            .ok_or(GeometryError::UnsupportedNodeCount(coordinates.len()))?;
        let d = dim.n_coords();
        let n_nodes = dim.n_nodes();

        let mut jac = Mat::<f64>::zeros(d, d);
        for i in 0..d {
            for j in 0..d {
                jac[(i, j)] = coordinates[i + 1][j] - coordinates[0][j];
            }
        }

        let det = determinant(&jac);
        let factorial = if d == 2 { 2.0 } else { 6.0 };
        let signed_volume = det / factorial;

        let scale = characteristic_length(coordinates, d);
        if det.abs() <= DEGENERATE_TOL * scale.powi(d as i32) {
            return Err(GeometryError::Degenerate {
                measure: signed_volume,
            });
        }

        // Reference gradients, one column per node
        let mut dn_dxi_t = Mat::<f64>::zeros(d, n_nodes);
        for k in 0..d {
            dn_dxi_t[(k, 0)] = -1.0;
            dn_dxi_t[(k, k + 1)] = 1.0;
        }

        let lu = jac.as_ref().full_piv_lu();
        let grads = lu.solve(&dn_dxi_t);

        let mut dn_dx = Mat::<f64>::zeros(n_nodes, d);
        for i in 0..n_nodes {
            for k in 0..d {
                dn_dx[(i, k)] = grads[(k, i)];
            }
        }

        Ok(Self {
            dim,
            dn_dx,
            volume: signed_volume.abs(),
            signed_volume,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.dim.n_nodes()
    }

    /// Gradient of a nodal field: Σ_i values[i] ∇N_i.
    ///
    /// Components beyond the mesh dimension are zero.
    pub fn gradient(&self, values: &[f64]) -> [f64; 3] {
        let mut g = [0.0; 3];
        for (i, &v) in values.iter().enumerate().take(self.n_nodes()) {
            for k in 0..self.dim.n_coords() {
                g[k] += v * self.dn_dx[(i, k)];
            }
        }
        g
    }

    /// Projection of each shape gradient on a vector: (∇N · v)_i.
    pub fn project_gradients(&self, v: &[f64; 3]) -> Vec<f64> {
        (0..self.n_nodes())
            .map(|i| {
                (0..self.dim.n_coords())
                    .map(|k| self.dn_dx[(i, k)] * v[k])
                    .sum()
            })
            .collect()
    }

    /// Outward unit normal of facet `facet` (the facet opposite local node `facet`).
    pub fn facet_normal(&self, facet: usize) -> [f64; 3] {
        let mut normal = [0.0; 3];
        let mut norm_sq = 0.0;
        for k in 0..self.dim.n_coords() {
            normal[k] = -self.dn_dx[(facet, k)];
            norm_sq += normal[k] * normal[k];
        }
        let norm = norm_sq.sqrt();
        for c in normal.iter_mut() {
            *c /= norm;
        }
        normal
    }

    /// Local node indices of facet `facet`, in ascending order.
    pub fn facet_local_nodes(&self, facet: usize) -> impl Iterator<Item = usize> {
        (0..self.n_nodes()).filter(move |&i| i != facet)
    }
}

/// Centroid of a set of coordinates.
pub fn centroid(coordinates: &[[f64; 3]]) -> [f64; 3] {
    let mut c = [0.0; 3];
    for p in coordinates {
        for k in 0..3 {
            c[k] += p[k];
        }
    }
    let n = coordinates.len().max(1) as f64;
    c.map(|v| v / n)
}

/// Determinant of a 2×2 or 3×3 matrix.
pub(crate) fn determinant(m: &Mat<f64>) -> f64 {
    match m.nrows() {
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        3 => {
            m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
                - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
                + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
        }
        n => unreachable!("determinant of {n}x{n} matrix"),
    }
}

/// Longest distance from node 0 to any other node.
fn characteristic_length(coordinates: &[[f64; 3]], d: usize) -> f64 {
    coordinates[1..]
        .iter()
        .map(|p| {
            (0..d)
                .map(|k| (p[k] - coordinates[0][k]).powi(2))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_triangle() -> [[f64; 3]; 3] {
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    fn unit_tetrahedron() -> [[f64; 3]; 4] {
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn test_triangle_measure_and_gradients() {
        let geom = SimplexGeometry::compute(&unit_triangle()).unwrap();
        assert_relative_eq!(geom.volume, 0.5, epsilon = 1e-14);
        assert_relative_eq!(geom.dn_dx[(0, 0)], -1.0, epsilon = 1e-14);
        assert_relative_eq!(geom.dn_dx[(0, 1)], -1.0, epsilon = 1e-14);
        assert_relative_eq!(geom.dn_dx[(1, 0)], 1.0, epsilon = 1e-14);
        assert_relative_eq!(geom.dn_dx[(2, 1)], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_tetrahedron_measure() {
        let geom = SimplexGeometry::compute(&unit_tetrahedron()).unwrap();
        assert_relative_eq!(geom.volume, 1.0 / 6.0, epsilon = 1e-14);
        assert_eq!(geom.dn_dx.nrows(), 4);
        assert_eq!(geom.dn_dx.ncols(), 3);
    }

    #[test]
    fn test_gradients_partition_of_unity() {
        let coords = [[0.3, -0.2, 0.0], [2.1, 0.4, 0.0], [0.9, 1.7, 0.0]];
        let geom = SimplexGeometry::compute(&coords).unwrap();
        for k in 0..2 {
            let sum: f64 = (0..3).map(|i| geom.dn_dx[(i, k)]).sum();
            assert!(sum.abs() < 1e-13);
        }
    }

    #[test]
    fn test_gradient_of_linear_field_is_exact() {
        let coords = [[0.3, -0.2, 0.0], [2.1, 0.4, 0.0], [0.9, 1.7, 0.0]];
        let geom = SimplexGeometry::compute(&coords).unwrap();
        // f(x, y) = 2x - 3y + 1
        let values: Vec<f64> = coords.iter().map(|p| 2.0 * p[0] - 3.0 * p[1] + 1.0).collect();
        let g = geom.gradient(&values);
        assert_relative_eq!(g[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(g[1], -3.0, epsilon = 1e-12);
        assert_eq!(g[2], 0.0);
    }

    #[test]
    fn test_facet_normals_point_outward() {
        let geom = SimplexGeometry::compute(&unit_triangle()).unwrap();
        // Facet 1 is the edge x = 0 (nodes 0, 2)
        let n1 = geom.facet_normal(1);
        assert_relative_eq!(n1[0], -1.0, epsilon = 1e-14);
        assert_relative_eq!(n1[1], 0.0, epsilon = 1e-14);
        // Facet 0 is the hypotenuse
        let n0 = geom.facet_normal(0);
        let s = 1.0 / 2.0_f64.sqrt();
        assert_relative_eq!(n0[0], s, epsilon = 1e-14);
        assert_relative_eq!(n0[1], s, epsilon = 1e-14);

        let nodes: Vec<usize> = geom.facet_local_nodes(1).collect();
        assert_eq!(nodes, vec![0, 2]);
    }

    #[test]
    fn test_inverted_triangle_has_negative_signed_volume() {
        let coords = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];
        let geom = SimplexGeometry::compute(&coords).unwrap();
        assert!(geom.signed_volume < 0.0);
        assert_relative_eq!(geom.volume, 0.5, epsilon = 1e-14);
        // Normals stay outward regardless of orientation
        let n1 = geom.facet_normal(1);
        assert_relative_eq!(n1[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(n1[1], -1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_degenerate_triangle_is_rejected() {
        let coords = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        assert!(matches!(
            SimplexGeometry::compute(&coords),
            Err(GeometryError::Degenerate { .. })
        ));
    }

    #[test]
    fn test_unsupported_node_count() {
        let coords = [[0.0; 3]; 5];
        assert_eq!(
            SimplexGeometry::compute(&coords).unwrap_err(),
            GeometryError::UnsupportedNodeCount(5)
        );
    }

    #[test]
    fn test_centroid() {
        let c = centroid(&unit_triangle());
        assert_relative_eq!(c[0], 1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(c[1], 1.0 / 3.0, epsilon = 1e-14);
    }
}
