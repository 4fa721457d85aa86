//! Nodal potential selection and the element flow state.
//!
//! An element reads either the primary or the auxiliary potential of each
//! node, depending on which side of the wake it is evaluating. The selected
//! potentials give the perturbation velocity ∇φ; adding V∞ gives the local
//! velocity that drives the density law.

use crate::element::{ElementRole, PotentialElement};
use crate::error::ElementResult;
use crate::geometry::SimplexGeometry;
use crate::mesh::PotentialMesh;
use crate::physics::{density, density_derivative, FreeStreamConditions};

/// Which nodal potential an element reads at each node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PotentialSide {
    /// Primary potential everywhere
    Primary,
    /// Auxiliary potential at trailing-edge nodes, primary elsewhere
    Kutta,
    /// Primary where d > 0, auxiliary elsewhere
    Upper,
    /// Primary where d < 0, auxiliary elsewhere
    Lower,
}

impl PotentialSide {
    /// Side an element of the given role evaluates its velocity on.
    ///
    /// Wake elements report the upper side.
    pub const fn for_role(role: ElementRole) -> Self {
        match role {
            ElementRole::Inlet | ElementRole::Normal => PotentialSide::Primary,
            ElementRole::Kutta => PotentialSide::Kutta,
            ElementRole::Wake => PotentialSide::Upper,
        }
    }
}

/// Nodal potentials of an element, in local node order.
pub fn element_potentials(
    mesh: &PotentialMesh,
    element: &PotentialElement,
    side: PotentialSide,
) -> ElementResult<Vec<f64>> {
    let distances: &[f64] = match side {
        PotentialSide::Upper | PotentialSide::Lower => element.checked_wake_distances()?,
        PotentialSide::Primary | PotentialSide::Kutta => &[],
    };

    element
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, &node)| {
            let primary = match side {
                PotentialSide::Primary => true,
                PotentialSide::Kutta => !mesh.node(node).flags.trailing_edge,
                PotentialSide::Upper => distances[i] > 0.0,
                PotentialSide::Lower => distances[i] < 0.0,
            };
            if primary {
                Ok(mesh.potential(node))
            } else {
                mesh.auxiliary_potential(node)
            }
        })
        .collect()
}

/// Velocity and density of an element evaluated at its centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowState {
    /// Perturbation velocity ∇φ
    pub perturbation: [f64; 3],
    /// Local velocity V∞ + ∇φ
    pub velocity: [f64; 3],
    /// |V|²
    pub velocity_sq: f64,
    /// Local density ρ
    pub density: f64,
    /// dρ/d|V|²
    pub density_derivative: f64,
}

impl FlowState {
    /// Evaluate the flow state from nodal potentials.
    pub fn evaluate(
        conditions: &FreeStreamConditions,
        geometry: &SimplexGeometry,
        potentials: &[f64],
    ) -> Self {
        let perturbation = geometry.gradient(potentials);
        let velocity = total_velocity(conditions, geometry, &perturbation);
        let velocity_sq = velocity.iter().map(|v| v * v).sum();
        let rho = density(conditions, velocity_sq);
        Self {
            perturbation,
            velocity,
            velocity_sq,
            density: rho,
            density_derivative: density_derivative(conditions, rho),
        }
    }
}

/// V∞ + ∇φ, restricted to the mesh dimension.
pub fn total_velocity(
    conditions: &FreeStreamConditions,
    geometry: &SimplexGeometry,
    perturbation: &[f64; 3],
) -> [f64; 3] {
    let mut velocity = [0.0; 3];
    for k in 0..geometry.dim.n_coords() {
        velocity[k] = conditions.velocity[k] + perturbation[k];
    }
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ElementError;
    use crate::types::{ElementIndex, NodeIndex};
    use approx::assert_relative_eq;

    fn wake_cell() -> PotentialMesh {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        for n in 0..4 {
            mesh.node_mut(NodeIndex::new(n)).potential = n as f64;
        }
        mesh.mark_wake_element(ElementIndex::new(0), vec![1.0, 1.0, -1.0])
            .unwrap();
        for n in 0..3 {
            mesh.node_mut(NodeIndex::new(n)).auxiliary_potential = Some(10.0 + n as f64);
        }
        mesh
    }

    #[test]
    fn test_upper_and_lower_selection() {
        let mesh = wake_cell();
        let elem = mesh.element(ElementIndex::new(0));
        // Nodes 0, 1, 2 hold primaries 0, 1, 2 and auxiliaries 10, 11, 12
        let upper = element_potentials(&mesh, elem, PotentialSide::Upper).unwrap();
        let lower = element_potentials(&mesh, elem, PotentialSide::Lower).unwrap();
        assert_eq!(upper, vec![0.0, 1.0, 12.0]);
        assert_eq!(lower, vec![10.0, 11.0, 2.0]);
    }

    #[test]
    fn test_kutta_selection_uses_trailing_edge_auxiliary() {
        let mut mesh = wake_cell();
        mesh.mark_trailing_edge(NodeIndex::new(3));
        mesh.node_mut(NodeIndex::new(3)).auxiliary_potential = Some(-5.0);
        let elem = mesh.element(ElementIndex::new(1));
        // Element 1 = [v0, v2, v3]
        let kutta = element_potentials(&mesh, elem, PotentialSide::Kutta).unwrap();
        assert_eq!(kutta, vec![0.0, 2.0, -5.0]);
    }

    #[test]
    fn test_missing_auxiliary_fails() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let mut elem = mesh.element(ElementIndex::new(0)).clone();
        elem.set_wake_distances(vec![1.0, 1.0, -1.0]).unwrap();
        assert!(matches!(
            element_potentials(&mesh, &elem, PotentialSide::Upper),
            Err(ElementError::MissingNodalData { .. })
        ));
    }

    #[test]
    fn test_uniform_potential_gives_free_stream() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let conditions = FreeStreamConditions::new([2.0, 1.0, 0.0]);
        let geom = mesh.element_geometry(ElementIndex::new(0)).unwrap();
        let state = FlowState::evaluate(&conditions, &geom, &[3.0, 3.0, 3.0]);
        assert_relative_eq!(state.perturbation[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(state.velocity[0], 2.0, epsilon = 1e-14);
        assert_relative_eq!(state.velocity_sq, 5.0, epsilon = 1e-14);
        assert_relative_eq!(state.density, 1.0, epsilon = 1e-14);
    }
}
