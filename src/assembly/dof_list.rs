//! Element dof lists.
//!
//! | Role   | Slots | Layout                                                  |
//! |--------|-------|---------------------------------------------------------|
//! | Inlet  | N     | primary potential of every node                         |
//! | Normal | N + 1 | primary potentials, then the upwind additional node     |
//! | Kutta  | N     | auxiliary on trailing-edge nodes, primary elsewhere     |
//! | Wake   | 2N    | upper slots `0..N`, lower slots `N..2N`                 |

use crate::dofs::Dof;
use crate::element::{ElementRole, PotentialElement};
use crate::error::ElementResult;
use crate::mesh::PotentialMesh;
use crate::types::NodeIndex;
use crate::upwind::additional_node;

/// Dof list of an element for its current role.
pub fn element_dofs(mesh: &PotentialMesh, element: &PotentialElement) -> ElementResult<Vec<Dof>> {
    let nodes = element.nodes();
    match element.role() {
        ElementRole::Inlet => Ok(nodes.iter().map(|&n| Dof::primary(n)).collect()),
        ElementRole::Normal => {
            let extra = additional_node(element, mesh)?;
            let mut dofs: Vec<Dof> = nodes.iter().map(|&n| Dof::primary(n)).collect();
            dofs.push(Dof::primary(extra));
            Ok(dofs)
        }
        ElementRole::Kutta => Ok(nodes
            .iter()
            .map(|&n| Dof::select(n, !mesh.node(n).flags.trailing_edge))
            .collect()),
        ElementRole::Wake => Ok(wake_dofs(nodes, element.checked_wake_distances()?)),
    }
}

/// Doubled dof list of a wake element.
///
/// Upper slot `i` is the primary dof where d_i > 0, the auxiliary dof
/// otherwise. Lower slot `N + i` is the primary dof where d_i < 0, the
/// auxiliary dof otherwise, so a node with d_i == 0 appears twice as
/// auxiliary.
pub fn wake_dofs(nodes: &[NodeIndex], distances: &[f64]) -> Vec<Dof> {
    let upper = nodes
        .iter()
        .zip(distances)
        .map(|(&n, &d)| Dof::select(n, d > 0.0));
    let lower = nodes
        .iter()
        .zip(distances)
        .map(|(&n, &d)| Dof::select(n, d < 0.0));
    upper.chain(lower).collect()
}
