//! Potential jump across the wake.
//!
//! After each solve step every active wake element reports, per node, the
//! scaled difference between the auxiliary and primary potentials:
//!
//! jump = ∓ 2/|V∞| (φ_aux - φ)    (- where d > 0, + where d ≤ 0)
//!
//! Elements only emit contributions. Writing them into node storage is a
//! separate reduction step, run once all elements are done.

use tracing::{debug, warn};

use crate::element::PotentialElement;
use crate::error::ElementResult;
use crate::mesh::PotentialMesh;
use crate::physics::FreeStreamConditions;
use crate::types::{ElementIndex, NodeIndex};

/// Potential jump at one node, as computed by one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpContribution {
    pub node: NodeIndex,
    pub element: ElementIndex,
    pub value: f64,
}

/// Scaled jump for one node.
///
/// # Example
/// ```
/// use potflow_rs::postprocess::potential_jump;
///
/// assert_eq!(potential_jump(1.5, 0.5, 0.2, 2.0), -1.0);
/// assert_eq!(potential_jump(1.5, 0.5, -0.2, 2.0), 1.0);
/// assert_eq!(potential_jump(0.7, 0.7, 0.2, 2.0), 0.0);
/// ```
#[inline]
pub fn potential_jump(auxiliary: f64, primary: f64, distance: f64, free_stream_speed: f64) -> f64 {
    let scaled = 2.0 / free_stream_speed * (auxiliary - primary);
    if distance > 0.0 {
        -scaled
    } else {
        scaled
    }
}

/// Jump contributions of one element.
///
/// Empty unless the element is an active wake element.
pub fn potential_jump_contributions(
    mesh: &PotentialMesh,
    element: &PotentialElement,
    conditions: &FreeStreamConditions,
) -> ElementResult<Vec<JumpContribution>> {
    if !(element.flags.wake && element.flags.active) {
        return Ok(Vec::new());
    }
    conditions.validate()?;
    let speed = conditions.speed();
    let distances = element.checked_wake_distances()?;

    element
        .nodes()
        .iter()
        .zip(distances)
        .map(|(&node, &d)| {
            let auxiliary = mesh.auxiliary_potential(node)?;
            Ok(JumpContribution {
                node,
                element: element.id(),
                value: potential_jump(auxiliary, mesh.potential(node), d, speed),
            })
        })
        .collect()
}

/// Outcome of a jump reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpReduction {
    /// Nodes that received a value
    pub nodes_written: usize,
    /// Nodes whose contributions disagreed beyond the tolerance
    pub conflicts: usize,
}

/// Write jump contributions into node storage.
///
/// At each node the contribution of the lowest element index wins, whatever
/// the order the contributions arrive in. Contributions that differ from the
/// winner by more than `tolerance` (relative, floored at 1) are reported.
pub fn reduce_potential_jumps<I>(
    mesh: &mut PotentialMesh,
    contributions: I,
    tolerance: f64,
) -> JumpReduction
where
    I: IntoIterator<Item = JumpContribution>,
{
    let mut contributions: Vec<JumpContribution> = contributions.into_iter().collect();
    contributions.sort_by_key(|c| (c.node, c.element));

    let mut reduction = JumpReduction::default();
    for group in contributions.chunk_by(|a, b| a.node == b.node) {
        let winner = group[0];
        let limit = tolerance * winner.value.abs().max(1.0);
        let disagreeing = group[1..]
            .iter()
            .filter(|c| (c.value - winner.value).abs() > limit)
            .count();
        if disagreeing > 0 {
            warn!(
                node = %winner.node,
                element = %winner.element,
                value = winner.value,
                disagreeing,
                "inconsistent potential jump contributions"
            );
            reduction.conflicts += 1;
        }
        mesh.node_mut(winner.node).potential_jump = Some(winner.value);
        reduction.nodes_written += 1;
    }

    debug!(
        nodes = reduction.nodes_written,
        conflicts = reduction.conflicts,
        "potential jumps reduced"
    );
    reduction
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wake_mesh() -> PotentialMesh {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        mesh.mark_wake_element(ElementIndex::new(0), vec![1.0, 1.0, -1.0])
            .unwrap();
        mesh.mark_wake_element(ElementIndex::new(1), vec![1.0, -1.0, -1.0])
            .unwrap();
        mesh
    }

    #[test]
    fn test_jump_zero_when_potentials_agree() {
        for d in [-1.0, 0.0, 1.0] {
            for phi in [-3.0, 0.0, 2.5] {
                assert_eq!(potential_jump(phi, phi, d, 7.0), 0.0);
            }
        }

        let mesh = wake_mesh();
        let conditions = FreeStreamConditions::new([2.0, 0.0, 0.0]);
        for elem in mesh.elements() {
            let contributions = potential_jump_contributions(&mesh, elem, &conditions).unwrap();
            assert_eq!(contributions.len(), 3);
            assert!(contributions.iter().all(|c| c.value == 0.0));
        }
    }

    #[test]
    fn test_inactive_and_non_wake_elements_emit_nothing() {
        let mut mesh = wake_mesh();
        mesh.element_mut(ElementIndex::new(0)).flags.active = false;
        mesh.element_mut(ElementIndex::new(1)).flags.wake = false;
        let conditions = FreeStreamConditions::default();
        for elem in mesh.elements() {
            assert!(potential_jump_contributions(&mesh, elem, &conditions)
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn test_jump_signs() {
        let mut mesh = wake_mesh();
        mesh.node_mut(NodeIndex::new(0)).auxiliary_potential = Some(1.0);
        mesh.node_mut(NodeIndex::new(2)).auxiliary_potential = Some(1.0);
        let conditions = FreeStreamConditions::new([4.0, 0.0, 0.0]);
        let elem = mesh.element(ElementIndex::new(0));
        let c = potential_jump_contributions(&mesh, elem, &conditions).unwrap();
        // d0 > 0, d2 < 0
        assert_relative_eq!(c[0].value, -0.5, epsilon = 1e-14);
        assert_relative_eq!(c[2].value, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_reduction_is_order_independent() {
        let node = NodeIndex::new(2);
        let a = JumpContribution {
            node,
            element: ElementIndex::new(0),
            value: 1.0,
        };
        let b = JumpContribution {
            node,
            element: ElementIndex::new(1),
            value: 2.0,
        };

        let mut forward = wake_mesh();
        let r1 = reduce_potential_jumps(&mut forward, [a, b], 1e-12);
        let mut backward = wake_mesh();
        let r2 = reduce_potential_jumps(&mut backward, [b, a], 1e-12);

        assert_eq!(forward.potential_jump(node), Some(1.0));
        assert_eq!(backward.potential_jump(node), Some(1.0));
        assert_eq!(r1, r2);
        assert_eq!(
            r1,
            JumpReduction {
                nodes_written: 1,
                conflicts: 1
            }
        );
    }

    #[test]
    fn test_consistent_contributions_have_no_conflicts() {
        let mut mesh = wake_mesh();
        let conditions = FreeStreamConditions::default();
        let contributions: Vec<_> = mesh
            .elements()
            .iter()
            .flat_map(|e| potential_jump_contributions(&mesh, e, &conditions).unwrap())
            .collect();
        let reduction = reduce_potential_jumps(&mut mesh, contributions, 1e-12);
        assert_eq!(reduction.nodes_written, 4);
        assert_eq!(reduction.conflicts, 0);
    }
}
