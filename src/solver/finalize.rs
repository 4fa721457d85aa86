//! End-of-step postprocessing.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::ElementResult;
use crate::mesh::PotentialMesh;
use crate::physics::FreeStreamConditions;
use crate::postprocess::{reduce_potential_jumps, JumpContribution, JumpReduction};

/// Relative tolerance for disagreeing jump contributions at a shared node.
pub const JUMP_TOLERANCE: f64 = 1e-10;

/// Jump contributions of every element.
pub fn collect_potential_jumps(
    mesh: &PotentialMesh,
    conditions: &FreeStreamConditions,
) -> ElementResult<Vec<JumpContribution>> {
    let mut contributions = Vec::new();
    for element in mesh.elements() {
        contributions.extend(element.finalize_solution_step(mesh, conditions)?);
    }
    Ok(contributions)
}

/// Jump contributions of every element, computed in parallel.
#[cfg(feature = "parallel")]
pub fn collect_potential_jumps_parallel(
    mesh: &PotentialMesh,
    conditions: &FreeStreamConditions,
) -> ElementResult<Vec<JumpContribution>> {
    let per_element: Vec<Vec<JumpContribution>> = mesh
        .elements()
        .par_iter()
        .map(|element| element.finalize_solution_step(mesh, conditions))
        .collect::<ElementResult<_>>()?;
    Ok(per_element.into_iter().flatten().collect())
}

/// Compute and store the potential jump of every wake node.
pub fn finalize_solution_step(
    mesh: &mut PotentialMesh,
    conditions: &FreeStreamConditions,
) -> ElementResult<JumpReduction> {
    let contributions = collect_potential_jumps(mesh, conditions)?;
    Ok(reduce_potential_jumps(mesh, contributions, JUMP_TOLERANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ElementIndex, NodeIndex};
    use approx::assert_relative_eq;

    fn wake_strip() -> PotentialMesh {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 2.0, -0.5, 0.5, 2, 1);
        // Wake along y = 0: bottom row of nodes below, top row above
        for k in ElementIndex::iter(mesh.n_elements()) {
            let distances: Vec<f64> = mesh
                .element(k)
                .nodes()
                .iter()
                .map(|&n| mesh.node(n).position[1])
                .collect();
            mesh.mark_wake_element(k, distances).unwrap();
        }
        mesh
    }

    #[test]
    fn test_jump_written_to_every_wake_node() {
        let mut mesh = wake_strip();
        for n in NodeIndex::iter(mesh.n_nodes()) {
            let node = mesh.node_mut(n);
            node.auxiliary_potential = Some(node.potential + 0.25);
        }
        let conditions = FreeStreamConditions::new([0.5, 0.0, 0.0]);
        let reduction = finalize_solution_step(&mut mesh, &conditions).unwrap();
        assert_eq!(reduction.nodes_written, 6);
        assert_eq!(reduction.conflicts, 0);

        for n in NodeIndex::iter(mesh.n_nodes()) {
            let expected = if mesh.node(n).position[1] > 0.0 { -1.0 } else { 1.0 };
            assert_relative_eq!(mesh.potential_jump(n).unwrap(), expected, epsilon = 1e-14);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_collection_matches_serial() {
        let mesh = wake_strip();
        let conditions = FreeStreamConditions::default();
        let serial = collect_potential_jumps(&mesh, &conditions).unwrap();
        let parallel = collect_potential_jumps_parallel(&mesh, &conditions).unwrap();
        assert_eq!(serial, parallel);
    }
}
