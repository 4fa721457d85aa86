//! Dense global assembly for small systems.
//!
//! Scatters every active element's local system through its equation ids.
//! Intended for tests and small meshes; large problems plug the element
//! contract into a sparse assembler instead.

use faer::Mat;
use tracing::debug;

use crate::dofs::{DofKind, DofRegistry};
use crate::element::AssemblyContext;
use crate::error::{ElementError, ElementResult};
use crate::mesh::PotentialMesh;

/// Assembled global matrix and residual.
#[derive(Clone, Debug)]
pub struct GlobalSystem {
    pub lhs: Mat<f64>,
    pub rhs: Vec<f64>,
}

/// Assemble the global system of all active elements.
pub fn assemble_global(
    ctx: &AssemblyContext<'_>,
    registry: &DofRegistry,
) -> ElementResult<GlobalSystem> {
    let n = registry.n_equations();
    let mut lhs = Mat::zeros(n, n);
    let mut rhs = vec![0.0; n];

    let mut assembled = 0;
    for element in ctx.mesh.elements() {
        if !element.flags.active {
            continue;
        }
        let ids = element.equation_ids(ctx.mesh, registry)?;
        let local = element.calculate_local_system(ctx)?;
        for (a, ia) in ids.iter().enumerate() {
            rhs[ia.get()] += local.rhs[a];
            for (b, ib) in ids.iter().enumerate() {
                lhs[(ia.get(), ib.get())] += local.lhs[(a, b)];
            }
        }
        assembled += 1;
    }

    debug!(elements = assembled, equations = n, "global system assembled");
    Ok(GlobalSystem { lhs, rhs })
}

/// Add a solution increment to the nodal potentials.
///
/// `increment` is indexed by equation id and must cover every equation;
/// nothing is written when it does not.
pub fn apply_increment(
    mesh: &mut PotentialMesh,
    registry: &DofRegistry,
    increment: &[f64],
) -> ElementResult<()> {
    if increment.len() != registry.n_equations() {
        return Err(ElementError::IncrementLength {
            expected: registry.n_equations(),
            actual: increment.len(),
        });
    }
    for (dof, &dx) in registry.dofs().iter().zip(increment) {
        let node = mesh.node_mut(dof.node);
        match dof.kind {
            DofKind::Potential => node.potential += dx,
            DofKind::AuxiliaryPotential => {
                *node.auxiliary_potential.get_or_insert(0.0) += dx;
            }
        }
    }
    Ok(())
}
