//! Solve setup: element checks and the upwind search.

use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::element::{AssemblyContext, UpwindLink};
use crate::error::ElementResult;
use crate::mesh::PotentialMesh;

/// Outcome of the upwind search over a mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpwindSummary {
    /// Elements linked to an upstream neighbour
    pub linked: usize,
    /// Elements without an upstream neighbour
    pub inlets: usize,
    /// Wake elements, which are not searched
    pub wake: usize,
}

impl UpwindSummary {
    fn record(&mut self, link: Option<UpwindLink>) {
        match link {
            Some(UpwindLink::Element(_)) => self.linked += 1,
            Some(UpwindLink::Inlet) => self.inlets += 1,
            None => self.wake += 1,
        }
    }
}

/// Check every element of a mesh, stopping at the first failure.
pub fn check_all(mesh: &PotentialMesh) -> ElementResult<()> {
    mesh.elements().iter().try_for_each(|e| e.check(mesh))
}

/// Run the upwind search on every element.
pub fn initialize_all(ctx: &AssemblyContext<'_>) -> ElementResult<UpwindSummary> {
    ctx.conditions.validate()?;
    let mut summary = UpwindSummary::default();
    for element in ctx.mesh.elements() {
        summary.record(element.initialize(ctx)?);
    }
    debug!(
        linked = summary.linked,
        inlets = summary.inlets,
        wake = summary.wake,
        "upwind search done"
    );
    Ok(summary)
}

/// Run the upwind search on every element in parallel.
///
/// Gives the same links as [`initialize_all`].
#[cfg(feature = "parallel")]
pub fn initialize_all_parallel(ctx: &AssemblyContext<'_>) -> ElementResult<UpwindSummary> {
    ctx.conditions.validate()?;
    let links: Vec<Option<UpwindLink>> = ctx
        .mesh
        .elements()
        .par_iter()
        .map(|element| element.initialize(ctx))
        .collect::<ElementResult<_>>()?;

    let mut summary = UpwindSummary::default();
    for link in links {
        summary.record(link);
    }
    debug!(
        linked = summary.linked,
        inlets = summary.inlets,
        wake = summary.wake,
        "parallel upwind search done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::FreeStreamConditions;
    use crate::types::ElementIndex;

    #[test]
    fn test_summary_counts() {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 2, 1);
        mesh.mark_wake_element(ElementIndex::new(3), vec![1.0, -1.0, 1.0])
            .unwrap();
        let conditions = FreeStreamConditions::default();
        let ctx = AssemblyContext::new(&mesh, &conditions);

        let summary = initialize_all(&ctx).unwrap();
        assert_eq!(summary.linked + summary.inlets + summary.wake, 4);
        assert_eq!(summary.wake, 1);
        assert!(summary.inlets >= 1);

        // Second pass reuses the cached links
        assert_eq!(initialize_all(&ctx).unwrap(), summary);
    }

    #[test]
    fn test_invalid_free_stream_is_rejected() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let conditions = FreeStreamConditions::new([0.0, 0.0, 0.0]);
        let ctx = AssemblyContext::new(&mesh, &conditions);
        assert!(initialize_all(&ctx).is_err());
    }

    #[test]
    fn test_check_all_on_structured_mesh() {
        let mesh = PotentialMesh::structured_tetrahedra(1, 1, 1, 1.0);
        assert!(check_all(&mesh).is_ok());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let serial_mesh = PotentialMesh::structured_triangles(0.0, 2.0, 0.0, 1.0, 8, 5);
        let parallel_mesh = serial_mesh.clone();
        let conditions = FreeStreamConditions::new([0.9, 0.4, 0.0]);

        let serial = initialize_all(&AssemblyContext::new(&serial_mesh, &conditions)).unwrap();
        let parallel =
            initialize_all_parallel(&AssemblyContext::new(&parallel_mesh, &conditions)).unwrap();
        assert_eq!(serial, parallel);
        for (a, b) in serial_mesh.elements().iter().zip(parallel_mesh.elements()) {
            assert_eq!(a.upwind_link(), b.upwind_link());
        }
    }
}
