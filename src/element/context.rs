//! Shared, read-only inputs of per-element operations.

use crate::geometry::{LevelSetSplitter, WakeSplitter};
use crate::mesh::PotentialMesh;
use crate::physics::FreeStreamConditions;
use crate::upwind::UpwindLocator;

static DEFAULT_SPLITTER: LevelSetSplitter = LevelSetSplitter;

/// Everything an element needs besides itself: the mesh store, the
/// free-stream state and the collaborators used during assembly.
///
/// Cheap to copy and `Sync`, so one context can be shared by parallel
/// element loops.
#[derive(Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub mesh: &'a PotentialMesh,
    pub conditions: &'a FreeStreamConditions,
    pub splitter: &'a dyn WakeSplitter,
    pub locator: UpwindLocator,
}

impl<'a> AssemblyContext<'a> {
    /// Context with the exact level-set splitter and default upwind search.
    pub fn new(mesh: &'a PotentialMesh, conditions: &'a FreeStreamConditions) -> Self {
        Self {
            mesh,
            conditions,
            splitter: &DEFAULT_SPLITTER,
            locator: UpwindLocator::default(),
        }
    }

    /// Use another sub-volume splitter for cut wake elements.
    pub fn with_splitter(mut self, splitter: &'a dyn WakeSplitter) -> Self {
        self.splitter = splitter;
        self
    }

    /// Use another upwind search configuration.
    pub fn with_locator(mut self, locator: UpwindLocator) -> Self {
        self.locator = locator;
        self
    }
}

impl std::fmt::Debug for AssemblyContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssemblyContext")
            .field("n_elements", &self.mesh.n_elements())
            .field("conditions", self.conditions)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
