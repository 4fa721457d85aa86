//! # potflow-rs
//!
//! Wake handling for a finite-element transonic perturbation potential solver.
//!
//! This crate provides the element-level building blocks for lifting flows
//! with a discontinuous potential across the wake:
//! - Element classification (Inlet, Normal, Kutta, Wake)
//! - Upwind element search with a cached, write-once link
//! - Doubled-dof assembly of wake elements, including embedded (cut) wakes
//! - Kutta condition through auxiliary dofs at trailing-edge nodes
//! - Potential jump postprocessing with a deterministic node reduction
//! - Full-potential density law with Mach clamping
//!
//! Collaborators the element consumes (simplex geometry, level-set splitting,
//! dof numbering, the element/node store) come with minimal implementations.

pub mod assembly;
pub mod dofs;
pub mod element;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod physics;
pub mod postprocess;
pub mod solver;
pub mod types;
pub mod upwind;

// Re-export main types for convenience
pub use assembly::{LocalSystem, PotentialSide};
pub use dofs::{Dof, DofKind, DofRegistry};
pub use element::{
    AssemblyContext, AssemblyPath, ElementFlags, ElementOutput, ElementRole, PotentialElement,
    UpwindLink,
};
pub use error::{ElementError, ElementResult};
pub use geometry::{GeometryError, LevelSetSplitter, SimplexGeometry, WakeSplitter};
pub use mesh::{Node, NodeFlags, PotentialMesh};
pub use physics::FreeStreamConditions;
pub use postprocess::{JumpContribution, JumpReduction};
pub use solver::{
    apply_increment, assemble_global, check_all, finalize_solution_step, initialize_all,
    GlobalSystem, UpwindSummary,
};
pub use types::{Dimension, ElementIndex, EquationId, NodeIndex};
pub use upwind::{NeighborQuery, UpwindLocator};

#[cfg(feature = "parallel")]
pub use solver::{collect_potential_jumps_parallel, initialize_all_parallel};
