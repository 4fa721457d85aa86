//! Orchestration of per-element operations over a mesh.
//!
//! - [`initialize_all`]: upwind search, once per topology
//! - [`assemble_global`]: dense global system through equation ids
//! - [`finalize_solution_step`]: potential jump reduction after each solve

mod finalize;
mod global;
mod setup;

pub use finalize::{collect_potential_jumps, finalize_solution_step, JUMP_TOLERANCE};
pub use global::{apply_increment, assemble_global, GlobalSystem};
pub use setup::{check_all, initialize_all, UpwindSummary};

#[cfg(feature = "parallel")]
pub use finalize::collect_potential_jumps_parallel;
#[cfg(feature = "parallel")]
pub use setup::initialize_all_parallel;
