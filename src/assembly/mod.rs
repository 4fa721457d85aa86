//! Discontinuous-dof assembly building blocks.
//!
//! - [`dof_list`]: role-dependent dof lists, including the doubled wake layout
//! - [`potentials`]: per-side nodal potentials and the element flow state
//! - [`local_system`]: bilinear blocks, residuals and the wake placement rules
//!
//! The per-role dispatch lives on [`PotentialElement`](crate::element::PotentialElement).

pub mod dof_list;
pub mod local_system;
pub mod potentials;

pub use dof_list::{element_dofs, wake_dofs};
pub use local_system::{
    bilinear_block, cut_wake_lhs, cut_wake_rhs, padded, residual, sub_volume_blocks, total_block,
    wake_lhs, wake_rhs, LocalSystem, WakeResiduals,
};
pub use potentials::{element_potentials, total_velocity, FlowState, PotentialSide};
