//! Post-solve quantities written back to the mesh.

mod potential_jump;

pub use potential_jump::{
    potential_jump, potential_jump_contributions, reduce_potential_jumps, JumpContribution,
    JumpReduction,
};
