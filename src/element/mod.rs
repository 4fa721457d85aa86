//! Wake-aware transonic perturbation potential element.
//!
//! A [`PotentialElement`] is a linear triangle or tetrahedron with flags set
//! by preprocessing. Its [`ElementRole`] decides the size and layout of the
//! local system:
//!
//! - Inlet and Kutta elements couple their own N nodes
//! - Normal elements add one dof from the upwind element
//! - Wake elements double every node into upper and lower copies
//!
//! All per-element operations take an [`AssemblyContext`] and `&self`; the
//! only state an element writes is its write-once upwind link.

mod context;
mod contract;
mod output;
mod potential_element;
mod role;

pub use context::AssemblyContext;
pub use output::ElementOutput;
pub use potential_element::{ElementFlags, PotentialElement, UpwindLink};
pub use role::{AssemblyPath, ElementRole};
