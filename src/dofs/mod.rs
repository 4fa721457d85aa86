//! Degrees of freedom and the equation-id registry.
//!
//! Every node carries a primary potential dof. Wake-side and trailing-edge
//! nodes carry a second, auxiliary potential dof holding the value on the
//! other side of the wake.

mod registry;

pub use registry::DofRegistry;

use crate::types::NodeIndex;

/// Nodal variable a dof refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DofKind {
    /// Velocity potential
    Potential,
    /// Auxiliary velocity potential (other side of the wake)
    AuxiliaryPotential,
}

/// One nodal degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Dof {
    pub node: NodeIndex,
    pub kind: DofKind,
}

impl Dof {
    /// Primary potential dof of a node.
    #[inline]
    pub const fn primary(node: NodeIndex) -> Self {
        Self {
            node,
            kind: DofKind::Potential,
        }
    }

    /// Auxiliary potential dof of a node.
    #[inline]
    pub const fn auxiliary(node: NodeIndex) -> Self {
        Self {
            node,
            kind: DofKind::AuxiliaryPotential,
        }
    }

    /// Primary dof if `primary` holds, auxiliary otherwise.
    #[inline]
    pub const fn select(node: NodeIndex, primary: bool) -> Self {
        if primary {
            Self::primary(node)
        } else {
            Self::auxiliary(node)
        }
    }

    #[inline]
    pub fn is_auxiliary(&self) -> bool {
        self.kind == DofKind::AuxiliaryPotential
    }
}
