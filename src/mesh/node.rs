//! Mesh nodes and their nodal data.

/// Node-level flags set by preprocessing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeFlags {
    /// Node lies on the sharp trailing edge
    pub trailing_edge: bool,
    /// Node belongs to a wake element and carries an auxiliary potential
    pub on_wake_side: bool,
}

/// A mesh node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Coordinates (z ignored in 2D)
    pub position: [f64; 3],
    /// Primary (perturbation) velocity potential
    pub potential: f64,
    /// Auxiliary potential: the value on the opposite side of the wake.
    /// Present only for wake-side and trailing-edge nodes.
    pub auxiliary_potential: Option<f64>,
    /// Node flags
    pub flags: NodeFlags,
    /// Scaled potential jump across the wake, written after each solve step
    pub potential_jump: Option<f64>,
}

impl Node {
    /// Node at rest (zero potential, no auxiliary data).
    pub fn new(position: [f64; 3]) -> Self {
        Self {
            position,
            potential: 0.0,
            auxiliary_potential: None,
            flags: NodeFlags::default(),
            potential_jump: None,
        }
    }

    /// Whether the node needs an auxiliary potential dof.
    #[inline]
    pub fn needs_auxiliary(&self) -> bool {
        self.flags.on_wake_side || self.flags.trailing_edge
    }

    /// Give the node an auxiliary potential, starting from the primary value.
    pub(crate) fn ensure_auxiliary(&mut self) {
        if self.auxiliary_potential.is_none() {
            self.auxiliary_potential = Some(self.potential);
        }
    }
}
