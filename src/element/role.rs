//! Element roles and the assembly paths they select.

/// Role of an element in the discontinuous-potential formulation.
///
/// Each role fixes the size of the local system:
/// - `Inlet`: N dofs (no upwind neighbour)
/// - `Normal`: N + 1 dofs (the extra dof is the upwind element's additional node)
/// - `Kutta`: N dofs (trailing-edge nodes use their auxiliary potential)
/// - `Wake`: 2N dofs (upper and lower copies of every node)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Inlet,
    Normal,
    Kutta,
    Wake,
}

impl ElementRole {
    /// Classify an element from its flags.
    ///
    /// Priority: Wake > Kutta > Inlet > Normal.
    ///
    /// # Example
    /// ```
    /// use potflow_rs::element::ElementRole;
    ///
    /// assert_eq!(ElementRole::classify(true, true, true), ElementRole::Wake);
    /// assert_eq!(ElementRole::classify(false, true, true), ElementRole::Kutta);
    /// assert_eq!(ElementRole::classify(false, false, true), ElementRole::Inlet);
    /// assert_eq!(ElementRole::classify(false, false, false), ElementRole::Normal);
    /// ```
    pub const fn classify(wake: bool, kutta: bool, inlet: bool) -> Self {
        if wake {
            ElementRole::Wake
        } else if kutta {
            ElementRole::Kutta
        } else if inlet {
            ElementRole::Inlet
        } else {
            ElementRole::Normal
        }
    }

    /// Number of local dofs for an element with `n_nodes` nodes.
    pub const fn n_dofs(self, n_nodes: usize) -> usize {
        match self {
            ElementRole::Inlet | ElementRole::Kutta => n_nodes,
            ElementRole::Normal => n_nodes + 1,
            ElementRole::Wake => 2 * n_nodes,
        }
    }
}

/// Local assembly path: the element role with wake elements split by the
/// embedded-wake (cut) flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssemblyPath {
    Inlet,
    Normal,
    Kutta,
    WakeUncut,
    WakeCut,
}

impl AssemblyPath {
    /// Refine a role by the cut flag.
    pub const fn new(role: ElementRole, cut: bool) -> Self {
        match role {
            ElementRole::Inlet => AssemblyPath::Inlet,
            ElementRole::Normal => AssemblyPath::Normal,
            ElementRole::Kutta => AssemblyPath::Kutta,
            ElementRole::Wake if cut => AssemblyPath::WakeCut,
            ElementRole::Wake => AssemblyPath::WakeUncut,
        }
    }

    /// Role this path belongs to.
    pub const fn role(self) -> ElementRole {
        match self {
            AssemblyPath::Inlet => ElementRole::Inlet,
            AssemblyPath::Normal => ElementRole::Normal,
            AssemblyPath::Kutta => ElementRole::Kutta,
            AssemblyPath::WakeUncut | AssemblyPath::WakeCut => ElementRole::Wake,
        }
    }
}
