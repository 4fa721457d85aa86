//! Per-element state: connectivity, flags, wake distances and the cached
//! upwind link.

use std::fmt;
use std::sync::OnceLock;

use super::role::{AssemblyPath, ElementRole};
use crate::error::{ElementError, ElementResult};
use crate::types::{ElementIndex, NodeIndex};

/// Element-level flags set by preprocessing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementFlags {
    /// Element is crossed by the wake sheet
    pub wake: bool,
    /// Element touches the trailing edge without being a wake element
    pub kutta: bool,
    /// Wake element cut by an embedded wake: integrated by sub-volumes
    pub cut: bool,
    /// Element takes part in the solve
    pub active: bool,
    /// Trailing-edge element marked as decoupled by preprocessing (reported only)
    pub decoupled_trailing_edge: bool,
    /// Zero-velocity condition marker set by preprocessing (reported only)
    pub zero_velocity_condition: bool,
}

impl Default for ElementFlags {
    fn default() -> Self {
        Self {
            wake: false,
            kutta: false,
            cut: false,
            active: true,
            decoupled_trailing_edge: false,
            zero_velocity_condition: false,
        }
    }
}

/// Resolved upwind neighbour of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpwindLink {
    /// Upstream neighbour sharing the upwind facet
    Element(ElementIndex),
    /// No upstream neighbour: the element sits on the inflow boundary
    Inlet,
}

/// A linear simplex element of the potential flow mesh.
///
/// The element does not own its nodes or its upwind neighbour; both are
/// indices into the [`PotentialMesh`](crate::mesh::PotentialMesh) store.
#[derive(Clone, Debug)]
pub struct PotentialElement {
    id: ElementIndex,
    nodes: Vec<NodeIndex>,
    /// Element-level flags
    pub flags: ElementFlags,
    wake_distances: Vec<f64>,
    upwind: OnceLock<UpwindLink>,
}

impl PotentialElement {
    /// Create an element with default flags and an unresolved upwind link.
    pub fn new(id: ElementIndex, nodes: Vec<NodeIndex>) -> Self {
        Self {
            id,
            nodes,
            flags: ElementFlags::default(),
            wake_distances: Vec::new(),
            upwind: OnceLock::new(),
        }
    }

    /// Copy of this element on new nodes.
    ///
    /// Flags and wake distances are kept, the upwind link is not.
    pub fn with_nodes(&self, id: ElementIndex, nodes: Vec<NodeIndex>) -> Self {
        Self {
            id,
            nodes,
            flags: self.flags,
            wake_distances: self.wake_distances.clone(),
            upwind: OnceLock::new(),
        }
    }

    /// Index of this element in the element store.
    #[inline]
    pub fn id(&self) -> ElementIndex {
        self.id
    }

    /// Global node indices, in local order.
    #[inline]
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Signed wake distances, one per node (empty for non-wake elements).
    #[inline]
    pub fn wake_distances(&self) -> &[f64] {
        &self.wake_distances
    }

    /// Set the signed wake distances.
    ///
    /// Rejects arrays of the wrong length and non-finite values; the element
    /// is left unchanged on error.
    pub fn set_wake_distances(&mut self, distances: Vec<f64>) -> ElementResult<()> {
        if distances.len() != self.nodes.len() {
            return Err(ElementError::DistanceCount {
                element: self.id,
                expected: self.nodes.len(),
                actual: distances.len(),
            });
        }
        if let Some(local) = distances.iter().position(|d| !d.is_finite()) {
            return Err(ElementError::NonFiniteDistance {
                element: self.id,
                local,
                value: distances[local],
            });
        }
        self.wake_distances = distances;
        Ok(())
    }

    /// Wake distances checked against the node count.
    pub(crate) fn checked_wake_distances(&self) -> ElementResult<&[f64]> {
        if self.wake_distances.len() != self.nodes.len() {
            return Err(ElementError::DistanceCount {
                element: self.id,
                expected: self.nodes.len(),
                actual: self.wake_distances.len(),
            });
        }
        Ok(&self.wake_distances)
    }

    /// Cached upwind link, `None` while unresolved.
    #[inline]
    pub fn upwind_link(&self) -> Option<UpwindLink> {
        self.upwind.get().copied()
    }

    /// Whether the upwind search found no upstream neighbour.
    #[inline]
    pub fn is_inlet(&self) -> bool {
        matches!(self.upwind_link(), Some(UpwindLink::Inlet))
    }

    /// Upwind neighbour index.
    ///
    /// Fails for unresolved and inlet elements.
    pub fn upwind_element(&self) -> ElementResult<ElementIndex> {
        match self.upwind_link() {
            Some(UpwindLink::Element(upwind)) => Ok(upwind),
            Some(UpwindLink::Inlet) => Err(ElementError::MissingUpwindElement {
                element: self.id,
                reason: "inlet element",
            }),
            None => Err(ElementError::MissingUpwindElement {
                element: self.id,
                reason: "upwind search has not run",
            }),
        }
    }

    /// Store the upwind link once.
    ///
    /// Concurrent initialisers compute the same link from the same immutable
    /// inputs; the first stored value is kept and returned.
    pub(crate) fn cache_upwind(&self, link: UpwindLink) -> UpwindLink {
        match self.upwind.set(link) {
            Ok(()) => link,
            Err(_) => self.upwind.get().copied().unwrap_or(link),
        }
    }

    /// Role selected by the element flags and the upwind link.
    pub fn role(&self) -> ElementRole {
        ElementRole::classify(self.flags.wake, self.flags.kutta, self.is_inlet())
    }

    /// Assembly path: role refined by the cut flag.
    pub fn assembly_path(&self) -> AssemblyPath {
        AssemblyPath::new(self.role(), self.flags.cut)
    }
}

impl fmt::Display for PotentialElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PotentialElement {} ({:?}", self.id, self.assembly_path())?;
        match self.upwind_link() {
            Some(UpwindLink::Element(upwind)) => write!(f, ", upwind {upwind}")?,
            Some(UpwindLink::Inlet) => write!(f, ", inlet")?,
            None => {}
        }
        write!(f, ", nodes [")?;
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, "])")
    }
}
