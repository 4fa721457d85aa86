//! Equation-id numbering of nodal dofs.

use super::{Dof, DofKind};
use crate::error::{ElementError, ElementResult};
use crate::mesh::PotentialMesh;
use crate::types::{EquationId, NodeIndex};

/// Maps nodal dofs to global equation ids.
///
/// Ids are dense and stable for the lifetime of the registry.
#[derive(Clone, Debug, Default)]
pub struct DofRegistry {
    primary: Vec<Option<EquationId>>,
    auxiliary: Vec<Option<EquationId>>,
    dofs: Vec<Dof>,
}

impl DofRegistry {
    /// Empty registry for `n_nodes` nodes.
    pub fn new(n_nodes: usize) -> Self {
        Self {
            primary: vec![None; n_nodes],
            auxiliary: vec![None; n_nodes],
            dofs: Vec::new(),
        }
    }

    /// Number every dof of a mesh.
    ///
    /// Primary potentials come first in node order, followed by the auxiliary
    /// potentials of the nodes that carry one.
    pub fn from_mesh(mesh: &PotentialMesh) -> Self {
        let mut registry = Self::new(mesh.n_nodes());
        for node in NodeIndex::iter(mesh.n_nodes()) {
            registry.register(Dof::primary(node));
        }
        for node in NodeIndex::iter(mesh.n_nodes()) {
            if mesh.node(node).needs_auxiliary() {
                registry.register(Dof::auxiliary(node));
            }
        }
        registry
    }

    /// Register a dof, returning its equation id.
    ///
    /// Registering the same dof twice returns the existing id.
    pub fn register(&mut self, dof: Dof) -> EquationId {
        let idx = dof.node.get();
        if idx >= self.primary.len() {
            self.primary.resize(idx + 1, None);
            self.auxiliary.resize(idx + 1, None);
        }
        let slot = match dof.kind {
            DofKind::Potential => &mut self.primary[idx],
            DofKind::AuxiliaryPotential => &mut self.auxiliary[idx],
        };
        if let Some(id) = *slot {
            return id;
        }
        let id = EquationId::new(self.dofs.len());
        *slot = Some(id);
        self.dofs.push(dof);
        id
    }

    /// Equation id of a dof.
    pub fn equation_id(&self, dof: Dof) -> ElementResult<EquationId> {
        let table = match dof.kind {
            DofKind::Potential => &self.primary,
            DofKind::AuxiliaryPotential => &self.auxiliary,
        };
        table
            .get(dof.node.get())
            .copied()
            .flatten()
            .ok_or(ElementError::MissingNodalData {
                node: dof.node,
                field: match dof.kind {
                    DofKind::Potential => "potential dof",
                    DofKind::AuxiliaryPotential => "auxiliary potential dof",
                },
            })
    }

    /// Dof numbered by an equation id.
    #[inline]
    pub fn dof(&self, id: EquationId) -> Option<Dof> {
        self.dofs.get(id.get()).copied()
    }

    /// Total number of equations.
    #[inline]
    pub fn n_equations(&self) -> usize {
        self.dofs.len()
    }

    /// All dofs in equation order.
    #[inline]
    pub fn dofs(&self) -> &[Dof] {
        &self.dofs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementIndex;

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = DofRegistry::new(2);
        let a = registry.register(Dof::primary(NodeIndex::new(1)));
        let b = registry.register(Dof::primary(NodeIndex::new(1)));
        assert_eq!(a, b);
        assert_eq!(registry.n_equations(), 1);
        assert_eq!(registry.dof(a), Some(Dof::primary(NodeIndex::new(1))));
    }

    #[test]
    fn test_missing_auxiliary_is_reported() {
        let registry = DofRegistry::new(3);
        let err = registry
            .equation_id(Dof::auxiliary(NodeIndex::new(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            ElementError::MissingNodalData {
                field: "auxiliary potential dof",
                ..
            }
        ));
    }

    #[test]
    fn test_from_mesh_numbers_auxiliaries_last() {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        mesh.mark_wake_element(ElementIndex::new(0), vec![1.0, -1.0, 1.0])
            .unwrap();
        let registry = DofRegistry::from_mesh(&mesh);

        // 4 primaries, auxiliaries on nodes 0, 1, 2
        assert_eq!(registry.n_equations(), 7);
        for n in 0..4 {
            let id = registry.equation_id(Dof::primary(NodeIndex::new(n))).unwrap();
            assert_eq!(id.get(), n);
        }
        let aux = registry
            .equation_id(Dof::auxiliary(NodeIndex::new(2)))
            .unwrap();
        assert_eq!(aux.get(), 6);
        assert!(registry
            .equation_id(Dof::auxiliary(NodeIndex::new(3)))
            .is_err());
    }
}
