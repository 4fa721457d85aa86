//! Element contract: initialise, local system, dof lists, finalise, check.
//!
//! Every operation dispatches on the element's [`AssemblyPath`]:
//!
//! | Path       | LHS      | RHS | Dofs  |
//! |------------|----------|-----|-------|
//! | Inlet      | N × N    | N   | N     |
//! | Normal     | N+1      | N+1 | N + 1 |
//! | Kutta      | N × N    | N   | N     |
//! | WakeUncut  | 2N × 2N  | 2N  | 2N    |
//! | WakeCut    | 2N × 2N  | 2N  | 2N    |

use faer::Mat;
use tracing::trace;

use super::context::AssemblyContext;
use super::potential_element::{PotentialElement, UpwindLink};
use super::role::AssemblyPath;
use crate::assembly::{
    cut_wake_lhs, cut_wake_rhs, element_dofs, element_potentials, padded, residual,
    sub_volume_blocks, total_block, total_velocity, wake_lhs, wake_rhs, FlowState, LocalSystem,
    PotentialSide, WakeResiduals,
};
use crate::dofs::{Dof, DofRegistry};
use crate::error::{ElementError, ElementResult};
use crate::geometry::{side_volumes, GeometryError, SimplexGeometry, SubVolume};
use crate::mesh::PotentialMesh;
use crate::physics::FreeStreamConditions;
use crate::postprocess::{potential_jump_contributions, JumpContribution};
use crate::types::EquationId;
use crate::upwind::additional_node;

impl PotentialElement {
    /// Resolve and cache the upwind link.
    ///
    /// Wake elements have no upwind link and return `None`. Invalid
    /// free-stream conditions fail before anything is cached.
    pub fn initialize(&self, ctx: &AssemblyContext<'_>) -> ElementResult<Option<UpwindLink>> {
        ctx.conditions.validate()?;
        if self.flags.wake {
            return Ok(None);
        }
        let geometry = ctx.mesh.element_geometry(self.id())?;
        let link = ctx
            .locator
            .resolve(self, &geometry, &ctx.conditions.velocity, ctx.mesh);
        Ok(Some(link))
    }

    /// Local matrix and residual.
    pub fn calculate_local_system(&self, ctx: &AssemblyContext<'_>) -> ElementResult<LocalSystem> {
        let rhs = self.calculate_right_hand_side(ctx)?;
        let lhs = self.calculate_left_hand_side(ctx)?;
        Ok(LocalSystem { lhs, rhs })
    }

    /// Local matrix.
    pub fn calculate_left_hand_side(&self, ctx: &AssemblyContext<'_>) -> ElementResult<Mat<f64>> {
        let path = self.assembly_path();
        let (geometry, state) = self.flow_state_on(ctx, PotentialSide::for_role(path.role()))?;
        let total = total_block(&geometry, &state);

        match path {
            AssemblyPath::Inlet | AssemblyPath::Kutta => Ok(total),
            AssemblyPath::Normal => {
                additional_node(self, ctx.mesh)?;
                Ok(padded(&total, self.n_nodes() + 1))
            }
            AssemblyPath::WakeUncut => Ok(wake_lhs(&total, self.checked_wake_distances()?)),
            AssemblyPath::WakeCut => {
                let distances = self.checked_wake_distances()?;
                let pieces = self.split(ctx, distances)?;
                let (positive, negative) = sub_volume_blocks(&geometry, &state, &pieces);
                let te = self.trailing_edge_mask(ctx.mesh);
                Ok(cut_wake_lhs(&total, &positive, &negative, distances, &te))
            }
        }
    }

    /// Local residual.
    pub fn calculate_right_hand_side(&self, ctx: &AssemblyContext<'_>) -> ElementResult<Vec<f64>> {
        let path = self.assembly_path();
        let (geometry, state) = self.flow_state_on(ctx, PotentialSide::for_role(path.role()))?;

        match path {
            AssemblyPath::Inlet | AssemblyPath::Kutta => {
                Ok(residual(&geometry, state.density, &state.velocity))
            }
            AssemblyPath::Normal => {
                additional_node(self, ctx.mesh)?;
                let mut rhs = residual(&geometry, state.density, &state.velocity);
                rhs.push(0.0);
                Ok(rhs)
            }
            AssemblyPath::WakeUncut | AssemblyPath::WakeCut => {
                let distances = self.checked_wake_distances()?;
                let lower = element_potentials(ctx.mesh, self, PotentialSide::Lower)?;
                let lower_velocity =
                    total_velocity(ctx.conditions, &geometry, &geometry.gradient(&lower));
                let residuals =
                    WakeResiduals::new(&geometry, state.density, &state.velocity, &lower_velocity);

                if path == AssemblyPath::WakeUncut {
                    return Ok(wake_rhs(&residuals, distances));
                }
                let pieces = self.split(ctx, distances)?;
                let (upper_volume, lower_volume) = side_volumes(&pieces);
                let te = self.trailing_edge_mask(ctx.mesh);
                Ok(cut_wake_rhs(
                    &residuals,
                    distances,
                    &te,
                    upper_volume / geometry.volume,
                    lower_volume / geometry.volume,
                ))
            }
        }
    }

    /// Dofs of the local system, in local order.
    pub fn dof_list(&self, mesh: &PotentialMesh) -> ElementResult<Vec<Dof>> {
        element_dofs(mesh, self)
    }

    /// Global equation ids of the local system, in local order.
    pub fn equation_ids(
        &self,
        mesh: &PotentialMesh,
        registry: &DofRegistry,
    ) -> ElementResult<Vec<EquationId>> {
        self.dof_list(mesh)?
            .into_iter()
            .map(|dof| registry.equation_id(dof))
            .collect()
    }

    /// Potential jump contributions after a solve step.
    pub fn finalize_solution_step(
        &self,
        mesh: &PotentialMesh,
        conditions: &FreeStreamConditions,
    ) -> ElementResult<Vec<JumpContribution>> {
        potential_jump_contributions(mesh, self, conditions)
    }

    /// Validate connectivity, orientation and required nodal data.
    pub fn check(&self, mesh: &PotentialMesh) -> ElementResult<()> {
        let expected = mesh.dim().n_nodes();
        if self.n_nodes() != expected {
            return Err(ElementError::NodeCount {
                element: self.id(),
                expected,
                actual: self.n_nodes(),
            });
        }
        if let Some(&node) = self.nodes().iter().find(|n| n.get() >= mesh.n_nodes()) {
            return Err(ElementError::UnknownNode {
                node,
                len: mesh.n_nodes(),
            });
        }

        let coordinates: Vec<[f64; 3]> =
            self.nodes().iter().map(|&n| mesh.node(n).position).collect();
        let geometry = SimplexGeometry::compute(&coordinates)
            .map_err(|source| ElementError::geometry(self.id(), source))?;
        if geometry.signed_volume <= 0.0 {
            return Err(ElementError::geometry(
                self.id(),
                GeometryError::Inverted {
                    measure: geometry.signed_volume,
                },
            ));
        }

        if self.flags.wake {
            self.checked_wake_distances()?;
            for &node in self.nodes() {
                mesh.auxiliary_potential(node)?;
            }
        } else if self.flags.kutta {
            for &node in self.nodes() {
                if mesh.node(node).flags.trailing_edge {
                    mesh.auxiliary_potential(node)?;
                }
            }
        }
        Ok(())
    }

    /// Geometry and flow state evaluated on one side of the wake.
    pub(crate) fn flow_state_on(
        &self,
        ctx: &AssemblyContext<'_>,
        side: PotentialSide,
    ) -> ElementResult<(SimplexGeometry, FlowState)> {
        ctx.conditions.validate()?;
        let geometry = ctx.mesh.element_geometry(self.id())?;
        let potentials = element_potentials(ctx.mesh, self, side)?;
        let state = FlowState::evaluate(ctx.conditions, &geometry, &potentials);
        Ok((geometry, state))
    }

    fn split(&self, ctx: &AssemblyContext<'_>, distances: &[f64]) -> ElementResult<Vec<SubVolume>> {
        let pieces = ctx
            .splitter
            .split(&ctx.mesh.element_coordinates(self.id()), distances)
            .map_err(|source| ElementError::geometry(self.id(), source))?;
        trace!(element = %self.id(), pieces = pieces.len(), "split cut wake element");
        Ok(pieces)
    }

    fn trailing_edge_mask(&self, mesh: &PotentialMesh) -> Vec<bool> {
        self.nodes()
            .iter()
            .map(|&n| mesh.node(n).flags.trailing_edge)
            .collect()
    }
}
