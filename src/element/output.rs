//! Named element results.

use super::context::AssemblyContext;
use super::potential_element::{PotentialElement, UpwindLink};
use crate::assembly::{FlowState, PotentialSide};
use crate::error::{ElementError, ElementResult};
use crate::geometry::centroid;
use crate::mesh::PotentialMesh;
use crate::physics::{local_mach_number, pressure_coefficient, speed_of_sound};

/// Element results at the centroid.
///
/// Wake elements report the upper-side flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementOutput {
    pub velocity: [f64; 3],
    pub perturbation_velocity: [f64; 3],
    pub pressure_coefficient: f64,
    pub density: f64,
    pub local_mach_number: f64,
    pub speed_of_sound: f64,
    /// `None` for wake elements and elements whose upwind search has not run
    pub vector_to_upwind_element: Option<[f64; 3]>,
    pub wake: bool,
    pub kutta: bool,
    /// At least one node lies on the trailing edge
    pub trailing_edge: bool,
    pub decoupled_trailing_edge: bool,
    pub zero_velocity_condition: bool,
}

impl PotentialElement {
    /// Flow state on the side this element's role evaluates.
    pub fn flow_state(&self, ctx: &AssemblyContext<'_>) -> ElementResult<FlowState> {
        let side = PotentialSide::for_role(self.role());
        self.flow_state_on(ctx, side).map(|(_, state)| state)
    }

    /// Local velocity V∞ + ∇φ.
    pub fn velocity(&self, ctx: &AssemblyContext<'_>) -> ElementResult<[f64; 3]> {
        Ok(self.flow_state(ctx)?.velocity)
    }

    /// Perturbation velocity ∇φ.
    pub fn perturbation_velocity(&self, ctx: &AssemblyContext<'_>) -> ElementResult<[f64; 3]> {
        Ok(self.flow_state(ctx)?.perturbation)
    }

    pub fn pressure_coefficient(&self, ctx: &AssemblyContext<'_>) -> ElementResult<f64> {
        let state = self.flow_state(ctx)?;
        Ok(pressure_coefficient(ctx.conditions, state.velocity_sq))
    }

    pub fn density(&self, ctx: &AssemblyContext<'_>) -> ElementResult<f64> {
        Ok(self.flow_state(ctx)?.density)
    }

    pub fn local_mach_number(&self, ctx: &AssemblyContext<'_>) -> ElementResult<f64> {
        let state = self.flow_state(ctx)?;
        Ok(local_mach_number(ctx.conditions, state.velocity_sq))
    }

    pub fn speed_of_sound(&self, ctx: &AssemblyContext<'_>) -> ElementResult<f64> {
        let state = self.flow_state(ctx)?;
        Ok(speed_of_sound(ctx.conditions, state.velocity_sq))
    }

    /// Centroid of the upwind element minus centroid of this element.
    ///
    /// Zero for inlet elements.
    pub fn vector_to_upwind_element(&self, mesh: &PotentialMesh) -> ElementResult<[f64; 3]> {
        match self.upwind_link() {
            Some(UpwindLink::Inlet) => Ok([0.0; 3]),
            Some(UpwindLink::Element(upwind)) => {
                mesh.try_element(upwind)?;
                let here = centroid(&mesh.element_coordinates(self.id()));
                let there = centroid(&mesh.element_coordinates(upwind));
                Ok([there[0] - here[0], there[1] - here[1], there[2] - here[2]])
            }
            None => Err(ElementError::MissingUpwindElement {
                element: self.id(),
                reason: "upwind search has not run",
            }),
        }
    }

    /// Whether any node of the element lies on the trailing edge.
    pub fn is_trailing_edge_element(&self, mesh: &PotentialMesh) -> bool {
        self.nodes()
            .iter()
            .any(|&n| mesh.node(n).flags.trailing_edge)
    }

    /// All named results at once.
    pub fn output(&self, ctx: &AssemblyContext<'_>) -> ElementResult<ElementOutput> {
        let state = self.flow_state(ctx)?;
        let vector_to_upwind_element = match self.upwind_link() {
            Some(_) => Some(self.vector_to_upwind_element(ctx.mesh)?),
            None => None,
        };
        Ok(ElementOutput {
            velocity: state.velocity,
            perturbation_velocity: state.perturbation,
            pressure_coefficient: pressure_coefficient(ctx.conditions, state.velocity_sq),
            density: state.density,
            local_mach_number: local_mach_number(ctx.conditions, state.velocity_sq),
            speed_of_sound: speed_of_sound(ctx.conditions, state.velocity_sq),
            vector_to_upwind_element,
            wake: self.flags.wake,
            kutta: self.flags.kutta,
            trailing_edge: self.is_trailing_edge_element(ctx.mesh),
            decoupled_trailing_edge: self.flags.decoupled_trailing_edge,
            zero_velocity_condition: self.flags.zero_velocity_condition,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::FreeStreamConditions;
    use crate::types::{ElementIndex, NodeIndex};
    use approx::assert_relative_eq;

    #[test]
    fn test_output_of_uniform_flow() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let conditions = FreeStreamConditions::new([100.0, 0.0, 0.0]).with_mach(0.5);
        let ctx = AssemblyContext::new(&mesh, &conditions);
        let elem = mesh.element(ElementIndex::new(0));
        elem.initialize(&ctx).unwrap();

        let out = elem.output(&ctx).unwrap();
        assert_relative_eq!(out.velocity[0], 100.0, epsilon = 1e-10);
        assert_relative_eq!(out.pressure_coefficient, 0.0, epsilon = 1e-12);
        assert_relative_eq!(out.local_mach_number, 0.5, epsilon = 1e-12);
        assert_relative_eq!(out.density, 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.speed_of_sound, 200.0, epsilon = 1e-10);
        assert!(!out.wake);

        // Upwind element 1 = [v0, v2, v3]
        let v = out.vector_to_upwind_element.unwrap();
        assert_relative_eq!(v[0], -1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(v[1], 1.0 / 3.0, epsilon = 1e-14);
    }

    #[test]
    fn test_perturbation_velocity_from_linear_potential() {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        for n in NodeIndex::iter(mesh.n_nodes()) {
            let [x, y, _] = mesh.node(n).position;
            mesh.node_mut(n).potential = 0.1 * x - 0.2 * y;
        }
        let conditions = FreeStreamConditions::default();
        let ctx = AssemblyContext::new(&mesh, &conditions);
        let elem = mesh.element(ElementIndex::new(1));
        let u = elem.perturbation_velocity(&ctx).unwrap();
        assert_relative_eq!(u[0], 0.1, epsilon = 1e-14);
        assert_relative_eq!(u[1], -0.2, epsilon = 1e-14);
        let cp = elem.pressure_coefficient(&ctx).unwrap();
        assert_relative_eq!(cp, 1.0 - (1.1 * 1.1 + 0.04), epsilon = 1e-12);
    }

    #[test]
    fn test_outputs_reject_invalid_free_stream() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let elem = mesh.element(ElementIndex::new(0));
        for conditions in [
            FreeStreamConditions::new([0.0, 0.0, 0.0]),
            FreeStreamConditions::new([1.0, 0.0, 0.0]).with_density(0.0),
        ] {
            let ctx = AssemblyContext::new(&mesh, &conditions);
            assert!(matches!(
                elem.pressure_coefficient(&ctx),
                Err(ElementError::InvalidFreeStream(_))
            ));
            assert!(matches!(
                elem.output(&ctx),
                Err(ElementError::InvalidFreeStream(_))
            ));
        }
    }

    #[test]
    fn test_trailing_edge_flags_reported() {
        let mut mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        // Node 1 belongs to element 0 only
        mesh.mark_trailing_edge(NodeIndex::new(1));
        mesh.element_mut(ElementIndex::new(1)).flags.zero_velocity_condition = true;
        let conditions = FreeStreamConditions::default();
        let ctx = AssemblyContext::new(&mesh, &conditions);
        for elem in mesh.elements() {
            elem.cache_upwind(UpwindLink::Inlet);
        }

        let first = mesh.element(ElementIndex::new(0));
        assert!(first.is_trailing_edge_element(&mesh));
        let out = first.output(&ctx).unwrap();
        assert!(out.trailing_edge);
        assert!(!out.zero_velocity_condition);

        let second = mesh.element(ElementIndex::new(1));
        assert!(!second.is_trailing_edge_element(&mesh));
        let out = second.output(&ctx).unwrap();
        assert!(!out.trailing_edge);
        assert!(out.zero_velocity_condition);
        assert!(!out.decoupled_trailing_edge);
    }

    #[test]
    fn test_vector_to_upwind_requires_search() {
        let mesh = PotentialMesh::structured_triangles(0.0, 1.0, 0.0, 1.0, 1, 1);
        let elem = mesh.element(ElementIndex::new(1));
        assert!(elem.vector_to_upwind_element(&mesh).is_err());
        elem.cache_upwind(UpwindLink::Inlet);
        assert_eq!(elem.vector_to_upwind_element(&mesh).unwrap(), [0.0; 3]);
    }
}
