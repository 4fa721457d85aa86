//! Free-stream conditions shared by every element of a solve.

use crate::error::{ElementError, ElementResult};

/// Free-stream state and gas parameters.
///
/// # Example
/// ```
/// use potflow_rs::physics::FreeStreamConditions;
///
/// let conditions = FreeStreamConditions::new([170.0, 0.0, 0.0])
///     .with_mach(0.5)
///     .with_mach_limit(0.94);
/// assert!((conditions.sound_velocity - 340.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FreeStreamConditions {
    /// Free-stream velocity V∞
    pub velocity: [f64; 3],
    /// Free-stream density ρ∞
    pub density: f64,
    /// Free-stream Mach number M∞ (0 for incompressible)
    pub mach: f64,
    /// Ratio of specific heats γ
    pub heat_capacity_ratio: f64,
    /// Upper clamp for the local Mach number in the density law
    pub mach_limit: f64,
    /// Free-stream speed of sound a∞ (infinite when M∞ = 0)
    pub sound_velocity: f64,
}

impl Default for FreeStreamConditions {
    fn default() -> Self {
        Self::new([1.0, 0.0, 0.0])
    }
}

impl FreeStreamConditions {
    /// Incompressible conditions for a given free-stream velocity.
    pub fn new(velocity: [f64; 3]) -> Self {
        Self {
            velocity,
            density: 1.0,
            mach: 0.0,
            heat_capacity_ratio: 1.4,
            mach_limit: 0.94,
            sound_velocity: f64::INFINITY,
        }
    }

    /// Set the free-stream Mach number; the speed of sound follows from |V∞|.
    pub fn with_mach(mut self, mach: f64) -> Self {
        self.mach = mach;
        self.sound_velocity = if mach > 0.0 {
            self.speed() / mach
        } else {
            f64::INFINITY
        };
        self
    }

    /// Set the free-stream density.
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Set the ratio of specific heats.
    pub fn with_heat_capacity_ratio(mut self, gamma: f64) -> Self {
        self.heat_capacity_ratio = gamma;
        self
    }

    /// Set the local Mach number clamp.
    pub fn with_mach_limit(mut self, mach_limit: f64) -> Self {
        self.mach_limit = mach_limit;
        self
    }

    /// Free-stream speed |V∞|.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.velocity.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Squared free-stream speed |V∞|².
    #[inline]
    pub fn speed_squared(&self) -> f64 {
        self.velocity.iter().map(|v| v * v).sum()
    }

    /// Check that the conditions can drive an element.
    pub fn validate(&self) -> ElementResult<()> {
        if !(self.speed() > 0.0) {
            return Err(ElementError::InvalidFreeStream(
                "free-stream speed must be positive".to_string(),
            ));
        }
        if !(self.density > 0.0) {
            return Err(ElementError::InvalidFreeStream(format!(
                "density must be positive, got {}",
                self.density
            )));
        }
        if !(self.heat_capacity_ratio > 1.0) {
            return Err(ElementError::InvalidFreeStream(format!(
                "heat capacity ratio must exceed 1, got {}",
                self.heat_capacity_ratio
            )));
        }
        if self.mach < 0.0 || !(self.mach_limit > 0.0) {
            return Err(ElementError::InvalidFreeStream(format!(
                "invalid Mach settings: mach = {}, limit = {}",
                self.mach, self.mach_limit
            )));
        }
        Ok(())
    }
}
