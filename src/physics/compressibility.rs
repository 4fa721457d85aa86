//! Isentropic compressibility relations for the full-potential density law.
//!
//! All relations are written in terms of the local squared speed |V|² and the
//! free-stream state, following Drela, *Flight Vehicle Aerodynamics* (2014):
//!
//! a² = a∞² [1 + (γ-1)/2 M∞² (1 - |V|²/|V∞|²)]
//! ρ  = ρ∞ [(1 + (γ-1)/2 M∞²) / (1 + (γ-1)/2 M²)]^{1/(γ-1)}
//! dρ/d|V|² = -ρ∞^{γ-1} ρ^{2-γ} / (2 a∞²)

use tracing::warn;

use super::free_stream::FreeStreamConditions;

/// Density used when the isentropic base turns non-positive, relative to ρ∞.
const DENSITY_CORRECTION: f64 = 1e-5;

/// Local speed of sound.
///
/// Infinite in the incompressible limit (M∞ = 0). Returns zero when the
/// isentropic bracket turns non-positive (vacuum limit exceeded).
pub fn speed_of_sound(conditions: &FreeStreamConditions, velocity_sq: f64) -> f64 {
    if conditions.sound_velocity.is_infinite() {
        return f64::INFINITY;
    }
    let gamma = conditions.heat_capacity_ratio;
    let m_inf_sq = conditions.mach * conditions.mach;
    let base =
        1.0 + 0.5 * (gamma - 1.0) * m_inf_sq * (1.0 - velocity_sq / conditions.speed_squared());
    if base <= 0.0 {
        warn!(velocity_sq, "local speed of sound beyond vacuum limit, using zero");
        return 0.0;
    }
    conditions.sound_velocity * base.sqrt()
}

/// Local Mach number |V| / a.
pub fn local_mach_number(conditions: &FreeStreamConditions, velocity_sq: f64) -> f64 {
    let a = speed_of_sound(conditions, velocity_sq);
    if a.is_infinite() {
        return 0.0;
    }
    if a == 0.0 {
        return f64::INFINITY;
    }
    velocity_sq.sqrt() / a
}

/// Local density with the local Mach number clamped to `mach_limit`.
pub fn density(conditions: &FreeStreamConditions, velocity_sq: f64) -> f64 {
    let gamma = conditions.heat_capacity_ratio;
    let mut mach = local_mach_number(conditions, velocity_sq);
    if mach > conditions.mach_limit {
        warn!(
            mach,
            limit = conditions.mach_limit,
            "clamping the local Mach number"
        );
        mach = conditions.mach_limit;
    }

    let numerator = 1.0 + 0.5 * (gamma - 1.0) * conditions.mach * conditions.mach;
    let denominator = 1.0 + 0.5 * (gamma - 1.0) * mach * mach;
    let base = numerator / denominator;

    if base > 0.0 {
        conditions.density * base.powf(1.0 / (gamma - 1.0))
    } else {
        warn!(base, "using density correction");
        conditions.density * DENSITY_CORRECTION
    }
}

/// Derivative of the density with respect to the squared local speed.
///
/// Zero in the incompressible limit.
pub fn density_derivative(conditions: &FreeStreamConditions, density: f64) -> f64 {
    let gamma = conditions.heat_capacity_ratio;
    let a_inf = conditions.sound_velocity;
    if a_inf.is_infinite() {
        return 0.0;
    }
    -conditions.density.powf(gamma - 1.0) * density.powf(2.0 - gamma) / (2.0 * a_inf * a_inf)
}

/// Pressure coefficient.
///
/// Isentropic compressible form for M∞ > 0, Bernoulli form 1 - |V|²/|V∞|²
/// otherwise.
pub fn pressure_coefficient(conditions: &FreeStreamConditions, velocity_sq: f64) -> f64 {
    let ratio = velocity_sq / conditions.speed_squared();
    if conditions.mach <= 0.0 {
        return 1.0 - ratio;
    }
    let gamma = conditions.heat_capacity_ratio;
    let m_inf_sq = conditions.mach * conditions.mach;
    let base = (1.0 + 0.5 * (gamma - 1.0) * m_inf_sq * (1.0 - ratio)).max(0.0);
    2.0 / (gamma * m_inf_sq) * (base.powf(gamma / (gamma - 1.0)) - 1.0)
}
