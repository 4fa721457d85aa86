//! Local matrices and residual vectors.
//!
//! All paths share one bilinear form, the linearised full-potential operator
//! evaluated with whole-element shape gradients:
//!
//! Total = vol ρ ∇N ∇Nᵀ + 2 vol ρ' (∇N·V)(∇N·V)ᵀ
//!
//! and one residual r = -vol ρ ∇N·V. Wake elements place these blocks into a
//! doubled 2N system according to the sign of the nodal wake distance.

use faer::Mat;

use super::potentials::FlowState;
use crate::geometry::{SimplexGeometry, SubVolume, WakeSide};

/// Local matrix and residual of one element.
#[derive(Clone, Debug)]
pub struct LocalSystem {
    /// Left-hand side, n_dofs × n_dofs
    pub lhs: Mat<f64>,
    /// Right-hand side, n_dofs
    pub rhs: Vec<f64>,
}

impl LocalSystem {
    /// Number of local dofs.
    #[inline]
    pub fn size(&self) -> usize {
        self.rhs.len()
    }
}

/// Bilinear form over a measure `volume`.
pub fn bilinear_block(geometry: &SimplexGeometry, state: &FlowState, volume: f64) -> Mat<f64> {
    let n = geometry.n_nodes();
    let d = geometry.dim.n_coords();
    let dnv = geometry.project_gradients(&state.velocity);

    let mut block = Mat::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let mut dot = 0.0;
            for k in 0..d {
                dot += geometry.dn_dx[(i, k)] * geometry.dn_dx[(j, k)];
            }
            block[(i, j)] = volume
                * (state.density * dot + 2.0 * state.density_derivative * dnv[i] * dnv[j]);
        }
    }
    block
}

/// Bilinear form over the whole element.
#[inline]
pub fn total_block(geometry: &SimplexGeometry, state: &FlowState) -> Mat<f64> {
    bilinear_block(geometry, state, geometry.volume)
}

/// Bilinear forms accumulated over the positive and negative sub-volumes of a
/// cut element.
pub fn sub_volume_blocks(
    geometry: &SimplexGeometry,
    state: &FlowState,
    pieces: &[SubVolume],
) -> (Mat<f64>, Mat<f64>) {
    let n = geometry.n_nodes();
    let mut positive = Mat::zeros(n, n);
    let mut negative = Mat::zeros(n, n);
    for piece in pieces {
        let block = bilinear_block(geometry, state, piece.volume);
        let target = match piece.side {
            WakeSide::Positive => &mut positive,
            WakeSide::Negative => &mut negative,
        };
        for i in 0..n {
            for j in 0..n {
                target[(i, j)] += block[(i, j)];
            }
        }
    }
    (positive, negative)
}

/// Residual -vol ρ ∇N·V.
pub fn residual(geometry: &SimplexGeometry, density: f64, velocity: &[f64; 3]) -> Vec<f64> {
    let scale = -geometry.volume * density;
    geometry
        .project_gradients(velocity)
        .into_iter()
        .map(|v| scale * v)
        .collect()
}

/// Embed an N×N block in the leading corner of a larger zero matrix.
pub fn padded(block: &Mat<f64>, size: usize) -> Mat<f64> {
    let mut m = Mat::zeros(size, size);
    for i in 0..block.nrows() {
        for j in 0..block.ncols() {
            m[(i, j)] = block[(i, j)];
        }
    }
    m
}

/// Doubled matrix of an uncut wake element.
pub fn wake_lhs(total: &Mat<f64>, distances: &[f64]) -> Mat<f64> {
    let n = total.nrows();
    let mut lhs = Mat::zeros(2 * n, 2 * n);
    for row in 0..n {
        assign_wake_row(&mut lhs, total, distances, row);
    }
    lhs
}

/// Doubled matrix of a cut wake element.
///
/// Trailing-edge rows take the sub-volume blocks on their own side with no
/// wake coupling; every other row follows the uncut rule.
pub fn cut_wake_lhs(
    total: &Mat<f64>,
    positive: &Mat<f64>,
    negative: &Mat<f64>,
    distances: &[f64],
    trailing_edge: &[bool],
) -> Mat<f64> {
    let n = total.nrows();
    let mut lhs = Mat::zeros(2 * n, 2 * n);
    for row in 0..n {
        if trailing_edge[row] {
            for col in 0..n {
                lhs[(row, col)] = positive[(row, col)];
                lhs[(row + n, col + n)] = negative[(row, col)];
            }
        } else {
            assign_wake_row(&mut lhs, total, distances, row);
        }
    }
    lhs
}

/// Fill row `row` of both diagonal blocks and its cross-coupling term.
///
/// d < 0 couples the upper equation to the lower dofs; d > 0 couples the
/// lower equation to the upper dofs; d == 0 has no cross term.
fn assign_wake_row(lhs: &mut Mat<f64>, total: &Mat<f64>, distances: &[f64], row: usize) {
    let n = total.nrows();
    for col in 0..n {
        lhs[(row, col)] = total[(row, col)];
        lhs[(row + n, col + n)] = total[(row, col)];
    }

    if distances[row] < 0.0 {
        for col in 0..n {
            lhs[(row, col + n)] = -total[(row, col)];
        }
    } else if distances[row] > 0.0 {
        for col in 0..n {
            lhs[(row + n, col)] = -total[(row, col)];
        }
    }
}

/// Side residuals of a wake element.
#[derive(Clone, Debug)]
pub struct WakeResiduals {
    /// Residual of the upper-side velocity
    pub upper: Vec<f64>,
    /// Residual of the lower-side velocity
    pub lower: Vec<f64>,
    /// Residual of the velocity difference across the wake
    pub wake: Vec<f64>,
}

impl WakeResiduals {
    /// Residuals from the upper and lower total velocities.
    pub fn new(
        geometry: &SimplexGeometry,
        density: f64,
        upper_velocity: &[f64; 3],
        lower_velocity: &[f64; 3],
    ) -> Self {
        let mut diff = [0.0; 3];
        for k in 0..3 {
            diff[k] = upper_velocity[k] - lower_velocity[k];
        }
        Self {
            upper: residual(geometry, density, upper_velocity),
            lower: residual(geometry, density, lower_velocity),
            wake: residual(geometry, density, &diff),
        }
    }
}

/// Doubled residual of an uncut wake element.
pub fn wake_rhs(residuals: &WakeResiduals, distances: &[f64]) -> Vec<f64> {
    let n = residuals.upper.len();
    let mut rhs = vec![0.0; 2 * n];
    for row in 0..n {
        assign_wake_rhs_row(&mut rhs, residuals, distances, row);
    }
    rhs
}

/// Doubled residual of a cut wake element.
///
/// Trailing-edge rows take the side residuals weighted by the side volume
/// fractions.
pub fn cut_wake_rhs(
    residuals: &WakeResiduals,
    distances: &[f64],
    trailing_edge: &[bool],
    upper_fraction: f64,
    lower_fraction: f64,
) -> Vec<f64> {
    let n = residuals.upper.len();
    let mut rhs = vec![0.0; 2 * n];
    for row in 0..n {
        if trailing_edge[row] {
            rhs[row] = residuals.upper[row] * upper_fraction;
            rhs[row + n] = residuals.lower[row] * lower_fraction;
        } else {
            assign_wake_rhs_row(&mut rhs, residuals, distances, row);
        }
    }
    rhs
}

fn assign_wake_rhs_row(rhs: &mut [f64], residuals: &WakeResiduals, distances: &[f64], row: usize) {
    let n = residuals.upper.len();
    if distances[row] > 0.0 {
        rhs[row] = residuals.upper[row];
        rhs[row + n] = residuals.wake[row];
    } else {
        rhs[row] = residuals.wake[row];
        rhs[row + n] = residuals.lower[row];
    }
}
