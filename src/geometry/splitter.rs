//! Level-set subdivision of wake-cut simplices.
//!
//! A linear level set φ (the wake distance, given at the nodes) cuts a simplex
//! into a positive and a negative region. Each region is returned as a set of
//! sub-simplices tagged with the side they belong to:
//!
//! - Triangle, one isolated node: corner triangle + quadrilateral (2 triangles)
//! - Tetrahedron, one isolated node: corner tetrahedron + prism (3 tetrahedra)
//! - Tetrahedron, two nodes per side: two prisms (3 tetrahedra each)
//!
//! A node with φ == 0 is treated as negative, consistent with the dof rule.

use super::simplex::GeometryError;
use crate::types::Dimension;

/// Side of the wake sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WakeSide {
    /// Upper side, φ > 0
    Positive,
    /// Lower side, φ ≤ 0
    Negative,
}

impl WakeSide {
    /// Side selected by a signed distance.
    #[inline]
    pub fn of(distance: f64) -> Self {
        if distance > 0.0 {
            WakeSide::Positive
        } else {
            WakeSide::Negative
        }
    }
}

/// One signed sub-simplex of a cut element.
#[derive(Clone, Debug, PartialEq)]
pub struct SubVolume {
    /// Unsigned measure of the sub-simplex
    pub volume: f64,
    /// Side of the wake the sub-simplex lies on
    pub side: WakeSide,
}

/// Subdivides a wake-cut element into signed sub-volumes.
pub trait WakeSplitter: Send + Sync {
    /// Split a simplex given its node coordinates and nodal signed distances.
    fn split(
        &self,
        coordinates: &[[f64; 3]],
        distances: &[f64],
    ) -> Result<Vec<SubVolume>, GeometryError>;
}

/// Total measure of the positive and negative sub-volumes.
pub fn side_volumes(pieces: &[SubVolume]) -> (f64, f64) {
    pieces
        .iter()
        .fold((0.0, 0.0), |(pos, neg), piece| match piece.side {
            WakeSide::Positive => (pos + piece.volume, neg),
            WakeSide::Negative => (pos, neg + piece.volume),
        })
}

/// Exact splitter for a linear level set on triangles and tetrahedra.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelSetSplitter;

impl WakeSplitter for LevelSetSplitter {
    fn split(
        &self,
        coordinates: &[[f64; 3]],
        distances: &[f64],
    ) -> Result<Vec<SubVolume>, GeometryError> {
        let dim = Dimension::from_node_count(coordinates.len())
            .ok_or(GeometryError::UnsupportedNodeCount(coordinates.len()))?;
        if distances.len() != coordinates.len() {
            return Err(GeometryError::UnsupportedNodeCount(distances.len()));
        }

        if let Some(local) = distances.iter().position(|d| !d.is_finite()) {
            return Err(GeometryError::NonFiniteLevelSet {
                local,
                value: distances[local],
            });
        }

        // Every node lands on exactly one side
        let (positive, negative): (Vec<usize>, Vec<usize>) =
            (0..distances.len()).partition(|&i| distances[i] > 0.0);

        let whole = match dim {
            Dimension::Two => triangle_area(coordinates[0], coordinates[1], coordinates[2]),
            Dimension::Three => tetrahedron_volume(
                coordinates[0],
                coordinates[1],
                coordinates[2],
                coordinates[3],
            ),
        };

        if positive.is_empty() || negative.is_empty() {
            return Ok(vec![SubVolume {
                volume: whole,
                side: WakeSide::of(distances[0]),
            }]);
        }

        let cut = |a: usize, b: usize| -> [f64; 3] {
            let t = distances[a] / (distances[a] - distances[b]);
            let (pa, pb) = (coordinates[a], coordinates[b]);
            [
                pa[0] + t * (pb[0] - pa[0]),
                pa[1] + t * (pb[1] - pa[1]),
                pa[2] + t * (pb[2] - pa[2]),
            ]
        };

        let pieces = match dim {
            Dimension::Two => {
                let (lone, pair, lone_side) = if positive.len() == 1 {
                    (positive[0], [negative[0], negative[1]], WakeSide::Positive)
                } else {
                    (negative[0], [positive[0], positive[1]], WakeSide::Negative)
                };
                let other_side = opposite(lone_side);
                let p0 = cut(lone, pair[0]);
                let p1 = cut(lone, pair[1]);
                let (b, c) = (coordinates[pair[0]], coordinates[pair[1]]);
                vec![
                    SubVolume {
                        volume: triangle_area(coordinates[lone], p0, p1),
                        side: lone_side,
                    },
                    SubVolume {
                        volume: triangle_area(p0, b, c),
                        side: other_side,
                    },
                    SubVolume {
                        volume: triangle_area(p0, c, p1),
                        side: other_side,
                    },
                ]
            }
            Dimension::Three if positive.len() == 2 => {
                let (a, b) = (positive[0], positive[1]);
                let (c, d) = (negative[0], negative[1]);
                let (p_ac, p_ad, p_bc, p_bd) = (cut(a, c), cut(a, d), cut(b, c), cut(b, d));
                let mut pieces = prism(
                    [coordinates[a], p_ac, p_ad],
                    [coordinates[b], p_bc, p_bd],
                    WakeSide::Positive,
                );
                pieces.extend(prism(
                    [coordinates[c], p_ac, p_bc],
                    [coordinates[d], p_ad, p_bd],
                    WakeSide::Negative,
                ));
                pieces
            }
            Dimension::Three => {
                let (lone, rest, lone_side) = if positive.len() == 1 {
                    (
                        positive[0],
                        [negative[0], negative[1], negative[2]],
                        WakeSide::Positive,
                    )
                } else {
                    (
                        negative[0],
                        [positive[0], positive[1], positive[2]],
                        WakeSide::Negative,
                    )
                };
                let cuts = rest.map(|r| cut(lone, r));
                let mut pieces = vec![SubVolume {
                    volume: tetrahedron_volume(coordinates[lone], cuts[0], cuts[1], cuts[2]),
                    side: lone_side,
                }];
                pieces.extend(prism(
                    cuts,
                    rest.map(|r| coordinates[r]),
                    opposite(lone_side),
                ));
                pieces
            }
        };

        tracing::trace!(n_pieces = pieces.len(), whole, "split wake-cut element");
        Ok(pieces)
    }
}

fn opposite(side: WakeSide) -> WakeSide {
    match side {
        WakeSide::Positive => WakeSide::Negative,
        WakeSide::Negative => WakeSide::Positive,
    }
}

/// Split a triangular prism (bottom[i] joined to top[i]) into three tetrahedra.
fn prism(bottom: [[f64; 3]; 3], top: [[f64; 3]; 3], side: WakeSide) -> Vec<SubVolume> {
    [
        tetrahedron_volume(bottom[0], bottom[1], bottom[2], top[0]),
        tetrahedron_volume(bottom[1], bottom[2], top[0], top[1]),
        tetrahedron_volume(bottom[2], top[0], top[1], top[2]),
    ]
    .into_iter()
    .map(|volume| SubVolume { volume, side })
    .collect()
}

fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    0.5 * ((b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])).abs()
}

fn tetrahedron_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let w = [d[0] - a[0], d[1] - a[1], d[2] - a[2]];
    let det = u[0] * (v[1] * w[2] - v[2] * w[1]) - u[1] * (v[0] * w[2] - v[2] * w[0])
        + u[2] * (v[0] * w[1] - v[1] * w[0]);
    det.abs() / 6.0
}
