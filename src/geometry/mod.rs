//! Element geometry collaborators.
//!
//! - [`SimplexGeometry`]: shape functions, gradients and measure of a linear simplex
//! - [`WakeSplitter`]: subdivision of a wake-cut element into signed sub-volumes

mod simplex;
mod splitter;

pub use simplex::{centroid, GeometryError, SimplexGeometry};
pub use splitter::{side_volumes, LevelSetSplitter, SubVolume, WakeSide, WakeSplitter};
