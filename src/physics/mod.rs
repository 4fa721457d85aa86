//! Free-stream conditions and the compressible density law.

mod compressibility;
mod free_stream;

pub use compressibility::{
    density, density_derivative, local_mach_number, pressure_coefficient, speed_of_sound,
};
pub use free_stream::FreeStreamConditions;
