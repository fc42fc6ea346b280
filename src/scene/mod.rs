//! Host-side scene data: mesh pools, primitive builders and camera
//! matrices. Everything here runs on the CPU and is responsible for the
//! validation the stage kernels deliberately skip.

pub mod camera;
pub mod geometry;

pub use camera::{orthographic_matrix, perspective_matrix};
pub use geometry::{line_cap_strip, MeshBank, LINE_CAP_VERTEX_COUNT};
