//! Error types for the host-facing surface of the renderer.
//!
//! The stage kernels themselves are error-free by design: they operate on
//! data the host has already validated. Everything that *builds* that data
//! (mesh pools, uploads, target creation) reports failures through
//! [`PhosphorError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhosphorError {
    #[error("{pool} pool overflow: capacity {capacity}, requested {requested}")]
    PoolOverflow {
        pool: &'static str,
        capacity: usize,
        requested: usize,
    },

    #[error("line index buffer holds {count} entries; expected an even count of (start, end) pairs")]
    UnpairedLineIndices { count: usize },

    #[error("index {index} is outside the mesh vertex range {offset}..{end}")]
    IndexOutOfRange { index: u32, offset: u32, end: u32 },

    #[error("unknown line mesh id {0}")]
    UnknownMesh(u32),

    #[error("render targets cannot be zero-sized ({width}x{height})")]
    ZeroSizedTarget { width: u32, height: u32 },
}
