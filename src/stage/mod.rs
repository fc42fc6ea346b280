//! Per-invocation stage kernels.
//!
//! Each submodule is the Rust mirror of one GPU stage: the same inputs, the
//! same arithmetic, one invocation per call. The GPU runs these massively
//! parallel with no shared mutable state; here an invocation is a pure
//! function and a "dispatch" is a loop, so every stage is directly testable
//! and usable headless.
//!
//! Cross-stage ordering is the caller's job, exactly as it is on the GPU:
//! extraction before widening, beam before composition, composition before
//! tonemap.

pub mod beam;
pub mod compose;
pub mod extract;
pub mod tonemap;
pub mod transform;
pub mod widen;

pub use beam::beam_fragment;
pub use compose::compose_fragment;
pub use extract::{extract_line, extract_lines};
pub use tonemap::tonemap_fragment;
pub use transform::{world_position, world_position_unrotated, RigidTransform};
pub use widen::{widen_vertex, BeamVertex};
