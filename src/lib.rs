//! Phosphor Engine - a CRT-style vector display renderer
//!
//! This crate renders emissive line and triangle geometry the way a vector
//! monitor would: thin 3D segments are widened to a constant pixel width in
//! screen space, rasterized into an HDR "beam" buffer, accumulated into a
//! persistent buffer that decays over time like phosphor afterglow, and
//! finally tonemapped so over-bright strokes bloom toward white instead of
//! clipping.
//!
//! # Architecture
//! - [`math`] - quaternion and projection utilities shared by every stage
//! - [`types`] - GPU buffer records with fixed `#[repr(C)]` layouts
//! - [`stage`] - the per-invocation stage kernels in Rust, mirroring the
//!   WGSL stage-for-stage; used by the test suite and for headless work
//! - [`scene`] - host-side mesh pools, primitive builders and cameras
//! - [`pipeline`] - the wgpu pipeline: extraction compute pass, beam pass,
//!   persistence compositor and tonemap pass
//!
//! The library is headless: it renders into caller-supplied texture views
//! and never touches windowing or presentation. See `demos/oscilloscope.rs`
//! for a windowed frame loop.

pub mod error;
pub mod math;
pub mod pipeline;
pub mod scene;
pub mod stage;
pub mod types;

pub use error::PhosphorError;
pub use pipeline::PhosphorRenderer;
pub use scene::MeshBank;
pub use types::{MeshVertex, Uniforms};

/// Per-channel ceiling applied to the persistent buffer before the beam
/// maximum is folded in. High enough that bright strokes survive until the
/// tonemap stage, bounded so the accumulator cannot grow without limit.
pub const DECAY_CEILING: f32 = 8.0;

/// How overlapping beam strokes combine in the beam target within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeamBlend {
    /// Strokes sum; crossings glow brighter. The classic oscilloscope look.
    #[default]
    Additive,
    /// Strokes take the per-channel maximum; crossings do not over-brighten.
    Max,
}

/// Which beam-line path draws the frame's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineVariant {
    /// Per-segment instance records resolve mesh and placement through the
    /// pool indirection in the vertex stage. Full rigid transforms.
    Instanced,
    /// A compute pre-pass denormalizes segment endpoints; the draw then
    /// reads them by instance index. One shared translate-and-scale per
    /// frame, no per-instance rotation.
    #[default]
    Extracted,
}

/// Pool capacities used to size the GPU-side storage buffers.
#[derive(Debug, Clone, Copy)]
pub struct PoolLimits {
    pub max_mesh_vertices: usize,
    pub max_triangle_indices: usize,
    pub max_triangle_mesh_instances: usize,
    pub max_line_indices: usize,
    pub max_line_meshes: usize,
    pub max_line_mesh_instances: usize,
    pub max_line_instances: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_mesh_vertices: 10000,
            max_triangle_indices: 10000,
            max_triangle_mesh_instances: 256,
            max_line_indices: 20000,
            max_line_meshes: 100,
            max_line_mesh_instances: 200,
            max_line_instances: 10000,
        }
    }
}

/// Configuration for [`PhosphorRenderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial render target width in pixels
    pub width: u32,
    /// Initial render target height in pixels
    pub height: u32,
    /// Format of the final output target (usually the surface format)
    pub output_format: wgpu::TextureFormat,
    /// Blend policy for overlapping beam strokes
    pub beam_blend: BeamBlend,
    /// Which beam-line path draws segments
    pub line_variant: LineVariant,
    /// Decay rate written to beam pixels no stroke touches. Strongly
    /// negative so untouched pixels go dark within a frame or two.
    pub clear_decay_rate: f64,
    /// Storage pool capacities
    pub limits: PoolLimits,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            output_format: wgpu::TextureFormat::Bgra8UnormSrgb,
            beam_blend: BeamBlend::default(),
            line_variant: LineVariant::default(),
            clear_decay_rate: -200.0,
            limits: PoolLimits::default(),
        }
    }
}
