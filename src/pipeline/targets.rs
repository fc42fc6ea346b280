//! Offscreen render targets.
//!
//! The beam target and depth buffer are transient, rewritten every frame.
//! The two persistent targets ping-pong: each frame the compositor reads
//! one and writes the other, so phosphor state survives across frames
//! without a read-write hazard on a single texture.

use crate::error::PhosphorError;

/// HDR format for the beam and persistent targets. Half floats keep
/// over-bright strokes and the signed decay rate in the alpha channel.
pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Depth buffer format for the beam pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub struct RenderTargets {
    pub beam: wgpu::TextureView,
    pub depth: wgpu::TextureView,
    pub persist: [wgpu::TextureView; 2],
    pub width: u32,
    pub height: u32,
}

impl RenderTargets {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Result<Self, PhosphorError> {
        if width == 0 || height == 0 {
            return Err(PhosphorError::ZeroSizedTarget { width, height });
        }

        let make = |label: &str, format: wgpu::TextureFormat| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some(label),
                    size: wgpu::Extent3d {
                        width,
                        height,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                        | wgpu::TextureUsages::TEXTURE_BINDING,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        };

        Ok(Self {
            beam: make("phosphor beam", HDR_FORMAT),
            depth: make("phosphor depth", DEPTH_FORMAT),
            persist: [
                make("phosphor persist 0", HDR_FORMAT),
                make("phosphor persist 1", HDR_FORMAT),
            ],
            width,
            height,
        })
    }
}
