//! Beam rasterization fragment rule.
//!
//! Fragments write premultiplied emissive energy into the HDR beam target:
//! `rgb = color * intensity`, with the decay rate riding in the alpha
//! channel for the compositor to integrate next stage. Overlap resolution
//! is the target's blend policy, applied uniformly across a frame.

use glam::{Vec3, Vec4};

use crate::BeamBlend;

/// One beam fragment.
#[inline]
pub fn beam_fragment(color: Vec3, intensity: f32, delta_intensity: f32) -> Vec4 {
    (color * intensity).extend(delta_intensity)
}

/// Resolve an overlapping fragment against the value already in the target.
/// Color combines per the configured policy; the decay rate is replaced by
/// the incoming fragment's.
#[inline]
pub fn blend_fragment(policy: BeamBlend, dst: Vec4, src: Vec4) -> Vec4 {
    let color = match policy {
        BeamBlend::Additive => dst.truncate() + src.truncate(),
        BeamBlend::Max => dst.truncate().max(src.truncate()),
    };
    color.extend(src.w)
}
