//! GPU buffer records.
//!
//! Every struct here crosses the CPU/GPU boundary, so field order and
//! padding are part of the contract: the WGSL in [`crate::pipeline`]
//! addresses these fields by fixed offset. Do not reorder.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-frame constants, rewritten once per frame by the host.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct Uniforms {
    pub perspective: Mat4,
    pub orthographic: Mat4,
    pub total_time: f32,
    pub delta_time: f32,
    pub _pad: [f32; 2],
}

impl Uniforms {
    pub fn new(perspective: Mat4, orthographic: Mat4, total_time: f32, delta_time: f32) -> Self {
        Self {
            perspective,
            orthographic,
            total_time,
            delta_time,
            _pad: [0.0; 2],
        }
    }
}

/// A vertex in the shared mesh pool: position plus the emissive attributes
/// the beam carries. Packed into three 4-float groups (48 bytes) so storage
/// buffer access needs no implicit alignment padding.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub surface_color: [f32; 3],
    pub line_color: [f32; 3],
    pub intensity: f32,
    pub delta_intensity: f32,
    pub _pad: f32,
}

impl MeshVertex {
    pub fn new(
        position: (f32, f32, f32),
        surface_color: (f32, f32, f32),
        line_color: (f32, f32, f32),
        intensity: f32,
        delta_intensity: f32,
    ) -> Self {
        Self {
            position: [position.0, position.1, position.2],
            surface_color: [surface_color.0, surface_color.1, surface_color.2],
            line_color: [line_color.0, line_color.1, line_color.2],
            intensity,
            delta_intensity,
            _pad: 0.0,
        }
    }

    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn line_color_vec(&self) -> Vec3 {
        Vec3::from_array(self.line_color)
    }

    pub fn surface_color_vec(&self) -> Vec3 {
        Vec3::from_array(self.surface_color)
    }
}

/// One vertex of the constant-width cap template the widening stage rotates
/// into each segment's on-screen direction. `end` selects which projected
/// endpoint the vertex rides on: 0 = start, 1 = end.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct LineCapVertex {
    pub position: [f32; 3],
    pub end: f32,
}

/// Descriptor locating one line mesh's sub-ranges within the shared pools.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct LineMesh {
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub index_offset: u32,
    pub index_count: u32,
}

/// Placement of one triangle mesh instance in the world.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct TriangleMeshInstance {
    pub position: [f32; 3],
    pub _pad0: f32,
    /// Unit quaternion, `[x, y, z, w]` with `w` the scalar part.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub _pad1: f32,
}

impl TriangleMeshInstance {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            rotation: [rotation.x, rotation.y, rotation.z, rotation.w],
            scale: scale.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Placement of one line mesh instance, plus the id of the [`LineMesh`] it
/// draws.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct LineMeshInstance {
    pub position: [f32; 3],
    pub mesh: u32,
    /// Unit quaternion, `[x, y, z, w]` with `w` the scalar part.
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub _pad: f32,
}

impl LineMeshInstance {
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3, mesh: u32) -> Self {
        Self {
            position: position.to_array(),
            mesh,
            rotation: [rotation.x, rotation.y, rotation.z, rotation.w],
            scale: scale.to_array(),
            _pad: 0.0,
        }
    }
}

/// One drawable segment: a (mesh instance, line index) pair. The instanced
/// beam-line draw issues one of these per on-screen edge.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, Pod, Zeroable)]
pub struct LineInstance {
    pub mesh_instance: u32,
    pub line_index: u32,
}

/// Output of the line-pair extraction pass: both endpoint vertices of one
/// segment, denormalized so the widening stage skips the index indirection.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ExtractedLine {
    pub v0: MeshVertex,
    pub v1: MeshVertex,
}

/// Reduced per-draw placement for the extracted beam-line draw, which
/// carries no rotation: extracted records no longer know which instance
/// they came from, so the whole batch shares one translate-and-scale.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct LineDrawTransform {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub scale: [f32; 3],
    pub _pad1: f32,
}

impl LineDrawTransform {
    pub fn new(position: Vec3, scale: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            scale: scale.to_array(),
            _pad1: 0.0,
        }
    }
}

impl Default for LineDrawTransform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ONE)
    }
}

/// Draw parameters for one triangle mesh within the shared pools. Kept
/// host-side; the beam pass turns each into one instanced `draw_indexed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TriangleMeshDraw {
    pub index_count: u32,
    pub first_index: u32,
    pub base_vertex: i32,
    pub first_instance: u32,
    pub instance_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn record_sizes_are_fixed() {
        assert_eq!(size_of::<Uniforms>(), 144);
        assert_eq!(size_of::<MeshVertex>(), 48);
        assert_eq!(size_of::<LineCapVertex>(), 16);
        assert_eq!(size_of::<LineMesh>(), 16);
        assert_eq!(size_of::<TriangleMeshInstance>(), 48);
        assert_eq!(size_of::<LineMeshInstance>(), 48);
        assert_eq!(size_of::<LineInstance>(), 8);
        assert_eq!(size_of::<ExtractedLine>(), 96);
        assert_eq!(size_of::<LineDrawTransform>(), 32);
    }

    #[test]
    fn mesh_vertex_field_offsets() {
        let v = MeshVertex::new((1.0, 2.0, 3.0), (0.1, 0.2, 0.3), (0.4, 0.5, 0.6), 2.0, -1.5);
        let floats: &[f32; 12] = bytemuck::cast_ref(&v);
        assert_eq!(&floats[0..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&floats[3..6], &[0.1, 0.2, 0.3]);
        assert_eq!(&floats[6..9], &[0.4, 0.5, 0.6]);
        assert_eq!(floats[9], 2.0);
        assert_eq!(floats[10], -1.5);
    }
}
