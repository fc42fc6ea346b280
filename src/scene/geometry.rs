//! Mesh pools and primitive builders.
//!
//! [`MeshBank`] owns the CPU copies of the shared vertex/index pools and
//! performs all the range validation the render stages trust to have
//! happened. Meshes register once and are addressed by integer id
//! afterwards; pools are append-only.

use glam::Vec3;

use crate::error::PhosphorError;
use crate::types::{LineCapVertex, LineInstance, LineMesh, LineMeshInstance, MeshVertex, TriangleMeshDraw};
use crate::PoolLimits;

/// Number of vertices in the standard cap template strip.
pub const LINE_CAP_VERTEX_COUNT: u32 = 14;

/// Build the constant-width cap template: two quarter-circle end caps
/// stitched into a single triangle strip, one unit wide, with `end`
/// marking which projected endpoint each vertex rides on. `subdiv`
/// controls cap roundness; 2 yields the standard 14-vertex strip.
pub fn line_cap_strip(subdiv: usize) -> Vec<LineCapVertex> {
    let half = 1 + subdiv as isize;
    let arc = |i: isize, end: f32| {
        let f = i as f32 / half as f32 * (std::f32::consts::PI * 0.5);
        (f.sin(), f.cos(), end)
    };

    // The two on-axis tips appear once; every other cap vertex appears
    // twice, mirrored across the segment axis, forming the strip interior.
    let first = arc(-half, 0.0);
    let last = arc(half, 1.0);

    let left = (1 - half..1).map(|i| arc(i, 0.0));
    let right = (0..half).map(|i| arc(i, 1.0));
    let inter = left
        .chain(right)
        .flat_map(|(x, y, s)| [(x, -y, s), (x, y, s)]);

    std::iter::once(first)
        .chain(inter)
        .chain(std::iter::once(last))
        .map(|(x, y, s)| LineCapVertex {
            position: [x, y, -1.0],
            end: s,
        })
        .collect()
}

/// CPU-side owner of the shared mesh pools.
#[derive(Debug, Default)]
pub struct MeshBank {
    limits: PoolLimits,
    vertices: Vec<MeshVertex>,
    line_indices: Vec<u32>,
    triangle_indices: Vec<u16>,
    line_meshes: Vec<LineMesh>,
    triangle_draws: Vec<TriangleMeshDraw>,
}

impl MeshBank {
    pub fn new(limits: PoolLimits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    pub fn triangle_indices(&self) -> &[u16] {
        &self.triangle_indices
    }

    pub fn line_meshes(&self) -> &[LineMesh] {
        &self.line_meshes
    }

    pub fn triangle_draws(&self) -> &[TriangleMeshDraw] {
        &self.triangle_draws
    }

    /// Total number of drawable line segments across all meshes.
    pub fn line_count(&self) -> u32 {
        (self.line_indices.len() / 2) as u32
    }

    fn reserve_vertices(&mut self, count: usize) -> Result<u32, PhosphorError> {
        let offset = self.vertices.len();
        if offset + count > self.limits.max_mesh_vertices {
            return Err(PhosphorError::PoolOverflow {
                pool: "mesh vertex",
                capacity: self.limits.max_mesh_vertices,
                requested: offset + count,
            });
        }
        Ok(offset as u32)
    }

    /// Register a line mesh. `indices` are mesh-local (start, end) pairs;
    /// they are rebased to absolute pool offsets on insertion. Returns the
    /// mesh id.
    pub fn push_line_mesh(
        &mut self,
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<u32, PhosphorError> {
        if indices.len() % 2 != 0 {
            return Err(PhosphorError::UnpairedLineIndices {
                count: indices.len(),
            });
        }
        if self.line_meshes.len() >= self.limits.max_line_meshes {
            return Err(PhosphorError::PoolOverflow {
                pool: "line mesh",
                capacity: self.limits.max_line_meshes,
                requested: self.line_meshes.len() + 1,
            });
        }
        if self.line_indices.len() + indices.len() > self.limits.max_line_indices {
            return Err(PhosphorError::PoolOverflow {
                pool: "line index",
                capacity: self.limits.max_line_indices,
                requested: self.line_indices.len() + indices.len(),
            });
        }
        let vertex_offset = self.reserve_vertices(vertices.len())?;
        let end = vertex_offset + vertices.len() as u32;
        for &index in indices {
            let absolute = vertex_offset + index;
            if absolute >= end {
                return Err(PhosphorError::IndexOutOfRange {
                    index,
                    offset: vertex_offset,
                    end,
                });
            }
        }

        let index_offset = self.line_indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.line_indices
            .extend(indices.iter().map(|i| vertex_offset + i));

        let id = self.line_meshes.len() as u32;
        self.line_meshes.push(LineMesh {
            vertex_offset,
            vertex_count: vertices.len() as u32,
            index_offset,
            index_count: indices.len() as u32,
        });
        Ok(id)
    }

    /// Register a triangle mesh. Indices stay mesh-local; the draw record
    /// carries the base vertex instead. Returns the mesh id into
    /// [`Self::triangle_draws`].
    pub fn push_triangle_mesh(
        &mut self,
        vertices: &[MeshVertex],
        indices: &[u16],
    ) -> Result<u32, PhosphorError> {
        if self.triangle_indices.len() + indices.len() > self.limits.max_triangle_indices {
            return Err(PhosphorError::PoolOverflow {
                pool: "triangle index",
                capacity: self.limits.max_triangle_indices,
                requested: self.triangle_indices.len() + indices.len(),
            });
        }
        let vertex_offset = self.reserve_vertices(vertices.len())?;
        for &index in indices {
            if index as usize >= vertices.len() {
                return Err(PhosphorError::IndexOutOfRange {
                    index: index as u32,
                    offset: vertex_offset,
                    end: vertex_offset + vertices.len() as u32,
                });
            }
        }

        let first_index = self.triangle_indices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.triangle_indices.extend_from_slice(indices);

        let id = self.triangle_draws.len() as u32;
        self.triangle_draws.push(TriangleMeshDraw {
            index_count: indices.len() as u32,
            first_index,
            base_vertex: vertex_offset as i32,
            first_instance: 0,
            instance_count: 0,
        });
        Ok(id)
    }

    /// Point a triangle mesh at its slice of the instance array.
    pub fn set_triangle_instances(
        &mut self,
        mesh: u32,
        first_instance: u32,
        instance_count: u32,
    ) -> Result<(), PhosphorError> {
        let draw = self
            .triangle_draws
            .get_mut(mesh as usize)
            .ok_or(PhosphorError::UnknownMesh(mesh))?;
        draw.first_instance = first_instance;
        draw.instance_count = instance_count;
        Ok(())
    }

    /// Expand mesh instances into one [`LineInstance`] record per drawable
    /// segment, the stream the instanced beam-line draw consumes.
    pub fn line_instances_for(
        &self,
        instances: &[LineMeshInstance],
    ) -> Result<Vec<LineInstance>, PhosphorError> {
        let mut out = Vec::new();
        for (mesh_instance, instance) in instances.iter().enumerate() {
            let mesh = self
                .line_meshes
                .get(instance.mesh as usize)
                .ok_or(PhosphorError::UnknownMesh(instance.mesh))?;
            for line_index in 0..mesh.index_count / 2 {
                out.push(LineInstance {
                    mesh_instance: mesh_instance as u32,
                    line_index,
                });
            }
        }
        if out.len() > self.limits.max_line_instances {
            return Err(PhosphorError::PoolOverflow {
                pool: "line instance",
                capacity: self.limits.max_line_instances,
                requested: out.len(),
            });
        }
        Ok(out)
    }
}

/// Connect consecutive points into a line strip mesh.
pub fn line_strip(
    points: &[Vec3],
    color: (f32, f32, f32),
    intensity: f32,
    delta_intensity: f32,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let vertices = points
        .iter()
        .map(|p| {
            MeshVertex::new(
                (p.x, p.y, p.z),
                (0.0, 0.0, 0.0),
                color,
                intensity,
                delta_intensity,
            )
        })
        .collect();
    let indices = (1..points.len() as u32)
        .flat_map(|i| [i - 1, i])
        .collect();
    (vertices, indices)
}

/// Square grid in the XY plane, centered on the origin.
pub fn grid_xy(
    half_extent: f32,
    divisions: u32,
    color: (f32, f32, f32),
    intensity: f32,
    delta_intensity: f32,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let step = (half_extent * 2.0) / divisions as f32;
    for i in 0..=divisions {
        let t = -half_extent + step * i as f32;
        for (a, b) in [
            (Vec3::new(t, -half_extent, 0.0), Vec3::new(t, half_extent, 0.0)),
            (Vec3::new(-half_extent, t, 0.0), Vec3::new(half_extent, t, 0.0)),
        ] {
            for p in [a, b] {
                indices.push(vertices.len() as u32);
                vertices.push(MeshVertex::new(
                    (p.x, p.y, p.z),
                    (0.0, 0.0, 0.0),
                    color,
                    intensity,
                    delta_intensity,
                ));
            }
        }
    }
    (vertices, indices)
}

/// The twelve edges of an axis-aligned box.
pub fn box_outline(
    half_extents: Vec3,
    color: (f32, f32, f32),
    intensity: f32,
    delta_intensity: f32,
) -> (Vec<MeshVertex>, Vec<u32>) {
    let h = half_extents;
    let corners = [
        Vec3::new(-h.x, -h.y, -h.z),
        Vec3::new(h.x, -h.y, -h.z),
        Vec3::new(h.x, h.y, -h.z),
        Vec3::new(-h.x, h.y, -h.z),
        Vec3::new(-h.x, -h.y, h.z),
        Vec3::new(h.x, -h.y, h.z),
        Vec3::new(h.x, h.y, h.z),
        Vec3::new(-h.x, h.y, h.z),
    ];
    let vertices = corners
        .iter()
        .map(|p| {
            MeshVertex::new(
                (p.x, p.y, p.z),
                (0.0, 0.0, 0.0),
                color,
                intensity,
                delta_intensity,
            )
        })
        .collect();
    let edges = [
        [0, 1], [1, 2], [2, 3], [3, 0], // near face
        [4, 5], [5, 6], [6, 7], [7, 4], // far face
        [0, 4], [1, 5], [2, 6], [3, 7], // connectors
    ];
    (vertices, edges.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PhosphorError;
    use glam::Quat;

    #[test]
    fn cap_strip_has_expected_shape() {
        let strip = line_cap_strip(2);
        assert_eq!(strip.len(), LINE_CAP_VERTEX_COUNT as usize);
        // Tips sit on the segment axis, one unit out past each endpoint.
        assert_eq!(strip[0].position[0], -1.0);
        assert_eq!(strip[0].end, 0.0);
        let last = strip.last().unwrap();
        assert_eq!(last.position[0], 1.0);
        assert_eq!(last.end, 1.0);
        // Unit width: no vertex further than 1 from the axis.
        for v in &strip {
            assert!(v.position[1].abs() <= 1.0 + 1e-6);
            assert!(v.end == 0.0 || v.end == 1.0);
        }
    }

    #[test]
    fn line_mesh_indices_are_rebased() {
        let mut bank = MeshBank::default();
        let (v, i) = line_strip(
            &[Vec3::ZERO, Vec3::X, Vec3::Y],
            (1.0, 1.0, 1.0),
            1.0,
            -1.0,
        );
        let a = bank.push_line_mesh(&v, &i).unwrap();
        let b = bank.push_line_mesh(&v, &i).unwrap();
        assert_eq!((a, b), (0, 1));

        let meshes = bank.line_meshes();
        assert_eq!(meshes[1].vertex_offset, 3);
        assert_eq!(meshes[1].index_offset, 4);
        // Second mesh's indices point into its own vertex range.
        assert_eq!(&bank.line_indices()[4..], &[3, 4, 4, 5]);
    }

    #[test]
    fn bad_local_index_is_rejected() {
        let mut bank = MeshBank::default();
        let v = vec![MeshVertex::default(); 2];
        let err = bank.push_line_mesh(&v, &[0, 5]).unwrap_err();
        assert!(matches!(err, PhosphorError::IndexOutOfRange { .. }));
    }

    #[test]
    fn odd_index_count_is_rejected() {
        let mut bank = MeshBank::default();
        let v = vec![MeshVertex::default(); 2];
        let err = bank.push_line_mesh(&v, &[0, 1, 0]).unwrap_err();
        assert!(matches!(err, PhosphorError::UnpairedLineIndices { count: 3 }));
    }

    #[test]
    fn vertex_pool_overflow_is_reported() {
        let mut bank = MeshBank::new(PoolLimits {
            max_mesh_vertices: 4,
            ..Default::default()
        });
        let v = vec![MeshVertex::default(); 3];
        bank.push_line_mesh(&v, &[0, 1]).unwrap();
        let err = bank.push_line_mesh(&v, &[0, 1]).unwrap_err();
        assert!(matches!(
            err,
            PhosphorError::PoolOverflow {
                pool: "mesh vertex",
                ..
            }
        ));
    }

    #[test]
    fn line_instance_expansion_covers_every_edge() {
        let mut bank = MeshBank::default();
        let (v, i) = box_outline(Vec3::ONE, (0.0, 1.0, 0.0), 1.0, -1.0);
        let mesh = bank.push_line_mesh(&v, &i).unwrap();

        let instances = vec![
            LineMeshInstance::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, mesh),
            LineMeshInstance::new(Vec3::X, Quat::IDENTITY, Vec3::ONE, mesh),
        ];
        let records = bank.line_instances_for(&instances).unwrap();
        assert_eq!(records.len(), 24); // 12 edges x 2 instances
        assert_eq!(records[0].mesh_instance, 0);
        assert_eq!(records[12].mesh_instance, 1);
        assert_eq!(records[12].line_index, 0);
    }

    #[test]
    fn unknown_mesh_id_is_rejected() {
        let bank = MeshBank::default();
        let instances = vec![LineMeshInstance::new(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE, 7)];
        let err = bank.line_instances_for(&instances).unwrap_err();
        assert!(matches!(err, PhosphorError::UnknownMesh(7)));
    }
}
