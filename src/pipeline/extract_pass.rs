//! Line-pair extraction compute pass.
//!
//! Walks the line index pool two indices at a time and writes each
//! segment's endpoint vertices out as one denormalized record, so the
//! simplified beam-line draw reads its endpoints by instance index with no
//! indirection. Indices are absolute into the shared vertex pool; the
//! extracted records preserve every vertex attribute.

pub const EXTRACT_SHADER: &str = r#"
struct MeshVertex {
    d0: vec4<f32>, // position.xyz, surface_color.r
    d1: vec4<f32>, // surface_color.gb, line_color.rg
    d2: vec4<f32>, // line_color.b, intensity, delta_intensity, pad
}

struct ExtractedLine {
    v0: MeshVertex,
    v1: MeshVertex,
}

@group(0) @binding(0) var<storage, read> vertices: array<MeshVertex>;
@group(0) @binding(1) var<storage, read> line_indices: array<u32>;
@group(0) @binding(2) var<storage, read_write> lines: array<ExtractedLine>;

@compute @workgroup_size(64)
fn cs_main(@builtin(global_invocation_id) id: vec3<u32>) {
    let line = id.x;
    if (line * 2u + 1u >= arrayLength(&line_indices)) {
        return;
    }
    lines[line].v0 = vertices[line_indices[line * 2u]];
    lines[line].v1 = vertices[line_indices[line * 2u + 1u]];
}
"#;

/// Dispatch width of the extraction shader.
const WORKGROUP_SIZE: u32 = 64;

pub struct ExtractPass {
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
}

impl ExtractPass {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("line extract"),
            source: wgpu::ShaderSource::Wgsl(EXTRACT_SHADER.into()),
        });

        let storage = |binding, read_only| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("line extract"),
            entries: &[storage(0, true), storage(1, true), storage(2, false)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line extract"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("line extract"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "cs_main",
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        });

        Self { pipeline, layout }
    }

    /// Bind the pools for extraction. `index_bytes` must cover exactly the
    /// uploaded index range: the shader's bound check runs against the
    /// binding length, not the buffer capacity.
    pub fn bind(
        &self,
        device: &wgpu::Device,
        vertices: &wgpu::Buffer,
        line_indices: &wgpu::Buffer,
        index_bytes: wgpu::BufferSize,
        lines: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("line extract"),
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: vertices.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: line_indices,
                        offset: 0,
                        size: Some(index_bytes),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: lines.as_entire_binding(),
                },
            ],
        })
    }

    pub fn record(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        bind_group: &wgpu::BindGroup,
        line_count: u32,
    ) {
        if line_count == 0 {
            return;
        }
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("line extract"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(line_count.div_ceil(WORKGROUP_SIZE), 1, 1);
    }
}
