//! Beam rasterization pass.
//!
//! Draws the frame's emissive geometry into the HDR beam target. Three
//! pipelines share the target: instanced triangle meshes, instanced line
//! segments resolved through the full pool indirection, and the simplified
//! pre-extracted segment path. Every fragment writes `color * intensity`
//! into rgb and its decay rate into alpha; color accumulates per the
//! configured blend policy while alpha always takes the newest stroke's
//! rate.
//!
//! Line widening happens in the vertex stage: segments project to NDC,
//! the on-screen angle rotates the constant-width cap template, and the
//! orthographic matrix maps template units onto the screen independent of
//! depth. `crate::stage::widen` is the line-for-line CPU mirror.

use crate::pipeline::targets::{RenderTargets, DEPTH_FORMAT, HDR_FORMAT};
use crate::types::{LineCapVertex, LineInstance, MeshVertex, TriangleMeshDraw};
use crate::BeamBlend;

pub const BEAM_MESH_SHADER: &str = r#"
struct Uniforms {
    perspective: mat4x4<f32>,
    orthographic: mat4x4<f32>,
    total_time: f32,
    delta_time: f32,
}

struct MeshInstance {
    position: vec3<f32>,
    _pad0: f32,
    rotation: vec4<f32>,
    scale: vec3<f32>,
    _pad1: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var<storage, read> mesh_instances: array<MeshInstance>;

fn quat_inverse(q: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(-q.xyz, q.w);
}

fn quat_mul(a: vec4<f32>, b: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(
        a.w * b.xyz + b.w * a.xyz + cross(a.xyz, b.xyz),
        a.w * b.w - dot(a.xyz, b.xyz)
    );
}

fn quat_rotate(q: vec4<f32>, v: vec3<f32>) -> vec3<f32> {
    return quat_mul(q, quat_mul(vec4<f32>(v, 0.0), quat_inverse(q))).xyz;
}

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) surface_color: vec3<f32>,
    @location(3) intensity: f32,
    @location(4) delta_intensity: f32,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) intensity: f32,
    @location(2) delta_intensity: f32,
}

@vertex
fn vs_main(in: VertexInput, @builtin(instance_index) instance_index: u32) -> VertexOutput {
    let instance = mesh_instances[instance_index];
    // Rotate, then scale, then translate.
    let world = instance.position + quat_rotate(instance.rotation, in.position) * instance.scale;

    var out: VertexOutput;
    out.position = uniforms.perspective * vec4<f32>(world, 1.0);
    out.color = in.surface_color;
    out.intensity = in.intensity;
    out.delta_intensity = in.delta_intensity;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color * in.intensity, in.delta_intensity);
}
"#;

pub const BEAM_LINE_SHADER: &str = r#"
struct Uniforms {
    perspective: mat4x4<f32>,
    orthographic: mat4x4<f32>,
    total_time: f32,
    delta_time: f32,
}

struct MeshVertex {
    d0: vec4<f32>, // position.xyz, surface_color.r
    d1: vec4<f32>, // surface_color.gb, line_color.rg
    d2: vec4<f32>, // line_color.b, intensity, delta_intensity, pad
}

struct LineMesh {
    vertex_offset: u32,
    vertex_count: u32,
    index_offset: u32,
    index_count: u32,
}

struct LineMeshInstance {
    position: vec3<f32>,
    mesh: u32,
    rotation: vec4<f32>,
    scale: vec3<f32>,
    _pad: f32,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var<storage, read> vertices: array<MeshVertex>;
@group(0) @binding(2) var<storage, read> line_indices: array<u32>;
@group(0) @binding(3) var<storage, read> line_meshes: array<LineMesh>;
@group(0) @binding(4) var<storage, read> line_mesh_instances: array<LineMeshInstance>;

fn vertex_position(v: MeshVertex) -> vec3<f32> {
    return v.d0.xyz;
}

fn vertex_line_color(v: MeshVertex) -> vec3<f32> {
    return vec3<f32>(v.d1.z, v.d1.w, v.d2.x);
}

fn vertex_intensity(v: MeshVertex) -> f32 {
    return v.d2.y;
}

fn vertex_delta_intensity(v: MeshVertex) -> f32 {
    return v.d2.z;
}

fn quat_inverse(q: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(-q.xyz, q.w);
}

fn quat_mul(a: vec4<f32>, b: vec4<f32>) -> vec4<f32> {
    return vec4<f32>(
        a.w * b.xyz + b.w * a.xyz + cross(a.xyz, b.xyz),
        a.w * b.w - dot(a.xyz, b.xyz)
    );
}

fn quat_rotate(q: vec4<f32>, v: vec3<f32>) -> vec3<f32> {
    return quat_mul(q, quat_mul(vec4<f32>(v, 0.0), quat_inverse(q))).xyz;
}

fn project_ndc(m: mat4x4<f32>, p: vec3<f32>) -> vec3<f32> {
    let clip = m * vec4<f32>(p, 1.0);
    return clip.xyz / clip.w;
}

fn screen_angle(v0: vec3<f32>, v1: vec3<f32>) -> f32 {
    let delta = v1 - v0;
    if (dot(delta, delta) == 0.0) {
        return 0.0;
    }
    let n = normalize(delta);
    if (n.x == 0.0 && n.y == 0.0) {
        return 0.0;
    }
    return atan2(n.y, n.x);
}

fn rotate_2d(v: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(v.x * c - v.y * s, v.x * s + v.y * c);
}

struct VertexInput {
    @location(0) cap_position: vec3<f32>,
    @location(1) end: f32,
    @location(2) mesh_instance: u32,
    @location(3) line_index: u32,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) intensity: f32,
    @location(2) delta_intensity: f32,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let instance = line_mesh_instances[in.mesh_instance];
    let mesh = line_meshes[instance.mesh];
    let v0 = vertices[line_indices[mesh.index_offset + in.line_index * 2u]];
    let v1 = vertices[line_indices[mesh.index_offset + in.line_index * 2u + 1u]];

    let w0 = instance.position + quat_rotate(instance.rotation, vertex_position(v0)) * instance.scale;
    let w1 = instance.position + quat_rotate(instance.rotation, vertex_position(v1)) * instance.scale;

    let ndc0 = project_ndc(uniforms.perspective, w0);
    let ndc1 = project_ndc(uniforms.perspective, w1);

    let angle = screen_angle(ndc0, ndc1);
    let rotated = rotate_2d(in.cap_position.xy, angle);
    let offset = uniforms.orthographic * vec4<f32>(rotated, in.cap_position.z, 1.0);
    let anchor = mix(ndc0, ndc1, vec3<f32>(in.end));

    var out: VertexOutput;
    out.position = offset + vec4<f32>(anchor, 0.0);
    out.color = mix(vertex_line_color(v0), vertex_line_color(v1), vec3<f32>(in.end));
    out.intensity = mix(vertex_intensity(v0), vertex_intensity(v1), in.end);
    out.delta_intensity = mix(vertex_delta_intensity(v0), vertex_delta_intensity(v1), in.end);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color * in.intensity, in.delta_intensity);
}
"#;

pub const BEAM_LINE_EXTRACTED_SHADER: &str = r#"
struct Uniforms {
    perspective: mat4x4<f32>,
    orthographic: mat4x4<f32>,
    total_time: f32,
    delta_time: f32,
}

struct DrawTransform {
    position: vec3<f32>,
    _pad0: f32,
    scale: vec3<f32>,
    _pad1: f32,
}

struct MeshVertex {
    d0: vec4<f32>, // position.xyz, surface_color.r
    d1: vec4<f32>, // surface_color.gb, line_color.rg
    d2: vec4<f32>, // line_color.b, intensity, delta_intensity, pad
}

struct ExtractedLine {
    v0: MeshVertex,
    v1: MeshVertex,
}

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var<uniform> transform: DrawTransform;
@group(0) @binding(2) var<storage, read> lines: array<ExtractedLine>;

fn vertex_position(v: MeshVertex) -> vec3<f32> {
    return v.d0.xyz;
}

fn vertex_line_color(v: MeshVertex) -> vec3<f32> {
    return vec3<f32>(v.d1.z, v.d1.w, v.d2.x);
}

fn vertex_intensity(v: MeshVertex) -> f32 {
    return v.d2.y;
}

fn vertex_delta_intensity(v: MeshVertex) -> f32 {
    return v.d2.z;
}

fn project_ndc(m: mat4x4<f32>, p: vec3<f32>) -> vec3<f32> {
    let clip = m * vec4<f32>(p, 1.0);
    return clip.xyz / clip.w;
}

fn screen_angle(v0: vec3<f32>, v1: vec3<f32>) -> f32 {
    let delta = v1 - v0;
    if (dot(delta, delta) == 0.0) {
        return 0.0;
    }
    let n = normalize(delta);
    if (n.x == 0.0 && n.y == 0.0) {
        return 0.0;
    }
    return atan2(n.y, n.x);
}

fn rotate_2d(v: vec2<f32>, angle: f32) -> vec2<f32> {
    let s = sin(angle);
    let c = cos(angle);
    return vec2<f32>(v.x * c - v.y * s, v.x * s + v.y * c);
}

struct VertexInput {
    @location(0) cap_position: vec3<f32>,
    @location(1) end: f32,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) intensity: f32,
    @location(2) delta_intensity: f32,
}

@vertex
fn vs_main(in: VertexInput, @builtin(instance_index) line: u32) -> VertexOutput {
    let v0 = lines[line].v0;
    let v1 = lines[line].v1;

    let w0 = transform.position + vertex_position(v0) * transform.scale;
    let w1 = transform.position + vertex_position(v1) * transform.scale;

    let ndc0 = project_ndc(uniforms.perspective, w0);
    let ndc1 = project_ndc(uniforms.perspective, w1);

    let angle = screen_angle(ndc0, ndc1);
    let rotated = rotate_2d(in.cap_position.xy, angle);
    let offset = uniforms.orthographic * vec4<f32>(rotated, in.cap_position.z, 1.0);
    let anchor = mix(ndc0, ndc1, vec3<f32>(in.end));

    var out: VertexOutput;
    out.position = offset + vec4<f32>(anchor, 0.0);
    out.color = mix(vertex_line_color(v0), vertex_line_color(v1), vec3<f32>(in.end));
    out.intensity = mix(vertex_intensity(v0), vertex_intensity(v1), in.end);
    out.delta_intensity = mix(vertex_delta_intensity(v0), vertex_delta_intensity(v1), in.end);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color * in.intensity, in.delta_intensity);
}
"#;

/// Beam blend state: color per policy, alpha always replaced so the last
/// stroke's decay rate wins.
fn beam_blend_state(blend: BeamBlend) -> wgpu::BlendState {
    let color = match blend {
        BeamBlend::Additive => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        BeamBlend::Max => wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Max,
        },
    };
    wgpu::BlendState {
        color,
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::Zero,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

pub struct BeamPass {
    mesh_pipeline: wgpu::RenderPipeline,
    mesh_layout: wgpu::BindGroupLayout,
    line_pipeline: wgpu::RenderPipeline,
    line_layout: wgpu::BindGroupLayout,
    extracted_pipeline: wgpu::RenderPipeline,
    extracted_layout: wgpu::BindGroupLayout,
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn buffer_entry(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_source: &str,
    layout: &wgpu::BindGroupLayout,
    buffers: &[wgpu::VertexBufferLayout],
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });
    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[layout],
        push_constant_ranges: &[],
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            // The cap strip mirrors its winding across the segment axis,
            // so nothing here can cull.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
    })
}

impl BeamPass {
    pub fn new(device: &wgpu::Device, blend: BeamBlend) -> Self {
        let blend = beam_blend_state(blend);

        let mesh_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 36,
                    shader_location: 3,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 40,
                    shader_location: 4,
                },
            ],
        };

        let cap_vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineCapVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        };

        let line_instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Uint32,
                    offset: 0,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Uint32,
                    offset: 4,
                    shader_location: 3,
                },
            ],
        };

        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("beam meshes"),
            entries: &[uniform_entry(0), storage_entry(1)],
        });
        let mesh_pipeline = build_pipeline(
            device,
            "beam meshes",
            BEAM_MESH_SHADER,
            &mesh_layout,
            &[mesh_vertex_layout],
            wgpu::PrimitiveTopology::TriangleList,
            blend,
            true,
        );

        let line_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("beam lines"),
            entries: &[
                uniform_entry(0),
                storage_entry(1),
                storage_entry(2),
                storage_entry(3),
                storage_entry(4),
            ],
        });
        let line_pipeline = build_pipeline(
            device,
            "beam lines",
            BEAM_LINE_SHADER,
            &line_layout,
            &[cap_vertex_layout.clone(), line_instance_layout],
            wgpu::PrimitiveTopology::TriangleStrip,
            blend,
            false,
        );

        let extracted_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("beam extracted lines"),
            entries: &[uniform_entry(0), uniform_entry(1), storage_entry(2)],
        });
        let extracted_pipeline = build_pipeline(
            device,
            "beam extracted lines",
            BEAM_LINE_EXTRACTED_SHADER,
            &extracted_layout,
            &[cap_vertex_layout],
            wgpu::PrimitiveTopology::TriangleStrip,
            blend,
            false,
        );

        Self {
            mesh_pipeline,
            mesh_layout,
            line_pipeline,
            line_layout,
            extracted_pipeline,
            extracted_layout,
        }
    }

    pub fn bind_meshes(
        &self,
        device: &wgpu::Device,
        uniforms: &wgpu::Buffer,
        mesh_instances: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("beam meshes"),
            layout: &self.mesh_layout,
            entries: &[buffer_entry(0, uniforms), buffer_entry(1, mesh_instances)],
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bind_lines(
        &self,
        device: &wgpu::Device,
        uniforms: &wgpu::Buffer,
        vertices: &wgpu::Buffer,
        line_indices: &wgpu::Buffer,
        line_meshes: &wgpu::Buffer,
        line_mesh_instances: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("beam lines"),
            layout: &self.line_layout,
            entries: &[
                buffer_entry(0, uniforms),
                buffer_entry(1, vertices),
                buffer_entry(2, line_indices),
                buffer_entry(3, line_meshes),
                buffer_entry(4, line_mesh_instances),
            ],
        })
    }

    pub fn bind_extracted(
        &self,
        device: &wgpu::Device,
        uniforms: &wgpu::Buffer,
        draw_transform: &wgpu::Buffer,
        lines: &wgpu::Buffer,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("beam extracted lines"),
            layout: &self.extracted_layout,
            entries: &[
                buffer_entry(0, uniforms),
                buffer_entry(1, draw_transform),
                buffer_entry(2, lines),
            ],
        })
    }

    /// Begin the beam render pass. Color clears to black with the idle
    /// decay rate in alpha, so untouched pixels fade hard; depth clears to
    /// the far plane.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        targets: &'e RenderTargets,
        clear_decay_rate: f64,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("beam"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &targets.beam,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.0,
                        b: 0.0,
                        a: clear_decay_rate,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// One instanced `draw_indexed` per registered triangle mesh.
    pub fn draw_meshes<'p>(
        &'p self,
        pass: &mut wgpu::RenderPass<'p>,
        bind_group: &'p wgpu::BindGroup,
        vertices: &'p wgpu::Buffer,
        indices: &'p wgpu::Buffer,
        draws: &[TriangleMeshDraw],
    ) {
        pass.set_pipeline(&self.mesh_pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, vertices.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint16);
        for draw in draws {
            if draw.instance_count == 0 {
                continue;
            }
            pass.draw_indexed(
                draw.first_index..draw.first_index + draw.index_count,
                draw.base_vertex,
                draw.first_instance..draw.first_instance + draw.instance_count,
            );
        }
    }

    /// One cap strip per (mesh instance, line) pair.
    pub fn draw_lines<'p>(
        &'p self,
        pass: &mut wgpu::RenderPass<'p>,
        bind_group: &'p wgpu::BindGroup,
        cap_template: &'p wgpu::Buffer,
        line_instances: &'p wgpu::Buffer,
        cap_vertex_count: u32,
        instance_count: u32,
    ) {
        if instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.line_pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, cap_template.slice(..));
        pass.set_vertex_buffer(1, line_instances.slice(..));
        pass.draw(0..cap_vertex_count, 0..instance_count);
    }

    /// One cap strip per extracted segment, instance index = line index.
    pub fn draw_extracted<'p>(
        &'p self,
        pass: &mut wgpu::RenderPass<'p>,
        bind_group: &'p wgpu::BindGroup,
        cap_template: &'p wgpu::Buffer,
        cap_vertex_count: u32,
        line_count: u32,
    ) {
        if line_count == 0 {
            return;
        }
        pass.set_pipeline(&self.extracted_pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.set_vertex_buffer(0, cap_template.slice(..));
        pass.draw(0..cap_vertex_count, 0..line_count);
    }
}
