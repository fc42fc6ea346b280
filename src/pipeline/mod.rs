//! The wgpu render pipeline.
//!
//! [`PhosphorRenderer`] owns every GPU resource and encodes one frame as
//! four stages, in order:
//!
//! 1. line-pair extraction (compute) - [`extract_pass`]
//! 2. beam rasterization into the HDR beam target - [`beam_pass`]
//! 3. persistence composition into the ping-pong accumulator -
//!    [`compose_pass`]
//! 4. tonemap to the output target - [`tonemap_pass`]
//!
//! The renderer is headless: it draws into any caller-supplied output view
//! and leaves surface acquisition and presentation to the embedder.

pub mod beam_pass;
pub mod compose_pass;
pub mod extract_pass;
pub mod targets;
pub mod tonemap_pass;

use beam_pass::BeamPass;
use compose_pass::ComposePass;
use extract_pass::ExtractPass;
use targets::RenderTargets;
use tonemap_pass::TonemapPass;

use crate::error::PhosphorError;
use crate::scene::{line_cap_strip, MeshBank};
use crate::types::{
    LineDrawTransform, LineInstance, LineMeshInstance, TriangleMeshDraw, TriangleMeshInstance,
    Uniforms,
};
use crate::{LineVariant, RendererConfig};

pub struct PhosphorRenderer {
    config: RendererConfig,
    targets: RenderTargets,

    uniform_buffer: wgpu::Buffer,
    draw_transform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    triangle_index_buffer: wgpu::Buffer,
    line_index_buffer: wgpu::Buffer,
    line_mesh_buffer: wgpu::Buffer,
    line_mesh_instance_buffer: wgpu::Buffer,
    triangle_instance_buffer: wgpu::Buffer,
    line_instance_buffer: wgpu::Buffer,
    extracted_buffer: wgpu::Buffer,
    cap_buffer: wgpu::Buffer,
    cap_vertex_count: u32,
    sampler: wgpu::Sampler,

    extract: ExtractPass,
    beam: BeamPass,
    compose: ComposePass,
    tonemap: TonemapPass,

    extract_bind_group: Option<wgpu::BindGroup>,
    beam_mesh_bind_group: wgpu::BindGroup,
    beam_line_bind_group: wgpu::BindGroup,
    beam_extracted_bind_group: wgpu::BindGroup,
    compose_bind_groups: [wgpu::BindGroup; 2],
    tonemap_bind_groups: [wgpu::BindGroup; 2],

    triangle_draws: Vec<TriangleMeshDraw>,
    static_line_count: u32,
    line_instance_count: u32,
    // Index of the persistent target holding last frame's state.
    previous: usize,
}

impl PhosphorRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        config: RendererConfig,
    ) -> Result<Self, PhosphorError> {
        let limits = config.limits;
        log::info!(
            "creating phosphor renderer, {}x{}, output {:?}",
            config.width,
            config.height,
            config.output_format
        );

        let targets = RenderTargets::new(device, config.width, config.height)?;

        let buffer = |label: &str, size: usize, usage: wgpu::BufferUsages| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: size as wgpu::BufferAddress,
                usage,
                mapped_at_creation: false,
            })
        };
        use wgpu::BufferUsages as U;

        let uniform_buffer = buffer(
            "uniforms",
            std::mem::size_of::<Uniforms>(),
            U::UNIFORM | U::COPY_DST,
        );
        let draw_transform_buffer = buffer(
            "line draw transform",
            std::mem::size_of::<LineDrawTransform>(),
            U::UNIFORM | U::COPY_DST,
        );
        let vertex_buffer = buffer(
            "mesh vertices",
            limits.max_mesh_vertices * 48,
            U::VERTEX | U::STORAGE | U::COPY_DST,
        );
        let triangle_index_buffer = buffer(
            "triangle indices",
            limits.max_triangle_indices * 2,
            U::INDEX | U::COPY_DST,
        );
        let line_index_buffer = buffer(
            "line indices",
            limits.max_line_indices * 4,
            U::STORAGE | U::COPY_DST,
        );
        let line_mesh_buffer = buffer(
            "line meshes",
            limits.max_line_meshes * 16,
            U::STORAGE | U::COPY_DST,
        );
        let line_mesh_instance_buffer = buffer(
            "line mesh instances",
            limits.max_line_mesh_instances * 48,
            U::STORAGE | U::COPY_DST,
        );
        let triangle_instance_buffer = buffer(
            "triangle mesh instances",
            limits.max_triangle_mesh_instances * 48,
            U::STORAGE | U::COPY_DST,
        );
        let line_instance_buffer = buffer(
            "line instances",
            limits.max_line_instances * 8,
            U::VERTEX | U::COPY_DST,
        );
        let extracted_buffer = buffer(
            "extracted lines",
            (limits.max_line_indices / 2) * 96,
            U::STORAGE,
        );

        let cap_template = line_cap_strip(2);
        let cap_buffer = buffer(
            "line cap template",
            cap_template.len() * std::mem::size_of::<crate::types::LineCapVertex>(),
            U::VERTEX | U::COPY_DST,
        );
        queue.write_buffer(&cap_buffer, 0, bytemuck::cast_slice(&cap_template));
        queue.write_buffer(
            &draw_transform_buffer,
            0,
            bytemuck::bytes_of(&LineDrawTransform::default()),
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("phosphor targets"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let extract = ExtractPass::new(device);
        let beam = BeamPass::new(device, config.beam_blend);
        let compose = ComposePass::new(device);
        let tonemap = TonemapPass::new(device, config.output_format);

        let beam_mesh_bind_group =
            beam.bind_meshes(device, &uniform_buffer, &triangle_instance_buffer);
        let beam_line_bind_group = beam.bind_lines(
            device,
            &uniform_buffer,
            &vertex_buffer,
            &line_index_buffer,
            &line_mesh_buffer,
            &line_mesh_instance_buffer,
        );
        let beam_extracted_bind_group = beam.bind_extracted(
            device,
            &uniform_buffer,
            &draw_transform_buffer,
            &extracted_buffer,
        );
        let compose_bind_groups =
            Self::make_compose_bind_groups(device, &compose, &uniform_buffer, &targets, &sampler);
        let tonemap_bind_groups = Self::make_tonemap_bind_groups(device, &tonemap, &targets, &sampler);

        Ok(Self {
            config,
            targets,
            uniform_buffer,
            draw_transform_buffer,
            vertex_buffer,
            triangle_index_buffer,
            line_index_buffer,
            line_mesh_buffer,
            line_mesh_instance_buffer,
            triangle_instance_buffer,
            line_instance_buffer,
            extracted_buffer,
            cap_buffer,
            cap_vertex_count: cap_template.len() as u32,
            sampler,
            extract,
            beam,
            compose,
            tonemap,
            extract_bind_group: None,
            beam_mesh_bind_group,
            beam_line_bind_group,
            beam_extracted_bind_group,
            compose_bind_groups,
            tonemap_bind_groups,
            triangle_draws: Vec::new(),
            static_line_count: 0,
            line_instance_count: 0,
            previous: 0,
        })
    }

    fn make_compose_bind_groups(
        device: &wgpu::Device,
        compose: &ComposePass,
        uniforms: &wgpu::Buffer,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> [wgpu::BindGroup; 2] {
        [
            compose.bind(device, uniforms, &targets.persist[0], &targets.beam, sampler),
            compose.bind(device, uniforms, &targets.persist[1], &targets.beam, sampler),
        ]
    }

    fn make_tonemap_bind_groups(
        device: &wgpu::Device,
        tonemap: &TonemapPass,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> [wgpu::BindGroup; 2] {
        [
            tonemap.bind(device, &targets.persist[0], sampler),
            tonemap.bind(device, &targets.persist[1], sampler),
        ]
    }

    pub fn width(&self) -> u32 {
        self.targets.width
    }

    pub fn height(&self) -> u32 {
        self.targets.height
    }

    /// Recreate the offscreen targets for a new output size. Accumulated
    /// phosphor state is lost; the next frame starts dark.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> Result<(), PhosphorError> {
        if width == self.targets.width && height == self.targets.height {
            return Ok(());
        }
        log::debug!("resizing phosphor targets to {width}x{height}");
        self.targets = RenderTargets::new(device, width, height)?;
        self.compose_bind_groups = Self::make_compose_bind_groups(
            device,
            &self.compose,
            &self.uniform_buffer,
            &self.targets,
            &self.sampler,
        );
        self.tonemap_bind_groups =
            Self::make_tonemap_bind_groups(device, &self.tonemap, &self.targets, &self.sampler);
        Ok(())
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &Uniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Translate-and-scale applied to every extracted line in the frame.
    pub fn write_draw_transform(&self, queue: &wgpu::Queue, transform: &LineDrawTransform) {
        queue.write_buffer(
            &self.draw_transform_buffer,
            0,
            bytemuck::bytes_of(transform),
        );
    }

    /// Upload the bank's pools and register its meshes. Re-runs the
    /// extraction pass setup so the next frame's extracted records match
    /// the new index range.
    pub fn upload_bank(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bank: &MeshBank,
    ) -> Result<(), PhosphorError> {
        let limits = self.config.limits;
        let checks: [(&str, usize, usize); 4] = [
            ("mesh vertex", bank.vertices().len(), limits.max_mesh_vertices),
            ("line index", bank.line_indices().len(), limits.max_line_indices),
            ("line mesh", bank.line_meshes().len(), limits.max_line_meshes),
            (
                "triangle index",
                bank.triangle_indices().len(),
                limits.max_triangle_indices,
            ),
        ];
        for (pool, requested, capacity) in checks {
            if requested > capacity {
                return Err(PhosphorError::PoolOverflow {
                    pool,
                    capacity,
                    requested,
                });
            }
        }

        if !bank.vertices().is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(bank.vertices()));
        }
        if !bank.line_indices().is_empty() {
            queue.write_buffer(
                &self.line_index_buffer,
                0,
                bytemuck::cast_slice(bank.line_indices()),
            );
        }
        if !bank.line_meshes().is_empty() {
            queue.write_buffer(
                &self.line_mesh_buffer,
                0,
                bytemuck::cast_slice(bank.line_meshes()),
            );
        }
        if !bank.triangle_indices().is_empty() {
            // Copy sizes must be 4-byte aligned; pad odd u16 counts.
            let mut indices = bank.triangle_indices().to_vec();
            if indices.len() % 2 != 0 {
                indices.push(0);
            }
            queue.write_buffer(
                &self.triangle_index_buffer,
                0,
                bytemuck::cast_slice(&indices),
            );
        }

        self.triangle_draws = bank.triangle_draws().to_vec();
        self.static_line_count = bank.line_count();

        // Bind exactly the uploaded index range: the extraction shader's
        // bound check runs against the binding length.
        self.extract_bind_group = wgpu::BufferSize::new(
            (bank.line_indices().len() * std::mem::size_of::<u32>()) as u64,
        )
        .map(|size| {
            self.extract.bind(
                device,
                &self.vertex_buffer,
                &self.line_index_buffer,
                size,
                &self.extracted_buffer,
            )
        });

        log::debug!(
            "uploaded mesh bank: {} vertices, {} line segments, {} line meshes, {} triangle meshes",
            bank.vertices().len(),
            self.static_line_count,
            bank.line_meshes().len(),
            self.triangle_draws.len()
        );
        Ok(())
    }

    /// Upload placements for line mesh instances, addressed by
    /// `LineInstance::mesh_instance`.
    pub fn write_line_mesh_instances(
        &self,
        queue: &wgpu::Queue,
        instances: &[LineMeshInstance],
    ) -> Result<(), PhosphorError> {
        if instances.len() > self.config.limits.max_line_mesh_instances {
            return Err(PhosphorError::PoolOverflow {
                pool: "line mesh instance",
                capacity: self.config.limits.max_line_mesh_instances,
                requested: instances.len(),
            });
        }
        if !instances.is_empty() {
            queue.write_buffer(
                &self.line_mesh_instance_buffer,
                0,
                bytemuck::cast_slice(instances),
            );
        }
        Ok(())
    }

    /// Upload the per-segment instance stream for the instanced line draw.
    pub fn write_line_instances(
        &mut self,
        queue: &wgpu::Queue,
        instances: &[LineInstance],
    ) -> Result<(), PhosphorError> {
        if instances.len() > self.config.limits.max_line_instances {
            return Err(PhosphorError::PoolOverflow {
                pool: "line instance",
                capacity: self.config.limits.max_line_instances,
                requested: instances.len(),
            });
        }
        if !instances.is_empty() {
            queue.write_buffer(
                &self.line_instance_buffer,
                0,
                bytemuck::cast_slice(instances),
            );
        }
        self.line_instance_count = instances.len() as u32;
        Ok(())
    }

    /// Upload placements for instanced triangle mesh draws.
    pub fn write_triangle_instances(
        &self,
        queue: &wgpu::Queue,
        instances: &[TriangleMeshInstance],
    ) -> Result<(), PhosphorError> {
        if instances.len() > self.config.limits.max_triangle_mesh_instances {
            return Err(PhosphorError::PoolOverflow {
                pool: "triangle mesh instance",
                capacity: self.config.limits.max_triangle_mesh_instances,
                requested: instances.len(),
            });
        }
        if !instances.is_empty() {
            queue.write_buffer(
                &self.triangle_instance_buffer,
                0,
                bytemuck::cast_slice(instances),
            );
        }
        Ok(())
    }

    /// Encode one frame into `output`. Stage order is fixed: extraction,
    /// beam, composition, tonemap; the persistent pair flips afterwards.
    pub fn render(&mut self, encoder: &mut wgpu::CommandEncoder, output: &wgpu::TextureView) {
        if self.config.line_variant == LineVariant::Extracted {
            if let Some(bind_group) = &self.extract_bind_group {
                self.extract.record(encoder, bind_group, self.static_line_count);
            }
        }

        {
            let mut pass = self
                .beam
                .begin(encoder, &self.targets, self.config.clear_decay_rate);
            self.beam.draw_meshes(
                &mut pass,
                &self.beam_mesh_bind_group,
                &self.vertex_buffer,
                &self.triangle_index_buffer,
                &self.triangle_draws,
            );
            match self.config.line_variant {
                LineVariant::Instanced => self.beam.draw_lines(
                    &mut pass,
                    &self.beam_line_bind_group,
                    &self.cap_buffer,
                    &self.line_instance_buffer,
                    self.cap_vertex_count,
                    self.line_instance_count,
                ),
                LineVariant::Extracted => self.beam.draw_extracted(
                    &mut pass,
                    &self.beam_extracted_bind_group,
                    &self.cap_buffer,
                    self.cap_vertex_count,
                    self.static_line_count,
                ),
            }
        }

        let next = 1 - self.previous;
        self.compose.record(
            encoder,
            &self.compose_bind_groups[self.previous],
            &self.targets.persist[next],
        );
        self.tonemap
            .record(encoder, &self.tonemap_bind_groups[next], output);
        self.previous = next;
    }
}
