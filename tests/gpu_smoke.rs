//! Full-pipeline smoke test against a real adapter.
//!
//! Skips (with a note) when the machine has no usable GPU, so CI without
//! one still runs the CPU-side suites.

use glam::Vec3;

use phosphor_engine::scene::{geometry, orthographic_matrix, perspective_matrix, MeshBank};
use phosphor_engine::types::{LineInstance, LineMeshInstance, TriangleMeshInstance};
use phosphor_engine::{LineVariant, MeshVertex, PhosphorRenderer, RendererConfig, Uniforms};

struct TestContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl TestContext {
    fn new() -> Option<Self> {
        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))?;
        let (device, queue) = pollster::block_on(
            adapter.request_device(&wgpu::DeviceDescriptor::default(), None),
        )
        .ok()?;
        Some(Self { device, queue })
    }

    fn output_view(&self) -> wgpu::TextureView {
        self.device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("smoke output"),
                size: wgpu::Extent3d {
                    width: 64,
                    height: 64,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn config(line_variant: LineVariant) -> RendererConfig {
        RendererConfig {
            width: 64,
            height: 64,
            output_format: wgpu::TextureFormat::Rgba8Unorm,
            line_variant,
            ..Default::default()
        }
    }
}

fn scope_bank() -> MeshBank {
    let mut bank = MeshBank::default();
    let (vertices, indices) = geometry::grid_xy(1.0, 4, (0.1, 0.3, 0.15), 0.5, -4.0);
    bank.push_line_mesh(&vertices, &indices).unwrap();
    let (vertices, indices) =
        geometry::box_outline(Vec3::ONE, (0.2, 1.0, 0.4), 2.0, -6.0);
    bank.push_line_mesh(&vertices, &indices).unwrap();
    bank
}

fn frame(
    ctx: &TestContext,
    renderer: &mut PhosphorRenderer,
    output: &wgpu::TextureView,
    total: f32,
) {
    let perspective = perspective_matrix(1.0, (0.0, 0.0), 1.0, 500.0);
    let orthographic = orthographic_matrix(1.0, 32.0, 1.0, 500.0);
    renderer.write_uniforms(
        &ctx.queue,
        &Uniforms::new(perspective, orthographic, total, 1.0 / 60.0),
    );

    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("smoke") });
    renderer.render(&mut encoder, output);
    ctx.queue.submit([encoder.finish()]);
    ctx.device.poll(wgpu::Maintain::Wait);
}

#[test]
fn extracted_variant_renders_frames() {
    let Some(ctx) = TestContext::new() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let mut renderer =
        PhosphorRenderer::new(&ctx.device, &ctx.queue, TestContext::config(LineVariant::Extracted))
            .unwrap();
    renderer
        .upload_bank(&ctx.device, &ctx.queue, &scope_bank())
        .unwrap();

    let output = ctx.output_view();
    for i in 0..3 {
        frame(&ctx, &mut renderer, &output, i as f32 / 60.0);
    }
}

#[test]
fn instanced_variant_renders_frames() {
    let Some(ctx) = TestContext::new() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let mut renderer =
        PhosphorRenderer::new(&ctx.device, &ctx.queue, TestContext::config(LineVariant::Instanced))
            .unwrap();
    let mut bank = scope_bank();

    // One emissive quad so the triangle path draws alongside the lines.
    let quad = [
        MeshVertex::new((-1.0, -1.0, 0.0), (1.0, 0.4, 0.1), (0.0, 0.0, 0.0), 1.5, -5.0),
        MeshVertex::new((1.0, -1.0, 0.0), (1.0, 0.4, 0.1), (0.0, 0.0, 0.0), 1.5, -5.0),
        MeshVertex::new((1.0, 1.0, 0.0), (1.0, 0.4, 0.1), (0.0, 0.0, 0.0), 1.5, -5.0),
        MeshVertex::new((-1.0, 1.0, 0.0), (1.0, 0.4, 0.1), (0.0, 0.0, 0.0), 1.5, -5.0),
    ];
    let panel = bank.push_triangle_mesh(&quad, &[0, 1, 2, 0, 2, 3]).unwrap();
    bank.set_triangle_instances(panel, 0, 1).unwrap();

    renderer.upload_bank(&ctx.device, &ctx.queue, &bank).unwrap();
    renderer
        .write_triangle_instances(
            &ctx.queue,
            &[TriangleMeshInstance::new(
                Vec3::new(0.0, 0.0, 60.0),
                glam::Quat::IDENTITY,
                Vec3::splat(20.0),
            )],
        )
        .unwrap();

    let instances = vec![
        LineMeshInstance::new(Vec3::ZERO, glam::Quat::IDENTITY, Vec3::splat(40.0), 0),
        LineMeshInstance::new(
            Vec3::new(10.0, 0.0, 0.0),
            glam::Quat::from_axis_angle(Vec3::Y, 0.5),
            Vec3::splat(30.0),
            1,
        ),
    ];
    renderer
        .write_line_mesh_instances(&ctx.queue, &instances)
        .unwrap();
    let records: Vec<LineInstance> = bank.line_instances_for(&instances).unwrap();
    renderer.write_line_instances(&ctx.queue, &records).unwrap();

    let output = ctx.output_view();
    for i in 0..3 {
        frame(&ctx, &mut renderer, &output, i as f32 / 60.0);
    }
}

#[test]
fn resize_recreates_targets() {
    let Some(ctx) = TestContext::new() else {
        eprintln!("no GPU adapter available, skipping");
        return;
    };

    let mut renderer =
        PhosphorRenderer::new(&ctx.device, &ctx.queue, TestContext::config(LineVariant::Extracted))
            .unwrap();
    renderer
        .upload_bank(&ctx.device, &ctx.queue, &scope_bank())
        .unwrap();

    renderer.resize(&ctx.device, 128, 32).unwrap();
    assert_eq!((renderer.width(), renderer.height()), (128, 32));
    assert!(renderer.resize(&ctx.device, 0, 32).is_err());
}
