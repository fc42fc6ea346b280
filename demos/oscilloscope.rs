//! Windowed oscilloscope demo.
//!
//! Draws a Lissajous trace onto a graticule and lets the phosphor
//! persistence paint the afterglow: only the newest slice of the curve is
//! rendered each frame, the trail is entirely decayed accumulator state.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

use phosphor_engine::scene::{geometry, orthographic_matrix, perspective_matrix, MeshBank};
use phosphor_engine::types::LineDrawTransform;
use phosphor_engine::{PhosphorRenderer, RendererConfig, Uniforms};

/// World units per scope unit: the trace lives in [-1, 1] squared.
const SCOPE_SCALE: f32 = 80.0;

/// Seconds of curve drawn fresh each frame.
const TRACE_WINDOW: f32 = 0.25;

fn build_scene(time: f32) -> MeshBank {
    let mut bank = MeshBank::default();

    let (vertices, indices) = geometry::grid_xy(1.2, 12, (0.05, 0.25, 0.12), 0.5, -30.0);
    bank.push_line_mesh(&vertices, &indices).expect("graticule");

    let (vertices, indices) =
        geometry::box_outline(Vec3::new(1.25, 1.25, 0.01), (0.1, 0.5, 0.25), 0.8, -30.0);
    bank.push_line_mesh(&vertices, &indices).expect("bezel");

    let steps = 256;
    let points: Vec<Vec3> = (0..=steps)
        .map(|i| {
            let t = time - TRACE_WINDOW + TRACE_WINDOW * i as f32 / steps as f32;
            Vec3::new(
                (t * 3.0).sin(),
                (t * 2.0 + std::f32::consts::FRAC_PI_2).sin(),
                -0.02,
            )
        })
        .collect();
    let (vertices, indices) = geometry::line_strip(&points, (0.25, 1.0, 0.45), 3.0, -6.0);
    bank.push_line_mesh(&vertices, &indices).expect("trace");

    bank
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().expect("event loop");
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("oscilloscope")
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .expect("window"),
    );

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(window.clone()).expect("surface");
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .expect("adapter");
    let (device, queue) = pollster::block_on(
        adapter.request_device(&wgpu::DeviceDescriptor::default(), None),
    )
    .expect("device");

    let size = window.inner_size();
    let mut surface_config = surface
        .get_default_config(&adapter, size.width.max(1), size.height.max(1))
        .expect("surface config");
    surface.configure(&device, &surface_config);

    let mut renderer = PhosphorRenderer::new(
        &device,
        &queue,
        RendererConfig {
            width: surface_config.width,
            height: surface_config.height,
            output_format: surface_config.format,
            // Idle pixels fade at 3 units/s, long enough for a visible
            // afterglow trail behind the trace.
            clear_decay_rate: -3.0,
            ..Default::default()
        },
    )
    .expect("renderer");

    renderer.write_draw_transform(
        &queue,
        &LineDrawTransform::new(Vec3::ZERO, Vec3::splat(SCOPE_SCALE)),
    );

    let started = Instant::now();
    let mut last_frame = started;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::Resized(new_size) => {
                    surface_config.width = new_size.width.max(1);
                    surface_config.height = new_size.height.max(1);
                    surface.configure(&device, &surface_config);
                    if let Err(err) =
                        renderer.resize(&device, surface_config.width, surface_config.height)
                    {
                        log::error!("resize failed: {err}");
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let total = now.duration_since(started).as_secs_f32();
                    let delta = now.duration_since(last_frame).as_secs_f32();
                    last_frame = now;

                    let bank = build_scene(total);
                    if let Err(err) = renderer.upload_bank(&device, &queue, &bank) {
                        log::error!("mesh upload failed: {err}");
                        return;
                    }

                    let aspect = surface_config.width as f32 / surface_config.height as f32;
                    let perspective = perspective_matrix(aspect, (0.0, 0.0), 1.0, 500.0);
                    // Beam width: one template unit = 2 pixels.
                    let orthographic =
                        orthographic_matrix(aspect, surface_config.height as f32 / 4.0, 1.0, 500.0);
                    renderer.write_uniforms(
                        &queue,
                        &Uniforms::new(perspective, orthographic, total, delta),
                    );

                    match surface.get_current_texture() {
                        Ok(frame) => {
                            let view = frame
                                .texture
                                .create_view(&wgpu::TextureViewDescriptor::default());
                            let mut encoder = device.create_command_encoder(
                                &wgpu::CommandEncoderDescriptor { label: Some("frame") },
                            );
                            renderer.render(&mut encoder, &view);
                            queue.submit([encoder.finish()]);
                            frame.present();
                        }
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            surface.configure(&device, &surface_config);
                        }
                        Err(err) => log::error!("surface error: {err}"),
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            _ => {}
        })
        .expect("event loop");
}
