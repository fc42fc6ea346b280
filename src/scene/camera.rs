//! Camera matrix helpers.
//!
//! Left-handed, zero-to-one depth, matching wgpu's clip space. The
//! perspective matrix carries the view transform; the orthographic matrix
//! intentionally does not, since the widening stage uses it purely to map
//! template units onto the screen independent of depth.

use glam::{Mat4, Vec3};

/// Perspective view-projection orbiting the origin. `offset` pans the eye:
/// `offset.0` in half-turns around Y, `offset.1` vertically.
pub fn perspective_matrix(aspect: f32, offset: (f32, f32), near: f32, far: f32) -> Mat4 {
    let x = offset.0 * std::f32::consts::PI;
    let eye = Vec3::new(x.sin() * 300.0, offset.1 * 150.0, -x.cos() * 300.0);
    let view = Mat4::look_at_lh(eye, Vec3::ZERO, Vec3::Y);
    let projection = Mat4::perspective_lh(45.0f32.to_radians(), aspect, near, far);
    projection * view
}

/// Orthographic projection used to place widening offsets. `zoom` is the
/// vertical half-extent in template units; one template unit maps to
/// `height / (2 * zoom)` pixels of beam width.
pub fn orthographic_matrix(aspect: f32, zoom: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_lh(
        -zoom * aspect,
        zoom * aspect,
        -zoom,
        zoom,
        0.0,
        zoom * (far - near) * 2.0,
    )
}
