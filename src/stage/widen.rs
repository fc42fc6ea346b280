//! Screen-space line widening.
//!
//! Lines are true 3D segments, geometrically thin. To give them a constant
//! apparent width, each segment is projected to normalized device
//! coordinates first; its on-screen direction angle is then used to rotate
//! a small constant-width cap template in the screen plane, and the rotated
//! template is re-projected through the orthographic matrix - which knows
//! nothing of perspective depth, so the added width is the same number of
//! pixels no matter how far away the segment is. Each template vertex rides
//! on one endpoint, selected by its `end` scalar, and the beam attributes
//! interpolate between the endpoints with the same scalar.
//!
//! Mirrors the vertex stages of `BEAM_LINE_SHADER` and
//! `BEAM_LINE_EXTRACTED_SHADER`.

use glam::{Vec3, Vec4};

use crate::math::{project_ndc, rotate_2d, screen_angle};
use crate::types::{LineCapVertex, MeshVertex, Uniforms};

/// Vertex-stage output handed to beam rasterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamVertex {
    /// Clip-space position (w = 1 after the widening sum).
    pub position: Vec4,
    pub color: Vec3,
    pub intensity: f32,
    pub delta_intensity: f32,
}

/// One widening invocation: place cap-template vertex `cap` for the segment
/// with world-space endpoints `w0`, `w1` carrying the attributes of `v0`,
/// `v1`. The endpoints must already be instance-transformed; their
/// positions in `v0`/`v1` are ignored here.
pub fn widen_vertex(
    uniforms: &Uniforms,
    cap: &LineCapVertex,
    w0: Vec3,
    w1: Vec3,
    v0: &MeshVertex,
    v1: &MeshVertex,
) -> BeamVertex {
    let ndc0 = project_ndc(&uniforms.perspective, w0);
    let ndc1 = project_ndc(&uniforms.perspective, w1);

    let angle = screen_angle(ndc0, ndc1);
    let cap_pos = Vec3::from_array(cap.position);
    let rotated = rotate_2d(cap_pos.truncate(), angle);

    let offset = uniforms.orthographic * Vec4::new(rotated.x, rotated.y, cap_pos.z, 1.0);
    let anchor = ndc0.lerp(ndc1, cap.end);

    BeamVertex {
        position: offset + Vec4::new(anchor.x, anchor.y, anchor.z, 0.0),
        color: v0.line_color_vec().lerp(v1.line_color_vec(), cap.end),
        intensity: v0.intensity + (v1.intensity - v0.intensity) * cap.end,
        delta_intensity: v0.delta_intensity + (v1.delta_intensity - v0.delta_intensity) * cap.end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use std::f32::consts::FRAC_1_SQRT_2;

    fn square_on() -> Uniforms {
        Uniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, 0.0, 0.0)
    }

    fn endpoint(pos: (f32, f32, f32), color: (f32, f32, f32), intensity: f32) -> MeshVertex {
        MeshVertex::new(pos, (0.0, 0.0, 0.0), color, intensity, -0.5)
    }

    fn cap(x: f32, y: f32, end: f32) -> LineCapVertex {
        LineCapVertex {
            position: [x, y, 0.0],
            end,
        }
    }

    #[test]
    fn degenerate_segment_produces_finite_output() {
        let u = square_on();
        let v = endpoint((0.25, 0.25, 0.5), (1.0, 1.0, 1.0), 1.0);
        let p = v.position_vec();
        let out = widen_vertex(&u, &cap(0.0, 1.0, 0.0), p, p, &v, &v);
        assert!(out.position.is_finite());
        // Angle fell back to 0, so the template is un-rotated: its +Y
        // offset survives as +Y.
        assert!((out.position.y - (1.0 + 0.25)).abs() < 1e-6);
        assert!((out.position.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn template_rotates_into_screen_direction() {
        let u = square_on();
        let v0 = endpoint((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 1.0);
        let v1 = endpoint((1.0, 1.0, 0.0), (0.0, 1.0, 0.0), 2.0);

        // A template vertex offset one unit sideways (+Y, perpendicular to
        // the +X rest direction) must end up perpendicular to the 45-degree
        // on-screen direction.
        let out = widen_vertex(
            &u,
            &cap(0.0, 1.0, 0.0),
            v0.position_vec(),
            v1.position_vec(),
            &v0,
            &v1,
        );
        let offset = out.position.truncate().truncate();
        let expected = glam::Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2);
        assert!((offset - expected).length() < 1e-5, "{offset:?}");
    }

    #[test]
    fn long_axis_aligns_with_projected_direction() {
        let u = square_on();
        let v0 = endpoint((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 1.0);
        let v1 = endpoint((1.0, 1.0, 0.0), (0.0, 1.0, 0.0), 2.0);

        let near = widen_vertex(
            &u,
            &cap(0.0, 0.0, 0.0),
            v0.position_vec(),
            v1.position_vec(),
            &v0,
            &v1,
        );
        let far = widen_vertex(
            &u,
            &cap(0.0, 0.0, 1.0),
            v0.position_vec(),
            v1.position_vec(),
            &v0,
            &v1,
        );
        let axis = (far.position - near.position).truncate().truncate().normalize();
        assert!((axis - glam::Vec2::splat(FRAC_1_SQRT_2)).length() < 1e-5);

        // Attributes at the rails are the endpoint attributes.
        assert_eq!(near.color, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(far.color, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(near.intensity, 1.0);
        assert_eq!(far.intensity, 2.0);
    }

    #[test]
    fn width_is_depth_invariant() {
        // Two segments with identical screen projections at different
        // depths must get identical width offsets.
        let u = square_on();
        let v = endpoint((0.0, 0.0, 0.0), (1.0, 1.0, 1.0), 1.0);
        let t = cap(0.3, 1.0, 0.0);

        let shallow = widen_vertex(
            &u,
            &t,
            Vec3::new(0.1, 0.2, 0.1),
            Vec3::new(0.6, 0.2, 0.1),
            &v,
            &v,
        );
        let deep = widen_vertex(
            &u,
            &t,
            Vec3::new(0.1, 0.2, 0.9),
            Vec3::new(0.6, 0.2, 0.9),
            &v,
            &v,
        );
        let off_shallow = shallow.position.truncate().truncate() - glam::Vec2::new(0.1, 0.2);
        let off_deep = deep.position.truncate().truncate() - glam::Vec2::new(0.1, 0.2);
        assert!((off_shallow - off_deep).length() < 1e-6);
    }

    #[test]
    fn attribute_interpolation_is_linear_in_end() {
        let u = square_on();
        let v0 = endpoint((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0.0);
        let v1 = endpoint((1.0, 0.0, 0.0), (0.0, 0.0, 1.0), 4.0);
        let mid = widen_vertex(
            &u,
            &cap(0.0, 0.0, 0.5),
            v0.position_vec(),
            v1.position_vec(),
            &v0,
            &v1,
        );
        assert!((mid.color - Vec3::new(0.5, 0.0, 0.5)).length() < 1e-6);
        assert_eq!(mid.intensity, 2.0);
    }
}
