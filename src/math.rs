//! Math utilities shared by the stage kernels and the WGSL shaders.
//!
//! The quaternion operations are written out explicitly rather than
//! delegated to [`glam::Quat`] arithmetic so that the Rust kernels and the
//! shader code compute rotation the same way, term for term. Quaternions
//! are assumed unit-length throughout; none of these functions normalize.

use glam::{Mat4, Quat, Vec2, Vec3};

/// Conjugate of `q`. For unit quaternions this is the inverse.
#[inline]
pub fn quat_inverse(q: Quat) -> Quat {
    Quat::from_xyzw(-q.x, -q.y, -q.z, q.w)
}

/// Hamilton product `a * b`.
#[inline]
pub fn quat_hamilton_product(a: Quat, b: Quat) -> Quat {
    let av = Vec3::new(a.x, a.y, a.z);
    let bv = Vec3::new(b.x, b.y, b.z);
    let v = a.w * bv + b.w * av + av.cross(bv);
    Quat::from_xyzw(v.x, v.y, v.z, a.w * b.w - av.dot(bv))
}

/// Rotate `v` by the unit quaternion `q` via `q * (v, 0) * q^-1`.
#[inline]
pub fn quat_rotate(q: Quat, v: Vec3) -> Vec3 {
    let lifted = Quat::from_xyzw(v.x, v.y, v.z, 0.0);
    let r = quat_hamilton_product(q, quat_hamilton_product(lifted, quat_inverse(q)));
    Vec3::new(r.x, r.y, r.z)
}

/// In-plane 2D rotation by `angle` radians.
#[inline]
pub fn rotate_2d(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Project `p` through `matrix` and perspective-divide to normalized device
/// coordinates.
#[inline]
pub fn project_ndc(matrix: &Mat4, p: Vec3) -> Vec3 {
    matrix.project_point3(p)
}

/// On-screen direction angle of the segment `v0 -> v1`, both already in
/// normalized device coordinates. Degenerate segments (zero-length, or
/// pointing straight into the screen) fall back to an angle of 0.
#[inline]
pub fn screen_angle(v0: Vec3, v1: Vec3) -> f32 {
    let delta = v1 - v0;
    if delta.length_squared() == 0.0 {
        return 0.0;
    }
    let n = delta.normalize();
    if n.x == 0.0 && n.y == 0.0 {
        return 0.0;
    }
    n.y.atan2(n.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec3_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn hamilton_product_matches_glam_composition() {
        let a = Quat::from_axis_angle(Vec3::Y, 0.7);
        let b = Quat::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), -1.3);
        let ours = quat_hamilton_product(a, b);
        let glams = a * b;
        assert!((ours.x - glams.x).abs() < 1e-6);
        assert!((ours.y - glams.y).abs() < 1e-6);
        assert!((ours.z - glams.z).abs() < 1e-6);
        assert!((ours.w - glams.w).abs() < 1e-6);
    }

    #[test]
    fn rotate_matches_glam() {
        let q = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2);
        let v = Vec3::new(1.0, 0.0, 0.0);
        assert_vec3_near(quat_rotate(q, v), q * v);
        assert_vec3_near(quat_rotate(q, v), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rotate_inverse_roundtrip() {
        let q = Quat::from_axis_angle(Vec3::new(0.3, -0.8, 0.1).normalize(), 2.1);
        let v = Vec3::new(-4.0, 2.5, 0.25);
        assert_vec3_near(quat_rotate(quat_inverse(q), quat_rotate(q, v)), v);
    }

    #[test]
    fn screen_angle_cardinal_directions() {
        let o = Vec3::ZERO;
        assert!((screen_angle(o, Vec3::X) - 0.0).abs() < 1e-6);
        assert!((screen_angle(o, Vec3::Y) - FRAC_PI_2).abs() < 1e-6);
        assert!((screen_angle(o, Vec3::new(1.0, 1.0, 0.0)) - FRAC_PI_2 / 2.0).abs() < 1e-6);
    }

    #[test]
    fn screen_angle_degenerate_is_zero() {
        let p = Vec3::new(0.2, -0.4, 0.5);
        assert_eq!(screen_angle(p, p), 0.0);
        // Segment pointing straight along the view axis has no on-screen
        // direction either.
        assert_eq!(screen_angle(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.7)), 0.0);
    }

    #[test]
    fn rotate_2d_quarter_turn() {
        let r = rotate_2d(Vec2::X, FRAC_PI_2);
        assert!((r - Vec2::Y).length() < 1e-6);
    }
}
