//! Accumulation/persistence compositor.
//!
//! The only cross-frame state in the pipeline. Per pixel, last frame's
//! accumulated value decays by its own stored rate over the elapsed time,
//! clamps into `[0, DECAY_CEILING]`, and the fresh beam folds in via a
//! per-channel maximum - a re-struck pixel jumps straight to the new beam's
//! brightness, an untouched one keeps fading. The stored decay rate is
//! replaced by the beam's each frame. Mirrors `COMPOSE_SHADER`.

use glam::{Vec3, Vec4};

use crate::DECAY_CEILING;

/// One compositor invocation for a single pixel. `previous` is last frame's
/// persistent value, `beam` the freshly rendered one, `delta_time` the
/// frame time in seconds.
#[inline]
pub fn compose_fragment(previous: Vec4, beam: Vec4, delta_time: f32) -> Vec4 {
    let decayed = (previous.truncate() + Vec3::splat(previous.w * delta_time))
        .clamp(Vec3::ZERO, Vec3::splat(DECAY_CEILING));
    decayed.max(beam.truncate()).extend(beam.w)
}

/// Compose a whole frame: `previous` and `beam` are same-sized pixel
/// buffers, `out` receives the new persistent contents. The caller provides
/// the ping-pong: `previous` and `out` must be distinct buffers.
pub fn compose_buffer(previous: &[Vec4], beam: &[Vec4], out: &mut [Vec4], delta_time: f32) {
    for ((prev, beam), out) in previous.iter().zip(beam).zip(out) {
        *out = compose_fragment(*prev, *beam, delta_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_BEAM: Vec4 = Vec4::ZERO;

    #[test]
    fn decay_is_exact() {
        // clamp(c + a*dt, 0, ceiling), computed before the beam max.
        let prev = Vec4::new(2.0, 1.0, 0.25, -1.5);
        let out = compose_fragment(prev, ZERO_BEAM, 0.5);
        assert_eq!(out.truncate(), Vec3::new(1.25, 0.25, 0.0));
    }

    #[test]
    fn decay_clamps_to_ceiling() {
        let prev = Vec4::new(100.0, 7.9, 0.0, 1.0);
        let out = compose_fragment(prev, ZERO_BEAM, 0.5);
        assert_eq!(out.truncate(), Vec3::new(DECAY_CEILING, DECAY_CEILING, 0.5));
    }

    #[test]
    fn beam_wins_by_maximum_and_replaces_decay_rate() {
        let prev = Vec4::new(0.5, 3.0, 0.0, -1.0);
        let beam = Vec4::new(2.0, 0.1, 0.0, -0.25);
        let out = compose_fragment(prev, beam, 0.1);
        assert_eq!(out, Vec4::new(2.0, 2.9, 0.0, -0.25));
    }

    #[test]
    fn zero_beam_never_increases_magnitude() {
        let mut prev = Vec4::new(4.0, 2.0, 1.0, -0.8);
        for _ in 0..200 {
            let next = compose_fragment(prev, ZERO_BEAM, 0.016);
            assert!(next.truncate().length() <= prev.truncate().length() + 1e-6);
            prev = Vec4::new(next.x, next.y, next.z, -0.8);
        }
        assert!(prev.truncate().length() < 1e-3);
    }

    #[test]
    fn buffer_compose_matches_per_pixel_rule() {
        let prev = vec![Vec4::new(1.0, 1.0, 1.0, -2.0); 4];
        let beam = vec![
            Vec4::ZERO,
            Vec4::new(3.0, 0.0, 0.0, -0.5),
            Vec4::ZERO,
            Vec4::new(0.1, 0.1, 0.1, -0.5),
        ];
        let mut out = vec![Vec4::ZERO; 4];
        compose_buffer(&prev, &beam, &mut out, 0.25);
        for i in 0..4 {
            assert_eq!(out[i], compose_fragment(prev[i], beam[i], 0.25));
        }
    }
}
