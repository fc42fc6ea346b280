//! Tonemap compressor.
//!
//! Channels above 1.0 don't clip; the pixel blends toward white in
//! proportion to its total over-brightness, summed across channels. Pixels
//! at or below white pass through untouched. Output alpha is forced opaque:
//! this is the final display color. Mirrors `TONEMAP_SHADER`.

use glam::{Vec3, Vec4};

/// One tonemap invocation for a single pixel.
#[inline]
pub fn tonemap_fragment(color: Vec4) -> Vec4 {
    let overshoot = (color.truncate() - Vec3::ONE).max(Vec3::ZERO);
    let fac = (overshoot.x + overshoot.y + overshoot.z).clamp(0.0, 1.0);
    color.truncate().lerp(Vec3::ONE, fac).extend(1.0)
}

/// Tonemap a whole frame in place.
pub fn tonemap_buffer(pixels: &mut [Vec4]) {
    for p in pixels {
        *p = tonemap_fragment(*p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_overshoot_case() {
        // overshoot sum 0.5 -> halfway to white.
        let out = tonemap_fragment(Vec4::new(1.5, 0.2, 0.2, -3.0));
        assert!((out - Vec4::new(1.25, 0.6, 0.6, 1.0)).length() < 1e-6, "{out:?}");
    }

    #[test]
    fn in_gamut_colors_pass_through() {
        let out = tonemap_fragment(Vec4::new(0.9, 0.25, 0.0, -1.0));
        assert_eq!(out, Vec4::new(0.9, 0.25, 0.0, 1.0));
    }

    #[test]
    fn heavy_overshoot_saturates_to_white() {
        let out = tonemap_fragment(Vec4::new(4.0, 4.0, 4.0, 0.0));
        assert_eq!(out, Vec4::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn alpha_is_always_opaque() {
        assert_eq!(tonemap_fragment(Vec4::new(0.1, 0.1, 0.1, -200.0)).w, 1.0);
    }
}
