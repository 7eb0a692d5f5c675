use crate::error::{BackdropError, BackdropResult};
use crate::raster::Rgba8;

/// Source-over blend of opaque black at constant alpha `factor` over `dst`,
/// straight alpha: `out = factor * black + (1 - factor) * dst` per channel,
/// alpha composited toward opaque under the same rule.
///
/// `factor` is taken as-is. Out-of-range values saturate only at the u8
/// conversion, they are not rejected.
pub fn darken(dst: Rgba8, factor: f32) -> Rgba8 {
    [
        lerp_u8(dst[0], 0, factor),
        lerp_u8(dst[1], 0, factor),
        lerp_u8(dst[2], 0, factor),
        lerp_u8(dst[3], 255, factor),
    ]
}

/// Treat the pixel as a source with constant alpha multiplier `opacity`
/// composited over a fully transparent canvas. In straight-alpha terms only
/// the alpha channel scales; color channels pass through.
pub fn apply_opacity(px: Rgba8, opacity: f32) -> Rgba8 {
    [px[0], px[1], px[2], scale_u8(px[3], opacity)]
}

pub fn darken_in_place(dst: &mut [u8], factor: f32) -> BackdropResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(BackdropError::evaluation(
            "darken_in_place expects an rgba8 buffer",
        ));
    }
    for px in dst.chunks_exact_mut(4) {
        let out = darken([px[0], px[1], px[2], px[3]], factor);
        px.copy_from_slice(&out);
    }
    Ok(())
}

pub fn apply_opacity_in_place(dst: &mut [u8], opacity: f32) -> BackdropResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(BackdropError::evaluation(
            "apply_opacity_in_place expects an rgba8 buffer",
        ));
    }
    for px in dst.chunks_exact_mut(4) {
        let out = apply_opacity([px[0], px[1], px[2], px[3]], opacity);
        px.copy_from_slice(&out);
    }
    Ok(())
}

fn lerp_u8(dst: u8, src: u8, t: f32) -> u8 {
    (f32::from(src) * t + f32::from(dst) * (1.0 - t))
        .round()
        .clamp(0.0, 255.0) as u8
}

fn scale_u8(v: u8, s: f32) -> u8 {
    (f32::from(v) * s).round().clamp(0.0, 255.0) as u8
}
