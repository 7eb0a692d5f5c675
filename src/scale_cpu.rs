use crate::error::{BackdropError, BackdropResult};

/// Bilinear resample of a straight RGBA8 buffer to exactly `dw x dh`.
///
/// The image is stretched to fill the target rect: no aspect-ratio
/// preservation, no letterboxing. Zero-sized targets yield an empty buffer.
pub fn resize_bilinear_rgba8(
    src: &[u8],
    sw: u32,
    sh: u32,
    dw: u32,
    dh: u32,
) -> BackdropResult<Vec<u8>> {
    let src_len = (sw as usize)
        .checked_mul(sh as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BackdropError::evaluation("resize buffer size overflow"))?;
    if src.len() != src_len {
        return Err(BackdropError::evaluation(
            "resize_bilinear_rgba8 expects src matching width*height*4",
        ));
    }
    if sw == 0 || sh == 0 {
        return Err(BackdropError::evaluation(
            "resize_bilinear_rgba8 source must be non-empty",
        ));
    }
    if dw == 0 || dh == 0 {
        return Ok(Vec::new());
    }

    let dst_len = (dw as usize)
        .checked_mul(dh as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BackdropError::evaluation("resize buffer size overflow"))?;
    let mut out = vec![0u8; dst_len];

    let x_ratio = sw as f32 / dw as f32;
    let y_ratio = sh as f32 / dh as f32;
    let sw_us = sw as usize;

    for dy in 0..dh {
        // Pixel-center mapping, clamped so the sample window stays in bounds.
        let fy = ((dy as f32 + 0.5) * y_ratio - 0.5).clamp(0.0, (sh - 1) as f32);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(sh as usize - 1);
        let ty = fy - y0 as f32;

        for dx in 0..dw {
            let fx = ((dx as f32 + 0.5) * x_ratio - 0.5).clamp(0.0, (sw - 1) as f32);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(sw_us - 1);
            let tx = fx - x0 as f32;

            let i00 = (y0 * sw_us + x0) * 4;
            let i10 = (y0 * sw_us + x1) * 4;
            let i01 = (y1 * sw_us + x0) * 4;
            let i11 = (y1 * sw_us + x1) * 4;

            let out_idx = ((dy as usize) * (dw as usize) + dx as usize) * 4;
            for c in 0..4 {
                let top = lerp(f32::from(src[i00 + c]), f32::from(src[i10 + c]), tx);
                let bot = lerp(f32::from(src[i01 + c]), f32::from(src[i11 + c]), tx);
                out[out_idx + c] = lerp(top, bot, ty).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(out)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
