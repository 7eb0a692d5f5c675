use std::f64::consts::PI;

use crate::error::{BackdropError, BackdropResult};

/// Normalized 2D Gaussian kernel, row-major, side `2 * half_width + 1`.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    half_width: i32,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// Build the kernel for a blur radius.
    ///
    /// Half-width is `max(1, floor(radius))` and sigma is `radius / 3`.
    /// Weights follow the 2D Gaussian density and are renormalized to sum
    /// to 1, which corrects for truncating the tails to the finite window.
    pub fn new(blur_radius: f32) -> BackdropResult<Self> {
        if !blur_radius.is_finite() || blur_radius <= 0.0 {
            return Err(BackdropError::validation(
                "blur radius must be finite and > 0",
            ));
        }

        let half_width = (blur_radius.floor() as i32).max(1);
        let side = (2 * half_width + 1) as usize;
        let sigma = f64::from(blur_radius) / 3.0;
        let denom = 2.0 * sigma * sigma;
        let norm = 1.0 / (2.0 * PI * sigma * sigma);

        let mut weights = Vec::with_capacity(side * side);
        let mut sum = 0.0f64;
        for y in -half_width..=half_width {
            for x in -half_width..=half_width {
                let d2 = f64::from(x * x + y * y);
                let w = (-d2 / denom).exp() * norm;
                weights.push(w);
                sum += w;
            }
        }
        if !sum.is_finite() || sum <= 0.0 {
            return Err(BackdropError::evaluation("gaussian kernel sum is zero"));
        }
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self { half_width, weights })
    }

    pub fn half_width(&self) -> i32 {
        self.half_width
    }

    pub fn side(&self) -> usize {
        (2 * self.half_width + 1) as usize
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

/// Convolve a straight RGBA8 buffer with the Gaussian kernel for `blur_radius`.
///
/// All four channels are convolved identically, alpha included. Pixels whose
/// kernel window would leave the image are copied from the source untouched
/// (no-op edge policy). A radius <= 0 returns the input unchanged.
pub fn blur_rgba8(
    src: &[u8],
    width: u32,
    height: u32,
    blur_radius: f32,
) -> BackdropResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BackdropError::evaluation("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(BackdropError::evaluation(
            "blur_rgba8 expects src matching width*height*4",
        ));
    }
    if blur_radius <= 0.0 {
        return Ok(src.to_vec());
    }

    let kernel = GaussianKernel::new(blur_radius)?;
    let hw = kernel.half_width();
    let side = kernel.side() as i32;
    let w = width as i32;
    let h = height as i32;

    // Edge pixels keep their source value, so start from a copy and only
    // overwrite pixels with a fully interior kernel window.
    let mut out = src.to_vec();
    for y in hw..h - hw {
        for x in hw..w - hw {
            let mut acc = [0.0f64; 4];
            for ky in -hw..=hw {
                for kx in -hw..=hw {
                    let kw = kernel.weights()[((ky + hw) * side + (kx + hw)) as usize];
                    let idx = (((y + ky) * w + (x + kx)) as usize) * 4;
                    for c in 0..4 {
                        acc[c] += kw * f64::from(src[idx + c]);
                    }
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                out[out_idx + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blur_radius_0_is_identity() {
        let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let out = blur_rgba8(&src, 1, 2, 0.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn kernel_half_width_is_floor_with_min_1() {
        assert_eq!(GaussianKernel::new(0.5).unwrap().half_width(), 1);
        assert_eq!(GaussianKernel::new(1.0).unwrap().half_width(), 1);
        assert_eq!(GaussianKernel::new(2.7).unwrap().half_width(), 2);
        assert_eq!(GaussianKernel::new(5.0).unwrap().half_width(), 5);
    }

    #[test]
    fn kernel_weights_sum_to_one() {
        for radius in [0.3f32, 1.0, 1.5, 3.0, 7.2] {
            let k = GaussianKernel::new(radius).unwrap();
            let sum: f64 = k.weights().iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "radius {radius}: sum {sum}");
            assert_eq!(k.weights().len(), k.side() * k.side());
        }
    }

    #[test]
    fn blur_constant_image_is_identity() {
        let (w, h) = (6u32, 5u32);
        let px = [10u8, 20, 30, 40];
        let src = px.repeat((w * h) as usize);
        let out = blur_rgba8(&src, w, h, 3.0).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn edge_pixels_are_copied_from_source() {
        let (w, h) = (6u32, 6u32);
        let mut src = vec![0u8; (w * h * 4) as usize];
        for y in 0..h {
            for x in 0..w {
                let idx = ((y * w + x) * 4) as usize;
                // Curved field: a linear ramp would survive a symmetric
                // kernel unchanged and prove nothing about the interior.
                let v = (x * x * 6 + y * y * 3) as u8;
                src[idx..idx + 4].copy_from_slice(&[v, (x * 40 + y * 7) as u8, 200, 255]);
            }
        }

        let out = blur_rgba8(&src, w, h, 1.5).unwrap();

        // half-width 1: the outermost ring must be bit-identical.
        for y in 0..h {
            for x in 0..w {
                if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                    let idx = ((y * w + x) * 4) as usize;
                    assert_eq!(&out[idx..idx + 4], &src[idx..idx + 4], "edge ({x},{y})");
                }
            }
        }
        assert_ne!(out, src, "interior of a gradient must change");
    }

    #[test]
    fn blur_spreads_energy_from_single_pixel() {
        let (w, h) = (9u32, 9u32);
        let mut src = vec![0u8; (w * h * 4) as usize];
        let center = ((4 * w + 4) * 4) as usize;
        src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

        let out = blur_rgba8(&src, w, h, 2.0).unwrap();

        let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(nonzero > 1);
        assert!(out[center + 3] < 255);
    }

    #[test]
    fn blur_rejects_mismatched_buffer() {
        assert!(blur_rgba8(&[0u8; 10], 2, 2, 1.0).is_err());
    }
}
