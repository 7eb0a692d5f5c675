use std::path::Path;

use crate::{
    blur_cpu, composite_cpu,
    error::{BackdropError, BackdropResult},
    raster::{Raster, decode_raster},
    scale_cpu,
};

/// Effect knobs for the backdrop pipeline.
///
/// Values are applied as-is: nothing clamps or rejects out-of-range input,
/// the blend arithmetic saturates where it must (permissive by design).
/// `blur_radius <= 0` disables blur, `darkening_factor <= 0` disables the
/// black overlay, `overall_opacity >= 1` disables the opacity stage.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EffectParams {
    pub blur_radius: f32,
    pub darkening_factor: f32,
    pub overall_opacity: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            blur_radius: 1.5,
            darkening_factor: 0.6,
            overall_opacity: 1.0,
        }
    }
}

impl EffectParams {
    pub fn from_json(s: &str) -> BackdropResult<Self> {
        serde_json::from_str(s).map_err(|e| BackdropError::serde(e.to_string()))
    }

    pub fn to_json(&self) -> BackdropResult<String> {
        serde_json::to_string(self).map_err(|e| BackdropError::serde(e.to_string()))
    }
}

/// Run blur, darken and opacity in that fixed order over `source`,
/// producing a new raster. The source is never written through; skipped
/// stages pass the working image along untouched.
#[tracing::instrument(skip(source), fields(width = source.width(), height = source.height()))]
pub fn process_image(source: &Raster, params: EffectParams) -> BackdropResult<Raster> {
    let (w, h) = (source.width(), source.height());
    let mut current = source.clone();

    if params.blur_radius > 0.0 {
        let blurred = blur_cpu::blur_rgba8(current.bytes(), w, h, params.blur_radius)?;
        current = Raster::from_raw(w, h, blurred)?;
    }
    if params.darkening_factor > 0.0 {
        composite_cpu::darken_in_place(current.bytes_mut(), params.darkening_factor)?;
    }
    if params.overall_opacity < 1.0 {
        composite_cpu::apply_opacity_in_place(current.bytes_mut(), params.overall_opacity)?;
    }
    Ok(current)
}

/// Panel state: the decoded source image, the derived image, and the current
/// effect parameters.
///
/// Each setter stores its value, reruns the full pipeline from the original
/// source synchronously, and raises the repaint flag. A missing or
/// undecodable source is logged and leaves the panel blank; nothing
/// propagates to the caller.
#[derive(Clone, Debug)]
pub struct Backdrop {
    source: Option<Raster>,
    processed: Option<Raster>,
    params: EffectParams,
    needs_repaint: bool,
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::empty()
    }
}

impl Backdrop {
    /// Blank panel with default parameters and no image.
    pub fn empty() -> Self {
        Self {
            source: None,
            processed: None,
            params: EffectParams::default(),
            needs_repaint: true,
        }
    }

    /// Decode the background from encoded bytes. Decode failures are logged
    /// and leave the panel blank.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::with_params(bytes, EffectParams::default())
    }

    pub fn with_params(bytes: &[u8], params: EffectParams) -> Self {
        let source = match decode_raster(bytes) {
            Ok(raster) => Some(raster),
            Err(err) => {
                tracing::warn!(%err, "background image failed to decode");
                None
            }
        };
        let mut panel = Self {
            source,
            processed: None,
            params,
            needs_repaint: true,
        };
        panel.reprocess();
        panel
    }

    /// Read and decode the background from a file path. Read failures are
    /// logged and leave the panel blank.
    pub fn from_path(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "background image not found");
                Self::empty()
            }
        }
    }

    pub fn params(&self) -> EffectParams {
        self.params
    }

    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// Current derived image, `None` when the source failed to load.
    pub fn processed(&self) -> Option<&Raster> {
        self.processed.as_ref()
    }

    pub fn set_blur_radius(&mut self, blur_radius: f32) {
        self.params.blur_radius = blur_radius;
        self.reprocess();
    }

    pub fn set_darkening_factor(&mut self, darkening_factor: f32) {
        self.params.darkening_factor = darkening_factor;
        self.reprocess();
    }

    pub fn set_overall_opacity(&mut self, overall_opacity: f32) {
        self.params.overall_opacity = overall_opacity;
        self.reprocess();
    }

    pub fn set_params(&mut self, params: EffectParams) {
        self.params = params;
        self.reprocess();
    }

    /// True after any parameter change until the next `paint`.
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Render the derived image stretched to exactly `width x height` with
    /// bilinear interpolation, or `None` when there is nothing to draw.
    /// Clears the repaint flag.
    pub fn paint(&mut self, width: u32, height: u32) -> Option<Raster> {
        self.needs_repaint = false;
        let img = self.processed.as_ref()?;
        let scaled =
            match scale_cpu::resize_bilinear_rgba8(img.bytes(), img.width(), img.height(), width, height)
            {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(%err, "scaled render failed");
                    return None;
                }
            };
        match Raster::from_raw(width, height, scaled) {
            Ok(raster) => Some(raster),
            Err(err) => {
                tracing::warn!(%err, "scaled render produced a bad buffer");
                None
            }
        }
    }

    fn reprocess(&mut self) {
        self.processed = match &self.source {
            Some(src) => match process_image(src, self.params) {
                Ok(img) => Some(img),
                Err(err) => {
                    tracing::warn!(%err, "effects pipeline failed");
                    None
                }
            },
            None => None,
        };
        self.needs_repaint = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> Raster {
        Raster::from_pixel(w, h, px).unwrap()
    }

    #[test]
    fn all_stages_disabled_is_identity() {
        let src = solid(4, 4, [40, 80, 120, 200]);
        let params = EffectParams {
            blur_radius: 0.0,
            darkening_factor: 0.0,
            overall_opacity: 1.0,
        };
        let out = process_image(&src, params).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn stages_run_in_fixed_order() {
        // Darken then opacity: red at darken 0.5 gives (128,0,0,255), and
        // opacity 0.5 then halves only the alpha.
        let src = solid(2, 2, [255, 0, 0, 255]);
        let params = EffectParams {
            blur_radius: 0.0,
            darkening_factor: 0.5,
            overall_opacity: 0.5,
        };
        let out = process_image(&src, params).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.pixel(x, y), [128, 0, 0, 128]);
            }
        }
    }

    #[test]
    fn opacity_at_or_above_1_is_skipped() {
        let src = solid(2, 2, [10, 20, 30, 200]);
        let params = EffectParams {
            blur_radius: 0.0,
            darkening_factor: 0.0,
            overall_opacity: 3.0,
        };
        let out = process_image(&src, params).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn default_params_match_original_configuration() {
        let p = EffectParams::default();
        assert_eq!(p.blur_radius, 1.5);
        assert_eq!(p.darkening_factor, 0.6);
        assert_eq!(p.overall_opacity, 1.0);
    }

    #[test]
    fn params_json_round_trip() {
        let p = EffectParams {
            blur_radius: 2.25,
            darkening_factor: 0.1,
            overall_opacity: 0.75,
        };
        let json = p.to_json().unwrap();
        assert_eq!(EffectParams::from_json(&json).unwrap(), p);
    }

    #[test]
    fn params_json_missing_fields_take_defaults() {
        let p = EffectParams::from_json(r#"{ "blur_radius": 4.0 }"#).unwrap();
        assert_eq!(p.blur_radius, 4.0);
        assert_eq!(p.darkening_factor, 0.6);
        assert_eq!(p.overall_opacity, 1.0);
    }

    #[test]
    fn setters_raise_repaint_flag() {
        let mut panel = Backdrop::empty();
        assert!(panel.needs_repaint());
        panel.paint(8, 8);
        assert!(!panel.needs_repaint());
        panel.set_blur_radius(2.0);
        assert!(panel.needs_repaint());
    }

    #[test]
    fn blank_panel_paints_nothing() {
        let mut panel = Backdrop::from_bytes(b"not an image");
        assert!(panel.source().is_none());
        assert!(panel.processed().is_none());
        assert!(panel.paint(64, 64).is_none());
    }

    #[test]
    fn missing_path_leaves_panel_blank() {
        let mut panel = Backdrop::from_path(Path::new("/nonexistent/bg1.jpg"));
        assert!(panel.paint(32, 32).is_none());
    }
}
