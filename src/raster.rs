use crate::error::{BackdropError, BackdropResult};

/// Straight-alpha RGBA8 pixel (r, g, b, a), alpha not multiplied in.
pub type Rgba8 = [u8; 4];

/// Fixed-size straight-alpha RGBA8 raster.
///
/// Width and height are set at creation and the backing buffer always holds
/// exactly `width * height * 4` bytes. Pipeline stages produce new rasters;
/// a source raster handed to the pipeline is never written through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Raster {
    /// Fully transparent raster of the given size.
    pub fn new(width: u32, height: u32) -> BackdropResult<Self> {
        let len = expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; len],
        })
    }

    /// Wrap an existing RGBA8 buffer, checking its length against the dims.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> BackdropResult<Self> {
        let len = expected_len(width, height)?;
        if data.len() != len {
            return Err(BackdropError::validation(
                "raster buffer must match width*height*4",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Raster of the given size filled with one pixel value.
    pub fn from_pixel(width: u32, height: u32, px: Rgba8) -> BackdropResult<Self> {
        let len = expected_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: px.repeat(len / 4),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y). Panics when out of bounds, test/debug convenience.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height);
        let idx = ((y as usize * self.width as usize) + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

fn expected_len(width: u32, height: u32) -> BackdropResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| BackdropError::validation("raster size overflow"))
}

/// Decode an encoded image (any format the `image` crate handles) into a
/// straight-alpha RGBA8 raster.
pub fn decode_raster(bytes: &[u8]) -> BackdropResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| BackdropError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Raster::from_raw(width, height, rgba.into_raw())
}
