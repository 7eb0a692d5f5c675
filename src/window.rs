use minifb::{Window, WindowOptions};

use crate::{
    error::{BackdropError, BackdropResult},
    pipeline::Backdrop,
    raster::Raster,
};

pub use minifb::{Key, KeyRepeat};

/// Thin windowing adapter around a [`Backdrop`] panel.
///
/// Each `present` call queries the current window size, asks the panel to
/// paint itself stretched to that size, and pushes the pixels. A blank panel
/// draws nothing but keeps the window pumping events.
pub struct PanelWindow {
    window: Window,
}

impl PanelWindow {
    pub fn new(title: &str, width: usize, height: usize) -> BackdropResult<Self> {
        let window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| BackdropError::evaluation(format!("create window: {e}")))?;
        Ok(Self { window })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn key_pressed(&self, key: Key, repeat: KeyRepeat) -> bool {
        self.window.is_key_pressed(key, repeat)
    }

    /// Paint the panel into the window at its current size.
    pub fn present(&mut self, backdrop: &mut Backdrop) -> BackdropResult<()> {
        let (w, h) = self.window.get_size();
        match backdrop.paint(w as u32, h as u32) {
            Some(frame) => {
                let buf = pack_0rgb(&frame);
                self.window
                    .update_with_buffer(&buf, w, h)
                    .map_err(|e| BackdropError::evaluation(format!("update window: {e}")))?;
            }
            None => self.window.update(),
        }
        Ok(())
    }
}

/// Flatten straight RGBA over the opaque black window surface into the
/// `0RGB` u32 layout minifb expects.
fn pack_0rgb(frame: &Raster) -> Vec<u32> {
    frame
        .bytes()
        .chunks_exact(4)
        .map(|px| {
            let a = u32::from(px[3]);
            let r = (u32::from(px[0]) * a + 127) / 255;
            let g = (u32::from(px[1]) * a + 127) / 255;
            let b = (u32::from(px[2]) * a + 127) / 255;
            (r << 16) | (g << 8) | b
        })
        .collect()
}
