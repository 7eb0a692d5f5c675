#![forbid(unsafe_code)]

pub mod blur_cpu;
pub mod composite_cpu;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod scale_cpu;
#[cfg(feature = "window")]
pub mod window;

pub use error::{BackdropError, BackdropResult};
pub use pipeline::{Backdrop, EffectParams, process_image};
pub use raster::{Raster, Rgba8, decode_raster};
