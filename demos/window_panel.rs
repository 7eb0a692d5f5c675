//! Interactive backdrop panel in a resizable window.
//!
//! Usage: `cargo run --features window --example window_panel [image-path]`
//!
//! Keys: Up/Down adjust blur, Left/Right adjust darkening, `[`/`]` adjust
//! opacity, Esc quits. The window stretches the image to its current size.

use std::path::Path;

use backdrop::Backdrop;
use backdrop::window::{Key, KeyRepeat, PanelWindow};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "media/bg1.jpg".to_string());
    let mut backdrop = Backdrop::from_path(Path::new(&path));

    let mut window = PanelWindow::new("backdrop", 960, 540)?;
    while window.is_open() && !window.esc_pressed() {
        let p = backdrop.params();
        if window.key_pressed(Key::Up, KeyRepeat::Yes) {
            backdrop.set_blur_radius(p.blur_radius + 0.5);
        }
        if window.key_pressed(Key::Down, KeyRepeat::Yes) {
            backdrop.set_blur_radius((p.blur_radius - 0.5).max(0.0));
        }
        if window.key_pressed(Key::Right, KeyRepeat::Yes) {
            backdrop.set_darkening_factor(p.darkening_factor + 0.05);
        }
        if window.key_pressed(Key::Left, KeyRepeat::Yes) {
            backdrop.set_darkening_factor((p.darkening_factor - 0.05).max(0.0));
        }
        if window.key_pressed(Key::RightBracket, KeyRepeat::Yes) {
            backdrop.set_overall_opacity((p.overall_opacity + 0.05).min(1.0));
        }
        if window.key_pressed(Key::LeftBracket, KeyRepeat::Yes) {
            backdrop.set_overall_opacity((p.overall_opacity - 0.05).max(0.0));
        }
        if backdrop.needs_repaint() {
            let q = backdrop.params();
            eprintln!(
                "blur {:.2}  darken {:.2}  opacity {:.2}",
                q.blur_radius, q.darkening_factor, q.overall_opacity
            );
        }
        window.present(&mut backdrop)?;
    }
    Ok(())
}
