// What you SEE now:
// • A blank canvas sized to your photo; the photo itself stays hidden.
// • Hold Left Mouse and move: strokes appear, colored by the photo pixel
//   under the cursor. Faster strokes leave bigger marks.
// • 1/2/3 pick the brush (circle / square / line).
// • C clears the painting. S saves it as a PNG. ESC quits.

use impasto::compose;
use impasto::draw::{Drawer, draw_text_5x7};
use impasto::engine::StrokeEngine;
use impasto::error::Error;
use impasto::source::SourceImage;
use impasto::types::{
    BrushConfig, FrameBuffer, PointerAction, PointerBatch, Rect, Rgba, TouchSample,
};
use std::time::Instant;

const DEFAULT_PHOTO: &str = "photo.png";
const SAVE_PATH: &str = "painting.png";

// minifb has a single mouse; it paints as pointer id 0. The engine itself
// handles any number of concurrent pointer ids.
const MOUSE_POINTER_ID: i32 = 0;

fn main() -> Result<(), Error> {
    env_logger::init();

    /* --- Source photo ---
       Visual: nothing yet; this is the color well strokes will dip into. */
    let photo_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_PHOTO.to_string());
    let photo = match SourceImage::open(&photo_path) {
        Ok(img) => Some(img),
        Err(e) => {
            log::warn!("{e}; painting with the fallback color");
            None
        }
    };

    /* --- Window + engine setup ---
       Visual: a white canvas opens, sized to the photo. */
    let (w, h) = photo
        .as_ref()
        .map(|p| (p.width(), p.height()))
        .unwrap_or((800, 600));
    let mut drawer = Drawer::new("Impasto", w, h)?;

    let mut engine = StrokeEngine::new();
    engine.ensure_surface_size(w, h);
    let mut screen = FrameBuffer::new(w, h);

    let mut config = BrushConfig::default();
    let started = Instant::now();
    let mut mouse_was_down = false;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        /* 1) Follow the window size; the painting keeps its overlap. */
        let (win_w, win_h) = drawer.size();
        if win_w != screen.width || win_h != screen.height {
            engine.ensure_surface_size(win_w, win_h);
            screen = FrameBuffer::new(win_w, win_h);
        }

        /* 2) Keyboard: brush selection, clear, save. */
        if let Some(brush) = drawer.brush_key_pressed() {
            log::info!("brush set to {}", brush.label());
            config.brush = brush;
        }
        if drawer.c_pressed_once() {
            engine.clear();
        }
        if drawer.s_pressed_once() {
            // a failed save is logged, not fatal
            if let Err(e) = save_snapshot(&engine, SAVE_PATH) {
                log::error!("{e}");
            }
        }

        /* 3) Mouse state becomes this frame's pointer batch.
           Visual: press paints the first minimum-size mark; dragging
           extends the stroke. */
        let mouse_down = drawer.left_mouse_down();
        let action = match (mouse_was_down, mouse_down) {
            (false, true) => Some(PointerAction::Down),
            (true, true) => Some(PointerAction::Move),
            (true, false) => Some(PointerAction::Up),
            (false, false) => None,
        };
        if let (Some(action), Some((mx, my))) = (action, drawer.mouse_pos()) {
            let batch = PointerBatch {
                pointer_id: MOUSE_POINTER_ID,
                action,
                history: Vec::new(), // minifb reports no coalesced sub-samples
                sample: TouchSample::new(mx, my, started.elapsed().as_millis() as i64),
            };
            engine.process_batch(&batch, &config, photo.as_ref());
        }
        mouse_was_down = mouse_down;

        /* 4) Composite the retained painting into the frame and present. */
        let bounds = photo.as_ref().map(|p| {
            Rect::new(
                0,
                0,
                p.width().min(screen.width) as i32,
                p.height().min(screen.height) as i32,
            )
        });
        compose::composite(&mut screen, engine.surface(), bounds);

        let hud = if photo.is_some() {
            format!(
                "BRUSH: {} | 1/2/3: BRUSH  C: CLEAR  S: SAVE",
                config.brush.label()
            )
        } else {
            format!("NO PHOTO | BRUSH: {}", config.brush.label())
        };
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x0044_4444);

        drawer.present(&screen)?;
    }

    Ok(())
}

/// Encode the current painting (straight RGBA) and write it to disk.
fn save_snapshot(engine: &StrokeEngine, path: &str) -> Result<(), Error> {
    let snap = engine.snapshot();
    let mut bytes = Vec::with_capacity(snap.pixels.len() * 4);
    for px in &snap.pixels {
        let c = Rgba::from_argb(*px);
        bytes.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }
    let img = image::RgbaImage::from_raw(snap.width as u32, snap.height as u32, bytes)
        .ok_or_else(|| Error::ImageSave("snapshot buffer has the wrong length".into()))?;
    img.save(path)
        .map_err(|e| Error::ImageSave(format!("{path}: {e}")))?;
    log::info!("painting saved to {path}");
    Ok(())
}
