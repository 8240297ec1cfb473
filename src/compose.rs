// Composites the retained painting into the frame the window presents:
// backdrop, then the painting source-over, then a faint outline showing
// where the paintable region sits. The painting itself is never touched.

use crate::surface::PaintSurface;
use crate::types::{FrameBuffer, Rect, Rgba};

/// What shows through wherever nothing has been painted yet.
pub const BACKDROP: u32 = 0x00FF_FFFF;

/// Opacity of the boundary outline.
const BORDER_ALPHA: u8 = 50;

/// Build one presentable frame. `bounds` is the host-reported rectangle of
/// the paintable/source content within the viewport; it only drives the
/// outline, never the paint.
pub fn composite(frame: &mut FrameBuffer, surface: &PaintSurface, bounds: Option<Rect>) {
    for px in frame.pixels.iter_mut() {
        *px = BACKDROP;
    }

    // Blend the painting at native resolution; sizes can disagree for a
    // frame or two around a resize, so only the overlap is drawn.
    let w = frame.width.min(surface.width());
    let h = frame.height.min(surface.height());
    for y in 0..h {
        for x in 0..w {
            let src = Rgba::from_argb(surface.pixels()[y * surface.width() + x]);
            if src.a == 0 {
                continue;
            }
            let idx = y * frame.width + x;
            frame.pixels[idx] = blend_over_opaque(frame.pixels[idx], src);
        }
    }

    if let Some(rect) = bounds {
        draw_bounds_outline(frame, rect);
    }
}

/// Source-over onto an opaque 0x00RRGGBB pixel.
#[inline]
fn blend_over_opaque(dst: u32, src: Rgba) -> u32 {
    let a = src.a as u32;
    let inv = 255 - a;
    let dr = (dst >> 16) & 0xFF;
    let dg = (dst >> 8) & 0xFF;
    let db = dst & 0xFF;
    let r = (src.r as u32 * a + dr * inv + 127) / 255;
    let g = (src.g as u32 * a + dg * inv + 127) / 255;
    let b = (src.b as u32 * a + db * inv + 127) / 255;
    (r << 16) | (g << 8) | b
}

/// Thin faint rectangle marking the paintable region.
fn draw_bounds_outline(frame: &mut FrameBuffer, rect: Rect) {
    for x in rect.left..rect.right {
        border_pixel(frame, x, rect.top);
        border_pixel(frame, x, rect.bottom - 1);
    }
    // skip the corners so they are not darkened twice
    for y in (rect.top + 1)..(rect.bottom - 1) {
        border_pixel(frame, rect.left, y);
        border_pixel(frame, rect.right - 1, y);
    }
}

#[inline]
fn border_pixel(frame: &mut FrameBuffer, x: i32, y: i32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= frame.width || y >= frame.height {
        return;
    }
    let idx = y * frame.width + x;
    frame.pixels[idx] = blend_over_opaque(frame.pixels[idx], Rgba::new(0, 0, 0, BORDER_ALPHA));
}
