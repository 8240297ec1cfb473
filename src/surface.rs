// The retained painting. An off-screen 0xAARRGGBB buffer that accumulates
// every stroke and outlives individual frames; the window is redrawn *from*
// this, never into it.
//
// All drawing blends source-over with 8-bit integer math. Out-of-bounds
// pixels are skipped, never an error.

use crate::types::{Rgba, Shape};

/// Stamp radius used to give line-brush segments their stroke width.
const SEGMENT_STAMP_RADIUS: f32 = 2.0;

pub struct PaintSurface {
    width: usize,
    height: usize,
    pixels: Vec<u32>, // 0xAARRGGBB, row-major; 0 = fully transparent
}

/// A decoupled copy of the raster. Later strokes never show up in an
/// already-taken snapshot.
#[derive(Clone)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl PaintSurface {
    /// Starts empty; the buffer is allocated on the first `ensure_size`.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            pixels: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Match the surface to the viewport. On change the buffer is replaced,
    /// pixels valid in both sizes are carried over, and any newly exposed
    /// area stays transparent.
    pub fn ensure_size(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        log::debug!(
            "surface resize {}x{} -> {}x{}",
            self.width,
            self.height,
            width,
            height
        );
        let mut pixels = vec![0u32; width * height];
        let copy_w = self.width.min(width);
        for y in 0..self.height.min(height) {
            let src = y * self.width;
            let dst = y * width;
            pixels[dst..dst + copy_w].copy_from_slice(&self.pixels[src..src + copy_w]);
        }
        self.width = width;
        self.height = height;
        self.pixels = pixels;
    }

    /// Wipe the painting back to fully transparent.
    pub fn clear(&mut self) {
        for px in &mut self.pixels {
            *px = 0;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        Rgba::from_argb(self.pixels[y * self.width + x])
    }

    /// Rasterize one brush mark with the given color.
    pub fn draw_shape(&mut self, shape: &Shape, color: Rgba) {
        match *shape {
            Shape::Disc { cx, cy, radius } => self.fill_disc(cx, cy, radius, color),
            Shape::Square { cx, cy, half } => self.fill_square(cx, cy, half, color),
            Shape::Segment { x0, y0, x1, y1 } => self.stroke_segment(x0, y0, x1, y1, color),
        }
    }

    /// Scan the disc's bounding box and blend every pixel inside the circle.
    fn fill_disc(&mut self, cx: f32, cy: f32, radius: f32, color: Rgba) {
        let r2 = radius * radius;
        let x0 = (cx - radius).floor() as i32;
        let x1 = (cx + radius).ceil() as i32;
        let y0 = (cy - radius).floor() as i32;
        let y1 = (cy + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }

    /// Axis-aligned square [cx-half, cy-half, cx+half, cy+half].
    fn fill_square(&mut self, cx: f32, cy: f32, half: f32, color: Rgba) {
        let x0 = (cx - half).round() as i32;
        let x1 = (cx + half).round() as i32;
        let y0 = (cy - half).round() as i32;
        let y1 = (cy + half).round() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Stamp small discs every ~2 px along the segment for a thick line.
    fn stroke_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let dist = (dx * dx + dy * dy).sqrt();
        if !dist.is_finite() {
            return;
        }
        let steps = (dist / 2.0).ceil().max(1.0) as i32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.fill_disc(x0 + dx * t, y0 + dy * t, SEGMENT_STAMP_RADIUS, color);
        }
    }

    /// Blend one pixel source-over; out-of-bounds writes are skipped.
    /// Fully opaque paint overwrites exactly.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = y * self.width + x;
        if color.a == 255 {
            self.pixels[idx] = color.to_argb();
            return;
        }
        if color.a == 0 {
            return;
        }
        let dst = Rgba::from_argb(self.pixels[idx]);
        self.pixels[idx] = over(color, dst).to_argb();
    }
}

/// Straight-alpha source-over: a stroke covers what is underneath in
/// proportion to its opacity, and coverage accumulates toward opaque. On a
/// fully transparent destination the source color survives unchanged.
#[inline]
fn over(src: Rgba, dst: Rgba) -> Rgba {
    let sa = src.a as u32;
    let da = dst.a as u32;
    // total coverage, scaled by 255
    let acc = sa * 255 + da * (255 - sa);
    if acc == 0 {
        return Rgba::new(0, 0, 0, 0);
    }
    let channel = |cs: u8, cd: u8| -> u8 {
        let num = cs as u32 * sa * 255 + cd as u32 * da * (255 - sa);
        ((num + acc / 2) / acc) as u8
    };
    Rgba {
        r: channel(src.r, dst.r),
        g: channel(src.g, dst.g),
        b: channel(src.b, dst.b),
        a: ((acc + 127) / 255) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPAQUE_RED: Rgba = Rgba::new(200, 10, 10, 255);
    const OPAQUE_BLUE: Rgba = Rgba::new(10, 10, 200, 255);

    fn surface(w: usize, h: usize) -> PaintSurface {
        let mut s = PaintSurface::new();
        s.ensure_size(w, h);
        s
    }

    #[test]
    fn over_keeps_the_source_color_on_a_transparent_destination() {
        let src = Rgba::new(200, 50, 10, 128);
        assert_eq!(over(src, Rgba::new(0, 0, 0, 0)), src);
    }

    #[test]
    fn over_on_an_opaque_destination_stays_opaque() {
        let out = over(Rgba::new(255, 0, 0, 128), Rgba::new(0, 0, 255, 255));
        assert_eq!(out.a, 255);
        assert!(out.r > 0 && out.r < 255);
        assert!(out.b > 0 && out.b < 255);
    }

    #[test]
    fn opaque_shapes_overwrite_their_centers_exactly() {
        let mut s = surface(64, 64);
        s.draw_shape(
            &Shape::Disc {
                cx: 10.0,
                cy: 10.0,
                radius: 4.0,
            },
            OPAQUE_RED,
        );
        s.draw_shape(
            &Shape::Square {
                cx: 40.0,
                cy: 40.0,
                half: 4.0,
            },
            OPAQUE_BLUE,
        );
        assert_eq!(s.pixel(10, 10), OPAQUE_RED);
        assert_eq!(s.pixel(40, 40), OPAQUE_BLUE);
        // disjoint shapes leave the space between untouched
        assert_eq!(s.pixel(25, 25).a, 0);
    }

    #[test]
    fn first_partial_stroke_keeps_its_own_color_and_alpha() {
        let mut s = surface(16, 16);
        let paint = Rgba::new(200, 40, 0, 128);
        s.draw_shape(
            &Shape::Disc {
                cx: 8.0,
                cy: 8.0,
                radius: 1.0,
            },
            paint,
        );
        assert_eq!(s.pixel(8, 8), paint);
    }

    #[test]
    fn partial_alpha_blends_strictly_between_the_sources() {
        let mut s = surface(16, 16);
        let first = Rgba::new(200, 0, 0, 128);
        let second = Rgba::new(0, 0, 200, 128);
        let dot = Shape::Disc {
            cx: 8.0,
            cy: 8.0,
            radius: 1.0,
        };
        s.draw_shape(&dot, first);
        s.draw_shape(&dot, second);

        let px = s.pixel(8, 8);
        assert!(px.r > 0 && px.r < 200); // between second.r and first.r
        assert!(px.b > 0 && px.b < 200); // between first.b and second.b
        assert!(px.a > 128); // coverage accumulated
    }

    #[test]
    fn disc_respects_its_radius() {
        let mut s = surface(64, 64);
        s.draw_shape(
            &Shape::Disc {
                cx: 32.0,
                cy: 32.0,
                radius: 8.0,
            },
            OPAQUE_RED,
        );
        assert_eq!(s.pixel(32 + 8, 32), OPAQUE_RED); // on the rim
        assert_eq!(s.pixel(32 + 9, 32).a, 0); // just outside
        assert_eq!(s.pixel(32 + 7, 32 + 7).a, 0); // outside the corner arc
    }

    #[test]
    fn segment_paints_along_its_whole_length() {
        let mut s = surface(64, 64);
        s.draw_shape(
            &Shape::Segment {
                x0: 5.0,
                y0: 5.0,
                x1: 55.0,
                y1: 55.0,
            },
            OPAQUE_RED,
        );
        assert_eq!(s.pixel(5, 5), OPAQUE_RED);
        assert_eq!(s.pixel(30, 30), OPAQUE_RED);
        assert_eq!(s.pixel(55, 55), OPAQUE_RED);
        assert_eq!(s.pixel(55, 5).a, 0);
    }

    #[test]
    fn clear_resets_every_pixel_to_transparent() {
        let mut s = surface(32, 32);
        s.draw_shape(
            &Shape::Square {
                cx: 16.0,
                cy: 16.0,
                half: 10.0,
            },
            OPAQUE_RED,
        );
        s.clear();
        let snap = s.snapshot();
        assert_eq!(snap.width, 32);
        assert_eq!(snap.height, 32);
        assert!(snap.pixels.iter().all(|&px| px == 0));
    }

    #[test]
    fn resize_preserves_overlap_and_grows_transparent() {
        let mut s = surface(32, 32);
        s.draw_shape(
            &Shape::Square {
                cx: 4.0,
                cy: 4.0,
                half: 2.0,
            },
            OPAQUE_RED,
        );
        s.ensure_size(48, 24);
        assert_eq!(s.pixel(4, 4), OPAQUE_RED); // valid in both sizes
        assert_eq!(s.pixel(40, 10).a, 0); // newly exposed area
        assert_eq!(s.width(), 48);
        assert_eq!(s.height(), 24);

        // shrinking then growing loses the content outside the small size
        s.ensure_size(2, 2);
        s.ensure_size(32, 32);
        assert_eq!(s.pixel(4, 4).a, 0);
    }

    #[test]
    fn ensure_size_with_no_prior_surface_allocates_fresh() {
        let mut s = PaintSurface::new();
        assert_eq!(s.width(), 0);
        s.ensure_size(10, 10);
        assert!(s.snapshot().pixels.iter().all(|&px| px == 0));
    }

    #[test]
    fn snapshot_is_decoupled_from_later_strokes() {
        let mut s = surface(16, 16);
        let snap = s.snapshot();
        s.draw_shape(
            &Shape::Disc {
                cx: 8.0,
                cy: 8.0,
                radius: 4.0,
            },
            OPAQUE_RED,
        );
        assert!(snap.pixels.iter().all(|&px| px == 0));
        assert_eq!(s.pixel(8, 8), OPAQUE_RED);
    }

    #[test]
    fn drawing_off_the_edge_is_silently_clipped() {
        let mut s = surface(16, 16);
        s.draw_shape(
            &Shape::Disc {
                cx: 0.0,
                cy: 0.0,
                radius: 6.0,
            },
            OPAQUE_RED,
        );
        s.draw_shape(
            &Shape::Square {
                cx: 100.0,
                cy: 100.0,
                half: 4.0,
            },
            OPAQUE_BLUE,
        );
        assert_eq!(s.pixel(0, 0), OPAQUE_RED);
    }
}
