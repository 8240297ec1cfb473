// The photo being painted from. Decoded once by the host and held as a
// read-only packed-pixel buffer; the engine only ever reads single pixels
// out of it to pick stroke colors.

use crate::error::Error;
use crate::types::Rgba;

pub struct SourceImage {
    width: usize,
    height: usize,
    pixels: Vec<u32>, // 0xAARRGGBB, row-major
}

impl SourceImage {
    /// Decode a photo from disk into the packed buffer the sampler reads.
    pub fn open(path: &str) -> Result<Self, Error> {
        let img = image::open(path)
            .map_err(|e| Error::ImageLoad(format!("{path}: {e}")))?
            .to_rgba8();

        let (w, h) = img.dimensions();
        let mut pixels = Vec::with_capacity((w as usize) * (h as usize));
        for px in img.pixels() {
            let [r, g, b, a] = px.0;
            pixels.push(Rgba::new(r, g, b, a).to_argb());
        }

        Ok(Self::from_pixels(w as usize, h as usize, pixels))
    }

    /// Wrap an already-packed buffer. `pixels.len()` must be `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u32>) -> Self {
        assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A width x height image filled with one color (handy in tests).
    pub fn solid(width: usize, height: usize, color: Rgba) -> Self {
        Self::from_pixels(width, height, vec![color.to_argb(); width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Rgba {
        Rgba::from_argb(self.pixels[y * self.width + x])
    }
}

/// Read the pixel under (x, y), clamping into bounds first. Touch
/// coordinates routinely land slightly outside the viewport; clamping is
/// the policy here, not an error.
pub fn sample(image: &SourceImage, x: f32, y: f32) -> Rgba {
    let cx = x.clamp(0.0, (image.width - 1) as f32) as usize;
    let cy = y.clamp(0.0, (image.height - 1) as f32) as usize;
    image.get_pixel(cx, cy)
}
