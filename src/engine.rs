// The stroke engine ties one pointer-event batch together: look up the
// pointer's track, pick a paint color from the photo, synthesize the brush
// geometry, and rasterize it onto the retained surface.
//
// All state is per-pointer except the surface itself; concurrent pointers
// interleave freely as long as the host delivers events on one thread.

use crate::brush;
use crate::source::{self, SourceImage};
use crate::surface::{PaintSurface, Snapshot};
use crate::tracker::PointerTracks;
use crate::types::{BrushConfig, PointerBatch, Rgba};

pub struct StrokeEngine {
    tracks: PointerTracks,
    surface: PaintSurface,
    active_color: Rgba, // last sampled photo color; reused while no photo is ready
}

impl StrokeEngine {
    pub fn new() -> Self {
        Self {
            tracks: PointerTracks::new(),
            surface: PaintSurface::new(),
            active_color: Rgba::RED,
        }
    }

    pub fn surface(&self) -> &PaintSurface {
        &self.surface
    }

    pub fn tracks(&self) -> &PointerTracks {
        &self.tracks
    }

    /// Keep the retained surface matched to the viewport.
    pub fn ensure_surface_size(&mut self, width: usize, height: usize) {
        self.surface.ensure_size(width, height);
    }

    /// Wipe the painting. Returns true so the host schedules a redraw.
    pub fn clear(&mut self) -> bool {
        log::info!("painting cleared");
        self.surface.clear();
        true
    }

    /// Decoupled copy of the current painting for the host to save or show.
    pub fn snapshot(&self) -> Snapshot {
        self.surface.snapshot()
    }

    /// Process one pointer-event batch. Returns true when the surface
    /// changed and the host should composite a fresh frame.
    pub fn process_batch(
        &mut self,
        batch: &PointerBatch,
        config: &BrushConfig,
        image: Option<&SourceImage>,
    ) -> bool {
        let prior = self.tracks.get_or_create(batch.pointer_id).prior();

        // Resample the paint color on every batch so a stroke drifts across
        // the photo's colors as it moves. No photo yet: keep the last color.
        if let Some(img) = image {
            self.active_color = source::sample(img, batch.sample.x, batch.sample.y);
        }
        let color = self.active_color.with_alpha(config.alpha);

        let shapes = brush::batch_shapes(config.brush, prior, batch, config.min_radius);
        for shape in &shapes {
            self.surface.draw_shape(shape, color);
        }

        if batch.action.is_terminal() {
            // Marks for the terminal event (if any) are already down; the
            // track must not survive the gesture.
            self.tracks.remove(batch.pointer_id);
            log::debug!("pointer {} gesture ended", batch.pointer_id);
        } else {
            if batch.action.is_start() {
                log::debug!(
                    "pointer {} gesture started at ({:.1}, {:.1})",
                    batch.pointer_id,
                    batch.sample.x,
                    batch.sample.y
                );
            }
            self.tracks.update(
                batch.pointer_id,
                batch.sample.x,
                batch.sample.y,
                batch.sample.time_ms,
            );
        }

        !shapes.is_empty()
    }
}

impl Default for StrokeEngine {
    fn default() -> Self {
        Self::new()
    }
}
