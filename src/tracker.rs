// Per-pointer state registry. Each active pointer id owns exactly one track
// holding the last position and timestamp seen for it; tracks are created on
// first contact and dropped when the gesture ends.

use std::collections::HashMap;

/// Sentinel for "this track has not seen an event yet".
pub const NO_TIMESTAMP: i64 = -1;

#[derive(Clone, Copy, Debug)]
pub struct PointerTrack {
    pub last_x: f32,
    pub last_y: f32,
    pub last_time_ms: i64,
}

impl PointerTrack {
    fn fresh() -> Self {
        Self {
            last_x: 0.0,
            last_y: 0.0,
            last_time_ms: NO_TIMESTAMP,
        }
    }

    /// The previous point of this gesture, or None for a track that has not
    /// been updated yet (first touch has no prior point).
    pub fn prior(&self) -> Option<(f32, f32, i64)> {
        if self.last_time_ms == NO_TIMESTAMP {
            None
        } else {
            Some((self.last_x, self.last_y, self.last_time_ms))
        }
    }
}

/// Registry keyed by the host-assigned pointer id. Unknown ids are legal
/// everywhere: they simply instantiate a fresh track.
#[derive(Default)]
pub struct PointerTracks {
    tracks: HashMap<i32, PointerTrack>,
}

impl PointerTracks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, pointer_id: i32) -> &PointerTrack {
        self.tracks
            .entry(pointer_id)
            .or_insert_with(PointerTrack::fresh)
    }

    pub fn update(&mut self, pointer_id: i32, x: f32, y: f32, time_ms: i64) {
        let track = self
            .tracks
            .entry(pointer_id)
            .or_insert_with(PointerTrack::fresh);
        track.last_x = x;
        track.last_y = y;
        track.last_time_ms = time_ms;
    }

    pub fn remove(&mut self, pointer_id: i32) {
        self.tracks.remove(&pointer_id);
    }

    pub fn contains(&self, pointer_id: i32) -> bool {
        self.tracks.contains_key(&pointer_id)
    }

    pub fn get(&self, pointer_id: i32) -> Option<&PointerTrack> {
        self.tracks.get(&pointer_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
