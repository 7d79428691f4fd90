use crate::coords::{Mapper, TIMELINE_SCALES};

/// Fixed pixel geometry of the timeline canvas region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    pub width: f32,
    pub header_height: f32,
    pub margin: f32,
    pub lane_height: f32,
    pub edge_tolerance: f32,
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self {
            width: 800.0,
            header_height: 40.0,
            margin: 10.0,
            lane_height: 30.0,
            edge_tolerance: 5.0,
        }
    }
}

/// Pan/zoom window onto the timeline plus the playhead position.
///
/// Owned by the client; only the playhead is mirrored to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineViewState {
    /// Index into [`TIMELINE_SCALES`], always in bounds.
    pub scale_index: usize,
    /// Timeline time at the left edge of the visible window, >= 0.
    pub scroll_offset: i64,
    /// Current time cursor, >= 0.
    pub playhead_time: i64,
}

impl Default for TimelineViewState {
    fn default() -> Self {
        Self {
            // 10 ms per pixel at startup.
            scale_index: 2,
            scroll_offset: 0,
            playhead_time: 0,
        }
    }
}

impl TimelineViewState {
    /// Current zoom level in milliseconds per pixel.
    pub fn ms_per_pixel(&self) -> i64 {
        TIMELINE_SCALES[self.scale_index]
    }

    /// Builds the mapper for the current scale and scroll offset.
    pub fn mapper(&self) -> Mapper {
        Mapper {
            ms_per_pixel: self.ms_per_pixel(),
            scroll_offset: self.scroll_offset,
        }
    }

    /// Steps the zoom level one table entry per wheel tick, clamped
    /// to the scale table bounds.
    pub fn zoom(&mut self, wheel_delta: f32) {
        let step: isize = if wheel_delta < 0.0 { -1 } else { 1 };
        let next = self.scale_index as isize + step;
        self.scale_index = next.clamp(0, (TIMELINE_SCALES.len() - 1) as isize) as usize;
    }

    /// Advances the scroll offset one page when the playhead runs
    /// past the right edge of the visible window.
    pub fn follow_playhead(&mut self, geometry: &TimelineGeometry) {
        let mapper = self.mapper();
        if mapper.time_to_pixel(self.playhead_time) > geometry.width {
            self.scroll_offset = mapper.pixel_to_time(geometry.width);
        }
    }
}
