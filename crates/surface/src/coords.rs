/// Zoom table in milliseconds per pixel, ascending. Wheel zoom steps
/// through this table one entry at a time and never extrapolates.
pub const TIMELINE_SCALES: [i64; 9] = [1, 5, 10, 20, 50, 100, 250, 500, 1_000];

/// Time↔pixel mapping for one scale/scroll configuration.
///
/// A `Mapper` is a throwaway value built from the current view state;
/// pixel outputs may be negative and callers clamp as needed.
///
/// # Example
/// ```
/// use surface::Mapper;
///
/// let mapper = Mapper { ms_per_pixel: 10, scroll_offset: 500 };
/// assert_eq!(mapper.time_to_pixel(600), 10.0);
/// assert_eq!(mapper.pixel_to_time(10.0), 600);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapper {
    pub ms_per_pixel: i64,
    pub scroll_offset: i64,
}

impl Mapper {
    /// Canvas x offset of timeline time `t`.
    pub fn time_to_pixel(&self, t: i64) -> f32 {
        (t - self.scroll_offset) as f32 / self.ms_per_pixel as f32
    }

    /// Timeline time under canvas x offset `px`.
    pub fn pixel_to_time(&self, px: f32) -> i64 {
        self.scroll_offset + self.raw_pixel_to_time(px)
    }

    /// Offset-independent pixel→time conversion, used for deltas.
    pub fn raw_pixel_to_time(&self, px: f32) -> i64 {
        (f64::from(px) * self.ms_per_pixel as f64).round() as i64
    }
}
