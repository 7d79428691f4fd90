use std::time::Instant;

/// Local play/pause state with a monotonic clock anchor.
///
/// Authoritative on the client: it is mirrored to the engine on every
/// transition and never received back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub is_playing: bool,
    anchor: Option<Instant>,
}

impl PlaybackState {
    /// Starts or stops playback, re-anchoring the clock on start.
    pub fn set_playing(&mut self, playing: bool, now: Instant) {
        self.is_playing = playing;
        self.anchor = playing.then_some(now);
    }

    /// Returns the wall-clock milliseconds elapsed since the last
    /// tick while playing, and re-anchors. Zero while paused.
    pub fn tick(&mut self, now: Instant) -> i64 {
        let Some(anchor) = self.anchor else {
            return 0;
        };
        let elapsed = now.duration_since(anchor).as_millis() as i64;
        if elapsed > 0 {
            self.anchor = Some(now);
        }
        elapsed
    }
}
