use std::time::Instant;

use tracing::info;

use crate::interact::{CursorStyle, InteractionStateMachine, Intent, PointerEvent};
use crate::model::{DemoModel, Effect};
use crate::playback::PlaybackState;
use crate::snap::SnapPolicy;
use crate::view::{TimelineGeometry, TimelineViewState};

/// Discrete transport commands from the shell's buttons. They bypass
/// the pointer state machine but feed the same time-push path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    /// Step the playhead and window back one page.
    StepBack,
    /// Rewind playhead and window to time zero.
    JumpToStart,
    /// Flip between playing and paused.
    TogglePlay,
    /// Step the playhead and window forward one page.
    StepForward,
}

/// The client-owned control-surface context: effect model, view
/// window, playback state and the interaction machine, with no
/// ambient globals. All mutation funnels through here; the rendering
/// collaborator only ever sees a [`RenderSnapshot`].
#[derive(Debug, Default)]
pub struct Surface {
    pub model: DemoModel,
    pub view: TimelineViewState,
    pub playback: PlaybackState,
    pub snap: SnapPolicy,
    pub geometry: TimelineGeometry,
    machine: InteractionStateMachine,
}

/// Borrowed read-only state handed to the renderer once per redraw
/// tick.
#[derive(Debug, Clone, Copy)]
pub struct RenderSnapshot<'a> {
    pub effects: &'a [Effect],
    pub scroll_offset: i64,
    pub ms_per_pixel: i64,
    pub playhead_time: i64,
    pub is_playing: bool,
    pub cursor: CursorStyle,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one pointer event through the interaction state machine
    /// and returns the push intents for the sync layer.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Intent> {
        self.machine.handle(
            event,
            &mut self.model,
            &mut self.view,
            self.playback.is_playing,
            self.snap,
            &self.geometry,
        )
    }

    /// Applies one transport command. Every command mirrors the
    /// resulting time and play state to the engine.
    pub fn handle_transport(&mut self, command: TransportCommand, now: Instant) -> Vec<Intent> {
        let page = self
            .view
            .mapper()
            .raw_pixel_to_time(self.geometry.width - self.geometry.margin);

        match command {
            TransportCommand::StepBack => {
                self.view.playhead_time = (self.view.playhead_time - page).max(0);
                self.view.scroll_offset = (self.view.scroll_offset - page).max(0);
            }
            TransportCommand::JumpToStart => {
                self.view.playhead_time = 0;
                self.view.scroll_offset = 0;
            }
            TransportCommand::TogglePlay => {
                let playing = !self.playback.is_playing;
                self.playback.set_playing(playing, now);
                info!(playing, "playback toggled");
            }
            TransportCommand::StepForward => {
                self.view.playhead_time += page;
                self.view.scroll_offset += page;
            }
        }

        vec![Intent::PushTime {
            is_playing: self.playback.is_playing,
            cur_time: self.view.playhead_time,
        }]
    }

    /// Advances the playhead by wall-clock time while playing and
    /// keeps it inside the visible window. The engine runs its own
    /// clock during playback, so ticking pushes nothing.
    pub fn tick_playback(&mut self, now: Instant) {
        let elapsed = self.playback.tick(now);
        if elapsed > 0 {
            self.view.playhead_time += elapsed;
            self.view.follow_playhead(&self.geometry);
        }
    }

    /// Adopts an engine snapshot wholesale. Unsynchronized with any
    /// in-progress drag by design; the machine tolerates the stale
    /// index.
    pub fn apply_snapshot(&mut self, snapshot: DemoModel) {
        self.model.replace(snapshot);
    }

    pub fn render_snapshot(&self) -> RenderSnapshot<'_> {
        RenderSnapshot {
            effects: &self.model.effects,
            scroll_offset: self.view.scroll_offset,
            ms_per_pixel: self.view.ms_per_pixel(),
            playhead_time: self.view.playhead_time,
            is_playing: self.playback.is_playing,
            cursor: self.machine.cursor(),
        }
    }
}
