//! UI-agnostic core of the demo-engine control surface.
//!
//! The surface holds the effect timeline mirrored from the remote
//! engine, the pan/zoom view state, and the pointer-driven
//! interaction machine that edits both. It performs no I/O: pointer
//! events come in, push intents for the sync layer come out, and the
//! rendering collaborator reads state through [`RenderSnapshot`].

pub mod api;
pub mod coords;
pub mod interact;
pub mod model;
pub mod playback;
pub mod snap;
pub mod view;

pub use api::{RenderSnapshot, Surface, TransportCommand};
pub use coords::{Mapper, TIMELINE_SCALES};
pub use interact::{
    CursorStyle, DragState, EffectEdge, InteractionStateMachine, Intent, PointerEvent,
};
pub use model::{DemoModel, Effect, MIN_EFFECT_SPAN};
pub use playback::PlaybackState;
pub use snap::SnapPolicy;
pub use view::{TimelineGeometry, TimelineViewState};
