//! Headless operator console: connects the link and logs what the
//! engine reports. Rendering shells consume the same event stream
//! through [`surface::RenderSnapshot`].

use engine_link::{LinkConfig, LinkEvent, spawn_link};
use surface::Surface;
use tracing::{info, warn};

fn main() {
    init_tracing();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| LinkConfig::default().url);
    info!(%url, "connecting to engine");

    let (_commands, events) = spawn_link(LinkConfig {
        url,
        ..LinkConfig::default()
    });

    let mut surface = Surface::new();
    while let Ok(event) = events.recv() {
        match event {
            LinkEvent::Connected => info!("engine connected"),
            LinkEvent::Disconnected => warn!("engine disconnected"),
            LinkEvent::FrameTime(seconds) => info!(fps = 1_000.0 * seconds, "frame time"),
            LinkEvent::Snapshot(model) => {
                surface.apply_snapshot(model);
                info!(
                    effect_count = surface.model.effects.len(),
                    "snapshot applied"
                );
            }
        }
    }

    info!("engine link closed");
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
