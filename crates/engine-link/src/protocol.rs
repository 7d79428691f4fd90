use serde::{Deserialize, Serialize};
use serde_json::Value;
use surface::DemoModel;

use crate::error::Result;

/// Control token requesting a full demo snapshot; sent verbatim, not
/// JSON-wrapped.
pub const REQ_DEMO_INFO: &str = "REQ:DEMO.INFO";
/// Control token requesting the engine's current frame time.
pub const REQ_SYSTEM_FPS: &str = "REQ:SYSTEM.FPS";

/// `data` payload of a `type:"time"` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeInfo {
    pub is_playing: bool,
    pub cur_time: i64,
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    msg: Msg<T>,
}

#[derive(Debug, Serialize)]
struct Msg<T> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: T,
}

/// Encodes a playhead/play-state update:
/// `{"msg":{"type":"time","data":{"is_playing":...,"cur_time":...}}}`.
pub fn encode_time(info: TimeInfo) -> Result<String> {
    let text = serde_json::to_string(&Envelope {
        msg: Msg {
            kind: "time",
            data: info,
        },
    })?;
    Ok(text)
}

/// Encodes a full demo-model update:
/// `{"msg":{"type":"demo","data":{"effects":[...]}}}`.
pub fn encode_demo(model: &DemoModel) -> Result<String> {
    let text = serde_json::to_string(&Envelope {
        msg: Msg {
            kind: "demo",
            data: model,
        },
    })?;
    Ok(text)
}

/// Inbound engine message, matched by payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Frame time in seconds (`system.ms`); observers display
    /// `1000 * value`.
    FrameTime(f64),
    /// Full effect-list snapshot (`demo`).
    Snapshot(DemoModel),
}

/// Decodes one inbound message. Shape-based, first match wins:
/// `system.ms` is checked before `demo`. Messages matching neither
/// shape, and unparseable payloads, yield `None` and are silently
/// ignored by the channel.
pub fn decode_inbound(text: &str) -> Option<Inbound> {
    let value: Value = serde_json::from_str(text).ok()?;
    if let Some(ms) = value.get("system.ms").and_then(Value::as_f64) {
        return Some(Inbound::FrameTime(ms));
    }
    let demo = value.get("demo")?;
    let model: DemoModel = serde_json::from_value(demo.clone()).ok()?;
    Some(Inbound::Snapshot(model))
}
