use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shortest span an effect may be trimmed down to, in milliseconds.
pub const MIN_EFFECT_SPAN: i64 = 50;

/// One named, time-bounded entry on the demo timeline.
///
/// Times are milliseconds in engine units. Effects may overlap; the
/// engine assigns identity implicitly by list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    pub start_time: i64,
    pub end_time: i64,
}

impl Effect {
    /// Duration of the effect in milliseconds.
    pub fn span(&self) -> i64 {
        self.end_time - self.start_time
    }
}

/// Ordered effect list mirrored from the engine, plus whatever other
/// demo fields the engine reported.
///
/// The engine is the source of truth: it may push a snapshot that
/// replaces the whole list at any time, including mid-drag. Local
/// edits therefore address effects by index and tolerate the index
/// going stale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoModel {
    pub effects: Vec<Effect>,
    /// Engine-reported demo fields this client does not interpret.
    /// Kept verbatim so a pushed demo returns the whole object the
    /// engine sent, not just the effect list.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DemoModel {
    /// Adopts an engine snapshot wholesale, discarding local edits.
    pub fn replace(&mut self, snapshot: DemoModel) {
        debug!(
            effect_count = snapshot.effects.len(),
            "model replaced by engine snapshot"
        );
        *self = snapshot;
    }

    /// Moves the start edge of the effect at `index` to `new_start`,
    /// clamped into `[0, end_time - MIN_EFFECT_SPAN]`.
    ///
    /// Returns the applied value, or `None` when `index` no longer
    /// points at an effect (the model may have been replaced by a
    /// snapshot while a drag was in flight).
    pub fn trim_start(&mut self, index: usize, new_start: i64) -> Option<i64> {
        let effect = self.effects.get_mut(index)?;
        let clamped = new_start.min(effect.end_time - MIN_EFFECT_SPAN).max(0);
        effect.start_time = clamped;
        Some(clamped)
    }

    /// Moves the end edge of the effect at `index` to `new_end`,
    /// clamped to keep at least [`MIN_EFFECT_SPAN`] of duration.
    ///
    /// Returns the applied value, or `None` when `index` is stale.
    pub fn trim_end(&mut self, index: usize, new_end: i64) -> Option<i64> {
        let effect = self.effects.get_mut(index)?;
        let clamped = new_end.max(effect.start_time + MIN_EFFECT_SPAN);
        effect.end_time = clamped;
        Some(clamped)
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoModel, Effect, MIN_EFFECT_SPAN};

    fn model_with_one_effect() -> DemoModel {
        DemoModel {
            effects: vec![Effect {
                name: String::from("particles"),
                start_time: 1_000,
                end_time: 2_000,
            }],
            ..DemoModel::default()
        }
    }

    #[test]
    fn trim_start_clamps_below_end_minus_min_span() {
        let mut model = model_with_one_effect();

        let applied = model.trim_start(0, 3_000).expect("effect exists");

        assert_eq!(applied, 2_000 - MIN_EFFECT_SPAN);
        assert_eq!(model.effects[0].start_time, 1_950);
        assert!(model.effects[0].span() >= MIN_EFFECT_SPAN);
    }

    #[test]
    fn trim_start_clamps_at_zero() {
        let mut model = model_with_one_effect();

        let applied = model.trim_start(0, -400).expect("effect exists");

        assert_eq!(applied, 0);
    }

    #[test]
    fn trim_end_keeps_min_span() {
        let mut model = model_with_one_effect();

        let applied = model.trim_end(0, 900).expect("effect exists");

        assert_eq!(applied, 1_000 + MIN_EFFECT_SPAN);
        assert!(model.effects[0].span() >= MIN_EFFECT_SPAN);
    }

    #[test]
    fn trim_on_stale_index_is_a_noop() {
        let mut model = model_with_one_effect();
        model.replace(DemoModel::default());

        assert_eq!(model.trim_start(0, 500), None);
        assert_eq!(model.trim_end(0, 500), None);
    }

    #[test]
    fn replace_adopts_snapshot_wholesale() {
        let mut model = model_with_one_effect();

        model.replace(DemoModel {
            effects: vec![Effect {
                name: String::from("tunnel"),
                start_time: 0,
                end_time: 500,
            }],
            ..DemoModel::default()
        });

        assert_eq!(model.effects.len(), 1);
        assert_eq!(model.effects[0].name, "tunnel");
    }

    #[test]
    fn replace_keeps_uninterpreted_engine_fields() {
        let mut extra = serde_json::Map::new();
        extra.insert(String::from("duration"), serde_json::json!(180_000));

        let mut model = model_with_one_effect();
        model.replace(DemoModel {
            effects: Vec::new(),
            extra: extra.clone(),
        });

        assert_eq!(model.extra, extra);
    }
}
