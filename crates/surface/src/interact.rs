use tracing::{debug, trace};

use crate::coords::Mapper;
use crate::model::{DemoModel, MIN_EFFECT_SPAN};
use crate::snap::SnapPolicy;
use crate::view::{TimelineGeometry, TimelineViewState};

/// Raw pointer input in canvas-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button press; `modifier` is the state of the modifier key at
    /// press time (selects panning over scrubbing, and arms edge
    /// drags).
    Press { x: f32, y: f32, modifier: bool },
    Move { x: f32, y: f32 },
    Release { x: f32 },
    /// Pointer left the canvas. Treated as a release: an active
    /// gesture commits rather than cancels, so a fast pointer exit
    /// cannot leave the machine stuck in a drag.
    Leave,
    Wheel { delta: f32 },
}

/// Which edge of an effect a drag grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectEdge {
    Start,
    End,
}

/// Cursor affordance the shell should display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    EdgeResize,
    Scrub,
}

/// Current gesture. The drag variants carry the full drag context:
/// pointer position and model values captured at press time, so each
/// move computes an absolute delta instead of accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Normal,
    DraggingPlayhead {
        start_x: f32,
        origin_offset: i64,
        panning: bool,
    },
    DraggingEffectEdge {
        index: usize,
        edge: EffectEdge,
        start_x: f32,
        origin_start: i64,
        origin_end: i64,
    },
}

/// Push request the state machine hands to the sync layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    PushTime { is_playing: bool, cur_time: i64 },
    PushDemo(DemoModel),
}

/// Result of probing effect lanes for a nearby start or end edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHit {
    pub index: usize,
    pub edge: EffectEdge,
}

/// True when the pointer is inside the header strip above the lanes.
pub fn inside_header(x: f32, y: f32, geometry: &TimelineGeometry) -> bool {
    x >= geometry.margin && x < geometry.width && y >= 0.0 && y < geometry.header_height
}

/// Scans effect lanes (one lane per effect, fixed height) for a
/// start or end edge within the pixel tolerance of the pointer's x.
/// The start edge wins when both are in range.
pub fn hit_effect_edge(
    x: f32,
    y: f32,
    model: &DemoModel,
    mapper: &Mapper,
    geometry: &TimelineGeometry,
) -> Option<EdgeHit> {
    let lane_y = y - geometry.header_height;
    if lane_y < 0.0 {
        return None;
    }
    let index = (lane_y / geometry.lane_height) as usize;
    let effect = model.effects.get(index)?;

    let start_x = geometry.margin + mapper.time_to_pixel(effect.start_time);
    let end_x = geometry.margin + mapper.time_to_pixel(effect.end_time);
    if (x - start_x).abs() < geometry.edge_tolerance {
        Some(EdgeHit {
            index,
            edge: EffectEdge::Start,
        })
    } else if (x - end_x).abs() < geometry.edge_tolerance {
        Some(EdgeHit {
            index,
            edge: EffectEdge::End,
        })
    } else {
        None
    }
}

/// Pointer-driven editing machine for the timeline canvas.
///
/// One machine instance interprets the whole press/move/release
/// stream; the current [`DragState`] selects the interpretation, so
/// exactly one behavior is active at a time. No event is fatal: a
/// press that hits nothing simply stays in `Normal`, and a drag whose
/// effect index went stale degrades to view-only moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionStateMachine {
    state: DragState,
    cursor: CursorStyle,
}

impl InteractionStateMachine {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Interprets one pointer event, mutating model and view state as
    /// the current gesture dictates, and returns the push intents the
    /// sync layer should forward to the engine.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        model: &mut DemoModel,
        view: &mut TimelineViewState,
        is_playing: bool,
        snap: SnapPolicy,
        geometry: &TimelineGeometry,
    ) -> Vec<Intent> {
        match self.state {
            DragState::Normal => self.handle_normal(event, model, view, geometry),
            DragState::DraggingPlayhead {
                start_x,
                origin_offset,
                panning,
            } => self.handle_playhead_drag(
                event,
                view,
                is_playing,
                snap,
                geometry,
                start_x,
                origin_offset,
                panning,
            ),
            DragState::DraggingEffectEdge {
                index,
                edge,
                start_x,
                origin_start,
                origin_end,
            } => self.handle_edge_drag(
                event,
                model,
                view,
                snap,
                start_x,
                index,
                edge,
                origin_start,
                origin_end,
            ),
        }
    }

    fn handle_normal(
        &mut self,
        event: PointerEvent,
        model: &mut DemoModel,
        view: &mut TimelineViewState,
        geometry: &TimelineGeometry,
    ) -> Vec<Intent> {
        match event {
            PointerEvent::Press { x, y, modifier } => {
                if inside_header(x, y, geometry) {
                    self.transition(DragState::DraggingPlayhead {
                        start_x: x,
                        origin_offset: view.scroll_offset,
                        panning: modifier,
                    });
                } else if modifier {
                    if let Some(hit) = hit_effect_edge(x, y, model, &view.mapper(), geometry) {
                        let effect = &model.effects[hit.index];
                        self.transition(DragState::DraggingEffectEdge {
                            index: hit.index,
                            edge: hit.edge,
                            start_x: x,
                            origin_start: effect.start_time,
                            origin_end: effect.end_time,
                        });
                    }
                }
                Vec::new()
            }
            PointerEvent::Move { x, y } => {
                self.cursor = if hit_effect_edge(x, y, model, &view.mapper(), geometry).is_some() {
                    CursorStyle::EdgeResize
                } else {
                    CursorStyle::Default
                };
                Vec::new()
            }
            PointerEvent::Wheel { delta } => {
                view.zoom(delta);
                trace!(scale_index = view.scale_index, "zoom");
                Vec::new()
            }
            PointerEvent::Release { .. } | PointerEvent::Leave => Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_playhead_drag(
        &mut self,
        event: PointerEvent,
        view: &mut TimelineViewState,
        is_playing: bool,
        snap: SnapPolicy,
        geometry: &TimelineGeometry,
        start_x: f32,
        origin_offset: i64,
        panning: bool,
    ) -> Vec<Intent> {
        let scrub = |view: &mut TimelineViewState, x: f32| {
            let time = view.mapper().pixel_to_time(x - geometry.margin);
            view.playhead_time = snap.snap(time.max(0));
            Intent::PushTime {
                is_playing,
                cur_time: view.playhead_time,
            }
        };

        match event {
            PointerEvent::Move { x, .. } => {
                if panning {
                    let delta = view.mapper().raw_pixel_to_time(x - start_x);
                    view.scroll_offset = snap.snap((origin_offset - delta).max(0));
                    Vec::new()
                } else {
                    vec![scrub(view, x)]
                }
            }
            PointerEvent::Release { x } => {
                let intents = if panning {
                    Vec::new()
                } else {
                    vec![scrub(view, x)]
                };
                self.transition(DragState::Normal);
                intents
            }
            PointerEvent::Leave => {
                // Commit at the last applied playhead position.
                let intents = if panning {
                    Vec::new()
                } else {
                    vec![Intent::PushTime {
                        is_playing,
                        cur_time: view.playhead_time,
                    }]
                };
                self.transition(DragState::Normal);
                intents
            }
            PointerEvent::Wheel { delta } => {
                view.zoom(delta);
                Vec::new()
            }
            PointerEvent::Press { .. } => Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_edge_drag(
        &mut self,
        event: PointerEvent,
        model: &mut DemoModel,
        view: &mut TimelineViewState,
        snap: SnapPolicy,
        start_x: f32,
        index: usize,
        edge: EffectEdge,
        origin_start: i64,
        origin_end: i64,
    ) -> Vec<Intent> {
        match event {
            PointerEvent::Move { x, .. } => {
                let delta = view.mapper().raw_pixel_to_time(x - start_x);
                let applied = match edge {
                    EffectEdge::Start => {
                        let clamped = (origin_start + delta)
                            .min(origin_end - MIN_EFFECT_SPAN)
                            .max(0);
                        model.trim_start(index, snap.snap(clamped))
                    }
                    EffectEdge::End => {
                        let target =
                            snap.snap((origin_end + delta).max(origin_start + MIN_EFFECT_SPAN));
                        model.trim_end(index, target)
                    }
                };
                if applied.is_none() {
                    // The engine replaced the model mid-drag and the
                    // captured index no longer exists. The gesture
                    // keeps running but stops editing.
                    debug!(index, "edge drag target went stale");
                }
                vec![Intent::PushDemo(model.clone())]
            }
            PointerEvent::Release { .. } | PointerEvent::Leave => {
                self.transition(DragState::Normal);
                vec![Intent::PushDemo(model.clone())]
            }
            PointerEvent::Wheel { delta } => {
                view.zoom(delta);
                Vec::new()
            }
            PointerEvent::Press { .. } => Vec::new(),
        }
    }

    /// Switches gesture state; the single place entry actions run, so
    /// exactly one interpretation of the pointer stream is active.
    fn transition(&mut self, next: DragState) {
        debug!(from = ?self.state, to = ?next, "interaction transition");
        self.cursor = match next {
            DragState::Normal => CursorStyle::Default,
            DragState::DraggingPlayhead { .. } => CursorStyle::Scrub,
            DragState::DraggingEffectEdge { .. } => CursorStyle::EdgeResize,
        };
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CursorStyle, DragState, EffectEdge, InteractionStateMachine, Intent, PointerEvent,
        hit_effect_edge, inside_header,
    };
    use crate::model::{DemoModel, Effect, MIN_EFFECT_SPAN};
    use crate::snap::SnapPolicy;
    use crate::view::{TimelineGeometry, TimelineViewState};

    fn fixture() -> (DemoModel, TimelineViewState, TimelineGeometry) {
        let model = DemoModel {
            effects: vec![Effect {
                name: String::from("plasma"),
                start_time: 1_000,
                end_time: 2_000,
            }],
            ..DemoModel::default()
        };
        // 1 ms per pixel, no scroll: time == pixel for easy math.
        let view = TimelineViewState {
            scale_index: 0,
            scroll_offset: 0,
            playhead_time: 0,
        };
        (model, view, TimelineGeometry::default())
    }

    fn drive(
        machine: &mut InteractionStateMachine,
        events: &[PointerEvent],
        model: &mut DemoModel,
        view: &mut TimelineViewState,
        geometry: &TimelineGeometry,
    ) -> Vec<Intent> {
        let snap = SnapPolicy::default();
        events
            .iter()
            .flat_map(|event| machine.handle(*event, model, view, false, snap, geometry))
            .collect()
    }

    #[test]
    fn header_geometry_excludes_the_left_margin() {
        let geometry = TimelineGeometry::default();

        assert!(inside_header(100.0, 10.0, &geometry));
        assert!(!inside_header(5.0, 10.0, &geometry));
        assert!(!inside_header(100.0, 50.0, &geometry));
    }

    #[test]
    fn edge_hit_finds_the_start_edge_in_its_lane() {
        let (model, view, geometry) = fixture();

        // Lane 0 spans y in [40, 70); start edge sits at margin + 1000.
        let hit = hit_effect_edge(1_013.0, 55.0, &model, &view.mapper(), &geometry)
            .expect("edge within tolerance");

        assert_eq!(hit.index, 0);
        assert_eq!(hit.edge, EffectEdge::Start);
    }

    #[test]
    fn edge_hit_misses_outside_tolerance() {
        let (model, view, geometry) = fixture();

        assert!(hit_effect_edge(1_020.0, 55.0, &model, &view.mapper(), &geometry).is_none());
        assert!(hit_effect_edge(1_013.0, 20.0, &model, &view.mapper(), &geometry).is_none());
    }

    #[test]
    fn header_press_then_release_scrubs_the_playhead_with_snapping() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        // Canvas-local x = 100; pixel_to_time(100 - margin) = 90,
        // snapped down to 50.
        let intents = drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 100.0,
                    y: 10.0,
                    modifier: false,
                },
                PointerEvent::Release { x: 100.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(view.playhead_time, 50);
        assert_eq!(
            intents,
            vec![Intent::PushTime {
                is_playing: false,
                cur_time: 50,
            }]
        );
        assert_eq!(machine.state(), DragState::Normal);
    }

    #[test]
    fn scrub_pushes_time_on_every_move() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        let intents = drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 60.0,
                    y: 10.0,
                    modifier: false,
                },
                PointerEvent::Move { x: 110.0, y: 10.0 },
                PointerEvent::Move { x: 210.0, y: 10.0 },
                PointerEvent::Release { x: 210.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(intents.len(), 3);
        assert_eq!(view.playhead_time, 200);
    }

    #[test]
    fn scrub_clamps_at_time_zero() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 50.0,
                    y: 10.0,
                    modifier: false,
                },
                PointerEvent::Move { x: 2.0, y: 10.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(view.playhead_time, 0);
    }

    #[test]
    fn modifier_press_in_header_pans_the_view_without_pushing() {
        let (mut model, mut view, geometry) = fixture();
        view.scroll_offset = 1_000;
        let mut machine = InteractionStateMachine::default();

        let intents = drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 400.0,
                    y: 10.0,
                    modifier: true,
                },
                PointerEvent::Move { x: 300.0, y: 10.0 },
                PointerEvent::Release { x: 300.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        // Dragging left by 100 px at 1 ms/px pans forward by 100 ms.
        assert_eq!(view.scroll_offset, 1_100);
        assert!(intents.is_empty());
    }

    #[test]
    fn pan_clamps_the_scroll_offset_at_zero() {
        let (mut model, mut view, geometry) = fixture();
        view.scroll_offset = 30;
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 100.0,
                    y: 10.0,
                    modifier: true,
                },
                PointerEvent::Move { x: 400.0, y: 10.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(view.scroll_offset, 0);
    }

    #[test]
    fn start_edge_drag_clamps_below_the_end_and_snaps() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        // Grab the start edge at x = margin + 1000, drag +2000 px
        // (= +2000 ms at 1 ms/px): clamp to end - 50 = 1950.
        let intents = drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 1_010.0,
                    y: 55.0,
                    modifier: true,
                },
                PointerEvent::Move {
                    x: 3_010.0,
                    y: 55.0,
                },
                PointerEvent::Release { x: 3_010.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(model.effects[0].start_time, 1_950);
        assert_eq!(model.effects[0].end_time, 2_000);
        assert_eq!(intents.len(), 2);
        assert!(matches!(intents[0], Intent::PushDemo(_)));
    }

    #[test]
    fn end_edge_drag_clamps_above_the_start() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 2_010.0,
                    y: 55.0,
                    modifier: true,
                },
                PointerEvent::Move {
                    x: 10.0,
                    y: 55.0,
                },
                PointerEvent::Release { x: 10.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(model.effects[0].end_time, 1_000 + MIN_EFFECT_SPAN);
        assert!(model.effects[0].span() >= MIN_EFFECT_SPAN);
    }

    #[test]
    fn span_invariant_holds_after_alternating_edge_drags() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        let gestures: &[(f32, f32)] = &[
            (1_010.0, 2_500.0),
            (2_010.0, 900.0),
            (1_960.0, 0.0),
            (2_010.0, 4_000.0),
        ];
        for &(grab_x, to_x) in gestures {
            drive(
                &mut machine,
                &[
                    PointerEvent::Press {
                        x: grab_x,
                        y: 55.0,
                        modifier: true,
                    },
                    PointerEvent::Move { x: to_x, y: 55.0 },
                    PointerEvent::Release { x: to_x },
                ],
                &mut model,
                &mut view,
                &geometry,
            );
        }

        assert!(model.effects[0].span() >= MIN_EFFECT_SPAN);
        assert!(model.effects[0].start_time >= 0);
    }

    #[test]
    fn edge_press_without_modifier_stays_normal() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[PointerEvent::Press {
                x: 1_010.0,
                y: 55.0,
                modifier: false,
            }],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(machine.state(), DragState::Normal);
    }

    #[test]
    fn snapshot_replace_mid_drag_does_not_panic_on_the_next_move() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();
        let snap = SnapPolicy::default();

        machine.handle(
            PointerEvent::Press {
                x: 1_010.0,
                y: 55.0,
                modifier: true,
            },
            &mut model,
            &mut view,
            false,
            snap,
            &geometry,
        );

        // Engine pushes an empty snapshot while the drag is active.
        model.replace(DemoModel::default());

        let intents = machine.handle(
            PointerEvent::Move {
                x: 1_200.0,
                y: 55.0,
            },
            &mut model,
            &mut view,
            false,
            snap,
            &geometry,
        );

        // The move still pushes the (now unedited) current model.
        assert_eq!(intents, vec![Intent::PushDemo(DemoModel::default())]);
    }

    #[test]
    fn leave_commits_a_drag_instead_of_cancelling() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        let intents = drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 100.0,
                    y: 10.0,
                    modifier: false,
                },
                PointerEvent::Move { x: 210.0, y: 10.0 },
                PointerEvent::Leave,
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(machine.state(), DragState::Normal);
        assert_eq!(
            intents.last(),
            Some(&Intent::PushTime {
                is_playing: false,
                cur_time: 200,
            })
        );
    }

    #[test]
    fn hover_over_an_edge_shows_the_resize_cursor() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[PointerEvent::Move { x: 1_010.0, y: 55.0 }],
            &mut model,
            &mut view,
            &geometry,
        );
        assert_eq!(machine.cursor(), CursorStyle::EdgeResize);

        drive(
            &mut machine,
            &[PointerEvent::Move { x: 500.0, y: 55.0 }],
            &mut model,
            &mut view,
            &geometry,
        );
        assert_eq!(machine.cursor(), CursorStyle::Default);
    }

    #[test]
    fn wheel_zoom_stays_available_mid_drag() {
        let (mut model, mut view, geometry) = fixture();
        let mut machine = InteractionStateMachine::default();

        drive(
            &mut machine,
            &[
                PointerEvent::Press {
                    x: 100.0,
                    y: 10.0,
                    modifier: false,
                },
                PointerEvent::Wheel { delta: 1.0 },
            ],
            &mut model,
            &mut view,
            &geometry,
        );

        assert_eq!(view.scale_index, 1);
        assert!(matches!(machine.state(), DragState::DraggingPlayhead { .. }));
    }
}
