//! Fixed timestep frame tick
//!
//! One call per display frame: runs the repeating actions, eases the pistons,
//! checks the ceiling and latches the crush.

use super::collision::output_stroke;
use super::state::{CrushState, PressState};

/// What a single tick produced, for the view to draw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    /// Input piston offset below its rest position (px)
    pub input_offset: f32,
    /// Output piston travel above its rest position (px)
    pub output_travel: f32,
    /// Object touching the ceiling this tick
    pub contact: bool,
    pub crush: CrushState,
    /// The crush latched on this very tick
    pub just_crushed: bool,
    /// Pump or release moved the input force
    pub inputs_changed: bool,
}

/// Advance the press by one frame of `dt` seconds
pub fn tick(state: &mut PressState, dt: f32) -> Frame {
    state.count_tick();

    let inputs_changed = state.run_timers(dt);

    let config = state.config();
    let target = (state.input_force() / config.max_input_force).clamp(0.0, 1.0);
    state.ease_visual(target);

    let config = state.config();
    let inputs = state.inputs();
    let input_offset = state.visual_position() * config.input_travel_px;
    let stroke = output_stroke(input_offset, inputs.input_area, inputs.output_area, config);

    // Never re-evaluated once crushed
    let mut just_crushed = false;
    if state.crush() == CrushState::Intact
        && stroke.contact
        && state.output_force() > config.crush_threshold
    {
        just_crushed = state.latch_crushed();
        log::info!(
            "Object crushed at {:.0} N (threshold {:.0} N)",
            state.output_force(),
            state.config().crush_threshold
        );
    }

    Frame {
        input_offset,
        output_travel: stroke.travel,
        contact: stroke.contact,
        crush: state.crush(),
        just_crushed,
        inputs_changed,
    }
}
