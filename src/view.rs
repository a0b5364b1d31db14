//! Readout text and scene attributes
//!
//! Pure formatting of simulation state into the strings the page displays.
//! The DOM glue writes these verbatim, so everything here is host-testable.

use glam::Vec2;

use crate::sim::{Control, CrushState, Frame, PressState};

/// Element ids in `index.html`
pub mod ids {
    pub const FORCE_SLIDER: &str = "f1-slider";
    pub const INPUT_AREA_SLIDER: &str = "a1-slider";
    pub const OUTPUT_AREA_SLIDER: &str = "a2-slider";
    pub const REALISTIC_TOGGLE: &str = "realistic-toggle";

    pub const PUMP_BUTTON: &str = "btn-pump";
    pub const RELEASE_BUTTON: &str = "btn-release";
    pub const RESET_BUTTON: &str = "btn-reset";

    pub const FORCE_LABEL: &str = "f1-val";
    pub const INPUT_AREA_LABEL: &str = "a1-val";
    pub const OUTPUT_AREA_LABEL: &str = "a2-val";
    pub const MATH_FORCE: &str = "math-f1";
    pub const MATH_RATIO: &str = "math-ratio";
    pub const MATH_PRESSURE: &str = "math-p";
    pub const MATH_OUTPUT_FORCE: &str = "math-f2";
    pub const GAUGE: &str = "gauge-display";
    pub const WARNING: &str = "warning-msg";

    pub const PISTON_LEFT: &str = "piston-left";
    pub const FLUID_LEFT: &str = "fluid-left";
    pub const PISTON_RIGHT: &str = "piston-right";
    pub const FLUID_RIGHT: &str = "fluid-right";
    pub const CRUSH_OBJECT: &str = "crush-object";
    pub const CRACKS: &str = "cracks";
    pub const CRUSH_MESSAGE: &str = "crush-msg";
}

/// Slider element for a control
pub fn slider_id(control: Control) -> &'static str {
    match control {
        Control::InputForce => ids::FORCE_SLIDER,
        Control::InputArea => ids::INPUT_AREA_SLIDER,
        Control::OutputArea => ids::OUTPUT_AREA_SLIDER,
    }
}

/// Scene geometry of the SVG (px, in each cylinder group's local space)
const LEFT_PISTON_REST: Vec2 = Vec2::new(5.0, 100.0);
const LEFT_FLUID_REST_HEIGHT: f32 = 150.0;
const RIGHT_PISTON_REST: Vec2 = Vec2::new(-95.0, 150.0);
const RIGHT_FLUID_REST_HEIGHT: f32 = 100.0;

/// Text readouts, refreshed whenever an input changes
#[derive(Debug, Clone, PartialEq)]
pub struct Readouts {
    pub force_label: String,
    pub input_area_label: String,
    pub output_area_label: String,
    pub math_force: String,
    pub math_ratio: String,
    /// Inner HTML (carries the unit span)
    pub math_pressure_html: String,
    pub math_output_force: String,
    pub gauge: String,
    pub warning_visible: bool,
}

impl Readouts {
    pub fn from_state(state: &PressState) -> Self {
        let inputs = state.inputs();
        let reading = state.reading();
        Self {
            force_label: format!("{} N", inputs.input_force),
            input_area_label: format!("{} cm²", inputs.input_area),
            output_area_label: format!("{} cm²", inputs.output_area),
            math_force: format!("{} N", to_fixed(inputs.input_force, 0)),
            math_ratio: format!("{} x", to_fixed(state.mechanical_advantage(), 2)),
            math_pressure_html: format!(
                "{} <span class=\"unit\">kPa</span>",
                to_fixed(reading.pressure_kpa, 1)
            ),
            math_output_force: format!("{} N", to_fixed(reading.output_force, 0)),
            gauge: format!("{} kPa", to_fixed(reading.pressure_kpa, 0)),
            warning_visible: state.warning_visible(),
        }
    }

    pub fn warning_opacity(&self) -> &'static str {
        if self.warning_visible { "1" } else { "0" }
    }
}

/// Transform and size attributes for the animated scene, re-applied every frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub piston_left_transform: String,
    pub fluid_left_y: String,
    pub fluid_left_height: String,
    pub piston_right_transform: String,
    pub fluid_right_y: String,
    pub fluid_right_height: String,
    pub fluid_fill: String,
    pub object_transform: String,
    pub cracks_opacity: &'static str,
    pub crush_message_visible: bool,
}

impl Scene {
    pub fn from_frame(frame: &Frame, state: &PressState) -> Self {
        let config = state.config();

        let left = LEFT_PISTON_REST + Vec2::new(0.0, frame.input_offset);
        let right = RIGHT_PISTON_REST - Vec2::new(0.0, frame.output_travel);

        let crushed = frame.crush == CrushState::Crushed;
        let object_scale = if crushed { config.crushed_scale } else { 1.0 };

        Self {
            piston_left_transform: translate(left),
            fluid_left_y: left.y.to_string(),
            fluid_left_height: (LEFT_FLUID_REST_HEIGHT - frame.input_offset).to_string(),
            piston_right_transform: translate(right),
            fluid_right_y: right.y.to_string(),
            fluid_right_height: (RIGHT_FLUID_REST_HEIGHT + frame.output_travel).to_string(),
            fluid_fill: config.fluid_color(state.pressure_kpa()),
            object_transform: format!("scaleY({})", object_scale),
            cracks_opacity: if crushed { "1" } else { "0" },
            crush_message_visible: crushed,
        }
    }
}

/// Fixed-point text with halves rounded away from zero. `{:.N}` rounds an
/// exact tie to even, which would show 12.5 kPa as "12".
pub fn to_fixed(value: f32, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = (f64::from(value) * scale).round() / scale;
    format!("{:.*}", decimals, rounded)
}

fn translate(pos: Vec2) -> String {
    format!("translate({}, {})", pos.x, pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick;

    #[test]
    fn test_default_readouts() {
        let state = PressState::default();
        let readouts = Readouts::from_state(&state);
        assert_eq!(readouts.force_label, "200 N");
        assert_eq!(readouts.input_area_label, "5 cm²");
        assert_eq!(readouts.output_area_label, "100 cm²");
        assert_eq!(readouts.math_force, "200 N");
        assert_eq!(readouts.math_ratio, "20.00 x");
        assert_eq!(
            readouts.math_pressure_html,
            "400.0 <span class=\"unit\">kPa</span>"
        );
        assert_eq!(readouts.math_output_force, "4000 N");
        assert_eq!(readouts.gauge, "400 kPa");
        assert_eq!(readouts.warning_opacity(), "0");
    }

    #[test]
    fn test_warning_readout() {
        let mut state = PressState::default();
        state.set_control(Control::InputArea, 40.0);
        state.set_control(Control::OutputArea, 40.0);
        let readouts = Readouts::from_state(&state);
        assert!(readouts.warning_visible);
        assert_eq!(readouts.warning_opacity(), "1");
        assert_eq!(readouts.math_ratio, "1.00 x");
    }

    #[test]
    fn test_readouts_round_halves_up() {
        let mut state = PressState::default();
        state.set_control(Control::InputForce, 5.0);
        state.set_control(Control::InputArea, 4.0);
        state.set_control(Control::OutputArea, 5.0);
        let readouts = Readouts::from_state(&state);
        assert_eq!(readouts.gauge, "13 kPa");
        assert_eq!(
            readouts.math_pressure_html,
            "12.5 <span class=\"unit\">kPa</span>"
        );
        assert_eq!(readouts.math_output_force, "6 N");
        assert_eq!(readouts.math_ratio, "1.25 x");
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(12.5, 0), "13");
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.125, 2), "1.13");
        assert_eq!(to_fixed(400.0, 1), "400.0");
        assert_eq!(to_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn test_scene_at_rest() {
        let state = PressState::default();
        let scene = Scene::from_frame(&Frame::default(), &state);
        assert_eq!(scene.piston_left_transform, "translate(5, 100)");
        assert_eq!(scene.fluid_left_y, "100");
        assert_eq!(scene.fluid_left_height, "150");
        assert_eq!(scene.piston_right_transform, "translate(-95, 150)");
        assert_eq!(scene.fluid_right_height, "100");
        assert_eq!(scene.object_transform, "scaleY(1)");
        assert_eq!(scene.cracks_opacity, "0");
        assert!(!scene.crush_message_visible);
    }

    #[test]
    fn test_scene_tracks_frame() {
        let state = PressState::default();
        let frame = Frame {
            input_offset: 40.0,
            output_travel: 100.0,
            ..Default::default()
        };
        let scene = Scene::from_frame(&frame, &state);
        assert_eq!(scene.piston_left_transform, "translate(5, 140)");
        assert_eq!(scene.fluid_left_height, "110");
        assert_eq!(scene.piston_right_transform, "translate(-95, 50)");
        assert_eq!(scene.fluid_right_y, "50");
        assert_eq!(scene.fluid_right_height, "200");
    }

    #[test]
    fn test_crushed_scene_reapplied_every_frame() {
        let mut state = PressState::default();
        state.set_control(Control::InputForce, 500.0);
        let mut crushed_frames = 0;
        for _ in 0..300 {
            let frame = tick(&mut state, crate::consts::FRAME_DT);
            let scene = Scene::from_frame(&frame, &state);
            if state.is_crushed() {
                crushed_frames += 1;
                assert_eq!(scene.object_transform, "scaleY(0.4)");
                assert_eq!(scene.cracks_opacity, "1");
                assert!(scene.crush_message_visible);
            }
        }
        assert!(crushed_frames > 0);
    }

    #[test]
    fn test_slider_ids() {
        assert_eq!(slider_id(Control::InputForce), "f1-slider");
        assert_eq!(slider_id(Control::OutputArea), "a2-slider");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_warning_iff_input_area_not_smaller(
                a1 in 1u32..=50,
                k in 1u32..=40,
            ) {
                let a2 = 5 * k;
                let mut state = PressState::default();
                state.set_control(Control::InputArea, a1 as f32);
                state.set_control(Control::OutputArea, a2 as f32);

                let readouts = Readouts::from_state(&state);
                prop_assert_eq!(readouts.warning_visible, a1 >= a2);
                let opacity = if a1 >= a2 { "1" } else { "0" };
                prop_assert_eq!(readouts.warning_opacity(), opacity);
            }
        }
    }
}
