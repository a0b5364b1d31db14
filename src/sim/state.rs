//! Press state and core simulation types
//!
//! Derived readings and the visual piston position are private: the readings
//! are only recomputed through `apply_inputs`, and the position only moves by
//! the per-frame ease or a reset.

use serde::{Deserialize, Serialize};

use super::physics::{self, Reading};
use super::timer::IntervalTimer;
use crate::config::{ControlRange, PressConfig};

/// Whether the object on the output piston has been destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrushState {
    #[default]
    Intact,
    /// Latched; only a reset returns to `Intact`
    Crushed,
}

/// The three user-adjustable quantities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    /// Force on the input piston (N)
    pub input_force: f32,
    /// Input piston area (cm²)
    pub input_area: f32,
    /// Output piston area (cm²)
    pub output_area: f32,
}

impl Inputs {
    pub fn defaults(config: &PressConfig) -> Self {
        Self {
            input_force: config.default_input_force,
            input_area: config.default_input_area,
            output_area: config.default_output_area,
        }
    }
}

/// A host control bound to one input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    InputForce,
    InputArea,
    OutputArea,
}

impl Control {
    pub const ALL: [Control; 3] = [Control::InputForce, Control::InputArea, Control::OutputArea];

    pub fn range(&self, config: &PressConfig) -> ControlRange {
        match self {
            Control::InputForce => config.force_range,
            Control::InputArea => config.input_area_range,
            Control::OutputArea => config.output_area_range,
        }
    }

    pub fn value(&self, inputs: &Inputs) -> f32 {
        match self {
            Control::InputForce => inputs.input_force,
            Control::InputArea => inputs.input_area,
            Control::OutputArea => inputs.output_area,
        }
    }

    pub(super) fn value_mut<'a>(&self, inputs: &'a mut Inputs) -> &'a mut f32 {
        match self {
            Control::InputForce => &mut inputs.input_force,
            Control::InputArea => &mut inputs.input_area,
            Control::OutputArea => &mut inputs.output_area,
        }
    }
}

/// Complete simulator state
#[derive(Debug, Clone)]
pub struct PressState {
    config: PressConfig,
    inputs: Inputs,
    reading: Reading,
    /// Normalized input piston stroke (0 = rest, 1 = fully depressed)
    visual_position: f32,
    crush: CrushState,
    realistic_mode: bool,
    pub(super) pump: IntervalTimer,
    pub(super) release: IntervalTimer,
    /// Frame tick counter
    time_ticks: u64,
}

impl Default for PressState {
    fn default() -> Self {
        Self::new(PressConfig::default())
    }
}

impl PressState {
    /// Create a press at rest with the configured defaults
    pub fn new(config: PressConfig) -> Self {
        let inputs = Inputs::defaults(&config);
        let pump = IntervalTimer::from_millis(config.pump_period_ms);
        let release = IntervalTimer::from_millis(config.release_period_ms);
        let mut state = Self {
            config,
            inputs,
            reading: Reading::default(),
            visual_position: 0.0,
            crush: CrushState::Intact,
            realistic_mode: false,
            pump,
            release,
            time_ticks: 0,
        };
        state.apply_inputs(inputs);
        state
    }

    pub fn config(&self) -> &PressConfig {
        &self.config
    }

    pub fn inputs(&self) -> Inputs {
        self.inputs
    }

    pub fn input_force(&self) -> f32 {
        self.inputs.input_force
    }

    pub fn reading(&self) -> Reading {
        self.reading
    }

    pub fn pressure_kpa(&self) -> f32 {
        self.reading.pressure_kpa
    }

    pub fn output_force(&self) -> f32 {
        self.reading.output_force
    }

    pub fn mechanical_advantage(&self) -> f32 {
        physics::mechanical_advantage(self.inputs.input_area, self.inputs.output_area)
    }

    /// The no-advantage warning indicator
    pub fn warning_visible(&self) -> bool {
        physics::lacks_advantage(self.inputs.input_area, self.inputs.output_area)
    }

    pub fn visual_position(&self) -> f32 {
        self.visual_position
    }

    pub fn crush(&self) -> CrushState {
        self.crush
    }

    pub fn is_crushed(&self) -> bool {
        self.crush == CrushState::Crushed
    }

    pub fn realistic_mode(&self) -> bool {
        self.realistic_mode
    }

    pub fn is_pumping(&self) -> bool {
        self.pump.is_active()
    }

    pub fn is_releasing(&self) -> bool {
        self.release.is_active()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Clamp inputs to their controls and recompute the readings together.
    /// Returns whether anything changed.
    pub(super) fn apply_inputs(&mut self, mut inputs: Inputs) -> bool {
        for control in Control::ALL {
            let value = control.value_mut(&mut inputs);
            *value = control.range(&self.config).clamp(*value);
        }
        let changed = inputs != self.inputs;
        self.inputs = inputs;
        self.reading = physics::solve(inputs.input_force, inputs.input_area, inputs.output_area);
        changed
    }

    pub(super) fn set_realistic(&mut self, realistic: bool) {
        self.realistic_mode = realistic;
    }

    /// One easing step toward `target`, snapping once within epsilon
    pub(super) fn ease_visual(&mut self, target: f32) {
        let diff = target - self.visual_position;
        if diff.abs() > self.config.snap_epsilon {
            self.visual_position += diff * self.config.ease_speed(self.realistic_mode);
        } else {
            self.visual_position = target;
        }
    }

    /// Intact -> Crushed. Returns true only on the transition itself.
    pub(super) fn latch_crushed(&mut self) -> bool {
        match self.crush {
            CrushState::Intact => {
                self.crush = CrushState::Crushed;
                true
            }
            CrushState::Crushed => false,
        }
    }

    pub(super) fn count_tick(&mut self) {
        self.time_ticks += 1;
    }

    /// Defaults, intact object, piston at rest, no repeating actions
    pub(super) fn restore_defaults(&mut self) {
        self.pump.stop();
        self.release.stop();
        self.crush = CrushState::Intact;
        self.visual_position = 0.0;
        self.apply_inputs(Inputs::defaults(&self.config));
    }
}
