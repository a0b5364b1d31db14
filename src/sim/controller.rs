//! Interaction controller
//!
//! Discrete user events mapped onto state transitions. Every operation that
//! touches an input goes through `apply_inputs`, so the readings never lag.

use super::state::{Control, PressState};

impl PressState {
    /// A control moved to `value` (clamped to its range)
    pub fn set_control(&mut self, control: Control, value: f32) -> bool {
        let mut inputs = self.inputs();
        *control.value_mut(&mut inputs) = value;
        self.apply_inputs(inputs)
    }

    pub fn set_realistic_mode(&mut self, realistic: bool) {
        if realistic != self.realistic_mode() {
            log::debug!("Realistic mode: {}", realistic);
        }
        self.set_realistic(realistic);
    }

    /// Pump pressed. A no-op while the pump is already running.
    pub fn start_pump(&mut self) -> bool {
        let started = self.pump.start();
        if started {
            log::debug!("Pump started at {} N", self.input_force());
        }
        started
    }

    /// Pump released, or the pointer left it. Safe to call repeatedly.
    pub fn stop_pump(&mut self) {
        if self.pump.stop() {
            log::debug!("Pump stopped at {} N", self.input_force());
        }
    }

    /// Begin draining the input force to zero. Ends on its own.
    pub fn release(&mut self) -> bool {
        if self.input_force() <= 0.0 {
            return false;
        }
        let started = self.release.start();
        if started {
            log::debug!("Releasing from {} N", self.input_force());
        }
        started
    }

    /// Back to defaults with the object intact
    pub fn reset(&mut self) {
        self.restore_defaults();
        log::info!("Press reset");
    }

    /// Run pump and release for `dt` seconds. Returns whether the force changed.
    pub(super) fn run_timers(&mut self, dt: f32) -> bool {
        let mut changed = false;

        let (pump_step, pump_max) = (self.config().pump_step, self.config().pump_max_force);
        for _ in 0..self.pump.advance(dt) {
            let force = self.input_force();
            if force < pump_max {
                changed |= self.set_control(Control::InputForce, (force + pump_step).min(pump_max));
            }
        }

        let release_step = self.config().release_step;
        for _ in 0..self.release.advance(dt) {
            let before = self.input_force();
            let force = (before - release_step).max(0.0);
            changed |= self.set_control(Control::InputForce, force);
            // A step the force grid swallows must not leave release running
            if self.input_force() <= 0.0 || self.input_force() >= before {
                self.release.stop();
                log::debug!("Release finished at {} N", self.input_force());
                break;
            }
        }

        changed
    }
}
