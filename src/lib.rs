//! Hydraulic Press - an interactive Pascal's Law simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, interaction controller, frame tick)
//! - `config`: Tunable constants, loaded from JSON with validated fallbacks
//! - `view`: Readout text and scene attributes derived from simulation state

pub mod config;
pub mod sim;
pub mod view;

pub use config::{ConfigError, ControlRange, PressConfig};
pub use sim::{Control, CrushState, Frame, PressState, tick};

/// Simulator constants that are not subject to tuning
pub mod consts {
    /// Fixed frame timestep (60 Hz, the display rate the easing is tuned for)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest host frame delta accepted before clamping (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// 1 N/cm² = 10,000 N/m² = 10 kPa
    pub const KPA_PER_N_PER_CM2: f32 = 10.0;
}
