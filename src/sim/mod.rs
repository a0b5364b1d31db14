//! Deterministic simulation module
//!
//! All press logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Repeating actions stepped by the tick, never by host timers
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod physics;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{StrokeResult, output_stroke};
pub use physics::{Reading, lacks_advantage, mechanical_advantage, solve};
pub use state::{Control, CrushState, Inputs, PressState};
pub use tick::{Frame, tick};
pub use timer::IntervalTimer;
