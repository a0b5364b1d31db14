//! Pascal's Law over two connected cylinders
//!
//! Forces in newtons, areas in cm², pressure in kPa.

use serde::{Deserialize, Serialize};

use crate::consts::KPA_PER_N_PER_CM2;

/// Derived quantities for one set of inputs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    /// Fluid pressure (kPa)
    pub pressure_kpa: f32,
    /// Force on the output piston (N)
    pub output_force: f32,
}

/// Solve the press for the given inputs.
///
/// Areas must be strictly positive; the control ranges guarantee this.
#[inline]
pub fn solve(input_force: f32, input_area: f32, output_area: f32) -> Reading {
    let pressure_n_per_cm2 = input_force / input_area;
    Reading {
        pressure_kpa: pressure_n_per_cm2 * KPA_PER_N_PER_CM2,
        output_force: pressure_n_per_cm2 * output_area,
    }
}

/// Ratio of output to input force
#[inline]
pub fn mechanical_advantage(input_area: f32, output_area: f32) -> f32 {
    output_area / input_area
}

/// True when the press multiplies nothing (input piston at least as large as output)
#[inline]
pub fn lacks_advantage(input_area: f32, output_area: f32) -> bool {
    input_area >= output_area
}
