//! Output piston end-of-stroke check
//!
//! The output stroke is a visual exaggeration of the input stroke, clamped
//! where the object meets the ceiling. It is not volume-conserving.

use crate::config::PressConfig;

/// Result of clamping the output piston against the ceiling
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StrokeResult {
    /// Upward travel of the output piston (px), clamped
    pub travel: f32,
    /// Object is within the contact margin of the ceiling
    pub contact: bool,
}

/// Output piston travel for a given input piston offset (px)
pub fn output_stroke(
    input_offset: f32,
    input_area: f32,
    output_area: f32,
    config: &PressConfig,
) -> StrokeResult {
    let unclamped = input_offset * (input_area / output_area) * config.visual_exaggeration;
    let travel = unclamped.min(config.max_output_travel_px);
    StrokeResult {
        travel,
        contact: travel > config.max_output_travel_px - config.contact_margin_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_at_rest() {
        let config = PressConfig::default();
        let stroke = output_stroke(0.0, 5.0, 100.0, &config);
        assert_eq!(stroke.travel, 0.0);
        assert!(!stroke.contact);
    }

    #[test]
    fn test_stroke_scales_with_area_ratio() {
        let config = PressConfig::default();
        // 40 px * (5/100) * 50
        let stroke = output_stroke(40.0, 5.0, 100.0, &config);
        assert!((stroke.travel - 100.0).abs() < 1e-4);
        assert!(!stroke.contact);
    }

    #[test]
    fn test_stroke_clamps_at_ceiling() {
        let config = PressConfig::default();
        let stroke = output_stroke(100.0, 50.0, 50.0, &config);
        assert_eq!(stroke.travel, config.max_output_travel_px);
        assert!(stroke.contact);
    }

    #[test]
    fn test_contact_uses_margin_not_equality() {
        let config = PressConfig::default();
        // 126 px is inside the 5 px margin below the 130 px ceiling
        let stroke = output_stroke(50.4, 5.0, 100.0, &config);
        assert!(stroke.travel < config.max_output_travel_px);
        assert!(stroke.contact);

        let stroke = output_stroke(49.6, 5.0, 100.0, &config);
        assert!(!stroke.contact);
    }
}
