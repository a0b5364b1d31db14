//! Simulator configuration
//!
//! Control ranges, timing, and the empirically tuned visual constants. The
//! page may embed a JSON override; anything that fails validation falls back
//! to the built-in defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems detected before the simulator starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{control} minimum must be strictly positive (got {min})")]
    NonPositiveArea { control: &'static str, min: f32 },

    #[error("{control} range is inverted ({min} > {max})")]
    InvertedRange {
        control: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{control} default {value} lies outside its range")]
    DefaultOutOfRange { control: &'static str, value: f32 },

    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} {value} must lie within {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{field} {value} is not a multiple of the force step {step}")]
    OffStep {
        field: &'static str,
        value: f32,
        step: f32,
    },

    #[error("invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
}

/// Min/max/step of a host slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ControlRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp a raw value into the range and snap it onto the step grid
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let value = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return value;
        }
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).min(self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Every tunable constant of the press
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressConfig {
    // === Controls (N, cm², cm²) ===
    pub force_range: ControlRange,
    pub input_area_range: ControlRange,
    pub output_area_range: ControlRange,

    // === Defaults restored by reset ===
    pub default_input_force: f32,
    pub default_input_area: f32,
    pub default_output_area: f32,

    // === Pump / release ===
    /// Force added per pump period while the pump is held
    pub pump_step: f32,
    pub pump_period_ms: f32,
    /// Pump never pushes the force above this
    pub pump_max_force: f32,
    /// Force removed per release period
    pub release_step: f32,
    pub release_period_ms: f32,

    // === Physics ===
    /// Input force that maps to a fully depressed input piston
    pub max_input_force: f32,
    /// Output force (N) that destroys the object once in contact
    pub crush_threshold: f32,

    // === Animation ===
    /// Fraction of the remaining distance covered per frame
    pub ease_speed: f32,
    /// Slower easing used in realistic mode
    pub realistic_ease_speed: f32,
    /// Remaining distance below which the piston snaps to its target
    pub snap_epsilon: f32,

    // === Visual geometry (px) ===
    pub input_travel_px: f32,
    /// Output piston travel multiplier; not physically derived
    pub visual_exaggeration: f32,
    /// Travel at which the object meets the ceiling
    pub max_output_travel_px: f32,
    /// Contact is reported within this distance of the ceiling
    pub contact_margin_px: f32,
    /// Vertical scale of the flattened object
    pub crushed_scale: f32,

    // === Fluid ===
    pub fluid_base_color: String,
    pub fluid_high_pressure_color: String,
    /// Pressure at which the fluid reaches the high-pressure colour
    pub fluid_high_pressure_kpa: f32,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            force_range: ControlRange::new(0.0, 500.0, 5.0),
            input_area_range: ControlRange::new(1.0, 50.0, 1.0),
            output_area_range: ControlRange::new(5.0, 200.0, 5.0),

            default_input_force: 200.0,
            default_input_area: 5.0,
            default_output_area: 100.0,

            pump_step: 5.0,
            pump_period_ms: 50.0,
            pump_max_force: 500.0,
            release_step: 10.0,
            release_period_ms: 20.0,

            max_input_force: 500.0,
            crush_threshold: 5000.0,

            ease_speed: 0.1,
            realistic_ease_speed: 0.02,
            snap_epsilon: 0.001,

            input_travel_px: 100.0,
            visual_exaggeration: 50.0,
            max_output_travel_px: 130.0,
            contact_margin_px: 5.0,
            crushed_scale: 0.4,

            fluid_base_color: "#3b82f6".to_string(),
            fluid_high_pressure_color: "#2563eb".to_string(),
            fluid_high_pressure_kpa: 2000.0,
        }
    }
}

impl PressConfig {
    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        let controls = [
            ("input force", self.force_range, self.default_input_force),
            ("input area", self.input_area_range, self.default_input_area),
            ("output area", self.output_area_range, self.default_output_area),
        ];
        for (control, range, default) in controls {
            if range.min > range.max {
                return Err(ConfigError::InvertedRange {
                    control,
                    min: range.min,
                    max: range.max,
                });
            }
            if !range.contains(default) {
                return Err(ConfigError::DefaultOutOfRange {
                    control,
                    value: default,
                });
            }
        }

        // Areas are divisors: zero must be unreachable from the sliders
        for (control, range) in [
            ("input area", self.input_area_range),
            ("output area", self.output_area_range),
        ] {
            if range.min <= 0.0 {
                return Err(ConfigError::NonPositiveArea {
                    control,
                    min: range.min,
                });
            }
        }

        let positives = [
            ("pump_period_ms", self.pump_period_ms),
            ("release_period_ms", self.release_period_ms),
            ("pump_step", self.pump_step),
            ("release_step", self.release_step),
            ("max_input_force", self.max_input_force),
            ("ease_speed", self.ease_speed),
            ("realistic_ease_speed", self.realistic_ease_speed),
            ("snap_epsilon", self.snap_epsilon),
            ("input_travel_px", self.input_travel_px),
            ("visual_exaggeration", self.visual_exaggeration),
            ("max_output_travel_px", self.max_output_travel_px),
            ("crushed_scale", self.crushed_scale),
            ("fluid_high_pressure_kpa", self.fluid_high_pressure_kpa),
        ];
        for (field, value) in positives {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        // Easing past a full step overshoots the target and can diverge
        let bounded = [
            ("ease_speed", self.ease_speed, 0.0, 1.0),
            ("realistic_ease_speed", self.realistic_ease_speed, 0.0, 1.0),
            ("crushed_scale", self.crushed_scale, 0.0, 1.0),
            (
                "contact_margin_px",
                self.contact_margin_px,
                0.0,
                self.max_output_travel_px,
            ),
            (
                "pump_max_force",
                self.pump_max_force,
                self.force_range.min,
                self.force_range.max,
            ),
        ];
        for (field, value, min, max) in bounded {
            if !(value >= min && value <= max) {
                return Err(ConfigError::OutOfBounds {
                    field,
                    value,
                    min,
                    max,
                });
            }
        }

        // Timer writes snap to the force grid, so off-grid steps would stall
        let step = self.force_range.step;
        if step > 0.0 {
            for (field, value) in [
                ("pump_step", self.pump_step),
                ("release_step", self.release_step),
            ] {
                let steps = value / step;
                if (steps - steps.round()).abs() > 1e-4 {
                    return Err(ConfigError::OffStep { field, value, step });
                }
            }
        }

        for color in [&self.fluid_base_color, &self.fluid_high_pressure_color] {
            if parse_hex_color(color).is_none() {
                return Err(ConfigError::InvalidColor(color.clone()));
            }
        }

        Ok(())
    }

    /// Easing speed for the current mode
    pub fn ease_speed(&self, realistic: bool) -> f32 {
        if realistic {
            self.realistic_ease_speed
        } else {
            self.ease_speed
        }
    }

    /// Fluid colour for a given pressure, blended toward the high-pressure colour
    pub fn fluid_color(&self, pressure_kpa: f32) -> String {
        let base = parse_hex_color(&self.fluid_base_color).unwrap_or(Vec3::ZERO);
        let high = parse_hex_color(&self.fluid_high_pressure_color).unwrap_or(base);
        let t = (pressure_kpa / self.fluid_high_pressure_kpa).clamp(0.0, 1.0);
        format_hex_color(base.lerp(high, t))
    }

    /// Element holding an optional JSON override
    #[cfg(target_arch = "wasm32")]
    const CONFIG_ELEMENT_ID: &'static str = "press-config";

    /// Load config from the page's embedded JSON (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) if !json.trim().is_empty() => Self::from_json_or_default(&json),
            _ => {
                log::info!("Using default press config");
                Self::default()
            }
        }
    }

    /// Load config from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded press config");
                config
            }
            Err(e) => {
                log::warn!("Rejected press config: {}", e);
                Self::default()
            }
        }
    }
}

/// Parse `#rrggbb` into 0..1 RGB
pub fn parse_hex_color(s: &str) -> Option<Vec3> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Vec3::new(
        channel(0)? as f32 / 255.0,
        channel(2)? as f32 / 255.0,
        channel(4)? as f32 / 255.0,
    ))
}

/// Format 0..1 RGB as `#rrggbb`
pub fn format_hex_color(rgb: Vec3) -> String {
    let c = (rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PressConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_area_minimum_rejected() {
        let mut config = PressConfig::default();
        config.input_area_range.min = 0.0;
        config.default_input_area = 5.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveArea {
                control: "input area",
                ..
            })
        ));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = PressConfig::default();
        config.output_area_range = ControlRange::new(200.0, 5.0, 5.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let mut config = PressConfig::default();
        config.default_input_force = 900.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultOutOfRange {
                control: "input force",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_period_rejected() {
        let mut config = PressConfig::default();
        config.pump_period_ms = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "pump_period_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_off_grid_timer_steps_rejected() {
        let mut config = PressConfig::default();
        config.release_step = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OffStep {
                field: "release_step",
                ..
            })
        ));

        let mut config = PressConfig::default();
        config.pump_step = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OffStep {
                field: "pump_step",
                ..
            })
        ));

        let mut config = PressConfig::default();
        config.pump_step = 15.0;
        config.release_step = 25.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pump_max_beyond_force_range_rejected() {
        let mut config = PressConfig::default();
        config.pump_max_force = 900.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfBounds {
                field: "pump_max_force",
                ..
            })
        ));
    }

    #[test]
    fn test_visual_constants_validated() {
        let cases: [(&str, fn(&mut PressConfig)); 7] = [
            ("ease_speed", |c| c.ease_speed = 2.5),
            ("realistic_ease_speed", |c| c.realistic_ease_speed = 1.5),
            ("snap_epsilon", |c| c.snap_epsilon = 0.0),
            ("visual_exaggeration", |c| c.visual_exaggeration = -1.0),
            ("max_output_travel_px", |c| c.max_output_travel_px = 0.0),
            ("contact_margin_px", |c| c.contact_margin_px = 500.0),
            ("crushed_scale", |c| c.crushed_scale = 0.0),
        ];
        for (expected, mutate) in cases {
            let mut config = PressConfig::default();
            mutate(&mut config);
            let field = match config.validate() {
                Err(ConfigError::NonPositive { field, .. }) => field,
                Err(ConfigError::OutOfBounds { field, .. }) => field,
                other => panic!("{expected}: unexpected {other:?}"),
            };
            assert_eq!(field, expected);
        }
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = PressConfig::from_json(r#"{ "crush_threshold": 8000.0 }"#).unwrap();
        assert_eq!(config.crush_threshold, 8000.0);
        assert_eq!(config.default_input_force, 200.0);
        assert_eq!(config.ease_speed, 0.1);
    }

    #[test]
    fn test_bad_json_and_bad_colour() {
        assert!(matches!(
            PressConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PressConfig::from_json(r#"{ "fluid_base_color": "blue" }"#),
            Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_control_range_clamp_and_snap() {
        let range = ControlRange::new(0.0, 500.0, 5.0);
        assert_eq!(range.clamp(-20.0), 0.0);
        assert_eq!(range.clamp(612.0), 500.0);
        assert_eq!(range.clamp(203.0), 205.0);
        assert_eq!(range.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn test_fluid_colour_endpoints() {
        let config = PressConfig::default();
        assert_eq!(config.fluid_color(0.0), "#3b82f6");
        assert_eq!(config.fluid_color(10_000.0), "#2563eb");
    }

    #[test]
    fn test_hex_colour_parse() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(parse_hex_color("ff0000"), None);
        assert_eq!(parse_hex_color("#ff00"), None);
        assert_eq!(format_hex_color(Vec3::new(0.0, 0.0, 1.0)), "#0000ff");
    }
}
