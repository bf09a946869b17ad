//! Game settings
//!
//! Supplied once at construction. The simulation never reconfigures itself
//! at runtime; a new `GameState` is built instead.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Smallest playfield edge that still fits the spawn grid and a ship
pub const MIN_PLAYFIELD: u32 = 64;
/// Largest playfield edge; keeps spawn grid math in `u32` and pixel
/// coordinates exact in `f32`
pub const MAX_PLAYFIELD: u32 = 1 << 20;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Playfield width in pixels
    pub width: u32,
    /// Playfield height in pixels
    pub height: u32,

    // === Timing ===
    /// Target frame rate; only used to convert the round time into frames
    pub fps: u32,
    /// Round time limit in seconds
    pub round_time_secs: f32,

    // === Population ===
    /// Large obstacles in the first round
    pub starting_obstacles: u32,
    /// Cap on large obstacles per round
    pub max_obstacles: u32,
    /// Registry cap, local player included
    pub max_players: usize,

    /// RNG seed for deterministic replay
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 650,
            height: 650,
            fps: 60,
            round_time_secs: 90.0,
            starting_obstacles: 4,
            max_obstacles: 6,
            max_players: 20,
            seed: 0,
        }
    }
}

/// Why a settings document was rejected
#[derive(Debug)]
pub enum SettingsError {
    /// Not valid JSON, or fields of the wrong type
    Parse(serde_json::Error),
    /// Well-formed but out of range
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Parse(err) => write!(f, "failed to parse settings: {err}"),
            SettingsError::Invalid(reason) => write!(f, "invalid settings: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

impl Settings {
    /// Parse and validate a JSON settings document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |reason: String| Err(SettingsError::Invalid(reason));

        if self.width < MIN_PLAYFIELD || self.height < MIN_PLAYFIELD {
            return invalid(format!(
                "playfield {}x{} is smaller than {MIN_PLAYFIELD}x{MIN_PLAYFIELD}",
                self.width, self.height
            ));
        }
        if self.width > MAX_PLAYFIELD || self.height > MAX_PLAYFIELD {
            return invalid(format!(
                "playfield {}x{} is larger than {MAX_PLAYFIELD}x{MAX_PLAYFIELD}",
                self.width, self.height
            ));
        }
        if self.fps == 0 {
            return invalid("fps must be positive".into());
        }
        if !(self.round_time_secs.is_finite() && self.round_time_secs > 0.0) {
            return invalid(format!("round time {} is not positive", self.round_time_secs));
        }
        if self.round_frames() == 0 {
            return invalid("round time is shorter than one frame".into());
        }
        if self.starting_obstacles > self.max_obstacles {
            return invalid(format!(
                "starting obstacles {} exceed the cap of {}",
                self.starting_obstacles, self.max_obstacles
            ));
        }
        if self.max_players == 0 {
            return invalid("max_players must leave room for the local player".into());
        }
        Ok(())
    }

    /// Playfield size as a vector
    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Round time limit in frames
    pub fn round_frames(&self) -> u32 {
        (self.round_time_secs * self.fps as f32).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.round_frames(), 5400);
        assert_eq!(settings.playfield(), Vec2::new(650.0, 650.0));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "width": 800, "seed": 7 }"#).unwrap();
        assert_eq!(settings.width, 800);
        assert_eq!(settings.height, 650);
        assert_eq!(settings.seed, 7);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Settings::from_json("{ width: "),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "width": -5 }"#),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_largest_playfield_is_accepted() {
        let settings = Settings {
            width: MAX_PLAYFIELD,
            height: MAX_PLAYFIELD,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
        assert_eq!(settings.playfield(), Vec2::splat(MAX_PLAYFIELD as f32));
        assert!(matches!(
            Settings { width: MAX_PLAYFIELD + 1, ..settings }.validate(),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn test_validation() {
        let cases = [
            r#"{ "width": 10 }"#,
            r#"{ "height": 3000000000 }"#,
            r#"{ "fps": 0 }"#,
            r#"{ "round_time_secs": 0.0 }"#,
            r#"{ "starting_obstacles": 7 }"#,
            r#"{ "max_players": 0 }"#,
        ];
        for json in cases {
            let err = Settings::from_json(json).unwrap_err();
            assert!(matches!(err, SettingsError::Invalid(_)), "{json}");
            assert!(err.to_string().starts_with("invalid settings"));
        }
    }
}
