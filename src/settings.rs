//! Session settings and tuning
//!
//! Read once at session start. A native host may persist them as JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Viewport;

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Viewport must be strictly positive and finite in both dimensions
    #[error("invalid viewport {width}x{height}: dimensions must be positive")]
    InvalidViewport { width: f32, height: f32 },

    /// A tuning value is out of its usable range
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Settings file could not be read or written
    #[error("settings io: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `Settings`
    #[error("settings parse: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Numeric knobs of the pipe cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Pipe x below which the pair counts as off-screen (loop-reset boundary)
    pub pipe_exit_x: f32,
    /// Pipe x at the end of the animated sweep
    pub pipe_despawn_x: f32,
    /// Duration of one sweep at speed multiplier 1.0 (seconds)
    pub base_cycle_secs: f32,
    /// Total span of the random gap offset, centred on zero
    pub gap_range: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pipe_exit_x: -100.0,
            pipe_despawn_x: -200.0,
            base_cycle_secs: 3.0,
            gap_range: 400.0,
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.base_cycle_secs.is_finite() && self.base_cycle_secs > 0.0) {
            return Err(SettingsError::InvalidTuning(format!(
                "base_cycle_secs must be positive, got {}",
                self.base_cycle_secs
            )));
        }
        if !(self.gap_range.is_finite() && self.gap_range >= 0.0) {
            return Err(SettingsError::InvalidTuning(format!(
                "gap_range must be non-negative, got {}",
                self.gap_range
            )));
        }
        if !(self.pipe_despawn_x < self.pipe_exit_x) {
            return Err(SettingsError::InvalidTuning(format!(
                "pipe_despawn_x ({}) must lie left of pipe_exit_x ({})",
                self.pipe_despawn_x, self.pipe_exit_x
            )));
        }
        Ok(())
    }
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Viewport width in world units
    pub viewport_width: f32,
    /// Viewport height in world units
    pub viewport_height: f32,
    /// Seed for the gap offset RNG
    pub seed: u64,
    /// Pipe cycle tuning
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: 400.0,
            viewport_height: 800.0,
            seed: 0x5EED,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Settings for a given viewport, everything else default
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Self::default()
        }
    }

    /// Validate and return the viewport these settings describe
    pub fn viewport(&self) -> Result<Viewport, SettingsError> {
        let (width, height) = (self.viewport_width, self.viewport_height);
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SettingsError::InvalidViewport { width, height });
        }
        Ok(Viewport { width, height })
    }

    /// Check every field that feeds the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.viewport()?;
        self.tuning.validate()
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        let viewport = settings.viewport().unwrap();
        assert_eq!(viewport.width, 400.0);
        assert_eq!(viewport.height, 800.0);
    }

    #[test]
    fn test_degenerate_viewport_rejected() {
        for (w, h) in [(0.0, 800.0), (400.0, 0.0), (-1.0, 800.0), (f32::NAN, 800.0)] {
            let settings = Settings::with_viewport(w, h);
            assert!(matches!(
                settings.viewport(),
                Err(SettingsError::InvalidViewport { .. })
            ));
        }
    }

    #[test]
    fn test_bad_tuning_rejected() {
        let mut settings = Settings::default();
        settings.tuning.base_cycle_secs = 0.0;
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidTuning(_))));

        let mut settings = Settings::default();
        settings.tuning.pipe_despawn_x = 0.0;
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidTuning(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "viewport_width": 320.0 }"#).unwrap();
        assert_eq!(settings.viewport_width, 320.0);
        assert_eq!(settings.viewport_height, 800.0);
        assert_eq!(settings.tuning, Tuning::default());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("flappy_settings_{}.json", std::process::id()));
        let mut settings = Settings::with_viewport(360.0, 640.0);
        settings.seed = 42;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/flappy/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
