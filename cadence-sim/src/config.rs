//! Run configuration and the immutable parameter groups derived from it.
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::position::Point;

/// User-facing run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "RunConfig::default_goal_distance")]
    pub goal_distance: f64,
    #[serde(default = "RunConfig::default_goal_tolerance_percent")]
    pub goal_tolerance_percent: f64,
    #[serde(default = "RunConfig::default_interpretation_percent")]
    pub interpretation_percent: f64,
    #[serde(default = "RunConfig::default_cadences")]
    pub cadences: Vec<u32>,
    #[serde(default)]
    pub repeat: bool,
    /// Wall-clock delay between ticks. Pacing only; simulated time ignores it.
    #[serde(default)]
    pub period_ms: u64,
    /// Width-to-height ratio of the display surface, used for the vertical
    /// scale maximum handed to renderers.
    #[serde(default = "RunConfig::default_screen_ratio")]
    pub screen_ratio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl RunConfig {
    #[must_use]
    pub const fn default_goal_distance() -> f64 {
        200.0
    }

    #[must_use]
    pub const fn default_goal_tolerance_percent() -> f64 {
        1.0
    }

    #[must_use]
    pub const fn default_interpretation_percent() -> f64 {
        100.0
    }

    #[must_use]
    pub fn default_cadences() -> Vec<u32> {
        vec![1, 7, 14, 30]
    }

    #[must_use]
    pub const fn default_screen_ratio() -> f64 {
        1.0
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation
    /// error for out-of-range fields.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` when the file cannot be read, otherwise the
    /// errors of [`RunConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Validate every field. A cadence of zero would make `day % cadence`
    /// undefined and a non-positive goal or tolerance could never terminate.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_goal()?;
        self.validate_tolerance()?;
        self.validate_interpretation()?;
        self.validate_cadences()?;
        self.validate_screen_ratio()?;
        Ok(())
    }

    fn validate_goal(&self) -> Result<(), ConfigError> {
        if !self.goal_distance.is_finite() || self.goal_distance <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "goal_distance",
                value: self.goal_distance,
            });
        }
        Ok(())
    }

    fn validate_tolerance(&self) -> Result<(), ConfigError> {
        let value = self.goal_tolerance_percent;
        if value <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "goal_tolerance_percent",
                value,
            });
        }
        if !(value.is_finite() && value <= 100.0) {
            return Err(ConfigError::RangeViolation {
                field: "goal_tolerance_percent",
                min: 0.0,
                max: 100.0,
                value,
            });
        }
        Ok(())
    }

    fn validate_interpretation(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.interpretation_percent) {
            return Err(ConfigError::RangeViolation {
                field: "interpretation_percent",
                min: 0.0,
                max: 100.0,
                value: self.interpretation_percent,
            });
        }
        Ok(())
    }

    fn validate_cadences(&self) -> Result<(), ConfigError> {
        if self.cadences.is_empty() {
            return Err(ConfigError::EmptyCadences);
        }
        if let Some(index) = self.cadences.iter().position(|&cadence| cadence == 0) {
            return Err(ConfigError::ZeroCadence { index });
        }
        Ok(())
    }

    fn validate_screen_ratio(&self) -> Result<(), ConfigError> {
        if !self.screen_ratio.is_finite() || self.screen_ratio <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "screen_ratio",
                value: self.screen_ratio,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            goal_distance: Self::default_goal_distance(),
            goal_tolerance_percent: Self::default_goal_tolerance_percent(),
            interpretation_percent: Self::default_interpretation_percent(),
            cadences: Self::default_cadences(),
            repeat: false,
            period_ms: 0,
            screen_ratio: Self::default_screen_ratio(),
            seed: None,
        }
    }
}

/// Parameters shared by every process of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunParameters {
    pub goal: Point,
    /// Absolute distance below which a process has arrived.
    pub goal_tolerance: f64,
    pub interpretation_percent: f64,
    /// Extents renderers scale positions against.
    pub maximums: Point,
}

impl RunParameters {
    /// Resolve absolute values from a configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let goal_tolerance = config.goal_distance * config.goal_tolerance_percent / 100.0;
        Ok(Self {
            goal: Point::new(config.goal_distance, 0.0),
            goal_tolerance,
            interpretation_percent: config.interpretation_percent,
            maximums: Point::new(
                config.goal_distance,
                config.goal_distance / config.screen_ratio,
            ),
        })
    }
}

/// Parameters owned by a single process.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessParameters {
    pub cadence: u32,
    /// Opaque label handed to display collaborators.
    pub tag: String,
}

impl ProcessParameters {
    #[must_use]
    pub fn new(cadence: u32, tag: impl Into<String>) -> Self {
        Self {
            cadence,
            tag: tag.into(),
        }
    }

    /// Parameters with the default `cadence-<n>` tag.
    #[must_use]
    pub fn for_cadence(cadence: u32) -> Self {
        Self::new(cadence, format!("cadence-{cadence}"))
    }
}
