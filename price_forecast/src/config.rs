//! Forecast and generator settings
//!
//! Settings are plain values handed to the services that need them. They can
//! be read from a JSON file and overridden by `AGRI_*` environment variables.

use crate::error::{ForecastError, Result};
use crate::utils::{positive_days, validate_horizon};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

pub const ENV_HORIZON: &str = "AGRI_HORIZON";
pub const ENV_SMOOTHING_FACTOR: &str = "AGRI_SMOOTHING_FACTOR";
pub const ENV_LINEAR_WEIGHT: &str = "AGRI_LINEAR_WEIGHT";
pub const ENV_SMOOTHING_WEIGHT: &str = "AGRI_SMOOTHING_WEIGHT";
pub const ENV_WINDOW_DAYS: &str = "AGRI_WINDOW_DAYS";
pub const ENV_SEED: &str = "AGRI_SEED";

/// How the smoothed level is carried past the last observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingExtrapolation {
    /// Hold the last smoothed level
    #[default]
    Flat,
    /// Continue the change between the last two smoothed levels
    LastSlope,
}

/// Parameters of the trend predictor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Number of days to forecast
    pub horizon: usize,
    /// Exponential smoothing factor, in `(0, 1]`
    pub smoothing_factor: f64,
    /// Weight of the linear component in the blend
    pub linear_weight: f64,
    /// Weight of the smoothing component in the blend
    pub smoothing_weight: f64,
    pub extrapolation: SmoothingExtrapolation,
    /// Number of recent prices used to call the trend direction
    pub trend_window: usize,
    /// Mean daily change above which the trend counts as moving
    pub trend_threshold: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 7,
            smoothing_factor: 0.3,
            linear_weight: 0.5,
            smoothing_weight: 0.5,
            extrapolation: SmoothingExtrapolation::Flat,
            trend_window: 7,
            trend_threshold: 0.01,
        }
    }
}

impl ForecastConfig {
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_smoothing_factor(mut self, smoothing_factor: f64) -> Self {
        self.smoothing_factor = smoothing_factor;
        self
    }

    pub fn with_weights(mut self, linear_weight: f64, smoothing_weight: f64) -> Self {
        self.linear_weight = linear_weight;
        self.smoothing_weight = smoothing_weight;
        self
    }

    pub fn with_extrapolation(mut self, extrapolation: SmoothingExtrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        validate_horizon(self.horizon)?;

        if !self.smoothing_factor.is_finite()
            || self.smoothing_factor <= 0.0
            || self.smoothing_factor > 1.0
        {
            return Err(ForecastError::ConfigurationError(format!(
                "Smoothing factor must be in (0, 1], got {}",
                self.smoothing_factor
            )));
        }

        self.blend_weights()?;

        if self.trend_window < 2 {
            return Err(ForecastError::ConfigurationError(
                "Trend window must cover at least 2 prices".to_string(),
            ));
        }
        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(ForecastError::ConfigurationError(format!(
                "Trend threshold must be non-negative, got {}",
                self.trend_threshold
            )));
        }

        Ok(())
    }

    /// Blend weights normalised to sum to one, as `(linear, smoothing)`
    pub fn blend_weights(&self) -> Result<(f64, f64)> {
        let (linear, smoothing) = (self.linear_weight, self.smoothing_weight);
        if !linear.is_finite() || !smoothing.is_finite() || linear < 0.0 || smoothing < 0.0 {
            return Err(ForecastError::ConfigurationError(format!(
                "Blend weights must be non-negative, got {} and {}",
                linear, smoothing
            )));
        }

        let total = linear + smoothing;
        if total <= 0.0 {
            return Err(ForecastError::ConfigurationError(
                "At least one blend weight must be positive".to_string(),
            ));
        }

        Ok((linear / total, smoothing / total))
    }
}

/// Parameters of the synthetic series generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Length of the generated lookback window
    pub window_days: usize,
    /// Relative price drift over a year, may be negative
    pub annual_drift: f64,
    /// Fixed RNG seed; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window_days: 90,
            annual_drift: 0.05,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.window_days == 0 {
            return Err(ForecastError::ConfigurationError(
                "Window must be at least one day".to_string(),
            ));
        }
        if !self.annual_drift.is_finite() {
            return Err(ForecastError::ConfigurationError(
                "Annual drift must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// All settings of the application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub forecast: ForecastConfig,
    pub generator: GeneratorConfig,
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Override fields from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_vars(std::env::vars())
    }

    /// Override fields from `AGRI_*` key/value pairs; other keys are ignored
    pub fn apply_vars<I, K, V>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref().trim());
            match key {
                ENV_HORIZON => {
                    self.forecast.horizon = positive_days(parse_var(key, value)?, key)?;
                }
                ENV_SMOOTHING_FACTOR => self.forecast.smoothing_factor = parse_var(key, value)?,
                ENV_LINEAR_WEIGHT => self.forecast.linear_weight = parse_var(key, value)?,
                ENV_SMOOTHING_WEIGHT => self.forecast.smoothing_weight = parse_var(key, value)?,
                ENV_WINDOW_DAYS => {
                    self.generator.window_days = positive_days(parse_var(key, value)?, key)?;
                }
                ENV_SEED => self.generator.seed = Some(parse_var(key, value)?),
                _ => continue,
            }
            debug!("Setting {} overridden with {}", key, value);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.generator.validate()
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ForecastError::ConfigurationError(format!("Cannot parse {}={:?}", key, value))
    })
}
