//! Settings for training and for the scenario presets

use crate::error::{ForecastError, Result};
use crate::scenario::{Scenario, ScenarioParameters};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// How the dataset is partitioned for training and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Share of rows withheld for scoring
    pub test_size: f64,
    /// Seed of the row shuffle
    pub random_state: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "test_size must be between 0 and 1 (exclusive), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}

/// Parameters behind each named scenario.
///
/// Fields missing from a TOML table keep the preset's own value, so
/// `[scenarios.best]` with only `revenue_growth_rate` keeps the best case
/// expense factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioPresets {
    pub base: ScenarioParameters,
    pub best: ScenarioParameters,
    pub worst: ScenarioParameters,
}

impl Default for ScenarioPresets {
    fn default() -> Self {
        Self {
            base: ScenarioParameters::new(0.0, 1.0),
            best: ScenarioParameters::new(0.10, 0.90),
            worst: ScenarioParameters::new(-0.05, 1.10),
        }
    }
}

impl<'de> Deserialize<'de> for ScenarioPresets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let overrides = PresetOverrides::deserialize(deserializer)?;
        let defaults = Self::default();
        Ok(Self {
            base: overrides.base.apply(defaults.base),
            best: overrides.best.apply(defaults.best),
            worst: overrides.worst.apply(defaults.worst),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PresetOverrides {
    base: ParameterOverride,
    best: ParameterOverride,
    worst: ParameterOverride,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParameterOverride {
    revenue_growth_rate: Option<f64>,
    expense_change_factor: Option<f64>,
}

impl ParameterOverride {
    fn apply(self, preset: ScenarioParameters) -> ScenarioParameters {
        ScenarioParameters::new(
            self.revenue_growth_rate.unwrap_or(preset.revenue_growth_rate),
            self.expense_change_factor.unwrap_or(preset.expense_change_factor),
        )
    }
}

impl ScenarioPresets {
    pub fn parameters(&self, scenario: Scenario) -> ScenarioParameters {
        match scenario {
            Scenario::Base => self.base,
            Scenario::Best => self.best,
            Scenario::Worst => self.worst,
        }
    }
}

/// Top-level settings, usually read from a TOML file.
///
/// ```toml
/// horizon_months = 12
///
/// [forecast]
/// test_size = 0.25
///
/// [scenarios.best]
/// revenue_growth_rate = 0.15
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub forecast: ForecastConfig,
    pub scenarios: ScenarioPresets,
    /// Number of month starts to forecast after the last recorded date
    pub horizon_months: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig::default(),
            scenarios: ScenarioPresets::default(),
            horizon_months: 6,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Replace the forecast horizon, re-checking the settings
    pub fn with_horizon_months(mut self, months: usize) -> Result<Self> {
        self.horizon_months = months;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        if self.horizon_months == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon_months must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
