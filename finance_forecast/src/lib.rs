//! # Finance Forecast
//!
//! A Rust library for exploring historical financial figures: ratio
//! derivation, a linear profit forecast and best/worst case scenarios.
//!
//! ## Features
//!
//! - Dataset handling for `date, revenue, expenses, profit` figures (polars backed)
//! - Profitability, liquidity and leverage ratios
//! - Linear regression of profit on calendar month and year, scored on a held-out split
//! - What-if scenarios that scale revenue and expenses
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finance_forecast::{
//!     FinancialData, FinancialRecord, ForecastConfig, ForecastModel, RatioCalculator,
//!     ScenarioGenerator,
//! };
//!
//! let records: Vec<FinancialRecord> = (0..24)
//!     .map(|i| {
//!         let date = NaiveDate::from_ymd_opt(2022 + i / 12, (i % 12) as u32 + 1, 1).unwrap();
//!         FinancialRecord::new(date, 1000.0 + 10.0 * i as f64, 500.0)
//!     })
//!     .collect();
//!
//! let data = RatioCalculator::all(FinancialData::from_records(&records)?)?;
//!
//! // Explicit startup: build and train once
//! let model = ForecastModel::build(data.clone(), ForecastConfig::default())?;
//! println!("Model accuracy: {:.2}%", model.score().unwrap_or(0.0) * 100.0);
//!
//! let forecast = model.forecast_dates(&data.future_months(6)?)?;
//! assert_eq!(forecast.len(), 6);
//!
//! // Best case: revenue up 10%, expenses down 10%
//! let best = ScenarioGenerator::generate(&data, 0.10, 0.90)?;
//! assert_eq!(best.len(), data.len());
//! # Ok::<(), finance_forecast::ForecastError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod ratios;
pub mod scenario;

// Re-export commonly used types
pub use crate::config::{AppConfig, ForecastConfig, ScenarioPresets};
pub use crate::data::{month_starts, DataLoader, FinancialData, FinancialRecord};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{ForecastModel, ForecastResult, ModelState, TrainingSummary};
pub use crate::ratios::{RatioCalculator, RatioSummary};
pub use crate::scenario::{Scenario, ScenarioGenerator, ScenarioParameters};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
