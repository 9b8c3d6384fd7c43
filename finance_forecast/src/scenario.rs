//! What-if scenarios obtained by scaling revenue and expenses

use crate::data::columns::{EXPENSES, PROFIT, REVENUE};
use crate::data::FinancialData;
use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multipliers describing one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParameters {
    /// Revenue is multiplied by `1 + revenue_growth_rate`
    pub revenue_growth_rate: f64,
    /// Expenses are multiplied by `expense_change_factor`
    pub expense_change_factor: f64,
}

impl ScenarioParameters {
    pub fn new(revenue_growth_rate: f64, expense_change_factor: f64) -> Self {
        Self {
            revenue_growth_rate,
            expense_change_factor,
        }
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Named scenario presets offered to the analyst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Base,
    Best,
    Worst,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Base, Scenario::Best, Scenario::Worst];

    /// Human readable name, e.g. "Best Case"
    pub fn label(&self) -> &'static str {
        match self {
            Scenario::Base => "Base Case",
            Scenario::Best => "Best Case",
            Scenario::Worst => "Worst Case",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scenario::Base => "base",
            Scenario::Best => "best",
            Scenario::Worst => "worst",
        };
        f.write_str(name)
    }
}

impl FromStr for Scenario {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Scenario::Base),
            "best" => Ok(Scenario::Best),
            "worst" => Ok(Scenario::Worst),
            other => Err(ForecastError::InvalidParameter(format!(
                "Unknown scenario '{}', expected base, best or worst",
                other
            ))),
        }
    }
}

/// Builds scenario copies of a dataset
#[derive(Debug)]
pub struct ScenarioGenerator;

impl ScenarioGenerator {
    /// Copy of `base` with revenue, expenses and profit recomputed per row:
    ///
    /// * `revenue * (1 + revenue_growth_rate)`
    /// * `expenses * expense_change_factor`
    /// * `profit = revenue - expenses` on the new figures
    ///
    /// Every other column is copied unchanged, so derived ratio or calendar
    /// columns on the result are stale. `base` is never modified. Any real
    /// parameters are accepted.
    pub fn generate(
        base: &FinancialData,
        revenue_growth_rate: f64,
        expense_change_factor: f64,
    ) -> Result<FinancialData> {
        let revenue: Vec<f64> = base
            .revenue()?
            .into_iter()
            .map(|r| r * (1.0 + revenue_growth_rate))
            .collect();
        let expenses: Vec<f64> = base
            .expenses()?
            .into_iter()
            .map(|e| e * expense_change_factor)
            .collect();
        let profit: Vec<f64> = revenue
            .iter()
            .zip(expenses.iter())
            .map(|(r, e)| r - e)
            .collect();

        let mut df = base.dataframe().clone();
        df.with_column(Series::new(REVENUE, revenue))?;
        df.with_column(Series::new(EXPENSES, expenses))?;
        df.with_column(Series::new(PROFIT, profit))?;

        FinancialData::from_dataframe(df)
    }

    /// [`ScenarioGenerator::generate`] with bundled parameters
    pub fn generate_with(base: &FinancialData, params: ScenarioParameters) -> Result<FinancialData> {
        Self::generate(base, params.revenue_growth_rate, params.expense_change_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parsing() {
        assert_eq!("Best".parse::<Scenario>().unwrap(), Scenario::Best);
        assert_eq!(" worst ".parse::<Scenario>().unwrap(), Scenario::Worst);
        assert!("optimistic".parse::<Scenario>().is_err());
        assert_eq!(Scenario::Base.to_string(), "base");
        assert_eq!(Scenario::Worst.label(), "Worst Case");
    }

    #[test]
    fn test_default_parameters_are_identity() {
        let params = ScenarioParameters::default();
        assert_eq!(params.revenue_growth_rate, 0.0);
        assert_eq!(params.expense_change_factor, 1.0);
    }
}
