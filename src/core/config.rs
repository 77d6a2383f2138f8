use serde::{Deserialize, Serialize};

use super::error::EngineError;

pub const DEFAULT_EMERGENCY_FUND_MONTHS: f64 = 6.0;
pub const DEFAULT_LOAN_FREEDOM_WINDOW_YEARS: u32 = 10;
pub const DEFAULT_EMERGENCY_MATURITY_WINDOW_MONTHS: u32 = 6;
pub const DEFAULT_UNDERFUNDED_GOAL_NAMES_SHOWN: usize = 2;
pub const DEFAULT_LIFE_COVER_MULTIPLE: f64 = 10.0;
pub const DEFAULT_GAP_INVARIANT_TOLERANCE: f64 = 1.0;

/// Tunable windows and multipliers used by the emergency-fund evaluator and
/// the alert rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Emergency reserve target, in months of expenses.
    pub emergency_fund_months: f64,
    /// A loan ending within this many years frees up its EMI "soon".
    pub loan_freedom_window_years: u32,
    /// Emergency instruments maturing within this many months need attention.
    pub emergency_maturity_window_months: u32,
    /// Underfunded goal names listed in the alert before the rest are elided.
    pub underfunded_goal_names_shown: usize,
    /// Life cover target as a multiple of annual income.
    pub life_cover_multiple: f64,
    /// Allowed drift between `corpus_gap` and `required - final` before warning.
    pub gap_invariant_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            emergency_fund_months: DEFAULT_EMERGENCY_FUND_MONTHS,
            loan_freedom_window_years: DEFAULT_LOAN_FREEDOM_WINDOW_YEARS,
            emergency_maturity_window_months: DEFAULT_EMERGENCY_MATURITY_WINDOW_MONTHS,
            underfunded_goal_names_shown: DEFAULT_UNDERFUNDED_GOAL_NAMES_SHOWN,
            life_cover_multiple: DEFAULT_LIFE_COVER_MULTIPLE,
            gap_invariant_tolerance: DEFAULT_GAP_INVARIANT_TOLERANCE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("emergencyFundMonths", self.emergency_fund_months),
            ("lifeCoverMultiple", self.life_cover_multiple),
            ("gapInvariantTolerance", self.gap_invariant_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "{name} must be a finite value >= 0"
                )));
            }
        }
        if self.underfunded_goal_names_shown == 0 {
            return Err(EngineError::InvalidInput(
                "underfundedGoalNamesShown must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
