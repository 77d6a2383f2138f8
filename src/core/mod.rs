mod alerts;
mod cashflow;
mod classify;
mod config;
mod emergency;
mod engine;
mod error;
mod goals;
mod normalize;
mod timeline;
mod types;

pub use alerts::{AlertInputs, format_inr, prioritize};
pub use cashflow::{aggregate, releases};
pub use classify::{GOLD, REAL_ESTATE, classify};
pub use config::{
    DEFAULT_EMERGENCY_FUND_MONTHS, DEFAULT_EMERGENCY_MATURITY_WINDOW_MONTHS,
    DEFAULT_GAP_INVARIANT_TOLERANCE, DEFAULT_LIFE_COVER_MULTIPLE,
    DEFAULT_LOAN_FREEDOM_WINDOW_YEARS, DEFAULT_UNDERFUNDED_GOAL_NAMES_SHOWN, EngineConfig,
};
pub use emergency::evaluate as evaluate_emergency_fund;
pub use engine::calculate;
pub use error::{EngineError, TimelineIntegrityError};
pub use goals::{resolve as resolve_goal, resolve_all as resolve_goals};
pub use normalize::to_monthly;
pub use timeline::{insights as timeline_insights, merge as merge_timeline};
pub use types::{
    Alert, AlertCode, AlertType, CalculationInput, CalculationResult, CashFlowRelease,
    EmergencyFundStatus, Expense, Frequency, GapAnalysis, GapClassification, Goal, GoalStatus,
    IncomeProjectionRow, InsuranceKind, InsurancePolicy, Investment, Loan, MatrixRow,
    MaturingInflows, MergedTimelinePoint, MonthlyOutflows, ProjectionSummary, ReleaseSource,
    ResolvedGoal, RetirementProjection, SavedStrategy, TimelineInsights,
};
