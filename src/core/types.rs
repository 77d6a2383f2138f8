use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recurrence of a recorded amount. Anything the engine does not recognise is
/// normalised as monthly.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    #[serde(alias = "monthly")]
    Monthly,
    #[serde(alias = "quarterly")]
    Quarterly,
    #[serde(alias = "half-yearly", alias = "halfYearly", alias = "HALFYEARLY")]
    HalfYearly,
    #[serde(alias = "yearly", alias = "ANNUAL", alias = "annual")]
    Yearly,
    #[serde(alias = "one-time", alias = "oneTime", alias = "ONETIME")]
    OneTime,
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatrixRow {
    pub year: i32,
    pub age: u32,
    pub net_corpus: f64,
    pub total_inflow: f64,
    pub goal_outflow: f64,
    pub goals_this_year: Vec<String>,
    pub ppf_balance: f64,
    pub epf_balance: f64,
    pub mf_balance: f64,
    pub other_liquid_balance: f64,
    pub mf_sip: f64,
}

/// Post-retirement row. `year_offset` counts years since retirement; row 0 is
/// the retirement year itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeProjectionRow {
    #[serde(rename = "year", alias = "yearOffset")]
    pub year_offset: u32,
    pub corpus: f64,
    pub annual_income: f64,
    pub annual_expense: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub final_corpus: f64,
    pub retirement_age: u32,
    pub current_age: u32,
    pub life_expectancy: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GapAnalysis {
    pub required_corpus: f64,
    /// `required_corpus - final_corpus`; positive means a shortfall.
    pub corpus_gap: f64,
    pub current_monthly_expenses: f64,
    pub monthly_income: f64,
    pub net_monthly_savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetirementProjection {
    pub matrix: Vec<MatrixRow>,
    pub income_projection: Vec<IncomeProjectionRow>,
    pub summary: ProjectionSummary,
    pub gap_analysis: GapAnalysis,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalStatus {
    #[serde(alias = "funded")]
    Funded,
    #[serde(alias = "unfunded")]
    Unfunded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub target_year: i32,
    #[serde(default)]
    pub target_amount: f64,
    /// Target amount inflated to `target_year`.
    #[serde(default)]
    pub inflated_amount: f64,
    #[serde(default)]
    pub funding_percent: f64,
    pub status: GoalStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedGoal {
    pub goal: Goal,
    pub has_shortfall: bool,
    pub actual_fundable_percent: f64,
    pub shortfall_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedTimelinePoint {
    pub year: i32,
    pub age: u32,
    pub net_corpus_excluding_inflow: f64,
    pub is_post_retirement: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Loan {
    pub name: String,
    pub outstanding_amount: f64,
    pub emi: f64,
    pub emi_frequency: Option<Frequency>,
    pub end_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_active(&self) -> bool {
        self.outstanding_amount > 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Expense {
    pub name: String,
    pub amount: f64,
    pub frequency: Option<Frequency>,
    pub is_essential: bool,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Investment {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub current_value: f64,
    pub is_emergency_fund: bool,
    pub maturity_date: Option<NaiveDate>,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuranceKind {
    #[serde(alias = "life")]
    Life,
    #[serde(alias = "term")]
    Term,
    #[serde(alias = "health")]
    Health,
    #[default]
    #[serde(other)]
    Other,
}

impl InsuranceKind {
    pub fn is_life_cover(self) -> bool {
        matches!(self, InsuranceKind::Life | InsuranceKind::Term)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsurancePolicy {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: InsuranceKind,
    pub sum_assured: f64,
    pub premium: f64,
    pub premium_frequency: Option<Frequency>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaturingInflows {
    #[serde(rename = "totalMaturingBeforeRetirement")]
    pub total: f64,
    pub investment_count: u32,
    pub insurance_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedStrategy {
    pub sell_illiquid_assets: bool,
    pub reinvest_maturities: bool,
    #[serde(rename = "redirectLoanEMIs", alias = "redirectLoanEmis")]
    pub redirect_loan_emis: bool,
    #[serde(rename = "increaseSIP", alias = "increaseSip")]
    pub increase_sip: bool,
}

impl SavedStrategy {
    pub fn enabled_levers(&self) -> Vec<&'static str> {
        [
            (self.sell_illiquid_assets, "sell illiquid assets"),
            (self.reinvest_maturities, "reinvest maturities"),
            (self.redirect_loan_emis, "redirect freed EMIs"),
            (self.increase_sip, "increase SIP"),
        ]
        .into_iter()
        .filter_map(|(enabled, label)| enabled.then_some(label))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalculationInput {
    pub projection: Option<RetirementProjection>,
    pub goals: Vec<Goal>,
    pub loans: Vec<Loan>,
    pub expenses: Vec<Expense>,
    pub investments: Vec<Investment>,
    /// `None` means insurance records were not supplied at all.
    pub insurance: Option<Vec<InsurancePolicy>>,
    pub cash_balance: f64,
    pub net_worth_asset_breakdown: BTreeMap<String, f64>,
    pub maturing_before_retirement: MaturingInflows,
    pub saved_strategy: Option<SavedStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundStatus {
    pub current_total: f64,
    pub target: Option<f64>,
    pub gap: f64,
    pub is_met: Option<bool>,
    pub months_covered: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapClassification {
    pub illiquid_covers_gap: bool,
    pub maturities_cover_gap: bool,
    pub illiquid_value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyOutflows {
    pub monthly_expenses: f64,
    pub essential_monthly_expenses: f64,
    pub monthly_emi: f64,
    pub monthly_premiums: f64,
    pub total_monthly_outflow: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseSource {
    Loan,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRelease {
    pub date: NaiveDate,
    pub source: ReleaseSource,
    pub name: String,
    pub monthly_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInsights {
    pub peak_year: i32,
    pub peak_age: u32,
    pub peak_corpus: f64,
    pub depletion_year: Option<i32>,
    pub depletion_age: Option<u32>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Success,
    Warning,
    Danger,
    Info,
    Tip,
}

/// Stable identifier of the rule that produced an alert.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCode {
    ActiveStrategy,
    MaturityReinvestment,
    IlliquidCoversGap,
    MaturitiesCloseGap,
    CorpusShortfall,
    EmiFreedSoon,
    EmergencyFundGap,
    EmergencyFundMaturing,
    GoalsUnderfunded,
    LifeCoverGap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub code: AlertCode,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub description: String,
    pub action_label: String,
    pub action_target: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub merged_timeline: Vec<MergedTimelinePoint>,
    pub resolved_goals: Vec<ResolvedGoal>,
    pub emergency_fund: EmergencyFundStatus,
    pub alerts: Vec<Alert>,
    pub classification: GapClassification,
    pub outflows: MonthlyOutflows,
    pub cash_flow_releases: Vec<CashFlowRelease>,
    pub insights: Option<TimelineInsights>,
}
