use chrono::{Datelike, Months, NaiveDate};

use super::config::EngineConfig;
use super::normalize::to_monthly;
use super::types::{
    Alert, AlertCode, AlertType, EmergencyFundStatus, GapClassification, Goal, GoalStatus,
    InsurancePolicy, Investment, Loan, MaturingInflows, RetirementProjection, SavedStrategy,
};

/// Everything the alert rules read. Borrowed from the calculation in progress.
#[derive(Debug, Clone, Copy)]
pub struct AlertInputs<'a> {
    pub projection: &'a RetirementProjection,
    pub classification: &'a GapClassification,
    pub emergency_fund: &'a EmergencyFundStatus,
    pub goals: &'a [Goal],
    pub loans: &'a [Loan],
    pub investments: &'a [Investment],
    pub insurance: Option<&'a [InsurancePolicy]>,
    pub maturing: &'a MaturingInflows,
    pub saved_strategy: Option<&'a SavedStrategy>,
    pub as_of: NaiveDate,
}

/// Evaluates every alert rule in its fixed precedence order.
///
/// The output order is the rule order, not a severity sort. Each rule emits at
/// most one alert and emits nothing when its triggering data is absent.
pub fn prioritize(inputs: &AlertInputs<'_>, config: &EngineConfig) -> Vec<Alert> {
    [
        active_strategy(inputs),
        maturity_reinvestment(inputs),
        illiquid_covers_gap(inputs),
        corpus_gap(inputs),
        emi_freed_soon(inputs, config),
        emergency_fund_gap(inputs),
        emergency_fund_maturing(inputs, config),
        goals_underfunded(inputs, config),
        life_cover_gap(inputs, config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn alert(
    code: AlertCode,
    alert_type: AlertType,
    title: &str,
    description: String,
    action_label: &str,
    action_target: &str,
) -> Alert {
    Alert {
        code,
        alert_type,
        title: title.to_string(),
        description,
        action_label: action_label.to_string(),
        action_target: action_target.to_string(),
    }
}

fn active_strategy(inputs: &AlertInputs<'_>) -> Option<Alert> {
    let levers = inputs.saved_strategy?.enabled_levers();
    if levers.is_empty() {
        return None;
    }
    Some(alert(
        AlertCode::ActiveStrategy,
        AlertType::Info,
        "Retirement strategy active",
        format!("Your saved strategy will {}.", levers.join(", ")),
        "Review strategy",
        "/retirement/strategy",
    ))
}

fn maturity_reinvestment(inputs: &AlertInputs<'_>) -> Option<Alert> {
    let maturing = inputs.maturing;
    if !(maturing.total > 0.0) {
        return None;
    }
    Some(alert(
        AlertCode::MaturityReinvestment,
        AlertType::Success,
        "Maturities to reinvest",
        format!(
            "{} from {} and {} matures before retirement. Reinvest it to keep your corpus growing.",
            format_inr(maturing.total),
            plural(maturing.investment_count as usize, "investment", "investments"),
            plural(maturing.insurance_count as usize, "insurance policy", "insurance policies"),
        ),
        "Plan reinvestment",
        "/retirement/strategy",
    ))
}

fn illiquid_covers_gap(inputs: &AlertInputs<'_>) -> Option<Alert> {
    if !inputs.classification.illiquid_covers_gap {
        return None;
    }
    Some(alert(
        AlertCode::IlliquidCoversGap,
        AlertType::Warning,
        "Gap coverable by illiquid assets",
        format!(
            "Your gold and real estate ({}) could cover the {} corpus gap, but selling them takes time.",
            format_inr(inputs.classification.illiquid_value),
            format_inr(inputs.projection.gap_analysis.corpus_gap),
        ),
        "View net worth",
        "/net-worth",
    ))
}

/// Exactly one alert for a positive gap: the tip when maturities close it,
/// otherwise the shortfall.
fn corpus_gap(inputs: &AlertInputs<'_>) -> Option<Alert> {
    let gap = &inputs.projection.gap_analysis;
    if !(gap.corpus_gap > 0.0) {
        return None;
    }
    if inputs.classification.maturities_cover_gap {
        return Some(alert(
            AlertCode::MaturitiesCloseGap,
            AlertType::Tip,
            "Maturities can close the gap",
            format!(
                "Reinvesting {} of maturing investments closes the {} corpus gap.",
                format_inr(inputs.maturing.total),
                format_inr(gap.corpus_gap),
            ),
            "Plan reinvestment",
            "/retirement/strategy",
        ));
    }
    Some(alert(
        AlertCode::CorpusShortfall,
        AlertType::Danger,
        "Retirement corpus shortfall",
        format!(
            "You are projected to retire with {}, {} short of the {} you need.",
            format_inr(inputs.projection.summary.final_corpus),
            format_inr(gap.corpus_gap),
            format_inr(gap.required_corpus),
        ),
        "Increase savings",
        "/retirement/planner",
    ))
}

fn emi_freed_soon(inputs: &AlertInputs<'_>, config: &EngineConfig) -> Option<Alert> {
    let window_end = add_months(inputs.as_of, config.loan_freedom_window_years.saturating_mul(12));
    let (loan, end_date) = inputs
        .loans
        .iter()
        .filter(|loan| loan.is_active())
        .filter_map(|loan| {
            let end = loan.end_date?;
            (end >= inputs.as_of && end <= window_end).then_some((loan, end))
        })
        .min_by_key(|(_, end)| *end)?;

    let emi = to_monthly(loan.emi, loan.emi_frequency);
    Some(alert(
        AlertCode::EmiFreedSoon,
        AlertType::Tip,
        "EMI freed up soon",
        format!(
            "Your {} EMI of {}/month ends {} ({}). Redirect it to investments to boost your corpus.",
            loan.name,
            format_inr(emi),
            describe_horizon(inputs.as_of, end_date),
            end_date.format("%b %Y"),
        ),
        "Plan redirection",
        "/loans",
    ))
}

fn emergency_fund_gap(inputs: &AlertInputs<'_>) -> Option<Alert> {
    let savings = inputs.projection.gap_analysis.net_monthly_savings;
    let fund = inputs.emergency_fund;
    if !(savings > 0.0 && fund.gap > 0.0) {
        return None;
    }
    let target = fund.target?;
    Some(alert(
        AlertCode::EmergencyFundGap,
        AlertType::Warning,
        "Emergency fund below target",
        format!(
            "You have {} set aside against a target of {}. Top up {} from your monthly savings of {}.",
            format_inr(fund.current_total),
            format_inr(target),
            format_inr(fund.gap),
            format_inr(savings),
        ),
        "Build emergency fund",
        "/emergency-fund",
    ))
}

fn emergency_fund_maturing(inputs: &AlertInputs<'_>, config: &EngineConfig) -> Option<Alert> {
    let window_end = add_months(inputs.as_of, config.emergency_maturity_window_months);
    let mut maturing: Vec<(&Investment, NaiveDate)> = inputs
        .investments
        .iter()
        .filter(|inv| inv.is_emergency_fund)
        .filter_map(|inv| {
            let date = inv.maturity_date?;
            (date >= inputs.as_of && date <= window_end).then_some((inv, date))
        })
        .collect();
    maturing.sort_by_key(|(_, date)| *date);
    let (first, date) = *maturing.first()?;

    let label = if first.name.is_empty() { first.kind.as_str() } else { first.name.as_str() };
    let others = match maturing.len() - 1 {
        0 => String::new(),
        n => format!(" {} also mature within the window.", plural(n, "other instrument", "other instruments")),
    };
    Some(alert(
        AlertCode::EmergencyFundMaturing,
        AlertType::Warning,
        "Emergency fund maturing soon",
        format!(
            "{} ({}) matures on {}. Renew it or move it to a liquid account to keep your reserve available.{}",
            label,
            format_inr(first.current_value),
            date.format("%d %b %Y"),
            others,
        ),
        "Review investments",
        "/investments",
    ))
}

fn goals_underfunded(inputs: &AlertInputs<'_>, config: &EngineConfig) -> Option<Alert> {
    let unfunded: Vec<&str> = inputs
        .goals
        .iter()
        .filter(|g| g.status == GoalStatus::Unfunded)
        .map(|g| g.name.as_str())
        .collect();
    if unfunded.is_empty() {
        return None;
    }

    let shown = config.underfunded_goal_names_shown.max(1);
    let names = unfunded[..unfunded.len().min(shown)].join(", ");
    let more = if unfunded.len() > shown { "…" } else { "" };
    Some(alert(
        AlertCode::GoalsUnderfunded,
        AlertType::Danger,
        "Goals underfunded",
        format!(
            "{} not fully funded: {names}{more}",
            plural(unfunded.len(), "goal", "goals"),
        ),
        "Review goals",
        "/goals",
    ))
}

fn life_cover_gap(inputs: &AlertInputs<'_>, config: &EngineConfig) -> Option<Alert> {
    let policies = inputs.insurance?;
    let annual_income = inputs.projection.gap_analysis.monthly_income * 12.0;
    if !(annual_income > 0.0) {
        return None;
    }
    let cover: f64 = policies
        .iter()
        .filter(|p| p.kind.is_life_cover())
        .map(|p| p.sum_assured.max(0.0))
        .sum();
    let target = annual_income * config.life_cover_multiple;
    if cover >= target {
        return None;
    }
    Some(alert(
        AlertCode::LifeCoverGap,
        AlertType::Warning,
        "Life cover below recommended",
        format!(
            "Your life cover of {} is below {}x annual income ({}). Consider a term plan for the remaining {}.",
            format_inr(cover),
            config.life_cover_multiple,
            format_inr(target),
            format_inr(target - cover),
        ),
        "Review insurance",
        "/insurance",
    ))
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn describe_horizon(from: NaiveDate, to: NaiveDate) -> String {
    let months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    match months {
        ..=0 => "this month".to_string(),
        1..=11 => format!("in {}", plural(months as usize, "month", "months")),
        _ => format!("in {}", plural((months / 12) as usize, "year", "years")),
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 { format!("1 {one}") } else { format!("{n} {many}") }
}

/// Rupee amount in lakh/crore notation for large values, grouped digits below.
pub fn format_inr(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    // Units are picked on the value as displayed, so 99,999.6 reads as 1.00 L.
    let lakhs = (abs / 1e3).round() / 100.0;
    if lakhs >= 100.0 {
        return format!("{sign}₹{:.2} Cr", abs / 1e7);
    }
    let rupees = abs.round() as u64;
    if rupees >= 100_000 {
        return format!("{sign}₹{lakhs:.2} L");
    }
    if rupees >= 1_000 {
        format!("{sign}₹{},{:03}", rupees / 1_000, rupees % 1_000)
    } else {
        format!("{sign}₹{rupees}")
    }
}
