use super::types::{EmergencyFundStatus, Investment};

/// Liquid emergency coverage against a reserve of `target_months` of expenses.
///
/// Without any monthly expenses the target is unknown, so `is_met` is `None`
/// rather than `Some(true)`.
pub fn evaluate(
    cash_balance: f64,
    instruments: &[Investment],
    monthly_expenses: f64,
    target_months: f64,
) -> EmergencyFundStatus {
    let tagged: f64 = instruments
        .iter()
        .filter(|inv| inv.is_emergency_fund)
        .map(|inv| finite_or_zero(inv.current_value))
        .sum();
    let current_total = finite_or_zero(cash_balance) + tagged;

    if !(monthly_expenses.is_finite() && monthly_expenses > 0.0) {
        return EmergencyFundStatus {
            current_total,
            target: None,
            gap: 0.0,
            is_met: None,
            months_covered: None,
        };
    }

    let target = monthly_expenses * target_months;
    EmergencyFundStatus {
        current_total,
        target: Some(target),
        gap: (target - current_total).max(0.0),
        is_met: Some(current_total >= target),
        months_covered: Some(current_total / monthly_expenses),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
