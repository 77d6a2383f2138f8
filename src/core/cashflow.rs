use chrono::NaiveDate;

use super::normalize::to_monthly;
use super::types::{
    CashFlowRelease, Expense, InsurancePolicy, Loan, MonthlyOutflows, ReleaseSource,
};

/// Monthly totals of outflows still running on `as_of`. Closed loans (nothing
/// outstanding) and records whose end date has passed contribute nothing.
pub fn aggregate(
    expenses: &[Expense],
    loans: &[Loan],
    insurance: &[InsurancePolicy],
    as_of: NaiveDate,
) -> MonthlyOutflows {
    let mut monthly_expenses = 0.0;
    let mut essential_monthly_expenses = 0.0;
    for expense in expenses.iter().filter(|e| running_on(e.end_date, as_of)) {
        let monthly = to_monthly(expense.amount, expense.frequency);
        monthly_expenses += monthly;
        if expense.is_essential {
            essential_monthly_expenses += monthly;
        }
    }

    let monthly_emi: f64 = loans
        .iter()
        .filter(|loan| loan.is_active() && running_on(loan.end_date, as_of))
        .map(|loan| to_monthly(loan.emi, loan.emi_frequency))
        .sum();
    let monthly_premiums: f64 = insurance
        .iter()
        .map(|policy| to_monthly(policy.premium, policy.premium_frequency))
        .sum();

    MonthlyOutflows {
        monthly_expenses,
        essential_monthly_expenses,
        monthly_emi,
        monthly_premiums,
        total_monthly_outflow: monthly_expenses + monthly_emi + monthly_premiums,
    }
}

fn running_on(end_date: Option<NaiveDate>, as_of: NaiveDate) -> bool {
    end_date.is_none_or(|end| end >= as_of)
}

/// Dated schedule of monthly cash flow freed as loans and time-bound
/// expenses end, on or after `as_of`.
pub fn releases(loans: &[Loan], expenses: &[Expense], as_of: NaiveDate) -> Vec<CashFlowRelease> {
    let loan_releases = loans.iter().filter(|loan| loan.is_active()).filter_map(|loan| {
        let date = loan.end_date.filter(|d| *d >= as_of)?;
        Some(CashFlowRelease {
            date,
            source: ReleaseSource::Loan,
            name: loan.name.clone(),
            monthly_amount: to_monthly(loan.emi, loan.emi_frequency),
        })
    });
    let expense_releases = expenses.iter().filter_map(|expense| {
        let date = expense.end_date.filter(|d| *d >= as_of)?;
        let monthly_amount = to_monthly(expense.amount, expense.frequency);
        (monthly_amount != 0.0).then(|| CashFlowRelease {
            date,
            source: ReleaseSource::Expense,
            name: expense.name.clone(),
            monthly_amount,
        })
    });

    let mut schedule: Vec<CashFlowRelease> = loan_releases.chain(expense_releases).collect();
    schedule.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    schedule
}
