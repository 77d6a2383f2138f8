use super::types::{Goal, MatrixRow, ResolvedGoal};

/// Corrects a goal's nominal funding percent against the accumulation matrix.
///
/// A goal is short when the matrix row for its target year shows a negative
/// net corpus in a year that also carries a goal payout. Only the exact target
/// year is inspected; goals outside the matrix keep their heuristic percent.
/// The corrected percent is capped at the (clamped) nominal percent.
pub fn resolve(goal: &Goal, matrix: &[MatrixRow]) -> ResolvedGoal {
    let nominal = clamp_percent(goal.funding_percent);

    let Some(row) = matrix.iter().find(|row| row.year == goal.target_year) else {
        return unchanged(goal, nominal);
    };
    if !(row.net_corpus < 0.0 && row.goal_outflow > 0.0) {
        return unchanged(goal, nominal);
    }

    let goal_amount = [row.goal_outflow, goal.inflated_amount, goal.target_amount]
        .into_iter()
        .find(|amount| *amount != 0.0 && amount.is_finite())
        .unwrap_or(0.0);
    let shortfall_amount = row.net_corpus.abs();
    let fundable = (goal_amount - shortfall_amount).max(0.0);
    let actual_fundable_percent = if goal_amount > 0.0 {
        clamp_percent(fundable / goal_amount * 100.0).min(nominal)
    } else {
        0.0
    };

    ResolvedGoal {
        goal: goal.clone(),
        has_shortfall: true,
        actual_fundable_percent,
        shortfall_amount,
    }
}

pub fn resolve_all(goals: &[Goal], matrix: &[MatrixRow]) -> Vec<ResolvedGoal> {
    goals.iter().map(|goal| resolve(goal, matrix)).collect()
}

fn unchanged(goal: &Goal, nominal: f64) -> ResolvedGoal {
    ResolvedGoal {
        goal: goal.clone(),
        has_shortfall: false,
        actual_fundable_percent: nominal,
        shortfall_amount: 0.0,
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
