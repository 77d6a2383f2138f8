use chrono::NaiveDate;
use tracing::{debug, warn};

use super::alerts::{self, AlertInputs};
use super::cashflow;
use super::classify::classify;
use super::config::EngineConfig;
use super::emergency;
use super::error::EngineError;
use super::goals;
use super::timeline;
use super::types::{CalculationInput, CalculationResult, RetirementProjection};

/// Runs the full reconciliation over one snapshot of records.
///
/// `as_of` anchors every date window (loan freedom, emergency maturities,
/// cash-flow releases); the engine never reads the clock itself.
pub fn calculate(
    input: &CalculationInput,
    config: &EngineConfig,
    as_of: NaiveDate,
) -> Result<CalculationResult, EngineError> {
    config.validate()?;
    let projection = input.projection.as_ref().ok_or_else(|| {
        EngineError::InvalidInput("a retirement projection is required".to_string())
    })?;
    check_gap_invariant(projection, config);

    let merged_timeline = timeline::merge(projection)?;
    debug!(points = merged_timeline.len(), "merged corpus timeline");

    let insurance = input.insurance.as_deref().unwrap_or_default();
    let outflows = cashflow::aggregate(&input.expenses, &input.loans, insurance, as_of);
    let monthly_expenses = if input.expenses.is_empty() {
        projection.gap_analysis.current_monthly_expenses
    } else {
        outflows.monthly_expenses
    };
    let emergency_fund = emergency::evaluate(
        input.cash_balance,
        &input.investments,
        monthly_expenses,
        config.emergency_fund_months,
    );

    let resolved_goals = goals::resolve_all(&input.goals, &projection.matrix);
    let shortfalls = resolved_goals.iter().filter(|g| g.has_shortfall).count();
    debug!(goals = resolved_goals.len(), shortfalls, "resolved goals");

    let classification = classify(
        projection,
        &input.net_worth_asset_breakdown,
        &input.maturing_before_retirement,
    );

    let alert_inputs = AlertInputs {
        projection,
        classification: &classification,
        emergency_fund: &emergency_fund,
        goals: &input.goals,
        loans: &input.loans,
        investments: &input.investments,
        insurance: input.insurance.as_deref(),
        maturing: &input.maturing_before_retirement,
        saved_strategy: input.saved_strategy.as_ref(),
        as_of,
    };
    let alerts = alerts::prioritize(&alert_inputs, config);
    debug!(alerts = alerts.len(), "derived alerts");

    Ok(CalculationResult {
        insights: timeline::insights(&merged_timeline),
        cash_flow_releases: cashflow::releases(&input.loans, &input.expenses, as_of),
        merged_timeline,
        resolved_goals,
        emergency_fund,
        alerts,
        classification,
        outflows,
    })
}

fn check_gap_invariant(projection: &RetirementProjection, config: &EngineConfig) {
    let gap = &projection.gap_analysis;
    let expected = gap.required_corpus - projection.summary.final_corpus;
    if (gap.corpus_gap - expected).abs() > config.gap_invariant_tolerance {
        warn!(
            corpus_gap = gap.corpus_gap,
            expected, "corpus gap disagrees with required minus final corpus"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::TimelineIntegrityError;
    use crate::core::types::{AlertCode, GoalStatus};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    const SAMPLE_INPUT: &str = r#"{
      "projection": {
        "matrix": [
          { "year": 2026, "age": 57, "netCorpus": 1500000, "totalInflow": 0, "goalOutflow": 0 },
          { "year": 2027, "age": 58, "netCorpus": 1650000, "totalInflow": 200000, "goalOutflow": 0 },
          { "year": 2028, "age": 59, "netCorpus": -100000, "totalInflow": 0, "goalOutflow": 500000,
            "goalsThisYear": ["Daughter's wedding"] },
          { "year": 2029, "age": 60, "netCorpus": 1800000, "totalInflow": 0, "goalOutflow": 0 }
        ],
        "incomeProjection": [
          { "year": 0, "corpus": 1800000 },
          { "year": 1, "corpus": 1700000 },
          { "year": 2, "corpus": 1550000 }
        ],
        "summary": { "finalCorpus": 1800000, "retirementAge": 60, "currentAge": 57 },
        "gapAnalysis": {
          "requiredCorpus": 2000000,
          "corpusGap": 200000,
          "currentMonthlyExpenses": 50000,
          "monthlyIncome": 120000,
          "netMonthlySavings": 30000
        }
      },
      "goals": [
        { "id": "g1", "name": "Daughter's wedding", "targetYear": 2028, "targetAmount": 400000,
          "inflatedAmount": 450000, "fundingPercent": 100, "status": "FUNDED" },
        { "id": "g2", "name": "World trip", "targetYear": 2040, "targetAmount": 300000,
          "inflatedAmount": 500000, "fundingPercent": 40, "status": "UNFUNDED" }
      ],
      "loans": [
        { "name": "Car loan", "outstandingAmount": 600000, "emi": 45000, "endDate": "2029-09-30" },
        { "name": "Home loan", "outstandingAmount": 4000000, "emi": 60000, "endDate": "2041-09-30" }
      ],
      "expenses": [
        { "name": "Household", "amount": 50000, "frequency": "MONTHLY", "isEssential": true }
      ],
      "investments": [
        { "name": "Bank FD", "type": "FD", "currentValue": 300000, "isEmergencyFund": true },
        { "name": "Index fund", "type": "MF", "currentValue": 900000, "isEmergencyFund": false }
      ],
      "cashBalance": 200000,
      "netWorthAssetBreakdown": { "GOLD": 100000, "REAL_ESTATE": 150000 },
      "maturingBeforeRetirement": {
        "totalMaturingBeforeRetirement": 50000, "investmentCount": 1, "insuranceCount": 0
      },
      "savedStrategy": null
    }"#;

    fn sample_input() -> CalculationInput {
        serde_json::from_str(SAMPLE_INPUT).expect("sample input should parse")
    }

    #[test]
    fn sample_scenario_reconciles_every_stage() {
        let result =
            calculate(&sample_input(), &EngineConfig::default(), as_of()).expect("valid input");

        let years: Vec<i32> = result.merged_timeline.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2026, 2027, 2028, 2029, 2030, 2031]);
        assert_approx(result.merged_timeline[1].net_corpus_excluding_inflow, 1_450_000.0);
        assert_approx(result.merged_timeline[2].net_corpus_excluding_inflow, 0.0);

        let wedding = &result.resolved_goals[0];
        assert!(wedding.has_shortfall);
        assert_approx(wedding.shortfall_amount, 100_000.0);
        assert_approx(wedding.actual_fundable_percent, 80.0);
        assert!(!result.resolved_goals[1].has_shortfall);
        assert_approx(result.resolved_goals[1].actual_fundable_percent, 40.0);

        assert_approx(result.emergency_fund.current_total, 500_000.0);
        assert_eq!(result.emergency_fund.target, Some(300_000.0));
        assert_eq!(result.emergency_fund.is_met, Some(true));

        assert!(result.classification.illiquid_covers_gap);
        assert!(!result.classification.maturities_cover_gap);

        let codes: Vec<AlertCode> = result.alerts.iter().map(|a| a.code).collect();
        assert_eq!(
            codes,
            vec![
                AlertCode::MaturityReinvestment,
                AlertCode::IlliquidCoversGap,
                AlertCode::CorpusShortfall,
                AlertCode::EmiFreedSoon,
                AlertCode::GoalsUnderfunded,
            ]
        );
        assert!(result.alerts[3].description.contains("Car loan"));

        assert_eq!(result.cash_flow_releases.len(), 2);
        assert_eq!(result.cash_flow_releases[0].name, "Car loan");
        let insights = result.insights.expect("timeline is not empty");
        assert_eq!(insights.peak_year, 2029);
        assert_eq!(insights.peak_age, 60);
        assert_eq!(insights.depletion_year, None);
    }

    #[test]
    fn maturities_that_cover_the_gap_suppress_the_shortfall() {
        let mut input = sample_input();
        input.maturing_before_retirement.total = 250_000.0;
        let result = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");

        let codes: Vec<AlertCode> = result.alerts.iter().map(|a| a.code).collect();
        assert!(codes.contains(&AlertCode::IlliquidCoversGap));
        assert!(codes.contains(&AlertCode::MaturitiesCloseGap));
        assert!(!codes.contains(&AlertCode::CorpusShortfall));
    }

    #[test]
    fn missing_projection_is_invalid_input() {
        let mut input = sample_input();
        input.projection = None;
        let err = calculate(&input, &EngineConfig::default(), as_of())
            .expect_err("projection is mandatory");
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(err.kind(), "invalid-input");
    }

    #[test]
    fn malformed_matrix_is_a_timeline_integrity_error() {
        let mut input = sample_input();
        if let Some(p) = input.projection.as_mut() {
            p.matrix[2].year = 2027;
        }
        let err = calculate(&input, &EngineConfig::default(), as_of())
            .expect_err("duplicate year");
        assert_eq!(
            err,
            EngineError::TimelineIntegrity(TimelineIntegrityError::NonMonotonicMatrix {
                index: 2,
                previous: 2027,
                year: 2027,
            })
        );
        assert_eq!(err.kind(), "timeline-integrity");
    }

    #[test]
    fn inconsistent_matrix_ages_are_a_timeline_integrity_error() {
        let mut input = sample_input();
        if let Some(p) = input.projection.as_mut() {
            p.matrix.truncate(3);
            p.matrix[0].age = 40;
            p.matrix[1].age = 55;
            p.matrix[2].age = 60;
            p.summary.current_age = 58;
        }
        let err = calculate(&input, &EngineConfig::default(), as_of())
            .expect_err("ages jump between consecutive years");
        assert_eq!(
            err,
            EngineError::TimelineIntegrity(TimelineIntegrityError::MatrixAgeStep {
                index: 1,
                previous: 40,
                age: 55,
            })
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_calculation() {
        let config = EngineConfig {
            underfunded_goal_names_shown: 0,
            ..EngineConfig::default()
        };
        let err = calculate(&sample_input(), &config, as_of()).expect_err("bad config");
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn gap_analysis_expenses_are_used_without_expense_records() {
        let mut input = sample_input();
        input.expenses.clear();
        if let Some(p) = input.projection.as_mut() {
            p.gap_analysis.current_monthly_expenses = 100_000.0;
        }
        let result = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        assert_eq!(result.emergency_fund.target, Some(600_000.0));
        assert_approx(result.emergency_fund.gap, 100_000.0);
        assert!(
            result
                .alerts
                .iter()
                .any(|a| a.code == AlertCode::EmergencyFundGap)
        );
    }

    #[test]
    fn ended_expenses_do_not_inflate_the_emergency_target() {
        let mut input = sample_input();
        input.expenses = serde_json::from_str(
            r#"[
              { "name": "Rent", "amount": 20000, "frequency": "MONTHLY", "isEssential": true },
              { "name": "Old tuition", "amount": 80000, "frequency": "MONTHLY", "endDate": "2020-01-01" }
            ]"#,
        )
        .expect("expenses should parse");
        input.cash_balance = 50_000.0;
        input.investments.clear();

        let result = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        assert_approx(result.outflows.monthly_expenses, 20_000.0);
        assert_eq!(result.emergency_fund.target, Some(120_000.0));
        assert_approx(result.emergency_fund.gap, 70_000.0);
        assert!(result.cash_flow_releases.iter().all(|r| r.name != "Old tuition"));
    }

    #[test]
    fn zero_expenses_everywhere_leave_emergency_status_unknown() {
        let mut input = sample_input();
        input.expenses.clear();
        if let Some(p) = input.projection.as_mut() {
            p.gap_analysis.current_monthly_expenses = 0.0;
        }
        let result = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        assert_eq!(result.emergency_fund.is_met, None);
        assert!(
            !result
                .alerts
                .iter()
                .any(|a| a.code == AlertCode::EmergencyFundGap)
        );
    }

    #[test]
    fn calculation_is_deterministic() {
        let input = sample_input();
        let first = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        let second = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        assert_eq!(
            serde_json::to_string(&first).expect("serializes"),
            serde_json::to_string(&second).expect("serializes")
        );
    }

    #[test]
    fn funded_goals_only_produce_no_goal_alert() {
        let mut input = sample_input();
        for goal in &mut input.goals {
            goal.status = GoalStatus::Funded;
        }
        let result = calculate(&input, &EngineConfig::default(), as_of()).expect("valid input");
        assert!(
            !result
                .alerts
                .iter()
                .any(|a| a.code == AlertCode::GoalsUnderfunded)
        );
    }
}
