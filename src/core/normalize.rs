use super::types::Frequency;

/// Monthly-equivalent of `amount` recorded at `frequency`.
///
/// One-time amounts contribute nothing to a recurring rate. A missing or
/// unrecognised frequency is read as monthly, and a non-finite amount as zero.
pub fn to_monthly(amount: f64, frequency: Option<Frequency>) -> f64 {
    if !amount.is_finite() {
        return 0.0;
    }
    match frequency.unwrap_or(Frequency::Monthly) {
        Frequency::Monthly | Frequency::Unrecognized => amount,
        Frequency::Quarterly => amount / 3.0,
        Frequency::HalfYearly => amount / 6.0,
        Frequency::Yearly => amount / 12.0,
        Frequency::OneTime => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn to_monthly_divides_by_period_length() {
        assert_approx(to_monthly(1_200.0, Some(Frequency::Monthly)), 1_200.0);
        assert_approx(to_monthly(1_200.0, Some(Frequency::Quarterly)), 400.0);
        assert_approx(to_monthly(1_200.0, Some(Frequency::HalfYearly)), 200.0);
        assert_approx(to_monthly(1_200.0, Some(Frequency::Yearly)), 100.0);
    }

    #[test]
    fn to_monthly_ignores_one_time_amounts() {
        assert_approx(to_monthly(250_000.0, Some(Frequency::OneTime)), 0.0);
    }

    #[test]
    fn to_monthly_treats_missing_or_unknown_frequency_as_monthly() {
        assert_approx(to_monthly(900.0, None), 900.0);
        assert_approx(to_monthly(900.0, Some(Frequency::Unrecognized)), 900.0);
    }

    #[test]
    fn to_monthly_zeroes_non_finite_amounts() {
        assert_approx(to_monthly(f64::NAN, Some(Frequency::Yearly)), 0.0);
        assert_approx(to_monthly(f64::INFINITY, None), 0.0);
    }

    #[test]
    fn unknown_frequency_strings_deserialize_as_unrecognized() {
        let freq: Frequency = serde_json::from_str("\"FORTNIGHTLY\"").expect("valid json");
        assert_eq!(freq, Frequency::Unrecognized);
        let freq: Frequency = serde_json::from_str("\"HALF_YEARLY\"").expect("valid json");
        assert_eq!(freq, Frequency::HalfYearly);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_yearly_of_twelve_months_equals_monthly(rupees in 0u32..2_000_000_000) {
            let a = rupees as f64;
            prop_assert_eq!(
                to_monthly(a * 12.0, Some(Frequency::Yearly)),
                to_monthly(a, Some(Frequency::Monthly))
            );
        }

        #[test]
        fn prop_monthly_equivalent_never_exceeds_amount(
            paise in 0u64..10_000_000_000,
            idx in 0usize..5
        ) {
            let a = paise as f64 / 100.0;
            let freq = [
                Frequency::Monthly,
                Frequency::Quarterly,
                Frequency::HalfYearly,
                Frequency::Yearly,
                Frequency::OneTime,
            ][idx];
            let monthly = to_monthly(a, Some(freq));
            prop_assert!(monthly >= 0.0);
            prop_assert!(monthly <= a);
        }
    }
}
