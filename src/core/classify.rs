use std::collections::BTreeMap;

use super::types::{GapClassification, MaturingInflows, RetirementProjection};

pub const GOLD: &str = "GOLD";
pub const REAL_ESTATE: &str = "REAL_ESTATE";

/// Decides whether a positive corpus gap could be closed by liquidating
/// illiquid holdings or by the maturities that land before retirement.
/// Both flags are false when there is no gap.
pub fn classify(
    projection: &RetirementProjection,
    asset_breakdown: &BTreeMap<String, f64>,
    maturing: &MaturingInflows,
) -> GapClassification {
    let gap = &projection.gap_analysis;
    let final_corpus = projection.summary.final_corpus;
    let illiquid_value = asset_value(asset_breakdown, GOLD) + asset_value(asset_breakdown, REAL_ESTATE);

    if gap.corpus_gap <= 0.0 {
        return GapClassification {
            illiquid_covers_gap: false,
            maturities_cover_gap: false,
            illiquid_value,
        };
    }

    GapClassification {
        illiquid_covers_gap: final_corpus + illiquid_value >= gap.required_corpus,
        maturities_cover_gap: final_corpus + maturing.total.max(0.0) >= gap.required_corpus,
        illiquid_value,
    }
}

fn asset_value(breakdown: &BTreeMap<String, f64>, key: &str) -> f64 {
    breakdown
        .get(key)
        .copied()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
