use super::error::TimelineIntegrityError;
use super::types::{MergedTimelinePoint, RetirementProjection, TimelineInsights};

/// Splices the accumulation matrix and the post-retirement income projection
/// into one corpus timeline with a single point per calendar year.
///
/// Matrix points exclude the year's one-time inflow so maturity lump sums do
/// not show up as spikes. Income-projection row 0 repeats the retirement year
/// and is dropped.
pub fn merge(
    projection: &RetirementProjection,
) -> Result<Vec<MergedTimelinePoint>, TimelineIntegrityError> {
    validate_matrix(projection)?;
    validate_income_offsets(projection)?;

    let matrix = &projection.matrix;
    let Some(last) = matrix.last() else {
        return Err(TimelineIntegrityError::EmptyMatrix);
    };
    let retirement_year = last.year;
    let retirement_age = projection.summary.retirement_age;

    let mut timeline =
        Vec::with_capacity(matrix.len() + projection.income_projection.len().saturating_sub(1));
    timeline.extend(matrix.iter().map(|row| MergedTimelinePoint {
        year: row.year,
        age: row.age,
        net_corpus_excluding_inflow: (row.net_corpus - row.total_inflow).max(0.0),
        is_post_retirement: false,
    }));
    timeline.extend(
        projection
            .income_projection
            .iter()
            .skip(1)
            .map(|row| MergedTimelinePoint {
                year: retirement_year + row.year_offset as i32,
                age: retirement_age + row.year_offset,
                net_corpus_excluding_inflow: row.corpus,
                is_post_retirement: true,
            }),
    );
    Ok(timeline)
}

fn validate_matrix(projection: &RetirementProjection) -> Result<(), TimelineIntegrityError> {
    let matrix = &projection.matrix;
    if matrix.is_empty() {
        return Err(TimelineIntegrityError::EmptyMatrix);
    }

    for (index, pair) in matrix.windows(2).enumerate() {
        let previous = pair[0].year;
        let year = pair[1].year;
        if year <= previous {
            return Err(TimelineIntegrityError::NonMonotonicMatrix {
                index: index + 1,
                previous,
                year,
            });
        }
        if year != previous + 1 {
            return Err(TimelineIntegrityError::MatrixGap {
                index: index + 1,
                previous,
                year,
            });
        }
        let (previous, age) = (pair[0].age, pair[1].age);
        if previous.checked_add(1) != Some(age) {
            return Err(TimelineIntegrityError::MatrixAgeStep {
                index: index + 1,
                previous,
                age,
            });
        }
    }

    let expected = projection.summary.current_age;
    let found = matrix[0].age;
    if found != expected {
        return Err(TimelineIntegrityError::CurrentAgeMismatch { expected, found });
    }

    let expected = projection.summary.retirement_age;
    let found = matrix[matrix.len() - 1].age;
    if found != expected {
        return Err(TimelineIntegrityError::RetirementAgeMismatch { expected, found });
    }
    Ok(())
}

fn validate_income_offsets(projection: &RetirementProjection) -> Result<(), TimelineIntegrityError> {
    for (index, row) in projection.income_projection.iter().enumerate() {
        let expected = index as u32;
        if row.year_offset != expected {
            return Err(TimelineIntegrityError::IncomeProjectionOffset {
                index,
                expected,
                found: row.year_offset,
            });
        }
    }
    Ok(())
}

/// Peak corpus and the first post-retirement year the corpus runs out.
pub fn insights(timeline: &[MergedTimelinePoint]) -> Option<TimelineInsights> {
    let mut peak = timeline.first()?;
    for point in &timeline[1..] {
        if point.net_corpus_excluding_inflow > peak.net_corpus_excluding_inflow {
            peak = point;
        }
    }
    let depleted = timeline
        .iter()
        .find(|p| p.is_post_retirement && p.net_corpus_excluding_inflow <= 0.0);

    Some(TimelineInsights {
        peak_year: peak.year,
        peak_age: peak.age,
        peak_corpus: peak.net_corpus_excluding_inflow,
        depletion_year: depleted.map(|p| p.year),
        depletion_age: depleted.map(|p| p.age),
    })
}
