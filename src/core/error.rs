use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("timeline integrity error: {0}")]
    TimelineIntegrity(#[from] TimelineIntegrityError),
}

impl EngineError {
    /// Short machine-readable kind, used by the HTTP and CLI surfaces.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidInput(_) => "invalid-input",
            EngineError::TimelineIntegrity(_) => "timeline-integrity",
        }
    }
}

/// Upstream projection data that cannot be spliced into one timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineIntegrityError {
    #[error("accumulation matrix is empty")]
    EmptyMatrix,

    #[error("matrix year {year} at row {index} does not follow {previous}")]
    NonMonotonicMatrix {
        index: usize,
        previous: i32,
        year: i32,
    },

    #[error("matrix skips from year {previous} to {year} at row {index}")]
    MatrixGap {
        index: usize,
        previous: i32,
        year: i32,
    },

    #[error("matrix age {age} at row {index} does not follow age {previous}")]
    MatrixAgeStep {
        index: usize,
        previous: u32,
        age: u32,
    },

    #[error("first matrix row is age {found}, expected current age {expected}")]
    CurrentAgeMismatch { expected: u32, found: u32 },

    #[error("last matrix row is age {found}, expected retirement age {expected}")]
    RetirementAgeMismatch { expected: u32, found: u32 },

    #[error("income projection row {index} has offset {found}, expected {expected}")]
    IncomeProjectionOffset {
        index: usize,
        expected: u32,
        found: u32,
    },
}
