//! Domain error types.

/// Top-level error type for retrospect.
#[derive(Debug, thiserror::Error)]
pub enum RetrospectError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to read {path}: {reason}")]
    DataRead { path: String, reason: String },

    #[error("missing required columns {missing:?} (available: {available:?})")]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("data parse error at line {line}: {reason}")]
    DataParse { line: u64, reason: String },

    #[error("no price observations in {source_name}")]
    EmptySeries { source_name: String },

    #[error("observation dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedSeries {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RetrospectError> for std::process::ExitCode {
    fn from(err: &RetrospectError) -> Self {
        let code: u8 = match err {
            RetrospectError::Io(_) => 1,
            RetrospectError::ConfigParse { .. }
            | RetrospectError::ConfigMissing { .. }
            | RetrospectError::ConfigInvalid { .. } => 2,
            RetrospectError::DataRead { .. }
            | RetrospectError::MissingColumns { .. }
            | RetrospectError::DataParse { .. }
            | RetrospectError::EmptySeries { .. }
            | RetrospectError::UnorderedSeries { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
