//! Domain error types.

/// Top-level error type for pricelens.
#[derive(Debug, thiserror::Error)]
pub enum PricelensError {
    #[error("no price rows supplied")]
    EmptyInput,

    #[error("malformed row {index}: {field}: {reason}")]
    MalformedRow {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("insufficient history: have {rows} rows, indicators need more than {warmup}")]
    InsufficientHistory { rows: usize, warmup: usize },

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

    #[error("price feed error: {reason}")]
    Fetch { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PricelensError {
    pub(crate) fn malformed(index: usize, field: &str, reason: impl Into<String>) -> Self {
        PricelensError::MalformedRow {
            index,
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            PricelensError::Io(_) | PricelensError::Csv(_) => 1,
            PricelensError::ConfigParse { .. }
            | PricelensError::ConfigMissing { .. }
            | PricelensError::ConfigInvalid { .. } => 2,
            PricelensError::Fetch { .. } => 3,
            PricelensError::EmptyInput | PricelensError::MalformedRow { .. } => 4,
            PricelensError::InsufficientHistory { .. } => 5,
        }
    }
}

impl From<&PricelensError> for std::process::ExitCode {
    fn from(err: &PricelensError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
