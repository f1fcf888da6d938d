use std::path::PathBuf;

/// Result type for every fallible dashboard operation
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The chart-entry file is missing or does not match the row schema
    #[error("data unavailable at '{}': {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A field reference names a column the target table does not have
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("invalid field shorthand '{0}'")]
    InvalidShorthand(String),

    /// A per-view choice outside the options the view offers
    #[error("unsupported {option} '{value}'")]
    UnsupportedOption { option: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    pub(crate) fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unsupported(option: &'static str, value: impl Into<String>) -> Self {
        DashboardError::UnsupportedOption {
            option,
            value: value.into(),
        }
    }
}
