use thiserror::Error;

/// Failures surfaced by the console layer. Remote internals use `anyhow`; they are converted
/// here so screens match on a closed set instead of unwinding into rendering code.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Soft "not yet ready": no usable credential for an authenticated screen.
    #[error("credential unavailable")]
    CredentialUnavailable,

    #[error("fetch {collection}: {message}")]
    Fetch { collection: String, message: String },

    #[error("{operation} on {collection}: {message}")]
    Mutation {
        collection: String,
        operation: &'static str,
        message: String,
    },

    #[error("invalid {field} value {value:?} (expected one of: {expected})")]
    InvalidStatus {
        field: String,
        value: String,
        expected: String,
    },

    #[error("{0} is read-only")]
    ReadOnly(String),

    #[error("no records targeted")]
    EmptyTargets,

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("unknown entity {name:?} (expected one of: {expected})")]
    UnknownEntity { name: String, expected: String },
}

impl ConsoleError {
    pub(crate) fn fetch(collection: &str, err: &anyhow::Error) -> Self {
        ConsoleError::Fetch {
            collection: collection.to_string(),
            message: format!("{:#}", err),
        }
    }

    pub(crate) fn mutation(collection: &str, operation: &'static str, err: &anyhow::Error) -> Self {
        ConsoleError::Mutation {
            collection: collection.to_string(),
            operation,
            message: format!("{:#}", err),
        }
    }
}

pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
