use thiserror::Error as ThisError;

///
/// Error
///
/// Failures raised by the pagination core itself.
/// Numeric pagination input is never an error; it is clamped instead.
/// Failures from a query collaborator are not represented here, they flow
/// through the collaborator's own error type.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("pagination field '{field}' is computed and cannot be unset")]
    ReadOnlyViolation { field: String },
}

impl Error {
    /// Construct a configuration error.
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Construct a query capability error.
    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }

    /// Construct a read-only violation for one computed field.
    pub(crate) fn read_only(field: impl Into<String>) -> Self {
        Self::ReadOnlyViolation {
            field: field.into(),
        }
    }
}
