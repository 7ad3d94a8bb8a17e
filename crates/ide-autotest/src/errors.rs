use thiserror::Error;

/// Errors surfaced by a [`crate::Harness`] or by the waiting helpers built on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Invalid object name: {0}")]
    InvalidObjectName(String),

    #[error("Property '{property}' is not available on {object}")]
    PropertyUnavailable { object: String, property: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Harness disconnected: {0}")]
    Disconnected(String),
}

impl HarnessError {
    /// True for errors that mean "the UI does not look like we expected"
    /// rather than "the harness itself is broken".
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            HarnessError::ObjectNotFound(_)
                | HarnessError::Timeout(_)
                | HarnessError::PropertyUnavailable { .. }
                | HarnessError::InvalidObjectName(_)
        )
    }
}
