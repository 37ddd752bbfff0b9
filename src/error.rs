use thiserror::Error;

use crate::validation::ValidationErrors;

/// Outcome of a failed save.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The record broke one or more rules; nothing was persisted.
    #[error("validation failed: {0}")]
    Invalid(ValidationErrors),

    /// Store or hashing failure.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl SaveError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            SaveError::Invalid(errors) => Some(errors),
            SaveError::Store(_) => None,
        }
    }
}
