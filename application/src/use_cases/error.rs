//! Error type shared by the ballot use cases

use crate::ports::repository::RepositoryError;
use ballot_domain::{DomainError, EntityKind};
use thiserror::Error;

/// Errors returned by the ballot use cases
///
/// Repository rejections are unwrapped to their domain cause so callers can
/// match the domain taxonomy without looking at the storage layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BallotError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl BallotError {
    /// The domain cause, if this is a domain error
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            BallotError::Domain(e) => Some(e),
            BallotError::Repository(_) => None,
        }
    }

    /// Stable machine-readable code for the error class
    pub fn code(&self) -> &'static str {
        match self {
            BallotError::Domain(e) => e.code(),
            BallotError::Repository(RepositoryError::Conflict(_)) => "conflict",
            BallotError::Repository(_) => "storage_error",
        }
    }
}

impl From<RepositoryError> for BallotError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Rejected(e) => BallotError::Domain(e),
            RepositoryError::NotFound(id) => {
                BallotError::Domain(DomainError::not_found(EntityKind::Request, id))
            }
            other => BallotError::Repository(other),
        }
    }
}
