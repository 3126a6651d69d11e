//! Entity operation errors.

use nerdgraph::QueryError;
use thiserror::Error;

/// Entity operation result type.
pub type Result<T> = std::result::Result<T, EntitiesError>;

/// Error returned by [`EntitiesClient`](crate::EntitiesClient) operations.
#[derive(Debug, Error)]
pub enum EntitiesError {
    /// Transport, API or cancellation failure from the executor.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The request succeeded but nothing matched.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// Search arguments rejected before sending.
    #[error("invalid entity search: {0}")]
    InvalidSearch(String),
}

impl EntitiesError {
    /// Returns `true` for local absence or a server-reported missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Query(err) => err.is_not_found(),
            Self::InvalidSearch(_) => false,
        }
    }

    /// Returns `true` if the failure is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Query(err) if err.is_retryable())
    }

    /// Returns `true` if the credentials were rejected.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Query(err) if err.is_unauthorized())
    }

    /// Returns `true` if the caller cancelled the call.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Query(QueryError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use nerdgraph::{GraphqlError, GraphqlErrorResponse};

    use super::*;

    #[test]
    fn not_found_predicates() {
        assert!(EntitiesError::NotFound("guid".into()).is_not_found());
        assert!(!EntitiesError::InvalidSearch("both".into()).is_not_found());

        let api = EntitiesError::from(QueryError::Api {
            errors: GraphqlErrorResponse::new(vec![GraphqlError::new("Entity Not Found")]),
            status: 200,
        });
        assert!(api.is_not_found());
        assert!(!api.is_retryable());
    }

    #[test]
    fn cancellation_passes_through() {
        let err = EntitiesError::from(QueryError::Cancelled);
        assert!(err.is_cancelled());
        assert!(!err.is_not_found());
        assert!(!err.is_unauthorized());
    }
}
