//! Store-level error taxonomy.
//!
//! Repository methods never let a raw sqlx error escape undistinguished.
//! Every failure is one of three outcomes: the store could not be reached,
//! the unique-email constraint fired, or the query itself failed. Callers
//! decide how each outcome degrades at the HTTP surface.

use thiserror::Error;

/// PostgreSQL SQLSTATE for a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A connection to the store could not be established.
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The unique-email constraint rejected an insert or update.
    #[error("email already registered")]
    DuplicateEmail,

    /// Any other failure while executing a statement.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return StoreError::DuplicateEmail;
            }
        }
        StoreError::Query(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_query() {
        let error: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, StoreError::Query(_)));
    }

    #[test]
    fn test_duplicate_email_display() {
        assert_eq!(
            StoreError::DuplicateEmail.to_string(),
            "email already registered"
        );
    }
}
