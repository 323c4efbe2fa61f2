//! Shared Diesel error classification and numeric conversions.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// Storage-neutral reading of a Diesel failure.
///
/// Repositories translate this into their port's error enum, picking out the
/// constraint violations they give domain meaning to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    Connection(String),
    UniqueViolation(Option<String>),
    ForeignKeyViolation(Option<String>),
    Query(String),
}

/// Classify a Diesel error, logging the database's own message at debug.
pub(crate) fn classify(error: DieselError, operation: &str) -> DbFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => DbFailure::UniqueViolation(constraint),
                DatabaseErrorKind::ForeignKeyViolation => {
                    DbFailure::ForeignKeyViolation(constraint)
                }
                DatabaseErrorKind::ClosedConnection => {
                    DbFailure::Connection("database connection error".to_owned())
                }
                _ => DbFailure::Query("database error".to_owned()),
            }
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        other => {
            debug!(error = %other, operation, "diesel operation failed");
            DbFailure::Query("database error".to_owned())
        }
    }
}

/// Counts come back as `i64`; negative values cannot occur.
pub(crate) fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Offsets and limits beyond `i64::MAX` saturate.
pub(crate) fn to_sql_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify(DieselError::NotFound, "test"),
            DbFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn rollback_errors_are_query_failures() {
        assert!(matches!(
            classify(DieselError::RollbackTransaction, "test"),
            DbFailure::Query(_)
        ));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(42, 42)]
    #[case(-1, 0)]
    fn counts_clamp_at_zero(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(count_to_u64(raw), expected);
    }

    #[rstest]
    fn offsets_saturate() {
        assert_eq!(to_sql_i64(u64::MAX), i64::MAX);
        assert_eq!(to_sql_i64(30), 30);
    }
}
