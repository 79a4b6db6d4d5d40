//! Mapping from sqlx errors to store errors.

use slotbook_core::store::StoreError;

/// Uniqueness constraint guarding one booking per slot.
pub const BOOKINGS_SLOT_UNIQUE: &str = "bookings_slot_unique";
/// Uniqueness constraint on resource contact emails.
pub const RESOURCES_EMAIL_UNIQUE: &str = "resources_email_unique";

/// Name of the unique constraint `err` violated, if it is a unique violation.
pub fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => db_err.constraint(),
        _ => None,
    }
}

/// Classify an sqlx error. Pool exhaustion and I/O failures mean the store
/// is unavailable; everything else is a database error.
pub fn map_sqlx(context: &str, err: &sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(format!("{context}: {err}"))
        }
        _ => StoreError::Database(format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeouts_are_unavailable() {
        assert!(matches!(
            map_sqlx("reserve", &sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(msg) if msg.starts_with("reserve: ")
        ));
    }

    #[test]
    fn other_errors_are_database_errors() {
        assert!(matches!(
            map_sqlx("find", &sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
        assert_eq!(violated_unique_constraint(&sqlx::Error::RowNotFound), None);
    }
}
