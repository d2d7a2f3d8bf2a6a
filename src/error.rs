//! Store error type and rusqlite error mapping.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The store holds no live connection (never opened, or closed).
    #[error("database handle is not available")]
    Unavailable,

    #[error("cannot open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Unrecognized operation tag or input that cannot form a statement.
    #[error("cannot build query: {0}")]
    Build(String),

    #[error("statement failed: {0}")]
    Execute(#[source] rusqlite::Error),

    #[error("user {0} not found")]
    NotFound(i64),

    /// A fetched row does not have the expected shape.
    #[error("malformed row: {0}")]
    Row(#[source] rusqlite::Error),
}

impl StoreError {
    /// Maps the error of a single-row fetch for user `id`.
    ///
    /// - `QueryReturnedNoRows` → `NotFound`
    /// - column type, index or conversion failures → `Row`
    /// - everything else → `Execute`
    pub(crate) fn from_fetch(err: rusqlite::Error, id: i64) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound(id),
            err => StoreError::from_row(err),
        }
    }

    /// Maps an error raised while reading columns out of a row.
    pub(crate) fn from_row(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::InvalidColumnIndex(_)
            | rusqlite::Error::InvalidColumnName(_)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => StoreError::Row(err),
            err => StoreError::Execute(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Type;

    #[test]
    fn test_no_rows_maps_to_not_found() {
        let err = StoreError::from_fetch(rusqlite::Error::QueryReturnedNoRows, 42);
        assert!(matches!(err, StoreError::NotFound(42)));
        assert_eq!(err.to_string(), "user 42 not found");
    }

    #[test]
    fn test_column_type_mismatch_maps_to_row() {
        let err = rusqlite::Error::InvalidColumnType(1, "username".to_string(), Type::Null);
        assert!(matches!(StoreError::from_fetch(err, 1), StoreError::Row(_)));
    }

    #[test]
    fn test_engine_failure_maps_to_execute() {
        let sqlite_err = rusqlite::ffi::Error {
            code: rusqlite::ErrorCode::DatabaseBusy,
            extended_code: rusqlite::ffi::SQLITE_BUSY,
        };
        let err = rusqlite::Error::SqliteFailure(sqlite_err, None);
        assert!(matches!(StoreError::from_row(err), StoreError::Execute(_)));
    }
}
