use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The database rejected a query or the connection failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored or to-be-stored value does not fit its column type.
    #[error("value out of range for {column}: {value}")]
    OutOfRange { column: &'static str, value: String },
    /// A stored value could not be decoded into a domain type.
    #[error("corrupt value in {column}: {reason}")]
    Corrupt { column: &'static str, reason: String },
    /// The backend refused the write (used by fault-injecting stores).
    #[error("commit rejected: {0}")]
    Rejected(String),
}
