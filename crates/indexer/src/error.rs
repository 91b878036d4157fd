use bigdecimal::BigDecimal;
use thiserror::Error;
use tributary_data::StorageError;
use tributary_domain::{ConversionError, PoolId};

/// Errors raised while indexing pool events.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// A raw amount could not be converted; the event is not applied.
    #[error("{event} on pool {pool}: cannot convert {field}: {source}")]
    Conversion {
        event: &'static str,
        pool: PoolId,
        field: &'static str,
        #[source]
        source: ConversionError,
    },
    /// Applying the event would leave a reserve below zero.
    #[error("{event} on pool {pool}: {side} reserve {reserve} cannot cover {amount}")]
    NegativeReserve {
        event: &'static str,
        pool: PoolId,
        side: &'static str,
        reserve: BigDecimal,
        amount: BigDecimal,
    },
    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// A line of the event feed could not be decoded.
    #[error("event feed line {line}: {reason}")]
    Feed { line: usize, reason: String },
    /// The configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// Reading a feed or config file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IndexerError {
    /// Whether the error signals corrupt or inconsistent input data.
    #[must_use]
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            IndexerError::Conversion { .. }
                | IndexerError::NegativeReserve { .. }
                | IndexerError::Feed { .. }
        )
    }
}
