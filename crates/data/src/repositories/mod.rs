//! Repository implementations for PostgreSQL persistence.
//!
//! This module provides repositories for pools, swaps, candles and the
//! protocol statistics row, plus the [`Database`] handle that implements
//! [`Store`](crate::Store) on top of them.

mod candle_repository;
mod pg_store;
mod pool_repository;
mod protocol_stats_repository;
mod swap_repository;

pub use candle_repository::{CandleRecord, CandleRepository};
pub use pool_repository::{PoolRecord, PoolRepository};
pub use protocol_stats_repository::{ProtocolStatsRecord, ProtocolStatsRepository};
pub use swap_repository::{SwapRecord, SwapRepository};

use crate::error::StorageError;
use sqlx::PgPool;
use std::sync::Arc;

/// Database connection wrapper for repositories.
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Creates a new Database wrapper from a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Creates a new database connection from a connection string.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates a PoolRepository instance.
    #[must_use]
    pub fn pools(&self) -> PoolRepository {
        PoolRepository::new(self.pool.clone())
    }

    /// Creates a SwapRepository instance.
    #[must_use]
    pub fn swaps(&self) -> SwapRepository {
        SwapRepository::new(self.pool.clone())
    }

    /// Creates a CandleRepository instance.
    #[must_use]
    pub fn candles(&self) -> CandleRepository {
        CandleRepository::new(self.pool.clone())
    }

    /// Creates a ProtocolStatsRepository instance.
    #[must_use]
    pub fn protocol_stats(&self) -> ProtocolStatsRepository {
        ProtocolStatsRepository::new(self.pool.clone())
    }

    /// Runs database migrations.
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

/// Converts an unsigned domain integer into a BIGINT column value.
pub(crate) fn to_db_int(column: &'static str, value: u64) -> Result<i64, StorageError> {
    i64::try_from(value).map_err(|_| StorageError::OutOfRange {
        column,
        value: value.to_string(),
    })
}

/// Converts a BIGINT column value back into an unsigned domain integer.
pub(crate) fn from_db_int(column: &'static str, value: i64) -> Result<u64, StorageError> {
    u64::try_from(value).map_err(|_| StorageError::Corrupt {
        column,
        reason: format!("negative value {value}"),
    })
}
