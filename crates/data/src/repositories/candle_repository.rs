//! Candle repository, one table per resolution.

use super::{from_db_int, to_db_int};
use crate::error::StorageError;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use std::sync::Arc;
use tributary_domain::value_objects::Price;
use tributary_domain::{Candle, CandleKey, PoolId, Resolution};

/// Table holding the candles of a resolution.
#[must_use]
pub fn table_name(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::OneMinute => "candles_1m",
        Resolution::FiveMinutes => "candles_5m",
        Resolution::OneHour => "candles_1h",
        Resolution::OneDay => "candles_1d",
    }
}

/// Database record for a candle.
#[derive(Debug, Clone)]
pub struct CandleRecord {
    /// `"{pool_id}-{bucket_start}"`.
    pub id: String,
    /// Pool identifier.
    pub pool_id: String,
    /// Aligned bucket start in seconds.
    pub bucket_start: i64,
    /// Open price.
    pub open: BigDecimal,
    /// High price.
    pub high: BigDecimal,
    /// Low price.
    pub low: BigDecimal,
    /// Close price.
    pub close: BigDecimal,
    /// Volume traded in the bucket.
    pub volume: BigDecimal,
    /// Number of trades in the bucket.
    pub tx_count: i64,
}

impl CandleRecord {
    /// Creates a CandleRecord from a database row.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            pool_id: row.try_get("pool_id")?,
            bucket_start: row.try_get("bucket_start")?,
            open: row.try_get("open")?,
            high: row.try_get("high")?,
            low: row.try_get("low")?,
            close: row.try_get("close")?,
            volume: row.try_get("volume")?,
            tx_count: row.try_get("tx_count")?,
        })
    }

    /// Converts the record into a domain candle.
    ///
    /// # Errors
    /// Returns an error if an integer column is negative.
    pub fn into_candle(self, resolution: Resolution) -> Result<Candle, StorageError> {
        Ok(Candle {
            pool_id: PoolId(self.pool_id),
            resolution,
            bucket_start: from_db_int("bucket_start", self.bucket_start)?,
            open: Price::new(self.open),
            high: Price::new(self.high),
            low: Price::new(self.low),
            close: Price::new(self.close),
            volume: self.volume,
            tx_count: from_db_int("tx_count", self.tx_count)?,
        })
    }
}

/// Repository for candle reads and upserts.
#[derive(Clone)]
pub struct CandleRepository {
    pool: Arc<PgPool>,
}

impl CandleRepository {
    /// Creates a new CandleRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a candle by identity.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find(&self, key: &CandleKey) -> Result<Option<CandleRecord>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", table_name(key.resolution));
        let row = sqlx::query(&sql)
            .bind(key.id())
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(CandleRecord::from_row).transpose()
    }

    /// Finds candles for a pool with `start <= bucket_start <= end`.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_pool_and_range(
        &self,
        pool_id: &str,
        resolution: Resolution,
        start_timestamp: i64,
        end_timestamp: i64,
    ) -> Result<Vec<CandleRecord>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT * FROM {}
            WHERE pool_id = $1 AND bucket_start >= $2 AND bucket_start <= $3
            ORDER BY bucket_start ASC
            "#,
            table_name(resolution)
        );
        let rows = sqlx::query(&sql)
            .bind(pool_id)
            .bind(start_timestamp)
            .bind(end_timestamp)
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.iter().map(CandleRecord::from_row).collect()
    }

    /// Finds the latest candle for a pool.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_latest(
        &self,
        pool_id: &str,
        resolution: Resolution,
    ) -> Result<Option<CandleRecord>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT * FROM {}
            WHERE pool_id = $1
            ORDER BY bucket_start DESC
            LIMIT 1
            "#,
            table_name(resolution)
        );
        let row = sqlx::query(&sql)
            .bind(pool_id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(CandleRecord::from_row).transpose()
    }

    /// Creates or updates a candle inside an open transaction.
    ///
    /// `open` is written only on insert.
    ///
    /// # Errors
    /// Returns an error if the query fails or a value does not fit its column.
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        candle: &Candle,
    ) -> Result<(), StorageError> {
        let sql = format!(
            r#"
            INSERT INTO {} (id, pool_id, bucket_start, open, high, low, close, volume, tx_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                high = EXCLUDED.high,
                low = EXCLUDED.low,
                close = EXCLUDED.close,
                volume = EXCLUDED.volume,
                tx_count = EXCLUDED.tx_count
            "#,
            table_name(candle.resolution)
        );
        sqlx::query(&sql)
            .bind(candle.key().id())
            .bind(candle.pool_id.as_str())
            .bind(to_db_int("bucket_start", candle.bucket_start)?)
            .bind(&candle.open.value)
            .bind(&candle.high.value)
            .bind(&candle.low.value)
            .bind(&candle.close.value)
            .bind(&candle.volume)
            .bind(to_db_int("tx_count", candle.tx_count)?)
            .execute(conn)
            .await?;
        Ok(())
    }
}
