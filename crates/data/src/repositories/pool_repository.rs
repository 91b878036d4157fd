//! Pool repository for AMM pool persistence.

use super::{from_db_int, to_db_int};
use crate::error::StorageError;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use std::sync::Arc;
use tributary_domain::{Pool, PoolId};

/// Database record for a pool.
#[derive(Debug, Clone)]
pub struct PoolRecord {
    /// Pool identifier.
    pub id: String,
    /// Royalty token identifier.
    pub token_id: String,
    /// Quote token identifier.
    pub quote_token_id: String,
    /// Vault identifier.
    pub vault_id: String,
    /// Royalty token decimals.
    pub token_decimals: i16,
    /// Quote token decimals.
    pub quote_decimals: i16,
    /// Current royalty token reserve.
    pub reserve_token: BigDecimal,
    /// Current quote reserve.
    pub reserve_quote: BigDecimal,
    /// Cumulative royalty token volume.
    pub volume_token: BigDecimal,
    /// Cumulative quote volume.
    pub volume_quote: BigDecimal,
    /// Cumulative fees, in quote units.
    pub fees_collected: BigDecimal,
    /// Number of swaps.
    pub tx_count: i64,
    /// Creation block timestamp in seconds.
    pub created_at: i64,
    /// Timestamp of the latest swap.
    pub last_trade_at: Option<i64>,
}

impl PoolRecord {
    /// Creates a PoolRecord from a database row.
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            token_id: row.try_get("token_id")?,
            quote_token_id: row.try_get("quote_token_id")?,
            vault_id: row.try_get("vault_id")?,
            token_decimals: row.try_get("token_decimals")?,
            quote_decimals: row.try_get("quote_decimals")?,
            reserve_token: row.try_get("reserve_token")?,
            reserve_quote: row.try_get("reserve_quote")?,
            volume_token: row.try_get("volume_token")?,
            volume_quote: row.try_get("volume_quote")?,
            fees_collected: row.try_get("fees_collected")?,
            tx_count: row.try_get("tx_count")?,
            created_at: row.try_get("created_at")?,
            last_trade_at: row.try_get("last_trade_at")?,
        })
    }

    /// Converts the record into a domain pool.
    ///
    /// # Errors
    /// Returns an error if a column holds a value the domain cannot represent.
    pub fn into_pool(self) -> Result<Pool, StorageError> {
        let decimals = |column: &'static str, value: i16| {
            u8::try_from(value).map_err(|_| StorageError::Corrupt {
                column,
                reason: format!("invalid decimals {value}"),
            })
        };
        Ok(Pool {
            id: PoolId(self.id),
            token_id: self.token_id,
            quote_token_id: self.quote_token_id,
            vault_id: self.vault_id,
            token_decimals: decimals("token_decimals", self.token_decimals)?,
            quote_decimals: decimals("quote_decimals", self.quote_decimals)?,
            reserve_token: self.reserve_token,
            reserve_quote: self.reserve_quote,
            volume_token: self.volume_token,
            volume_quote: self.volume_quote,
            fees_collected: self.fees_collected,
            tx_count: from_db_int("tx_count", self.tx_count)?,
            created_at: from_db_int("created_at", self.created_at)?,
            last_trade_at: self
                .last_trade_at
                .map(|ts| from_db_int("last_trade_at", ts))
                .transpose()?,
        })
    }
}

/// Repository for pool CRUD operations.
#[derive(Clone)]
pub struct PoolRepository {
    pool: Arc<PgPool>,
}

impl PoolRepository {
    /// Creates a new PoolRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a pool by its ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PoolRecord>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM pools WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(PoolRecord::from_row).transpose()
    }

    /// Finds all pools.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_all(&self) -> Result<Vec<PoolRecord>, sqlx::Error> {
        let rows = sqlx::query("SELECT * FROM pools ORDER BY created_at ASC, id ASC")
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.iter().map(PoolRecord::from_row).collect()
    }

    /// Creates or updates a pool inside an open transaction.
    ///
    /// # Errors
    /// Returns an error if the query fails or a value does not fit its column.
    pub async fn upsert(&self, conn: &mut PgConnection, pool: &Pool) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO pools (id, token_id, quote_token_id, vault_id, token_decimals,
                               quote_decimals, reserve_token, reserve_quote, volume_token,
                               volume_quote, fees_collected, tx_count, created_at, last_trade_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                reserve_token = EXCLUDED.reserve_token,
                reserve_quote = EXCLUDED.reserve_quote,
                volume_token = EXCLUDED.volume_token,
                volume_quote = EXCLUDED.volume_quote,
                fees_collected = EXCLUDED.fees_collected,
                tx_count = EXCLUDED.tx_count,
                last_trade_at = EXCLUDED.last_trade_at
            "#,
        )
        .bind(pool.id.as_str())
        .bind(&pool.token_id)
        .bind(&pool.quote_token_id)
        .bind(&pool.vault_id)
        .bind(i16::from(pool.token_decimals))
        .bind(i16::from(pool.quote_decimals))
        .bind(&pool.reserve_token)
        .bind(&pool.reserve_quote)
        .bind(&pool.volume_token)
        .bind(&pool.volume_quote)
        .bind(&pool.fees_collected)
        .bind(to_db_int("tx_count", pool.tx_count)?)
        .bind(to_db_int("created_at", pool.created_at)?)
        .bind(
            pool.last_trade_at
                .map(|ts| to_db_int("last_trade_at", ts))
                .transpose()?,
        )
        .execute(conn)
        .await?;
        Ok(())
    }
}
