//! Swap repository. Swaps are insert-only.

use super::{from_db_int, to_db_int};
use crate::error::StorageError;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use std::sync::Arc;
use tributary_domain::value_objects::Price;
use tributary_domain::{PoolId, Swap};

/// Database record for a swap.
#[derive(Debug, Clone)]
pub struct SwapRecord {
    pub id: String,
    pub pool_id: String,
    pub trader: String,
    pub is_buy: bool,
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    pub fee: BigDecimal,
    pub price: BigDecimal,
    pub timestamp: i64,
    pub tx_hash: String,
    pub block_number: i64,
    pub log_index: i32,
}

impl SwapRecord {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            pool_id: row.try_get("pool_id")?,
            trader: row.try_get("trader")?,
            is_buy: row.try_get("is_buy")?,
            amount_in: row.try_get("amount_in")?,
            amount_out: row.try_get("amount_out")?,
            fee: row.try_get("fee")?,
            price: row.try_get("price")?,
            timestamp: row.try_get("timestamp")?,
            tx_hash: row.try_get("tx_hash")?,
            block_number: row.try_get("block_number")?,
            log_index: row.try_get("log_index")?,
        })
    }

    /// Converts the record into a domain swap.
    ///
    /// # Errors
    /// Returns an error if an integer column is negative.
    pub fn into_swap(self) -> Result<Swap, StorageError> {
        Ok(Swap {
            id: self.id,
            pool_id: PoolId(self.pool_id),
            trader: self.trader,
            is_buy: self.is_buy,
            amount_in: self.amount_in,
            amount_out: self.amount_out,
            fee: self.fee,
            price: Price::new(self.price),
            timestamp: from_db_int("timestamp", self.timestamp)?,
            tx_hash: self.tx_hash,
            block_number: from_db_int("block_number", self.block_number)?,
            log_index: u32::try_from(self.log_index).map_err(|_| StorageError::Corrupt {
                column: "log_index",
                reason: format!("negative value {}", self.log_index),
            })?,
        })
    }
}

/// Repository for swap persistence.
#[derive(Clone)]
pub struct SwapRepository {
    pool: Arc<PgPool>,
}

impl SwapRepository {
    /// Creates a new SwapRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a swap by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<SwapRecord>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM swaps WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(SwapRecord::from_row).transpose()
    }

    /// Finds the most recent swaps of a pool.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_pool(
        &self,
        pool_id: &str,
        limit: i64,
    ) -> Result<Vec<SwapRecord>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM swaps
            WHERE pool_id = $1
            ORDER BY block_number DESC, log_index DESC
            LIMIT $2
            "#,
        )
        .bind(pool_id)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;
        rows.iter().map(SwapRecord::from_row).collect()
    }

    /// Inserts a swap inside an open transaction; existing ids are left untouched.
    ///
    /// # Errors
    /// Returns an error if the query fails or a value does not fit its column.
    pub async fn insert(&self, conn: &mut PgConnection, swap: &Swap) -> Result<(), StorageError> {
        let log_index = i32::try_from(swap.log_index).map_err(|_| StorageError::OutOfRange {
            column: "log_index",
            value: swap.log_index.to_string(),
        })?;
        sqlx::query(
            r#"
            INSERT INTO swaps (id, pool_id, trader, is_buy, amount_in, amount_out, fee,
                               price, timestamp, tx_hash, block_number, log_index)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&swap.id)
        .bind(swap.pool_id.as_str())
        .bind(&swap.trader)
        .bind(swap.is_buy)
        .bind(&swap.amount_in)
        .bind(&swap.amount_out)
        .bind(&swap.fee)
        .bind(&swap.price.value)
        .bind(to_db_int("timestamp", swap.timestamp)?)
        .bind(&swap.tx_hash)
        .bind(to_db_int("block_number", swap.block_number)?)
        .bind(log_index)
        .execute(conn)
        .await?;
        Ok(())
    }
}
