//! Protocol statistics repository (single well-known row).

use super::{from_db_int, to_db_int};
use crate::error::StorageError;
use bigdecimal::BigDecimal;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use std::sync::Arc;
use tributary_domain::ProtocolStats;

/// Database record for protocol statistics.
#[derive(Debug, Clone)]
pub struct ProtocolStatsRecord {
    pub id: String,
    pub total_volume: BigDecimal,
    pub total_fees_collected: BigDecimal,
    pub total_pools: i64,
    pub total_vaults: i64,
    pub total_royalties_distributed: BigDecimal,
    pub total_holders: i64,
}

impl ProtocolStatsRecord {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            total_volume: row.try_get("total_volume")?,
            total_fees_collected: row.try_get("total_fees_collected")?,
            total_pools: row.try_get("total_pools")?,
            total_vaults: row.try_get("total_vaults")?,
            total_royalties_distributed: row.try_get("total_royalties_distributed")?,
            total_holders: row.try_get("total_holders")?,
        })
    }

    /// Converts the record into domain statistics.
    ///
    /// # Errors
    /// Returns an error if a counter column is negative.
    pub fn into_stats(self) -> Result<ProtocolStats, StorageError> {
        Ok(ProtocolStats {
            id: self.id,
            total_volume: self.total_volume,
            total_fees_collected: self.total_fees_collected,
            total_pools: from_db_int("total_pools", self.total_pools)?,
            total_vaults: from_db_int("total_vaults", self.total_vaults)?,
            total_royalties_distributed: self.total_royalties_distributed,
            total_holders: from_db_int("total_holders", self.total_holders)?,
        })
    }
}

/// Repository for the protocol statistics row.
#[derive(Clone)]
pub struct ProtocolStatsRepository {
    pool: Arc<PgPool>,
}

impl ProtocolStatsRepository {
    /// Creates a new ProtocolStatsRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds the statistics row by id.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find(&self, id: &str) -> Result<Option<ProtocolStatsRecord>, sqlx::Error> {
        let row = sqlx::query("SELECT * FROM protocol_stats WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(ProtocolStatsRecord::from_row).transpose()
    }

    /// Creates or updates the statistics row inside an open transaction.
    ///
    /// # Errors
    /// Returns an error if the query fails or a counter does not fit its column.
    pub async fn upsert(
        &self,
        conn: &mut PgConnection,
        stats: &ProtocolStats,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO protocol_stats (id, total_volume, total_fees_collected, total_pools,
                                        total_vaults, total_royalties_distributed, total_holders)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                total_volume = EXCLUDED.total_volume,
                total_fees_collected = EXCLUDED.total_fees_collected,
                total_pools = EXCLUDED.total_pools,
                total_vaults = EXCLUDED.total_vaults,
                total_royalties_distributed = EXCLUDED.total_royalties_distributed,
                total_holders = EXCLUDED.total_holders
            "#,
        )
        .bind(&stats.id)
        .bind(&stats.total_volume)
        .bind(&stats.total_fees_collected)
        .bind(to_db_int("total_pools", stats.total_pools)?)
        .bind(to_db_int("total_vaults", stats.total_vaults)?)
        .bind(&stats.total_royalties_distributed)
        .bind(to_db_int("total_holders", stats.total_holders)?)
        .execute(conn)
        .await?;
        Ok(())
    }
}
