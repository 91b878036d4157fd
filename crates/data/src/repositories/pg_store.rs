//! [`Store`] implementation backed by PostgreSQL.

use super::{Database, to_db_int};
use crate::error::StorageError;
use crate::store::{ChangeSet, Store};
use async_trait::async_trait;
use tracing::debug;
use tributary_domain::{Candle, CandleKey, Pool, PoolId, ProtocolStats, Resolution, Swap};

#[async_trait]
impl Store for Database {
    async fn load_pool(&self, id: &PoolId) -> Result<Option<Pool>, StorageError> {
        self.pools()
            .find_by_id(id.as_str())
            .await?
            .map(|record| record.into_pool())
            .transpose()
    }

    async fn load_swap(&self, id: &str) -> Result<Option<Swap>, StorageError> {
        self.swaps()
            .find_by_id(id)
            .await?
            .map(|record| record.into_swap())
            .transpose()
    }

    async fn load_candle(&self, key: &CandleKey) -> Result<Option<Candle>, StorageError> {
        self.candles()
            .find(key)
            .await?
            .map(|record| record.into_candle(key.resolution))
            .transpose()
    }

    async fn load_protocol_stats(&self, id: &str) -> Result<Option<ProtocolStats>, StorageError> {
        self.protocol_stats()
            .find(id)
            .await?
            .map(|record| record.into_stats())
            .transpose()
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let written = changes.len();
        let pools = self.pools();
        let swaps = self.swaps();
        let candles = self.candles();
        let stats = self.protocol_stats();

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool().begin().await?;
        for pool in changes.pools.values() {
            pools.upsert(&mut tx, pool).await?;
        }
        for swap in changes.swaps.values() {
            swaps.insert(&mut tx, swap).await?;
        }
        for candle in changes.candles.values() {
            candles.upsert(&mut tx, candle).await?;
        }
        for row in changes.protocol_stats.values() {
            stats.upsert(&mut tx, row).await?;
        }
        tx.commit().await?;

        debug!(records = written, "Committed change set");
        Ok(())
    }

    async fn list_pools(&self) -> Result<Vec<Pool>, StorageError> {
        self.pools()
            .find_all()
            .await?
            .into_iter()
            .map(|record| record.into_pool())
            .collect()
    }

    async fn recent_swaps(
        &self,
        pool_id: &PoolId,
        limit: usize,
    ) -> Result<Vec<Swap>, StorageError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.swaps()
            .find_by_pool(pool_id.as_str(), limit)
            .await?
            .into_iter()
            .map(|record| record.into_swap())
            .collect()
    }

    async fn candles_in_range(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
        from: u64,
        to: u64,
    ) -> Result<Vec<Candle>, StorageError> {
        // Clamp the bounds instead of failing on open-ended ranges.
        let from = to_db_int("bucket_start", from).unwrap_or(i64::MAX);
        let to = to_db_int("bucket_start", to).unwrap_or(i64::MAX);
        self.candles()
            .find_by_pool_and_range(pool_id.as_str(), resolution, from, to)
            .await?
            .into_iter()
            .map(|record| record.into_candle(resolution))
            .collect()
    }

    async fn latest_candle(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
    ) -> Result<Option<Candle>, StorageError> {
        self.candles()
            .find_latest(pool_id.as_str(), resolution)
            .await?
            .map(|record| record.into_candle(resolution))
            .transpose()
    }
}
