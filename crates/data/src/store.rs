use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use tributary_domain::{Candle, CandleKey, Pool, PoolId, ProtocolStats, Resolution, Swap};

/// All writes produced by processing one event.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub pools: HashMap<PoolId, Pool>,
    pub swaps: HashMap<String, Swap>,
    pub candles: HashMap<CandleKey, Candle>,
    pub protocol_stats: HashMap<String, ProtocolStats>,
}

impl ChangeSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of staged records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.len() + self.swaps.len() + self.candles.len() + self.protocol_stats.len()
    }
}

/// Storage backend for indexed entities.
///
/// `commit` must apply a change set atomically: either every record is
/// written or none is.
#[async_trait]
pub trait Store: Send + Sync {
    /// Loads a pool by id.
    async fn load_pool(&self, id: &PoolId) -> Result<Option<Pool>, StorageError>;

    /// Loads a swap by id.
    async fn load_swap(&self, id: &str) -> Result<Option<Swap>, StorageError>;

    /// Loads a candle by identity.
    async fn load_candle(&self, key: &CandleKey) -> Result<Option<Candle>, StorageError>;

    /// Loads the protocol statistics row.
    async fn load_protocol_stats(&self, id: &str) -> Result<Option<ProtocolStats>, StorageError>;

    /// Writes a change set atomically.
    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError>;

    /// Lists all pools ordered by creation time.
    async fn list_pools(&self) -> Result<Vec<Pool>, StorageError>;

    /// Lists the most recent swaps of a pool, newest first.
    async fn recent_swaps(&self, pool_id: &PoolId, limit: usize)
    -> Result<Vec<Swap>, StorageError>;

    /// Lists candles with `from <= bucket_start <= to`, oldest first.
    async fn candles_in_range(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
        from: u64,
        to: u64,
    ) -> Result<Vec<Candle>, StorageError>;

    /// Returns the most recent candle of a pool at a resolution.
    async fn latest_candle(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
    ) -> Result<Option<Candle>, StorageError>;
}
