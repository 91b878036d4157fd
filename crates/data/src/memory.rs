//! In-memory store.

use crate::error::StorageError;
use crate::store::{ChangeSet, Store};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;
use tributary_domain::{Candle, CandleKey, Pool, PoolId, ProtocolStats, Resolution, Swap};

#[derive(Debug, Default)]
struct MemoryState {
    pools: HashMap<PoolId, Pool>,
    swaps: HashMap<String, Swap>,
    /// One ordered collection per resolution, keyed by (pool, bucket start).
    candles: HashMap<Resolution, BTreeMap<(PoolId, u64), Candle>>,
    protocol_stats: HashMap<String, ProtocolStats>,
}

/// Store that keeps every entity in process memory.
///
/// A commit holds the write lock for the whole change set, so readers never
/// observe a partially applied event.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of candles stored at a resolution.
    pub async fn candle_count(&self, resolution: Resolution) -> usize {
        self.state
            .read()
            .await
            .candles
            .get(&resolution)
            .map_or(0, BTreeMap::len)
    }

    /// Number of swaps stored.
    pub async fn swap_count(&self) -> usize {
        self.state.read().await.swaps.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_pool(&self, id: &PoolId) -> Result<Option<Pool>, StorageError> {
        Ok(self.state.read().await.pools.get(id).cloned())
    }

    async fn load_swap(&self, id: &str) -> Result<Option<Swap>, StorageError> {
        Ok(self.state.read().await.swaps.get(id).cloned())
    }

    async fn load_candle(&self, key: &CandleKey) -> Result<Option<Candle>, StorageError> {
        Ok(self
            .state
            .read()
            .await
            .candles
            .get(&key.resolution)
            .and_then(|c| c.get(&(key.pool_id.clone(), key.bucket_start)))
            .cloned())
    }

    async fn load_protocol_stats(&self, id: &str) -> Result<Option<ProtocolStats>, StorageError> {
        Ok(self.state.read().await.protocol_stats.get(id).cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        let written = changes.len();

        state.pools.extend(changes.pools);
        state.swaps.extend(changes.swaps);
        for (key, candle) in changes.candles {
            state
                .candles
                .entry(key.resolution)
                .or_default()
                .insert((key.pool_id, key.bucket_start), candle);
        }
        state.protocol_stats.extend(changes.protocol_stats);

        debug!(records = written, "Committed change set");
        Ok(())
    }

    async fn list_pools(&self) -> Result<Vec<Pool>, StorageError> {
        let mut pools: Vec<Pool> = self.state.read().await.pools.values().cloned().collect();
        pools.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(pools)
    }

    async fn recent_swaps(
        &self,
        pool_id: &PoolId,
        limit: usize,
    ) -> Result<Vec<Swap>, StorageError> {
        let mut swaps: Vec<Swap> = self
            .state
            .read()
            .await
            .swaps
            .values()
            .filter(|s| &s.pool_id == pool_id)
            .cloned()
            .collect();
        swaps.sort_by(|a, b| {
            (b.block_number, b.log_index, b.timestamp).cmp(&(a.block_number, a.log_index, a.timestamp))
        });
        swaps.truncate(limit);
        Ok(swaps)
    }

    async fn candles_in_range(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
        from: u64,
        to: u64,
    ) -> Result<Vec<Candle>, StorageError> {
        if from > to {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        let Some(series) = state.candles.get(&resolution) else {
            return Ok(Vec::new());
        };
        Ok(series
            .range((pool_id.clone(), from)..=(pool_id.clone(), to))
            .map(|(_, candle)| candle.clone())
            .collect())
    }

    async fn latest_candle(
        &self,
        pool_id: &PoolId,
        resolution: Resolution,
    ) -> Result<Option<Candle>, StorageError> {
        let state = self.state.read().await;
        Ok(state.candles.get(&resolution).and_then(|series| {
            series
                .range((pool_id.clone(), 0)..=(pool_id.clone(), u64::MAX))
                .next_back()
                .map(|(_, candle)| candle.clone())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;
    use tributary_domain::value_objects::Price;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn candle(pool: &str, resolution: Resolution, ts: u64, price: BigDecimal) -> Candle {
        Candle::seed(
            CandleKey::for_timestamp(PoolId::from(pool), resolution, ts),
            Price::new(price),
            dec("1"),
        )
    }

    #[tokio::test]
    async fn test_commit_and_range_query() {
        let store = MemoryStore::new();
        let mut changes = ChangeSet::default();
        for (pool, ts, price) in [("1", 0, dec("1")), ("1", 120, dec("2")), ("1", 600, dec("3")), ("2", 60, dec("9"))] {
            let c = candle(pool, Resolution::OneMinute, ts, price);
            changes.candles.insert(c.key(), c);
        }
        store.commit(changes).await.unwrap();

        let pool = PoolId::from("1");
        let found = store.candles_in_range(&pool, Resolution::OneMinute, 0, 300).await.unwrap();
        assert_eq!(found.iter().map(|c| c.bucket_start).collect::<Vec<_>>(), vec![0, 120]);

        let latest = store.latest_candle(&pool, Resolution::OneMinute).await.unwrap().unwrap();
        assert_eq!(latest.close.value, dec("3"));

        assert!(store.candles_in_range(&pool, Resolution::OneHour, 0, 3600).await.unwrap().is_empty());
        assert_eq!(store.candle_count(Resolution::OneMinute).await, 4);
    }

    #[tokio::test]
    async fn test_resolutions_are_separate_collections() {
        let store = MemoryStore::new();
        let mut changes = ChangeSet::default();
        for resolution in Resolution::ALL {
            let c = candle("1", resolution, 0, dec("1"));
            changes.candles.insert(c.key(), c);
        }
        store.commit(changes).await.unwrap();

        for resolution in Resolution::ALL {
            assert_eq!(store.candle_count(resolution).await, 1);
        }
    }
}
