//! Protocol-wide statistics, kept in a single well-known row.

use bigdecimal::BigDecimal;
use tributary_data::{StorageError, UnitOfWork};
use tributary_domain::ProtocolStats;

/// Updates the protocol statistics row, creating it on first access.
#[derive(Debug, Clone)]
pub struct ProtocolStatsTracker {
    id: String,
}

impl ProtocolStatsTracker {
    /// Creates a tracker for the row with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Id of the tracked row.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the statistics row, staging a zeroed one if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    pub async fn get_or_create(&self, uow: &mut UnitOfWork<'_>) -> Result<ProtocolStats, StorageError> {
        let id = &self.id;
        let (stats, _) = uow.get_or_create(id, || ProtocolStats::new(id.clone())).await?;
        Ok(stats)
    }

    /// Counts a newly created pool.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    pub async fn record_pool_created(&self, uow: &mut UnitOfWork<'_>) -> Result<(), StorageError> {
        let mut stats = self.get_or_create(uow).await?;
        stats.total_pools += 1;
        uow.put(stats);
        Ok(())
    }

    /// Adds a trade's volume and fee to the protocol totals.
    ///
    /// # Errors
    /// Returns an error if the lookup fails.
    pub async fn record_trade(
        &self,
        uow: &mut UnitOfWork<'_>,
        volume: &BigDecimal,
        fee: &BigDecimal,
    ) -> Result<(), StorageError> {
        let mut stats = self.get_or_create(uow).await?;
        stats.total_volume += volume;
        stats.total_fees_collected += fee;
        uow.put(stats);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tributary_data::{MemoryStore, Store};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_stats_created_lazily_and_accumulate() {
        let store = MemoryStore::new();
        let tracker = ProtocolStatsTracker::new("protocol");
        assert!(store.load_protocol_stats("protocol").await.unwrap().is_none());

        let mut uow = UnitOfWork::new(&store);
        tracker.record_pool_created(&mut uow).await.unwrap();
        tracker.record_trade(&mut uow, &dec("100"), &dec("1")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = UnitOfWork::new(&store);
        tracker.record_trade(&mut uow, &dec("25"), &dec("0.5")).await.unwrap();
        uow.commit().await.unwrap();

        let stats = store.load_protocol_stats("protocol").await.unwrap().unwrap();
        assert_eq!(stats.total_pools, 1);
        assert_eq!(stats.total_volume, dec("125"));
        assert_eq!(stats.total_fees_collected, dec("1.5"));
        assert_eq!(stats.total_holders, 0);
    }
}
