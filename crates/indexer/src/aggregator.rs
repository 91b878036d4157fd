//! Multi-resolution OHLCV candle aggregation.
//!
//! Each trade updates one candle per enabled resolution through the same
//! [`CandleAggregator::upsert_candle`] routine, so every resolution follows
//! identical seeding and update rules.

use bigdecimal::BigDecimal;
use tracing::debug;
use tributary_data::{StorageError, UnitOfWork};
use tributary_domain::value_objects::Price;
use tributary_domain::{Candle, CandleKey, PoolId, Resolution};

/// Maintains the candle series of every enabled resolution.
#[derive(Debug, Clone)]
pub struct CandleAggregator {
    resolutions: Vec<Resolution>,
}

impl CandleAggregator {
    /// Creates an aggregator for the given resolutions (deduplicated, finest first).
    #[must_use]
    pub fn new(resolutions: impl IntoIterator<Item = Resolution>) -> Self {
        let mut resolutions: Vec<Resolution> = resolutions.into_iter().collect();
        resolutions.sort();
        resolutions.dedup();
        Self { resolutions }
    }

    /// Enabled resolutions.
    #[must_use]
    pub fn resolutions(&self) -> &[Resolution] {
        &self.resolutions
    }

    /// Folds one trade into the candle of its bucket at `resolution`.
    ///
    /// The first trade of a bucket seeds the candle with its own price; there
    /// is no carry-over from the previous bucket and empty buckets get no
    /// candle. Later trades widen high/low, overwrite close and accumulate
    /// volume and trade count.
    ///
    /// # Errors
    /// Returns an error if the candle lookup fails.
    pub async fn upsert_candle(
        uow: &mut UnitOfWork<'_>,
        pool_id: &PoolId,
        timestamp: u64,
        price: &Price,
        volume: &BigDecimal,
        resolution: Resolution,
    ) -> Result<Candle, StorageError> {
        let key = CandleKey::for_timestamp(pool_id.clone(), resolution, timestamp);
        let seed_key = key.clone();
        let (mut candle, created) = uow
            .get_or_create(&key, || Candle::seed(seed_key, price.clone(), volume.clone()))
            .await?;

        if !created {
            candle.apply_trade(price.clone(), volume);
            uow.put(candle.clone());
        }

        debug!(
            pool = %pool_id,
            resolution = %resolution,
            bucket_start = candle.bucket_start,
            created,
            close = %candle.close,
            tx_count = candle.tx_count,
            "Candle updated"
        );
        Ok(candle)
    }

    /// Folds one trade into every enabled resolution.
    ///
    /// # Errors
    /// Returns an error if a candle lookup fails.
    pub async fn record_trade(
        &self,
        uow: &mut UnitOfWork<'_>,
        pool_id: &PoolId,
        timestamp: u64,
        price: &Price,
        volume: &BigDecimal,
    ) -> Result<Vec<Candle>, StorageError> {
        let mut candles = Vec::with_capacity(self.resolutions.len());
        for &resolution in &self.resolutions {
            candles.push(
                Self::upsert_candle(uow, pool_id, timestamp, price, volume, resolution).await?,
            );
        }
        Ok(candles)
    }
}

impl Default for CandleAggregator {
    fn default() -> Self {
        Self::new(Resolution::ALL)
    }
}
