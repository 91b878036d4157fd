use crate::entities::pool::PoolId;
use crate::enums::Resolution;
use crate::math::bucket::bucket_start;
use crate::value_objects::price::Price;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Identity of a candle: one per (pool, resolution, bucket start).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandleKey {
    pub pool_id: PoolId,
    pub resolution: Resolution,
    pub bucket_start: u64,
}

impl CandleKey {
    /// Key of the bucket that `timestamp` falls into.
    #[must_use]
    pub fn for_timestamp(pool_id: PoolId, resolution: Resolution, timestamp: u64) -> Self {
        Self {
            pool_id,
            resolution,
            bucket_start: bucket_start(timestamp, resolution.period()),
        }
    }

    /// Row id within the resolution's collection.
    ///
    /// The bucket start is all digits, so splitting at the last `-` recovers
    /// the pool id and the mapping is injective.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}", self.pool_id, self.bucket_start)
    }
}

/// OHLCV aggregate of all trades in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub pool_id: PoolId,
    pub resolution: Resolution,
    pub bucket_start: u64,

    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,

    pub volume: BigDecimal,
    pub tx_count: u64,
}

impl Candle {
    /// Seeds a candle from the first trade in its bucket.
    #[must_use]
    pub fn seed(key: CandleKey, price: Price, volume: BigDecimal) -> Self {
        Self {
            pool_id: key.pool_id,
            resolution: key.resolution,
            bucket_start: key.bucket_start,
            open: price.clone(),
            high: price.clone(),
            low: price.clone(),
            close: price,
            volume,
            tx_count: 1,
        }
    }

    /// Folds a later trade in the same bucket into the candle.
    ///
    /// `open` is fixed at creation; `close` always takes the latest price.
    pub fn apply_trade(&mut self, price: Price, volume: &BigDecimal) {
        if price > self.high {
            self.high = price.clone();
        }
        if price < self.low {
            self.low = price.clone();
        }
        self.close = price;
        self.volume += volume;
        self.tx_count += 1;
    }

    #[must_use]
    pub fn key(&self) -> CandleKey {
        CandleKey {
            pool_id: self.pool_id.clone(),
            resolution: self.resolution,
            bucket_start: self.bucket_start,
        }
    }

    /// Exclusive end of the bucket.
    #[must_use]
    pub fn bucket_end(&self) -> u64 {
        self.bucket_start + self.resolution.period_secs()
    }
}
