//! Event processor: applies each pool event as one atomic unit of work.

use crate::aggregator::CandleAggregator;
use crate::config::IndexerConfig;
use crate::error::IndexerError;
use crate::pool_tracker;
use crate::stats::ProtocolStatsTracker;
use bigdecimal::BigDecimal;
use primitive_types::U256;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tributary_data::{Store, UnitOfWork};
use tributary_domain::events::{LiquidityChanged, PoolCreated, SwapExecuted};
use tributary_domain::value_objects::{Amount, Price};
use tributary_domain::{Pool, PoolEvent, PoolId, Swap};

/// Result of processing a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event's writes were committed.
    Applied,
    /// The event was ignored and nothing was written.
    Skipped,
}

/// Counts from a full feed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Applies pool events to a store.
pub struct EventProcessor {
    store: Arc<dyn Store>,
    config: IndexerConfig,
    aggregator: CandleAggregator,
    stats: ProtocolStatsTracker,
}

/// Human-scale value of a raw event amount.
fn human(raw: U256, decimals: u8) -> BigDecimal {
    Amount::new(raw, decimals).to_decimal()
}

impl EventProcessor {
    /// Creates a processor writing to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: IndexerConfig) -> Self {
        let aggregator = CandleAggregator::new(config.resolutions.iter().copied());
        let stats = ProtocolStatsTracker::new(config.protocol_stats_id.clone());
        Self {
            store,
            config,
            aggregator,
            stats,
        }
    }

    #[must_use]
    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Processes one event.
    ///
    /// All writes of the event are committed together; if any step fails
    /// nothing is written.
    ///
    /// # Errors
    /// Returns an error if a reserve would become negative or the store fails.
    pub async fn process(&self, event: &PoolEvent) -> Result<EventOutcome, IndexerError> {
        let mut uow = UnitOfWork::new(self.store.as_ref());

        let outcome = match event {
            PoolEvent::PoolCreated(e) => self.on_pool_created(&mut uow, e).await,
            PoolEvent::Swap(e) => self.on_swap(&mut uow, e).await,
            PoolEvent::LiquidityAdded(e) => self.on_liquidity(&mut uow, e, true).await,
            PoolEvent::LiquidityRemoved(e) => self.on_liquidity(&mut uow, e, false).await,
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                if e.is_data_integrity() {
                    error!(
                        event = event.kind(),
                        pool = %event.pool_id(),
                        tx_hash = %event.meta().tx_hash,
                        block = event.meta().block_number,
                        error = %e,
                        "Rejected event"
                    );
                }
                return Err(e);
            }
        };

        if outcome == EventOutcome::Applied {
            let written = uow.commit().await?;
            debug!(
                event = event.kind(),
                pool = %event.pool_id(),
                records = written,
                "Committed event"
            );
        }
        Ok(outcome)
    }

    /// Processes every event of a feed in order, stopping at the first error.
    ///
    /// # Errors
    /// Returns the first feed or processing error.
    pub async fn run<I>(&self, events: I) -> Result<RunSummary, IndexerError>
    where
        I: IntoIterator<Item = Result<PoolEvent, IndexerError>>,
    {
        let mut summary = RunSummary::default();
        for event in events {
            match self.process(&event?).await? {
                EventOutcome::Applied => summary.applied += 1,
                EventOutcome::Skipped => summary.skipped += 1,
            }
        }
        info!(
            applied = summary.applied,
            skipped = summary.skipped,
            "Event feed processed"
        );
        Ok(summary)
    }

    async fn on_pool_created(
        &self,
        uow: &mut UnitOfWork<'_>,
        event: &PoolCreated,
    ) -> Result<EventOutcome, IndexerError> {
        if uow.get::<Pool>(&event.pool_id).await?.is_some() {
            warn!(pool = %event.pool_id, tx_hash = %event.meta.tx_hash, "Pool already exists, skipping");
            return Ok(EventOutcome::Skipped);
        }

        let pool = Pool::new(
            event.pool_id.clone(),
            event.token_id.as_str(),
            event.quote_token_id.as_str(),
            event.vault_id.as_str(),
            event.token_decimals,
            event.quote_decimals,
            event.meta.timestamp,
        );
        uow.put(pool);
        self.stats.record_pool_created(uow).await?;

        info!(
            pool = %event.pool_id,
            token = %event.token_id,
            quote = %event.quote_token_id,
            vault = %event.vault_id,
            "Pool created"
        );
        Ok(EventOutcome::Applied)
    }

    async fn on_swap(
        &self,
        uow: &mut UnitOfWork<'_>,
        event: &SwapExecuted,
    ) -> Result<EventOutcome, IndexerError> {
        let Some(mut pool) = uow.get::<Pool>(&event.pool_id).await? else {
            warn!(pool = %event.pool_id, tx_hash = %event.meta.tx_hash, "Swap for unknown pool, skipping");
            return Ok(EventOutcome::Skipped);
        };

        let swap_id = Swap::id_for(&event.meta.tx_hash, event.meta.log_index);
        if uow.get::<Swap>(&swap_id).await?.is_some() {
            warn!(pool = %pool.id, swap = %swap_id, "Swap already indexed, skipping");
            return Ok(EventOutcome::Skipped);
        }

        let (in_decimals, out_decimals) = if event.is_buy {
            (pool.quote_decimals, pool.token_decimals)
        } else {
            (pool.token_decimals, pool.quote_decimals)
        };
        let reserve_token = human(event.reserve_token, pool.token_decimals);
        let reserve_quote = human(event.reserve_quote, pool.quote_decimals);

        let timestamp = event.meta.timestamp;
        if let Some(last) = pool.last_trade_at.filter(|&last| timestamp < last) {
            warn!(
                pool = %pool.id,
                timestamp,
                last_trade_at = last,
                "Swap arrived out of order"
            );
        }

        let swap = Swap {
            id: swap_id,
            pool_id: pool.id.clone(),
            trader: event.trader.clone(),
            is_buy: event.is_buy,
            amount_in: human(event.amount_in, in_decimals),
            amount_out: human(event.amount_out, out_decimals),
            fee: human(event.fee, pool.quote_decimals),
            price: Price::new(human(event.price, pool.quote_decimals)),
            timestamp,
            tx_hash: event.meta.tx_hash.clone(),
            block_number: event.meta.block_number,
            log_index: event.meta.log_index,
        };

        pool_tracker::apply_swap(&mut pool, &swap, reserve_token, reserve_quote);
        let volume = self.config.volume_basis.volume_of(&swap);
        self.aggregator
            .record_trade(uow, &pool.id, timestamp, &swap.price, volume)
            .await?;
        self.stats.record_trade(uow, volume, &swap.fee).await?;

        debug!(
            pool = %pool.id,
            swap = %swap.id,
            is_buy = swap.is_buy,
            price = %swap.price,
            volume = %volume,
            "Swap applied"
        );
        uow.put(pool);
        uow.put(swap);
        Ok(EventOutcome::Applied)
    }

    async fn on_liquidity(
        &self,
        uow: &mut UnitOfWork<'_>,
        event: &LiquidityChanged,
        added: bool,
    ) -> Result<EventOutcome, IndexerError> {
        let kind = if added { "LiquidityAdded" } else { "LiquidityRemoved" };

        let Some(mut pool) = uow.get::<Pool>(&event.pool_id).await? else {
            warn!(pool = %event.pool_id, tx_hash = %event.meta.tx_hash, event = kind, "Liquidity event for unknown pool, skipping");
            return Ok(EventOutcome::Skipped);
        };

        let token_amount = human(event.token_amount, pool.token_decimals);
        let quote_amount = human(event.quote_amount, pool.quote_decimals);

        if added {
            pool_tracker::add_liquidity(&mut pool, token_amount, quote_amount);
        } else {
            pool_tracker::remove_liquidity(&mut pool, token_amount, quote_amount)?;
        }

        debug!(
            pool = %pool.id,
            event = kind,
            provider = %event.provider,
            reserve_token = %pool.reserve_token,
            reserve_quote = %pool.reserve_quote,
            "Liquidity updated"
        );
        uow.put(pool);
        Ok(EventOutcome::Applied)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VolumeBasis;
    use crate::query::rollup;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use bigdecimal::Zero;
    use std::str::FromStr;
    use tributary_data::{ChangeSet, MemoryStore, StorageError};
    use tributary_domain::events::EventMeta;
    use tributary_domain::{Candle, CandleKey, ProtocolStats, Resolution};

    const E6: u64 = 1_000_000;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn e18(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn meta(timestamp: u64, tx: &str) -> EventMeta {
        EventMeta {
            timestamp,
            block_number: timestamp / 12,
            tx_hash: tx.to_string(),
            log_index: 0,
        }
    }

    fn pool_created(id: &str, timestamp: u64) -> PoolEvent {
        PoolEvent::PoolCreated(PoolCreated {
            pool_id: PoolId::from(id),
            token_id: "0xroyalty".to_string(),
            quote_token_id: "0xusdc".to_string(),
            vault_id: "0xvault".to_string(),
            token_decimals: 18,
            quote_decimals: 6,
            meta: meta(timestamp, &format!("0xcreate{id}")),
        })
    }

    fn buy(pool: &str, timestamp: u64, quote_in: u64, tokens_out: u64, price_e6: u64) -> PoolEvent {
        PoolEvent::Swap(SwapExecuted {
            pool_id: PoolId::from(pool),
            trader: "0xtrader".to_string(),
            is_buy: true,
            amount_in: U256::from(quote_in * E6),
            amount_out: e18(tokens_out),
            fee: U256::from(quote_in * E6 / 100),
            price: U256::from(price_e6),
            reserve_token: e18(1_000),
            reserve_quote: U256::from(2_000 * E6),
            meta: meta(timestamp, &format!("0xbuy{timestamp}")),
        })
    }

    fn sell(pool: &str, timestamp: u64, tokens_in: u64, quote_out: u64, price_e6: u64) -> PoolEvent {
        PoolEvent::Swap(SwapExecuted {
            pool_id: PoolId::from(pool),
            trader: "0xtrader".to_string(),
            is_buy: false,
            amount_in: e18(tokens_in),
            amount_out: U256::from(quote_out * E6),
            fee: U256::from(quote_out * E6 / 100),
            price: U256::from(price_e6),
            reserve_token: e18(1_010),
            reserve_quote: U256::from(1_975 * E6),
            meta: meta(timestamp, &format!("0xsell{timestamp}")),
        })
    }

    fn liquidity(pool: &str, timestamp: u64, tokens: u64, quote: u64) -> LiquidityChanged {
        LiquidityChanged {
            pool_id: PoolId::from(pool),
            provider: "0xlp".to_string(),
            token_amount: e18(tokens),
            quote_amount: U256::from(quote * E6),
            meta: meta(timestamp, &format!("0xliq{timestamp}")),
        }
    }

    fn processor(store: Arc<dyn Store>) -> EventProcessor {
        EventProcessor::new(store, IndexerConfig::default())
    }

    async fn candles(store: &MemoryStore, resolution: Resolution) -> Vec<Candle> {
        store
            .candles_in_range(&PoolId::from("1"), resolution, 0, u64::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_two_trades_across_minute_boundary() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        let events = vec![
            Ok(pool_created("1", 1000)),
            Ok(buy("1", 1005, 100, 50, 2_000_000)),
            Ok(sell("1", 1065, 10, 25, 2_500_000)),
        ];
        let summary = processor.run(events).await.unwrap();
        assert_eq!(summary, RunSummary { applied: 3, skipped: 0 });

        let minute = candles(&store, Resolution::OneMinute).await;
        assert_eq!(minute.len(), 2);
        assert_eq!(minute[0].bucket_start, 960);
        assert_eq!(minute[0].open.value, dec("2"));
        assert_eq!(minute[0].close.value, dec("2"));
        assert_eq!(minute[0].tx_count, 1);
        assert_eq!(minute[1].bucket_start, 1020);
        assert_eq!(minute[1].open.value, dec("2.5"));
        assert_eq!(minute[1].tx_count, 1);

        let five = candles(&store, Resolution::FiveMinutes).await;
        assert_eq!(five.len(), 1);
        let candle = &five[0];
        assert_eq!(candle.bucket_start, 900);
        assert_eq!(candle.open.value, dec("2"));
        assert_eq!(candle.close.value, dec("2.5"));
        assert_eq!(candle.high.value, dec("2.5"));
        assert_eq!(candle.low.value, dec("2"));
        assert_eq!(candle.tx_count, 2);
        // 100 quote in on the buy, 10 tokens in on the sell
        assert_eq!(candle.volume, dec("110"));

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.volume_quote, dec("125"));
        assert_eq!(pool.volume_token, dec("60"));
        assert_eq!(pool.fees_collected, dec("1.25"));
        assert_eq!(pool.tx_count, 2);
        assert_eq!(pool.reserve_token, dec("1010"));
        assert_eq!(pool.reserve_quote, dec("1975"));
        assert_eq!(pool.last_trade_at, Some(1065));

        let stats = store.load_protocol_stats("protocol").await.unwrap().unwrap();
        assert_eq!(stats.total_pools, 1);
        assert_eq!(stats.total_volume, dec("110"));
        assert_eq!(stats.total_fees_collected, dec("1.25"));
    }

    #[tokio::test]
    async fn test_quote_side_volume_basis() {
        let store = Arc::new(MemoryStore::new());
        let config = IndexerConfig {
            volume_basis: VolumeBasis::QuoteSide,
            ..IndexerConfig::default()
        };
        let processor = EventProcessor::new(store.clone(), config);

        processor.process(&pool_created("1", 1000)).await.unwrap();
        processor.process(&buy("1", 1005, 100, 50, 2_000_000)).await.unwrap();
        processor.process(&sell("1", 1065, 10, 25, 2_500_000)).await.unwrap();

        let day = candles(&store, Resolution::OneDay).await;
        assert_eq!(day[0].volume, dec("125"));
    }

    #[tokio::test]
    async fn test_no_candles_for_empty_buckets() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        processor.process(&pool_created("1", 0)).await.unwrap();
        processor.process(&buy("1", 30, 10, 5, 2_000_000)).await.unwrap();
        processor.process(&buy("1", 630, 10, 5, 3_000_000)).await.unwrap();

        let minute = candles(&store, Resolution::OneMinute).await;
        let starts: Vec<u64> = minute.iter().map(|c| c.bucket_start).collect();
        assert_eq!(starts, vec![0, 600]);
        // The later bucket opens at its own first trade, not the previous close.
        assert_eq!(minute[1].open.value, dec("3"));
        assert_eq!(minute[1].low.value, dec("3"));
    }

    #[tokio::test]
    async fn test_swap_for_unknown_pool_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        let outcome = processor.process(&buy("missing", 1005, 100, 50, 2_000_000)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Skipped);
        assert_eq!(store.swap_count().await, 0);
        for resolution in Resolution::ALL {
            assert_eq!(store.candle_count(resolution).await, 0);
        }
        assert!(store.load_protocol_stats("protocol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_events_are_skipped() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        let trade = buy("1", 1005, 100, 50, 2_000_000);
        let summary = processor
            .run(vec![
                Ok(pool_created("1", 1000)),
                Ok(pool_created("1", 1001)),
                Ok(trade.clone()),
                Ok(trade),
            ])
            .await
            .unwrap();
        assert_eq!(summary, RunSummary { applied: 2, skipped: 2 });

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.created_at, 1000);
        assert_eq!(pool.tx_count, 1);
        assert_eq!(candles(&store, Resolution::OneMinute).await[0].tx_count, 1);
        let stats = store.load_protocol_stats("protocol").await.unwrap().unwrap();
        assert_eq!(stats.total_pools, 1);
    }

    #[tokio::test]
    async fn test_negative_reserve_rejects_whole_event() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        processor.process(&pool_created("1", 1000)).await.unwrap();
        processor
            .process(&PoolEvent::LiquidityAdded(liquidity("1", 1001, 100, 200)))
            .await
            .unwrap();

        let err = processor
            .process(&PoolEvent::LiquidityRemoved(liquidity("1", 1002, 50, 300)))
            .await
            .unwrap_err();
        assert!(matches!(err, IndexerError::NegativeReserve { side: "quote", .. }));

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.reserve_token, dec("100"));
        assert_eq!(pool.reserve_quote, dec("200"));

        processor
            .process(&PoolEvent::LiquidityRemoved(liquidity("1", 1003, 50, 150)))
            .await
            .unwrap();
        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.reserve_token, dec("50"));
        assert_eq!(pool.reserve_quote, dec("50"));
    }

    #[tokio::test]
    async fn test_amounts_beyond_96_bits_are_exact() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());
        processor.process(&pool_created("1", 1000)).await.unwrap();

        let PoolEvent::Swap(mut swap) = buy("1", 1005, 100, 50, 2_000_000) else {
            unreachable!()
        };
        // 100 billion tokens at 18 decimals
        swap.amount_out = U256::exp10(29);
        swap.reserve_token = U256::exp10(29) * U256::from(3) + U256::from(7);
        let outcome = processor.process(&PoolEvent::Swap(swap)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Applied);

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.volume_token, dec("100000000000"));
        assert_eq!(pool.reserve_token, dec("300000000000.000000000000000007"));
        assert_eq!(store.swap_count().await, 1);
    }

    #[tokio::test]
    async fn test_reserves_grow_past_96_bits() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        let PoolEvent::PoolCreated(mut created) = pool_created("1", 1000) else {
            unreachable!()
        };
        created.token_decimals = 0;
        processor.process(&PoolEvent::PoolCreated(created)).await.unwrap();

        let mut deposit = liquidity("1", 1001, 0, 0);
        deposit.token_amount = U256::one() << 95;
        processor
            .process(&PoolEvent::LiquidityAdded(deposit.clone()))
            .await
            .unwrap();
        deposit.meta = meta(1002, "0xliq1002");
        processor
            .process(&PoolEvent::LiquidityAdded(deposit))
            .await
            .unwrap();

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.reserve_token, dec("79228162514264337593543950336"));
        assert_eq!(pool.reserve_quote, BigDecimal::zero());
    }

    #[tokio::test]
    async fn test_out_of_order_swap_is_applied() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        processor.process(&pool_created("1", 1000)).await.unwrap();
        processor.process(&buy("1", 1065, 100, 50, 2_500_000)).await.unwrap();
        let outcome = processor.process(&buy("1", 1005, 40, 20, 2_000_000)).await.unwrap();
        assert_eq!(outcome, EventOutcome::Applied);

        let pool = store.load_pool(&PoolId::from("1")).await.unwrap().unwrap();
        assert_eq!(pool.last_trade_at, Some(1065));
        assert_eq!(pool.tx_count, 2);
        assert_eq!(pool.volume_quote, dec("140"));
        assert_eq!(pool.volume_token, dec("70"));

        let minute = candles(&store, Resolution::OneMinute).await;
        let starts: Vec<u64> = minute.iter().map(|c| c.bucket_start).collect();
        assert_eq!(starts, vec![960, 1020]);
        assert_eq!(minute[0].volume, dec("40"));
        assert_eq!(minute[0].open.value, dec("2"));

        // Same 5m bucket: the late trade becomes the close.
        let five = candles(&store, Resolution::FiveMinutes).await;
        assert_eq!(five.len(), 1);
        assert_eq!(five[0].open.value, dec("2.5"));
        assert_eq!(five[0].close.value, dec("2"));
        assert_eq!(five[0].volume, dec("140"));
        assert_eq!(five[0].tx_count, 2);
    }

    #[tokio::test]
    async fn test_run_stops_at_first_error() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());

        let events = vec![
            Ok(pool_created("1", 1000)),
            Err(IndexerError::Feed {
                line: 2,
                reason: "bad json".to_string(),
            }),
            Ok(buy("1", 1005, 100, 50, 2_000_000)),
        ];
        let err = processor.run(events).await.unwrap_err();
        assert!(matches!(err, IndexerError::Feed { line: 2, .. }));
        assert_eq!(store.swap_count().await, 0);
    }

    /// Store whose commits always fail.
    struct FailingStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl Store for FailingStore {
        async fn load_pool(&self, id: &PoolId) -> Result<Option<Pool>, StorageError> {
            self.inner.load_pool(id).await
        }

        async fn load_swap(&self, id: &str) -> Result<Option<Swap>, StorageError> {
            self.inner.load_swap(id).await
        }

        async fn load_candle(&self, key: &CandleKey) -> Result<Option<Candle>, StorageError> {
            self.inner.load_candle(key).await
        }

        async fn load_protocol_stats(&self, id: &str) -> Result<Option<ProtocolStats>, StorageError> {
            self.inner.load_protocol_stats(id).await
        }

        async fn commit(&self, _changes: ChangeSet) -> Result<(), StorageError> {
            Err(StorageError::Rejected("disk full".to_string()))
        }

        async fn list_pools(&self) -> Result<Vec<Pool>, StorageError> {
            self.inner.list_pools().await
        }

        async fn recent_swaps(&self, pool_id: &PoolId, limit: usize) -> Result<Vec<Swap>, StorageError> {
            self.inner.recent_swaps(pool_id, limit).await
        }

        async fn candles_in_range(
            &self,
            pool_id: &PoolId,
            resolution: Resolution,
            from: u64,
            to: u64,
        ) -> Result<Vec<Candle>, StorageError> {
            self.inner.candles_in_range(pool_id, resolution, from, to).await
        }

        async fn latest_candle(
            &self,
            pool_id: &PoolId,
            resolution: Resolution,
        ) -> Result<Option<Candle>, StorageError> {
            self.inner.latest_candle(pool_id, resolution).await
        }
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let store = Arc::new(FailingStore {
            inner: MemoryStore::new(),
        });
        let processor = processor(store);

        let err = processor.process(&pool_created("1", 1000)).await.unwrap_err();
        assert!(matches!(err, IndexerError::Storage(StorageError::Rejected(_))));
        assert!(!err.is_data_integrity());
    }

    #[tokio::test]
    async fn test_volume_is_conserved_across_resolutions() {
        let store = Arc::new(MemoryStore::new());
        let processor = processor(store.clone());
        processor.process(&pool_created("1", 0)).await.unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let mut timestamp = 0u64;
        let mut expected = BigDecimal::zero();
        for _ in 0..200 {
            timestamp += rng.random_range(1..900);
            let quote_in = rng.random_range(1..500);
            let price = rng.random_range(1_000_000..3_000_000);
            processor
                .process(&buy("1", timestamp, quote_in, 1, price))
                .await
                .unwrap();
            expected += BigDecimal::from(quote_in);
        }

        for resolution in Resolution::ALL {
            let series = candles(&store, resolution).await;
            let volume = series
                .iter()
                .fold(BigDecimal::zero(), |acc, c| acc + &c.volume);
            let trades: u64 = series.iter().map(|c| c.tx_count).sum();
            assert_eq!(volume, expected, "{resolution}");
            assert_eq!(trades, 200, "{resolution}");
        }

        let minute = candles(&store, Resolution::OneMinute).await;
        let hour = candles(&store, Resolution::OneHour).await;
        assert_eq!(rollup(&minute, Resolution::OneHour), hour);
    }
}
