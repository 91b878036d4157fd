//! Streaming multi-resolution candle indexer.
//!
//! This crate turns an ordered stream of pool events into persisted state:
//! - Per-pool running totals (reserves, volume, fees, trade count)
//! - OHLCV candles at 1 minute, 5 minute, 1 hour and 1 day resolution
//! - Protocol-wide statistics
//!
//! Every event is applied as one unit of work and committed atomically.

/// Prelude module for convenient imports.
pub mod prelude;

/// Candle aggregation.
pub mod aggregator;
/// Indexer configuration.
pub mod config;
/// Error types.
pub mod error;
/// JSON-lines event feed.
pub mod feed;
/// Pool state updates.
pub mod pool_tracker;
/// Event processing.
pub mod processor;
/// Consumer-side candle helpers.
pub mod query;
/// Protocol statistics updates.
pub mod stats;

pub use aggregator::CandleAggregator;
pub use config::{IndexerConfig, VolumeBasis};
pub use error::IndexerError;
pub use feed::{EventFeed, EventRecord};
pub use processor::{EventOutcome, EventProcessor, RunSummary};
