//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use tributary_indexer::prelude::*;
//! ```

pub use crate::aggregator::CandleAggregator;
pub use crate::config::{IndexerConfig, VolumeBasis};
pub use crate::error::IndexerError;
pub use crate::feed::{EventFeed, EventRecord};
pub use crate::processor::{EventOutcome, EventProcessor, RunSummary};
pub use crate::query::{fill_gaps, rollup};
pub use crate::stats::ProtocolStatsTracker;

pub use tributary_data::{MemoryStore, Store, UnitOfWork};
pub use tributary_domain::{Candle, CandleKey, Pool, PoolEvent, PoolId, ProtocolStats, Resolution, Swap};
