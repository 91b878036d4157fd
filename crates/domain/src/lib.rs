//! Core domain model for the Tributary AMM candle indexer.
//!
//! This crate holds the pure, storage-agnostic parts of the pipeline:
//! - Entities persisted by the indexer (pools, swaps, candles, protocol stats)
//! - Decoded pool events handed over by the event source
//! - Fixed-point to decimal conversion
//! - Time bucket computation for candle resolutions

/// Error types.
pub mod error;
/// Persisted entities.
pub mod entities;
/// Enumerations shared across crates.
pub mod enums;
/// Decoded pool events.
pub mod events;
/// Fixed-point and time bucket arithmetic.
pub mod math;
/// Value objects.
pub mod value_objects;

pub use entities::{Candle, CandleKey, Pool, PoolId, ProtocolStats, Swap};
pub use enums::Resolution;
pub use error::ConversionError;
pub use events::PoolEvent;
