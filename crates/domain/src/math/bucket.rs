//! Time bucket computation.

use std::num::NonZeroU64;

/// Returns the start of the `period`-wide bucket containing `timestamp`.
///
/// Integer division only, so every timestamp in a bucket maps to the same
/// start value. Block timestamps are unsigned, so truncation equals floor.
#[must_use]
pub const fn bucket_start(timestamp: u64, period: NonZeroU64) -> u64 {
    let period = period.get();
    timestamp / period * period
}
