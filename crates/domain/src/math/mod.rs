//! Fixed-point and time bucket arithmetic.

pub mod bucket;
pub mod decimal;

pub use bucket::bucket_start;
pub use decimal::{parse_raw, to_decimal};
