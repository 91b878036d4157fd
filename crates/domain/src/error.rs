use thiserror::Error;

/// Errors raised while reading raw fixed-point integers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The raw string is not a base-10 unsigned integer.
    #[error("invalid raw amount {0:?}")]
    InvalidRaw(String),
    /// The raw string does not fit in 256 bits.
    #[error("raw amount {0:?} exceeds 256 bits")]
    TooLarge(String),
}

/// Resolution label that does not name a supported candle width.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resolution {0:?}, expected one of 1m, 5m, 1h, 1d")]
pub struct UnknownResolution(pub String);
