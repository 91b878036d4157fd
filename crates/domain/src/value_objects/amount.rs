use crate::math::decimal;
use bigdecimal::BigDecimal;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A raw on-chain amount together with the decimal places of its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount {
    pub raw: U256,
    pub decimals: u8,
}

impl Amount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Human-scale value of the amount.
    #[must_use]
    pub fn to_decimal(&self) -> BigDecimal {
        decimal::to_decimal(self.raw, self.decimals)
    }
}
