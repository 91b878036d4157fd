use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution price of a trade, in quote units per royalty token.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Price {
    pub value: BigDecimal,
}

impl Price {
    pub fn new(value: BigDecimal) -> Self {
        Self { value }
    }
}

impl From<BigDecimal> for Price {
    fn from(value: BigDecimal) -> Self {
        Self { value }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
