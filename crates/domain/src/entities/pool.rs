use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a trading pool as emitted by the factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl PoolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Running state of one royalty-token / quote-token pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub token_id: String,
    pub quote_token_id: String,
    pub vault_id: String,
    pub token_decimals: u8,
    pub quote_decimals: u8,

    pub reserve_token: BigDecimal,
    pub reserve_quote: BigDecimal,
    pub volume_token: BigDecimal,
    pub volume_quote: BigDecimal,
    pub fees_collected: BigDecimal,
    pub tx_count: u64,

    pub created_at: u64,
    /// Timestamp of the latest applied swap.
    pub last_trade_at: Option<u64>,
}

impl Pool {
    /// Creates a pool with zeroed reserves and totals.
    #[must_use]
    pub fn new(
        id: PoolId,
        token_id: impl Into<String>,
        quote_token_id: impl Into<String>,
        vault_id: impl Into<String>,
        token_decimals: u8,
        quote_decimals: u8,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            token_id: token_id.into(),
            quote_token_id: quote_token_id.into(),
            vault_id: vault_id.into(),
            token_decimals,
            quote_decimals,
            reserve_token: BigDecimal::zero(),
            reserve_quote: BigDecimal::zero(),
            volume_token: BigDecimal::zero(),
            volume_quote: BigDecimal::zero(),
            fees_collected: BigDecimal::zero(),
            tx_count: 0,
            created_at,
            last_trade_at: None,
        }
    }
}
