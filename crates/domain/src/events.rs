//! Decoded pool events delivered by the event source.
//!
//! Numeric fields are raw fixed-point integers; the pool's decimal counts
//! are needed to interpret them.

use crate::entities::pool::PoolId;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Position of an event on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    /// Block timestamp in seconds.
    pub timestamp: u64,
    pub block_number: u64,
    pub tx_hash: String,
    pub log_index: u32,
}

/// A pool was deployed by the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCreated {
    pub pool_id: PoolId,
    pub token_id: String,
    pub quote_token_id: String,
    pub vault_id: String,
    pub token_decimals: u8,
    pub quote_decimals: u8,
    pub meta: EventMeta,
}

/// A trade executed against a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapExecuted {
    pub pool_id: PoolId,
    pub trader: String,
    /// Quote in, royalty token out.
    pub is_buy: bool,
    pub amount_in: U256,
    pub amount_out: U256,
    /// Quote-denominated fee.
    pub fee: U256,
    /// Quote units per royalty token, scaled by the quote decimals.
    pub price: U256,
    /// Post-trade royalty-token reserve.
    pub reserve_token: U256,
    /// Post-trade quote reserve.
    pub reserve_quote: U256,
    pub meta: EventMeta,
}

/// Liquidity was deposited into or withdrawn from a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityChanged {
    pub pool_id: PoolId,
    pub provider: String,
    pub token_amount: U256,
    pub quote_amount: U256,
    pub meta: EventMeta,
}

/// Any event the indexer consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolEvent {
    PoolCreated(PoolCreated),
    Swap(SwapExecuted),
    LiquidityAdded(LiquidityChanged),
    LiquidityRemoved(LiquidityChanged),
}

impl PoolEvent {
    #[must_use]
    pub fn pool_id(&self) -> &PoolId {
        match self {
            PoolEvent::PoolCreated(e) => &e.pool_id,
            PoolEvent::Swap(e) => &e.pool_id,
            PoolEvent::LiquidityAdded(e) | PoolEvent::LiquidityRemoved(e) => &e.pool_id,
        }
    }

    #[must_use]
    pub fn meta(&self) -> &EventMeta {
        match self {
            PoolEvent::PoolCreated(e) => &e.meta,
            PoolEvent::Swap(e) => &e.meta,
            PoolEvent::LiquidityAdded(e) | PoolEvent::LiquidityRemoved(e) => &e.meta,
        }
    }

    /// Event name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PoolEvent::PoolCreated(_) => "PoolCreated",
            PoolEvent::Swap(_) => "Swap",
            PoolEvent::LiquidityAdded(_) => "LiquidityAdded",
            PoolEvent::LiquidityRemoved(_) => "LiquidityRemoved",
        }
    }
}
