use crate::entities::pool::PoolId;
use crate::value_objects::price::Price;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Immutable record of one executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swap {
    /// `"{tx_hash}-{log_index}"`.
    pub id: String,
    pub pool_id: PoolId,
    pub trader: String,
    /// Trader spent quote and received royalty tokens.
    pub is_buy: bool,
    pub amount_in: BigDecimal,
    pub amount_out: BigDecimal,
    /// Fee charged, in quote units.
    pub fee: BigDecimal,
    pub price: Price,
    pub timestamp: u64,
    pub tx_hash: String,
    pub block_number: u64,
    pub log_index: u32,
}

impl Swap {
    /// Builds the swap id from the originating log position.
    #[must_use]
    pub fn id_for(tx_hash: &str, log_index: u32) -> String {
        format!("{tx_hash}-{log_index}")
    }

    /// Amount on the quote side of the trade.
    #[must_use]
    pub fn quote_amount(&self) -> &BigDecimal {
        if self.is_buy {
            &self.amount_in
        } else {
            &self.amount_out
        }
    }

    /// Amount on the royalty-token side of the trade.
    #[must_use]
    pub fn token_amount(&self) -> &BigDecimal {
        if self.is_buy {
            &self.amount_out
        } else {
            &self.amount_in
        }
    }
}
