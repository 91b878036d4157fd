use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// Default id of the protocol-wide statistics row.
pub const PROTOCOL_STATS_ID: &str = "protocol";

/// Protocol-wide running totals, stored as a single well-known row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub id: String,
    pub total_volume: BigDecimal,
    pub total_fees_collected: BigDecimal,
    pub total_pools: u64,
    // Maintained by the vault and distribution handlers, not by the candle pipeline.
    pub total_vaults: u64,
    pub total_royalties_distributed: BigDecimal,
    pub total_holders: u64,
}

impl ProtocolStats {
    /// Creates a zeroed statistics row.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            total_volume: BigDecimal::zero(),
            total_fees_collected: BigDecimal::zero(),
            total_pools: 0,
            total_vaults: 0,
            total_royalties_distributed: BigDecimal::zero(),
            total_holders: 0,
        }
    }
}
