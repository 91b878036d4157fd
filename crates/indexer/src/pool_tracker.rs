//! Pool state updates: reserves and running totals.

use crate::error::IndexerError;
use bigdecimal::BigDecimal;
use tributary_domain::{Pool, Swap};

/// Applies an executed swap to its pool.
///
/// Reserves are taken from the event as authoritative post-trade values.
pub fn apply_swap(
    pool: &mut Pool,
    swap: &Swap,
    reserve_token: BigDecimal,
    reserve_quote: BigDecimal,
) {
    pool.reserve_token = reserve_token;
    pool.reserve_quote = reserve_quote;
    pool.volume_quote += swap.quote_amount();
    pool.volume_token += swap.token_amount();
    pool.fees_collected += &swap.fee;
    pool.tx_count += 1;
    pool.last_trade_at = Some(
        pool.last_trade_at
            .map_or(swap.timestamp, |last| last.max(swap.timestamp)),
    );
}

/// Adds deposited liquidity to the pool reserves.
pub fn add_liquidity(pool: &mut Pool, token_amount: BigDecimal, quote_amount: BigDecimal) {
    pool.reserve_token += token_amount;
    pool.reserve_quote += quote_amount;
}

/// Removes withdrawn liquidity from the pool reserves.
///
/// # Errors
/// Returns [`IndexerError::NegativeReserve`] if either side would drop below
/// zero; the pool is left unchanged in that case.
pub fn remove_liquidity(
    pool: &mut Pool,
    token_amount: BigDecimal,
    quote_amount: BigDecimal,
) -> Result<(), IndexerError> {
    let sides = [
        ("token", &pool.reserve_token, &token_amount),
        ("quote", &pool.reserve_quote, &quote_amount),
    ];
    for (side, reserve, amount) in sides {
        if reserve < amount {
            return Err(IndexerError::NegativeReserve {
                event: "LiquidityRemoved",
                pool: pool.id.clone(),
                side,
                reserve: reserve.clone(),
                amount: amount.clone(),
            });
        }
    }
    pool.reserve_token -= token_amount;
    pool.reserve_quote -= quote_amount;
    Ok(())
}
