//! JSON-lines event feed.
//!
//! Stands in for the chain event source: each line is one decoded event,
//! tagged by `type`, with raw amounts as base-10 strings, for example
//!
//! ```json
//! {"type":"swap","pool_id":"1","trader":"0xabc","is_buy":true,"amount_in":"100000000",
//!  "amount_out":"50000000000000000000","fee":"1000000","price":"2000000",
//!  "reserve_token":"950000000000000000000","reserve_quote":"2100000000",
//!  "timestamp":1005,"block_number":12,"tx_hash":"0x01","log_index":0}
//! ```

use crate::error::IndexerError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use tributary_domain::PoolEvent;
use tributary_domain::events::{EventMeta, LiquidityChanged, PoolCreated, SwapExecuted};
use tributary_domain::math::parse_raw;
use tributary_domain::PoolId;

/// Chain position fields shared by every record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    pub timestamp: u64,
    pub block_number: u64,
    pub tx_hash: String,
    /// Position of the log within its transaction; part of the swap id.
    pub log_index: u32,
}

impl From<MetaRecord> for EventMeta {
    fn from(meta: MetaRecord) -> Self {
        EventMeta {
            timestamp: meta.timestamp,
            block_number: meta.block_number,
            tx_hash: meta.tx_hash,
            log_index: meta.log_index,
        }
    }
}

/// One line of the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    PoolCreated {
        pool_id: String,
        token_id: String,
        quote_token_id: String,
        vault_id: String,
        token_decimals: u8,
        quote_decimals: u8,
        #[serde(flatten)]
        meta: MetaRecord,
    },
    Swap {
        pool_id: String,
        trader: String,
        is_buy: bool,
        amount_in: String,
        amount_out: String,
        fee: String,
        price: String,
        reserve_token: String,
        reserve_quote: String,
        #[serde(flatten)]
        meta: MetaRecord,
    },
    LiquidityAdded {
        pool_id: String,
        provider: String,
        token_amount: String,
        quote_amount: String,
        #[serde(flatten)]
        meta: MetaRecord,
    },
    LiquidityRemoved {
        pool_id: String,
        provider: String,
        token_amount: String,
        quote_amount: String,
        #[serde(flatten)]
        meta: MetaRecord,
    },
}

fn raw(event: &'static str, pool: &str, field: &'static str, value: &str) -> Result<U256, IndexerError> {
    parse_raw(value).map_err(|source| IndexerError::Conversion {
        event,
        pool: PoolId::from(pool),
        field,
        source,
    })
}

impl EventRecord {
    /// Decodes the record into a pool event.
    ///
    /// # Errors
    /// Returns [`IndexerError::Conversion`] if a raw amount is not a base-10 integer.
    pub fn into_event(self) -> Result<PoolEvent, IndexerError> {
        let event = match self {
            EventRecord::PoolCreated {
                pool_id,
                token_id,
                quote_token_id,
                vault_id,
                token_decimals,
                quote_decimals,
                meta,
            } => PoolEvent::PoolCreated(PoolCreated {
                pool_id: PoolId(pool_id),
                token_id,
                quote_token_id,
                vault_id,
                token_decimals,
                quote_decimals,
                meta: meta.into(),
            }),
            EventRecord::Swap {
                pool_id,
                trader,
                is_buy,
                amount_in,
                amount_out,
                fee,
                price,
                reserve_token,
                reserve_quote,
                meta,
            } => {
                let kind = "Swap";
                PoolEvent::Swap(SwapExecuted {
                    amount_in: raw(kind, &pool_id, "amount_in", &amount_in)?,
                    amount_out: raw(kind, &pool_id, "amount_out", &amount_out)?,
                    fee: raw(kind, &pool_id, "fee", &fee)?,
                    price: raw(kind, &pool_id, "price", &price)?,
                    reserve_token: raw(kind, &pool_id, "reserve_token", &reserve_token)?,
                    reserve_quote: raw(kind, &pool_id, "reserve_quote", &reserve_quote)?,
                    pool_id: PoolId(pool_id),
                    trader,
                    is_buy,
                    meta: meta.into(),
                })
            }
            EventRecord::LiquidityAdded {
                pool_id,
                provider,
                token_amount,
                quote_amount,
                meta,
            } => PoolEvent::LiquidityAdded(liquidity(
                "LiquidityAdded",
                pool_id,
                provider,
                &token_amount,
                &quote_amount,
                meta,
            )?),
            EventRecord::LiquidityRemoved {
                pool_id,
                provider,
                token_amount,
                quote_amount,
                meta,
            } => PoolEvent::LiquidityRemoved(liquidity(
                "LiquidityRemoved",
                pool_id,
                provider,
                &token_amount,
                &quote_amount,
                meta,
            )?),
        };
        Ok(event)
    }
}

fn liquidity(
    kind: &'static str,
    pool_id: String,
    provider: String,
    token_amount: &str,
    quote_amount: &str,
    meta: MetaRecord,
) -> Result<LiquidityChanged, IndexerError> {
    Ok(LiquidityChanged {
        token_amount: raw(kind, &pool_id, "token_amount", token_amount)?,
        quote_amount: raw(kind, &pool_id, "quote_amount", quote_amount)?,
        pool_id: PoolId(pool_id),
        provider,
        meta: meta.into(),
    })
}

/// Iterator over the events of a JSON-lines source.
///
/// Blank lines are ignored. Each undecodable line yields an
/// [`IndexerError::Feed`] carrying its 1-based line number.
pub struct EventFeed<R> {
    lines: Lines<R>,
    line: usize,
}

impl EventFeed<BufReader<File>> {
    /// Opens a feed file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IndexerError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> EventFeed<R> {
    /// Wraps any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for EventFeed<R> {
    type Item = Result<PoolEvent, IndexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(IndexerError::Io(e))),
            };
            self.line += 1;
            if text.trim().is_empty() {
                continue;
            }
            let line = self.line;
            let decoded = serde_json::from_str::<EventRecord>(&text)
                .map_err(|e| IndexerError::Feed {
                    line,
                    reason: e.to_string(),
                })
                .and_then(|record| {
                    record.into_event().map_err(|e| IndexerError::Feed {
                        line,
                        reason: e.to_string(),
                    })
                });
            return Some(decoded);
        }
    }
}
