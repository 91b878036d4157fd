//! Consumer-side candle helpers.
//!
//! Stored series are sparse: a bucket without trades has no candle. These
//! helpers only shape data for readers and never write back to the store.

use bigdecimal::{BigDecimal, Zero};
use tributary_domain::math::bucket_start;
use tributary_domain::{Candle, Resolution};

/// Fills empty buckets between `from` and `to` (inclusive) with flat candles.
///
/// A synthesized candle carries the previous close as open, high, low and
/// close, with zero volume and zero trades. Buckets before the first stored
/// candle stay empty since there is no price to carry.
///
/// `candles` must belong to one pool at `resolution`, sorted by bucket start.
#[must_use]
pub fn fill_gaps(candles: &[Candle], resolution: Resolution, from: u64, to: u64) -> Vec<Candle> {
    let period = resolution.period();
    let step = resolution.period_secs();
    let mut out = Vec::new();
    let mut stored = candles.iter().peekable();
    let mut previous: Option<&Candle> = None;

    // Seed the carried price from candles that precede the window.
    let first = bucket_start(from, period);
    while let Some(candle) = stored.next_if(|c| c.bucket_start < first) {
        previous = Some(candle);
    }

    let mut bucket = first;
    while bucket <= to {
        match stored.next_if(|c| c.bucket_start == bucket) {
            Some(candle) => {
                out.push(candle.clone());
                previous = Some(candle);
            }
            None => {
                if let Some(prev) = previous {
                    out.push(Candle {
                        pool_id: prev.pool_id.clone(),
                        resolution,
                        bucket_start: bucket,
                        open: prev.close.clone(),
                        high: prev.close.clone(),
                        low: prev.close.clone(),
                        close: prev.close.clone(),
                        volume: BigDecimal::zero(),
                        tx_count: 0,
                    });
                }
            }
        }
        match bucket.checked_add(step) {
            Some(next) => bucket = next,
            None => break,
        }
    }
    out
}

/// Merges candles into a coarser resolution.
///
/// Open comes from the earliest candle of each target bucket, close from the
/// latest; volume and trade counts add up. Returns an empty series when
/// `target` is finer than the input.
///
/// `candles` must belong to one pool and one resolution, sorted by bucket start.
#[must_use]
pub fn rollup(candles: &[Candle], target: Resolution) -> Vec<Candle> {
    let Some(first) = candles.first() else {
        return Vec::new();
    };
    if target.period_secs() < first.resolution.period_secs() {
        return Vec::new();
    }

    let period = target.period();
    let mut out: Vec<Candle> = Vec::new();
    for candle in candles {
        let start = bucket_start(candle.bucket_start, period);
        match out.last_mut() {
            Some(acc) if acc.bucket_start == start => {
                if candle.high > acc.high {
                    acc.high = candle.high.clone();
                }
                if candle.low < acc.low {
                    acc.low = candle.low.clone();
                }
                acc.close = candle.close.clone();
                acc.volume += &candle.volume;
                acc.tx_count += candle.tx_count;
            }
            _ => out.push(Candle {
                resolution: target,
                bucket_start: start,
                ..candle.clone()
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use tributary_domain::value_objects::Price;
    use tributary_domain::{CandleKey, PoolId};

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn candle(resolution: Resolution, start: u64, open: &str, close: &str, volume: &str) -> Candle {
        let key = CandleKey::for_timestamp(PoolId::from("1"), resolution, start);
        let mut candle = Candle::seed(key, Price::new(dec(open)), dec(volume));
        candle.apply_trade(Price::new(dec(close)), &BigDecimal::zero());
        candle
    }

    #[test]
    fn test_fill_gaps_carries_previous_close() {
        let series = vec![
            candle(Resolution::OneMinute, 60, "1", "2", "10"),
            candle(Resolution::OneMinute, 240, "3", "4", "5"),
        ];
        let filled = fill_gaps(&series, Resolution::OneMinute, 0, 300);

        let starts: Vec<u64> = filled.iter().map(|c| c.bucket_start).collect();
        assert_eq!(starts, vec![60, 120, 180, 240, 300]);
        for flat in &filled[1..3] {
            assert_eq!(flat.open.value, dec("2"));
            assert_eq!(flat.high, flat.low);
            assert_eq!(flat.volume, BigDecimal::zero());
            assert_eq!(flat.tx_count, 0);
        }
        assert_eq!(filled[3], series[1]);
        assert_eq!(filled[4].close.value, dec("4"));
    }

    #[test]
    fn test_fill_gaps_uses_close_before_window() {
        let series = vec![candle(Resolution::OneHour, 0, "1", "7", "1")];
        let filled = fill_gaps(&series, Resolution::OneHour, 7200, 10_800);
        assert_eq!(filled.len(), 2);
        assert_eq!(filled[0].bucket_start, 7200);
        assert_eq!(filled[0].open.value, dec("7"));
    }

    #[test]
    fn test_rollup_minutes_into_five() {
        let series = vec![
            candle(Resolution::OneMinute, 960, "2", "2", "100"),
            candle(Resolution::OneMinute, 1020, "2.5", "2.5", "10"),
            candle(Resolution::OneMinute, 1200, "3", "1", "1"),
        ];
        let five = rollup(&series, Resolution::FiveMinutes);

        assert_eq!(five.len(), 2);
        assert_eq!(five[0].bucket_start, 900);
        assert_eq!(five[0].resolution, Resolution::FiveMinutes);
        assert_eq!(five[0].open.value, dec("2"));
        assert_eq!(five[0].close.value, dec("2.5"));
        assert_eq!(five[0].high.value, dec("2.5"));
        assert_eq!(five[0].volume, dec("110"));
        assert_eq!(five[0].tx_count, 4);
        assert_eq!(five[1].bucket_start, 1200);
        assert_eq!(five[1].low.value, dec("1"));
    }

    #[test]
    fn test_rollup_to_finer_resolution_is_empty() {
        let series = vec![candle(Resolution::OneHour, 3600, "1", "1", "1")];
        assert!(rollup(&series, Resolution::OneMinute).is_empty());
    }
}
