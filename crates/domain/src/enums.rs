use crate::error::UnknownResolution;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::str::FromStr;

/// Candle bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resolution {
    /// 60 second buckets.
    #[serde(rename = "1m")]
    OneMinute,
    /// 300 second buckets.
    #[serde(rename = "5m")]
    FiveMinutes,
    /// 3600 second buckets.
    #[serde(rename = "1h")]
    OneHour,
    /// 86400 second buckets.
    #[serde(rename = "1d")]
    OneDay,
}

impl Resolution {
    /// Every supported resolution, finest first.
    pub const ALL: [Resolution; 4] = [
        Resolution::OneMinute,
        Resolution::FiveMinutes,
        Resolution::OneHour,
        Resolution::OneDay,
    ];

    /// Bucket width in seconds.
    #[must_use]
    pub const fn period_secs(self) -> u64 {
        self.period().get()
    }

    /// Bucket width as a non-zero period.
    #[must_use]
    pub const fn period(self) -> NonZeroU64 {
        const MINUTE: NonZeroU64 = NonZeroU64::new(60).unwrap();
        const FIVE_MINUTES: NonZeroU64 = NonZeroU64::new(300).unwrap();
        const HOUR: NonZeroU64 = NonZeroU64::new(3_600).unwrap();
        const DAY: NonZeroU64 = NonZeroU64::new(86_400).unwrap();
        match self {
            Resolution::OneMinute => MINUTE,
            Resolution::FiveMinutes => FIVE_MINUTES,
            Resolution::OneHour => HOUR,
            Resolution::OneDay => DAY,
        }
    }

    /// Short label used in table names and on the command line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Resolution::OneMinute => "1m",
            Resolution::FiveMinutes => "5m",
            Resolution::OneHour => "1h",
            Resolution::OneDay => "1d",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownResolution(s.to_string()))
    }
}
