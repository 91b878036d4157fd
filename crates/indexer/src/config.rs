//! Indexer configuration.

use crate::error::IndexerError;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tributary_domain::entities::protocol_stats::PROTOCOL_STATS_ID;
use tributary_domain::{Resolution, Swap};

/// Which amount of a trade counts as its volume in candles and protocol totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeBasis {
    /// The amount the trader spends: quote for buys, royalty tokens for sells.
    #[default]
    InputSide,
    /// The quote amount of every trade.
    QuoteSide,
}

impl VolumeBasis {
    /// Volume contributed by a swap.
    #[must_use]
    pub fn volume_of(self, swap: &Swap) -> &BigDecimal {
        match self {
            VolumeBasis::InputSide => &swap.amount_in,
            VolumeBasis::QuoteSide => swap.quote_amount(),
        }
    }
}

impl fmt::Display for VolumeBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeBasis::InputSide => f.write_str("input"),
            VolumeBasis::QuoteSide => f.write_str("quote"),
        }
    }
}

impl FromStr for VolumeBasis {
    type Err = IndexerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "input" | "input_side" => Ok(VolumeBasis::InputSide),
            "quote" | "quote_side" => Ok(VolumeBasis::QuoteSide),
            other => Err(IndexerError::Config(format!(
                "unknown volume basis {other:?}, expected input or quote"
            ))),
        }
    }
}

/// Configuration for the event processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Candle resolutions maintained per trade.
    pub resolutions: Vec<Resolution>,
    /// Volume definition for candles and protocol totals.
    pub volume_basis: VolumeBasis,
    /// Id of the protocol statistics row.
    pub protocol_stats_id: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            resolutions: Resolution::ALL.to_vec(),
            volume_basis: VolumeBasis::default(),
            protocol_stats_id: PROTOCOL_STATS_ID.to_string(),
        }
    }
}

impl IndexerConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, IndexerError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: IndexerConfig = serde_json::from_str(&raw)
            .map_err(|e| IndexerError::Config(format!("{}: {e}", path.as_ref().display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for unusable values.
    ///
    /// # Errors
    /// Returns an error if no resolution is enabled or the stats id is blank.
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.resolutions.is_empty() {
            return Err(IndexerError::Config(
                "at least one resolution must be enabled".to_string(),
            ));
        }
        if self.protocol_stats_id.trim().is_empty() {
            return Err(IndexerError::Config(
                "protocol_stats_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::io::Write;
    use tributary_domain::PoolId;
    use tributary_domain::value_objects::Price;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn swap(is_buy: bool) -> Swap {
        Swap {
            id: "0xabc-0".to_string(),
            pool_id: PoolId::from("1"),
            trader: "0xtrader".to_string(),
            is_buy,
            amount_in: dec("100"),
            amount_out: dec("50"),
            fee: dec("1"),
            price: Price::new(dec("2")),
            timestamp: 1005,
            tx_hash: "0xabc".to_string(),
            block_number: 1,
            log_index: 0,
        }
    }

    #[test]
    fn test_volume_basis() {
        assert_eq!(VolumeBasis::InputSide.volume_of(&swap(true)), &dec("100"));
        assert_eq!(VolumeBasis::InputSide.volume_of(&swap(false)), &dec("100"));
        assert_eq!(VolumeBasis::QuoteSide.volume_of(&swap(true)), &dec("100"));
        assert_eq!(VolumeBasis::QuoteSide.volume_of(&swap(false)), &dec("50"));
    }

    #[test]
    fn test_default_config() {
        let config = IndexerConfig::default();
        assert_eq!(config.resolutions.len(), 4);
        assert_eq!(config.protocol_stats_id, "protocol");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"resolutions": ["1m", "1h"], "volume_basis": "quote_side"}}"#).unwrap();

        let config = IndexerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(
            config.resolutions,
            vec![Resolution::OneMinute, Resolution::OneHour]
        );
        assert_eq!(config.volume_basis, VolumeBasis::QuoteSide);
        assert_eq!(config.protocol_stats_id, "protocol");
    }

    #[test]
    fn test_config_rejects_empty_resolutions() {
        let config = IndexerConfig {
            resolutions: Vec::new(),
            ..IndexerConfig::default()
        };
        assert!(matches!(config.validate(), Err(IndexerError::Config(_))));
    }

    #[test]
    fn test_volume_basis_from_str() {
        assert_eq!("quote".parse::<VolumeBasis>().unwrap(), VolumeBasis::QuoteSide);
        assert!("both".parse::<VolumeBasis>().is_err());
    }
}
