//! Simulation settings and their JSON config file.

use crate::account::{AccountKind, FeeSchedule};
use crate::prices::PriceProvider;
use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Basis points in one whole.
const BPS_PER_UNIT: u32 = 10_000;

/// Settings for one simulation run.
///
/// Every field has a default, so a config file only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Starting cash, as a decimal string
    #[serde(with = "rust_decimal::serde::str")]
    pub initial_deposit: Decimal,
    /// Personal account fee in basis points
    pub personal_fee_bps: u32,
    /// Tax-free savings account fee in basis points
    pub tax_free_savings_fee_bps: u32,
    /// Number of trading days; `None` runs to the end of the price data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Pause between console lines, in milliseconds
    pub pause_ms: u64,
    /// Directory of `<TICKER>.csv` files; `None` uses the embedded tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_deposit: Decimal::new(4000, 0),
            personal_fee_bps: 500,
            tax_free_savings_fee_bps: 100,
            days: None,
            pause_ms: 0,
            data_dir: None,
        }
    }
}

impl SimulationConfig {
    /// Get the default config file path.
    ///
    /// Default path: `<platform config dir>/stock-trader/config.json`
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("", "", "stock-trader")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// Load config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load config from a specific path, falling back to defaults if it does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.initial_deposit < Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "initial_deposit {} cannot be negative",
                self.initial_deposit
            )));
        }
        for (name, bps) in [
            ("personal_fee_bps", self.personal_fee_bps),
            ("tax_free_savings_fee_bps", self.tax_free_savings_fee_bps),
        ] {
            if bps >= BPS_PER_UNIT {
                return Err(Error::InvalidData(format!(
                    "{} must be below {}, got {}",
                    name, BPS_PER_UNIT, bps
                )));
            }
        }
        if self.days == Some(0) {
            return Err(Error::InvalidData("days must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Fee rates as fractions.
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            personal: bps_to_rate(self.personal_fee_bps),
            tax_free_savings: bps_to_rate(self.tax_free_savings_fee_bps),
        }
    }

    pub fn fee_rate(&self, kind: AccountKind) -> Decimal {
        self.fee_schedule().rate(kind)
    }

    /// Load the price tables this config points at.
    pub fn price_provider(&self) -> Result<PriceProvider> {
        match &self.data_dir {
            Some(dir) => PriceProvider::from_dir(dir),
            None => PriceProvider::embedded(),
        }
    }

    /// Number of days to simulate against `provider`.
    pub fn horizon(&self, provider: &PriceProvider) -> u32 {
        self.days.unwrap_or_else(|| provider.last_common_day())
    }
}

fn bps_to_rate(bps: u32) -> Decimal {
    Decimal::new(i64::from(bps), 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.initial_deposit, dec!(4000));
        assert_eq!(config.fee_rate(AccountKind::Personal), dec!(0.05));
        assert_eq!(config.fee_rate(AccountKind::TaxFreeSavings), dec!(0.01));
        assert_eq!(config.fee_schedule(), FeeSchedule::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = SimulationConfig::load_from_path(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "initial_deposit": "2500.50", "days": 30 }"#).unwrap();

        let config = SimulationConfig::load_from_path(&path).unwrap();
        assert_eq!(config.initial_deposit, dec!(2500.50));
        assert_eq!(config.days, Some(30));
        assert_eq!(config.personal_fee_bps, 500);
        assert_eq!(config.pause_ms, 0);
    }

    #[test]
    fn test_invalid_fee_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "personal_fee_bps": 10000 }"#).unwrap();

        let result = SimulationConfig::load_from_path(&path);
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_zero_days_rejected() {
        let config = SimulationConfig {
            days: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_negative_deposit_rejected() {
        let config = SimulationConfig {
            initial_deposit: dec!(-1),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let result = SimulationConfig::load_from_path(&path);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_horizon() {
        let provider = PriceProvider::embedded().unwrap();

        let config = SimulationConfig::default();
        assert_eq!(config.horizon(&provider), provider.last_common_day());

        let config = SimulationConfig {
            days: Some(10),
            ..Default::default()
        };
        assert_eq!(config.horizon(&provider), 10);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = SimulationConfig {
            tax_free_savings_fee_bps: 25,
            ..Default::default()
        };
        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"initial_deposit\": \"4000\""));

        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fee_rate(AccountKind::TaxFreeSavings), dec!(0.0025));
    }
}
