use crate::error::{ConfigurationError, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Rate parameters for one calculation.
///
/// Percentages are stored as entered (`75` means 75 %). The per-period maps
/// must cover exactly the periods listed in `periods`; see [`RateConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Share of the cash price used as the supply price.
    pub supply_rate_percent: Decimal,
    /// Rental lengths in months, in display order.
    pub periods: Vec<u32>,
    /// Total-rental multiplier per period.
    pub discount_rate_percent: BTreeMap<u32, Decimal>,
    /// Rental-company fee per period, taken from the final total rental fee.
    pub fee_rate_percent: BTreeMap<u32, Decimal>,
    /// Period shown in the selected-period view and used for export.
    pub selected_period: u32,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            supply_rate_percent: dec!(75),
            periods: vec![12, 24, 36, 48],
            discount_rate_percent: BTreeMap::from([
                (12, dec!(100)),
                (24, dec!(106)),
                (36, dec!(111)),
                (48, dec!(116)),
            ]),
            fee_rate_percent: BTreeMap::from([
                (12, dec!(21)),
                (24, dec!(26)),
                (36, dec!(28)),
                (48, dec!(31)),
            ]),
            selected_period: 12,
        }
    }
}

impl RateConfig {
    /// Loads a configuration from a JSON file. The result is not validated;
    /// validation happens when it is used.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Checks every structural and range invariant of the configuration.
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        if self.periods.is_empty() {
            return Err(ConfigurationError::NoPeriods);
        }
        if self.supply_rate_percent <= Decimal::ZERO {
            return Err(ConfigurationError::NonPositiveSupplyRate(
                self.supply_rate_percent,
            ));
        }

        let mut seen = HashSet::with_capacity(self.periods.len());
        for &period in &self.periods {
            if period == 0 {
                return Err(ConfigurationError::ZeroPeriod);
            }
            if !seen.insert(period) {
                return Err(ConfigurationError::DuplicatePeriod(period));
            }

            let discount = self
                .discount_rate_percent
                .get(&period)
                .ok_or(ConfigurationError::MissingDiscountRate(period))?;
            if *discount <= Decimal::ZERO {
                return Err(ConfigurationError::NonPositiveDiscountRate {
                    period,
                    value: *discount,
                });
            }

            let fee = self
                .fee_rate_percent
                .get(&period)
                .ok_or(ConfigurationError::MissingFeeRate(period))?;
            if *fee < Decimal::ZERO {
                return Err(ConfigurationError::NegativeFeeRate {
                    period,
                    value: *fee,
                });
            }
        }

        if let Some(&extra) = self.discount_rate_percent.keys().find(|p| !seen.contains(*p)) {
            return Err(ConfigurationError::UnexpectedDiscountRate(extra));
        }
        if let Some(&extra) = self.fee_rate_percent.keys().find(|p| !seen.contains(*p)) {
            return Err(ConfigurationError::UnexpectedFeeRate(extra));
        }
        if !seen.contains(&self.selected_period) {
            return Err(ConfigurationError::UnknownSelectedPeriod(
                self.selected_period,
            ));
        }

        Ok(())
    }

    pub fn has_period(&self, period: u32) -> bool {
        self.periods.contains(&period)
    }

    /// Discount and fee percentages for a period, if it is configured.
    pub fn rates_for(&self, period: u32) -> Option<(Decimal, Decimal)> {
        let discount = self.discount_rate_percent.get(&period)?;
        let fee = self.fee_rate_percent.get(&period)?;
        Some((*discount, *fee))
    }
}
