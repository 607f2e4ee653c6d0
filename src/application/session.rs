use crate::application::engine::RentalEngine;
use crate::domain::product::{RawProduct, parse_decimal_text};
use crate::domain::rates::RateConfig;
use crate::domain::rental::Calculation;
use crate::error::{RentalError, Result};
use rust_decimal::Decimal;
use tracing::info;

/// A single, whole-field change to the rate configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEdit {
    SupplyRate(Decimal),
    DiscountRate { period: u32, percent: Decimal },
    FeeRate { period: u32, percent: Decimal },
    SelectedPeriod(u32),
}

impl ConfigEdit {
    /// Parses a typed percentage such as `"106"` or `"21.5"`.
    pub fn parse_percent(text: &str) -> Result<Decimal> {
        parse_decimal_text(text)
            .ok_or_else(|| RentalError::Validation(format!("{text:?} is not a number")))
    }
}

/// The products and rates currently being worked on.
///
/// Edits are validated before they are accepted, and a rejected edit leaves
/// the session unchanged. Nothing is recomputed implicitly: callers ask for
/// [`PricingSession::recompute`] whenever the products or rates change.
#[derive(Debug, Clone, Default)]
pub struct PricingSession {
    products: Vec<RawProduct>,
    config: RateConfig,
}

impl PricingSession {
    pub fn new(config: RateConfig) -> Self {
        Self {
            products: Vec::new(),
            config,
        }
    }

    pub fn with_products(products: Vec<RawProduct>, config: RateConfig) -> Self {
        Self { products, config }
    }

    pub fn products(&self) -> &[RawProduct] {
        &self.products
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    /// Replaces the whole product list, e.g. after a new upload.
    pub fn replace_products(&mut self, products: Vec<RawProduct>) {
        info!(count = products.len(), "product list replaced");
        self.products = products;
    }

    /// Manual entry of one product. All three fields are required.
    pub fn add_product(&mut self, product_name: &str, model_name: &str, price: &str) -> Result<()> {
        if product_name.trim().is_empty() || model_name.trim().is_empty() || price.trim().is_empty()
        {
            return Err(RentalError::Validation(
                "product name, model name and price are all required".to_string(),
            ));
        }
        let price = parse_decimal_text(price)
            .ok_or_else(|| RentalError::Validation(format!("price {price:?} is not a number")))?;
        let product = RawProduct::new(product_name, model_name, price)?;
        self.products.push(product);
        Ok(())
    }

    pub fn apply(&mut self, edit: ConfigEdit) -> Result<()> {
        match edit {
            ConfigEdit::SupplyRate(percent) => {
                if percent <= Decimal::ZERO {
                    return Err(RentalError::Validation(format!(
                        "supply rate must be positive, got {percent}"
                    )));
                }
                self.config.supply_rate_percent = percent;
            }
            ConfigEdit::DiscountRate { period, percent } => {
                self.ensure_period(period)?;
                if percent <= Decimal::ZERO {
                    return Err(RentalError::Validation(format!(
                        "discount rate must be positive, got {percent}"
                    )));
                }
                self.config.discount_rate_percent.insert(period, percent);
            }
            ConfigEdit::FeeRate { period, percent } => {
                self.ensure_period(period)?;
                if percent < Decimal::ZERO {
                    return Err(RentalError::Validation(format!(
                        "fee rate must not be negative, got {percent}"
                    )));
                }
                self.config.fee_rate_percent.insert(period, percent);
            }
            ConfigEdit::SelectedPeriod(period) => {
                self.ensure_period(period)?;
                self.config.selected_period = period;
            }
        }
        Ok(())
    }

    /// Runs a full calculation over the current products and rates.
    pub fn recompute(&self) -> Result<Calculation> {
        Ok(RentalEngine::compute_all(&self.products, &self.config)?)
    }

    fn ensure_period(&self, period: u32) -> Result<()> {
        if self.config.has_period(period) {
            Ok(())
        } else {
            Err(RentalError::Validation(format!(
                "{period}-month period is not configured (periods: {:?})",
                self.config.periods
            )))
        }
    }
}
