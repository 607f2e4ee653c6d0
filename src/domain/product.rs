use crate::error::ProductValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as delivered by ingestion: identity plus its one-time ("cash") price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    pub product_name: String,
    pub model_name: String,
    pub price: Decimal,
}

impl RawProduct {
    /// Builds a product, trimming names and rejecting an empty name or a
    /// non-positive price.
    pub fn new(
        product_name: impl Into<String>,
        model_name: impl Into<String>,
        price: Decimal,
    ) -> Result<Self, ProductValidationError> {
        let product = Self {
            product_name: product_name.into().trim().to_string(),
            model_name: model_name.into().trim().to_string(),
            price,
        };
        product.validate()?;
        Ok(product)
    }

    pub fn validate(&self) -> Result<(), ProductValidationError> {
        if self.product_name.trim().is_empty() {
            return Err(ProductValidationError::EmptyProductName);
        }
        if self.price <= Decimal::ZERO {
            return Err(ProductValidationError::NonPositivePrice(self.price));
        }
        Ok(())
    }
}

/// Parses typed or spreadsheet number text: whitespace and thousands
/// separators are dropped, plain and scientific notation are accepted.
pub fn parse_decimal_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
