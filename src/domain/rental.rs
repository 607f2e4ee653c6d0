use super::product::RawProduct;
use crate::error::ProductValidationError;
use rust_decimal::Decimal;
use serde::Serialize;

/// Rental figures for one product over one rental period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBreakdown {
    pub period: u32,
    pub discount_rate_percent: Decimal,
    pub fee_rate_percent: Decimal,
    /// Cash price times the discount multiplier, unrounded.
    pub total_rental_fee: Decimal,
    pub monthly_rental_fee: Decimal,
    /// Customer-facing monthly fee, a multiple of 1000.
    pub final_monthly_rental_fee: Decimal,
    /// Billing total re-derived from the final monthly fee.
    pub final_total_rental_fee: Decimal,
    pub rental_company_profit: Decimal,
    /// Amount passed through to the supplier.
    pub supply_value: Decimal,
}

/// A product with its full rental matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedProduct {
    #[serde(flatten)]
    pub product: RawProduct,
    pub supply_price: Decimal,
    /// Supply price rounded to the nearest 10. Informational only.
    pub adjusted_price: Decimal,
    /// One entry per configured period, in configuration order.
    pub breakdowns: Vec<PeriodBreakdown>,
    /// Copy of the breakdown for the selected period.
    pub selected: PeriodBreakdown,
}

impl ComputedProduct {
    pub fn breakdown(&self, period: u32) -> Option<&PeriodBreakdown> {
        self.breakdowns.iter().find(|b| b.period == period)
    }

    pub fn selected_period(&self) -> u32 {
        self.selected.period
    }

    /// Projection without fee, profit and supply value fields.
    pub fn summary(&self) -> RentalSummary {
        RentalSummary {
            product_name: self.product.product_name.clone(),
            model_name: self.product.model_name.clone(),
            price: self.product.price,
            supply_price: self.supply_price,
            adjusted_price: self.adjusted_price,
            periods: self
                .breakdowns
                .iter()
                .map(|b| PeriodSummary {
                    period: b.period,
                    discount_rate_percent: b.discount_rate_percent,
                    total_rental_fee: b.total_rental_fee,
                    monthly_rental_fee: b.monthly_rental_fee,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalSummary {
    pub product_name: String,
    pub model_name: String,
    pub price: Decimal,
    pub supply_price: Decimal,
    pub adjusted_price: Decimal,
    pub periods: Vec<PeriodSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: u32,
    pub discount_rate_percent: Decimal,
    pub total_rental_fee: Decimal,
    pub monthly_rental_fee: Decimal,
}

/// A product the engine refused to compute.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedProduct {
    /// Position in the input slice.
    pub index: usize,
    pub product_name: String,
    pub model_name: String,
    pub reason: ProductValidationError,
}

/// Output of one full computation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calculation {
    pub products: Vec<ComputedProduct>,
    pub skipped: Vec<SkippedProduct>,
}

impl Calculation {
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
