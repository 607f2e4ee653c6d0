use crate::domain::product::RawProduct;
use crate::domain::rates::RateConfig;
use crate::domain::rental::{Calculation, ComputedProduct, PeriodBreakdown, SkippedProduct};
use crate::error::{ConfigurationError, ProductValidationError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

const HUNDRED: Decimal = dec!(100);
const ADJUSTED_PRICE_STEP: Decimal = dec!(10);
const MONTHLY_FEE_STEP: Decimal = dec!(1000);

/// The rental-fee calculation engine.
///
/// `RentalEngine` holds no state: every call takes the product list and the
/// rate configuration explicitly and returns a fresh result, so it can be
/// shared freely between threads.
pub struct RentalEngine;

impl RentalEngine {
    /// Computes the rental matrix for every product.
    ///
    /// The configuration is validated once up front and a broken one aborts
    /// the call before any product is looked at. Products that fail validation
    /// or whose figures do not fit in a `Decimal` are left out and reported in
    /// [`Calculation::skipped`]; the rest keep their input order.
    pub fn compute_all(
        products: &[RawProduct],
        config: &RateConfig,
    ) -> std::result::Result<Calculation, ConfigurationError> {
        config.validate()?;
        let schedule = RateSchedule::from_config(config)?;

        let mut calculation = Calculation::default();
        for (index, product) in products.iter().enumerate() {
            let computed = product.validate().and_then(|()| {
                Self::compute_checked(product, config.supply_rate_percent, &schedule)
            });
            match computed {
                Ok(computed) => calculation.products.push(computed),
                Err(reason) => {
                    warn!(
                        index,
                        product = %product.product_name,
                        model = %product.model_name,
                        %reason,
                        "skipping product"
                    );
                    calculation.skipped.push(SkippedProduct {
                        index,
                        product_name: product.product_name.clone(),
                        model_name: product.model_name.clone(),
                        reason,
                    });
                }
            }
        }

        debug!(
            computed = calculation.products.len(),
            skipped = calculation.skipped.len(),
            "rental calculation finished"
        );
        Ok(calculation)
    }

    /// Computes a single product.
    pub fn compute(product: &RawProduct, config: &RateConfig) -> Result<ComputedProduct> {
        config.validate()?;
        product.validate()?;
        let schedule = RateSchedule::from_config(config)?;
        Ok(Self::compute_checked(
            product,
            config.supply_rate_percent,
            &schedule,
        )?)
    }

    fn compute_checked(
        product: &RawProduct,
        supply_rate_percent: Decimal,
        schedule: &RateSchedule,
    ) -> std::result::Result<ComputedProduct, ProductValidationError> {
        let price = product.price;
        let out_of_range = || ProductValidationError::OutOfRange(price);

        let supply_price = price
            .checked_mul(supply_rate_percent / HUNDRED)
            .ok_or_else(out_of_range)?;
        let adjusted_price =
            round_to_step(supply_price, ADJUSTED_PRICE_STEP).ok_or_else(out_of_range)?;

        let breakdowns = schedule
            .periods
            .iter()
            .map(|rates| period_breakdown(price, rates))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(out_of_range)?;
        let selected = breakdowns[schedule.selected].clone();

        debug!(
            product = %product.product_name,
            model = %product.model_name,
            %price,
            "computed rental matrix"
        );

        Ok(ComputedProduct {
            product: product.clone(),
            supply_price,
            adjusted_price,
            breakdowns,
            selected,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct PeriodRates {
    period: u32,
    discount_rate_percent: Decimal,
    fee_rate_percent: Decimal,
}

/// Per-period rates in configured order, looked up once per run.
#[derive(Debug)]
struct RateSchedule {
    periods: Vec<PeriodRates>,
    /// Index of the selected period in `periods`.
    selected: usize,
}

impl RateSchedule {
    fn from_config(config: &RateConfig) -> std::result::Result<Self, ConfigurationError> {
        let periods = config
            .periods
            .iter()
            .map(|&period| {
                let discount_rate_percent = *config
                    .discount_rate_percent
                    .get(&period)
                    .ok_or(ConfigurationError::MissingDiscountRate(period))?;
                let fee_rate_percent = *config
                    .fee_rate_percent
                    .get(&period)
                    .ok_or(ConfigurationError::MissingFeeRate(period))?;
                Ok(PeriodRates {
                    period,
                    discount_rate_percent,
                    fee_rate_percent,
                })
            })
            .collect::<std::result::Result<Vec<_>, ConfigurationError>>()?;
        let selected = periods
            .iter()
            .position(|rates| rates.period == config.selected_period)
            .ok_or(ConfigurationError::UnknownSelectedPeriod(
                config.selected_period,
            ))?;
        Ok(Self { periods, selected })
    }
}

/// The per-period formula chain. Each rounding step feeds the next one, so
/// the order of operations here is fixed. `None` means a figure overflowed.
fn period_breakdown(price: Decimal, rates: &PeriodRates) -> Option<PeriodBreakdown> {
    let months = Decimal::from(rates.period);
    let discount_rate = rates.discount_rate_percent / HUNDRED;
    let fee_rate = rates.fee_rate_percent / HUNDRED;

    let total_rental_fee = price.checked_mul(discount_rate)?;
    let monthly_rental_fee = round_half_away(total_rental_fee.checked_div(months)?);
    let final_monthly_rental_fee = round_to_step(monthly_rental_fee, MONTHLY_FEE_STEP)?;
    let final_total_rental_fee = final_monthly_rental_fee.checked_mul(months)?;
    let rental_company_profit = final_total_rental_fee.checked_mul(fee_rate)?;
    let supply_value = final_total_rental_fee.checked_sub(rental_company_profit)?;

    Some(PeriodBreakdown {
        period: rates.period,
        discount_rate_percent: rates.discount_rate_percent,
        fee_rate_percent: rates.fee_rate_percent,
        total_rental_fee,
        monthly_rental_fee,
        final_monthly_rental_fee,
        final_total_rental_fee,
        rental_company_profit,
        supply_value,
    })
}

/// Rounds to a whole number, .5 going away from zero.
pub fn round_half_away(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

fn round_to_step(value: Decimal, step: Decimal) -> Option<Decimal> {
    round_half_away(value / step).checked_mul(step)
}
