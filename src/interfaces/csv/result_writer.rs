use crate::application::engine::round_half_away;
use crate::domain::rental::ComputedProduct;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// One exported line: the selected-period view of a product.
#[derive(Debug, Serialize)]
struct SelectedPeriodRow<'a> {
    product_name: &'a str,
    model_name: &'a str,
    period_months: u32,
    final_monthly_rental_fee: Decimal,
    final_total_rental_fee: Decimal,
    supply_value: Decimal,
}

impl<'a> From<&'a ComputedProduct> for SelectedPeriodRow<'a> {
    fn from(computed: &'a ComputedProduct) -> Self {
        let selected = &computed.selected;
        Self {
            product_name: &computed.product.product_name,
            model_name: &computed.product.model_name,
            period_months: selected.period,
            final_monthly_rental_fee: selected.final_monthly_rental_fee.normalize(),
            final_total_rental_fee: selected.final_total_rental_fee.normalize(),
            supply_value: round_half_away(selected.supply_value).normalize(),
        }
    }
}

/// Writes calculation results for export.
pub struct ResultWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Writes the selected-period view as CSV, one row per product.
    pub fn write_selected_csv(self, products: &[ComputedProduct]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(self.sink);
        if products.is_empty() {
            writer.write_record([
                "product_name",
                "model_name",
                "period_months",
                "final_monthly_rental_fee",
                "final_total_rental_fee",
                "supply_value",
            ])?;
        }
        for product in products {
            writer.serialize(SelectedPeriodRow::from(product))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes every product with its full period matrix as pretty JSON.
    pub fn write_json(mut self, products: &[ComputedProduct]) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.sink, products)?;
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::engine::RentalEngine;
    use crate::domain::product::RawProduct;
    use crate::domain::rates::RateConfig;
    use rust_decimal_macros::dec;

    fn computed(config: &RateConfig) -> Vec<ComputedProduct> {
        let products = vec![
            RawProduct::new("에어컨", "AC-2000", dec!(1200000)).unwrap(),
            RawProduct::new("냉장고", "REF-500", dec!(1500000)).unwrap(),
        ];
        RentalEngine::compute_all(&products, config).unwrap().products
    }

    #[test]
    fn test_selected_csv() {
        let mut out = Vec::new();
        ResultWriter::new(&mut out)
            .write_selected_csv(&computed(&RateConfig::default()))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "product_name,model_name,period_months,final_monthly_rental_fee,final_total_rental_fee,supply_value"
        );
        assert_eq!(lines[1], "에어컨,AC-2000,12,100000,1200000,948000");
        // monthly 125,000; profit is 21% of 1,500,000
        assert_eq!(lines[2], "냉장고,REF-500,12,125000,1500000,1185000");
    }

    #[test]
    fn test_selected_csv_follows_selected_period() {
        let mut config = RateConfig::default();
        config.selected_period = 24;
        let mut out = Vec::new();
        ResultWriter::new(&mut out)
            .write_selected_csv(&computed(&config))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("냉장고,REF-500,24,66000,1584000,1172160"));
    }

    #[test]
    fn test_supply_value_rounded_on_export() {
        let mut config = RateConfig::default();
        config.fee_rate_percent.insert(12, dec!(21.00005));
        let mut out = Vec::new();
        ResultWriter::new(&mut out)
            .write_selected_csv(&computed(&config))
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        // profit 252,000.6 leaves a supply value of 947,999.4
        assert!(text.contains("에어컨,AC-2000,12,100000,1200000,947999"));
    }

    #[test]
    fn test_empty_csv_still_has_header() {
        let mut out = Vec::new();
        ResultWriter::new(&mut out).write_selected_csv(&[]).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("product_name,"));
    }

    #[test]
    fn test_json_contains_full_matrix() {
        let mut out = Vec::new();
        ResultWriter::new(&mut out)
            .write_json(&computed(&RateConfig::default()))
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let first = &value[0];
        assert_eq!(first["product_name"], "에어컨");
        assert_eq!(first["breakdowns"].as_array().unwrap().len(), 4);
        assert_eq!(first["selected"]["period"], 12);
    }
}
