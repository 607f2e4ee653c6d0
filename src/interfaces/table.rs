//! Format-independent half of ingestion.
//!
//! CSV and workbook readers both produce a [`Table`]: a header row plus data
//! [`Row`]s of [`Cell`]s, each tagged with the sheet row it came from. Column lookup and row coercion happen here so every
//! source format behaves the same way.

use crate::domain::ports::{IngestedProducts, RowIssue};
use crate::domain::product::{RawProduct, parse_decimal_text};
use crate::error::{IngestionError, RowRejection};
use rust_decimal::Decimal;
use tracing::{info, warn};

/// One spreadsheet cell as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// A numeric cell. `None` marks a value that has no decimal form (NaN, infinity).
    Number(Option<Decimal>),
}

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    fn text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(Some(value)) => Some(value.normalize().to_string()),
            Cell::Number(None) => None,
        }
    }
}

/// A data row and its 1-based position in the source (the header is row 1
/// when it sits at the top).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub number: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Logical input fields and the header fragments that identify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ProductName,
    ModelName,
    Price,
}

impl Field {
    /// Resolution order: the most specific aliases go first so that a
    /// generic one (`name`) cannot grab a column another field needs.
    const RESOLUTION_ORDER: [Field; 3] = [Field::ModelName, Field::Price, Field::ProductName];

    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::ProductName => &["제품", "품명", "product", "name"],
            Field::ModelName => &["모델", "model"],
            Field::Price => &["단가", "가격", "price", "일시불"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::ProductName => "product name",
            Field::ModelName => "model name",
            Field::Price => "price",
        }
    }
}

/// Header positions of the three required fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub product_name: usize,
    pub model_name: usize,
    pub price: usize,
}

impl ColumnMap {
    /// Locates each field by case- and whitespace-insensitive substring match
    /// against its alias list. A column is claimed by at most one field.
    pub fn resolve(headers: &[String]) -> Result<Self, IngestionError> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut claimed: Vec<usize> = Vec::with_capacity(3);
        let mut found = [0usize; 3];

        for field in Field::RESOLUTION_ORDER {
            let position = field
                .aliases()
                .iter()
                .find_map(|alias| {
                    normalized
                        .iter()
                        .enumerate()
                        .find(|(i, h)| !claimed.contains(i) && h.contains(alias))
                        .map(|(i, _)| i)
                })
                .ok_or_else(|| IngestionError::MissingColumn {
                    field: field.label(),
                    headers: headers.join(", "),
                })?;
            claimed.push(position);
            found[field as usize] = position;
        }

        Ok(Self {
            product_name: found[Field::ProductName as usize],
            model_name: found[Field::ModelName as usize],
            price: found[Field::Price as usize],
        })
    }
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl Table {
    /// Converts the table into products, skipping unusable rows.
    ///
    /// Fails when a required column is missing or when no row survives.
    pub fn into_products(self) -> Result<IngestedProducts, IngestionError> {
        let columns = ColumnMap::resolve(&self.headers)?;
        let mut ingested = IngestedProducts::default();

        for row in &self.rows {
            if row.cells.iter().all(Cell::is_blank) {
                continue;
            }
            let row_number = row.number;
            match coerce_row(&row.cells, &columns) {
                Ok(product) => ingested.products.push(product),
                Err(reason) => {
                    warn!(row = row_number, %reason, "skipping input row");
                    ingested.skipped.push(RowIssue {
                        row: row_number,
                        reason,
                    });
                }
            }
        }

        if ingested.products.is_empty() {
            return Err(IngestionError::EmptyDataset {
                skipped: ingested.skipped.len(),
            });
        }

        info!(
            products = ingested.products.len(),
            skipped = ingested.skipped.len(),
            "ingestion finished"
        );
        Ok(ingested)
    }
}

fn coerce_row(row: &[Cell], columns: &ColumnMap) -> Result<RawProduct, RowRejection> {
    let cell = |i: usize| row.get(i).and_then(Cell::text);

    let product_name = cell(columns.product_name).ok_or(RowRejection::MissingProductName)?;
    let model_name = cell(columns.model_name).unwrap_or_default();

    let price = match row.get(columns.price) {
        None | Some(Cell::Empty) => return Err(RowRejection::MissingPrice),
        Some(Cell::Number(Some(value))) => *value,
        Some(Cell::Number(None)) => return Err(RowRejection::InvalidPrice("NaN".to_string())),
        Some(Cell::Text(text)) if text.trim().is_empty() => {
            return Err(RowRejection::MissingPrice);
        }
        Some(Cell::Text(text)) => parse_decimal_text(text)
            .ok_or_else(|| RowRejection::InvalidPrice(text.trim().to_string()))?,
    };
    if price <= Decimal::ZERO {
        return Err(RowRejection::NonPositivePrice(price));
    }

    Ok(RawProduct {
        product_name,
        model_name,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    /// Numbers rows consecutively from 2, as if nothing preceded the header.
    fn rows(cells: Vec<Vec<Cell>>) -> Vec<Row> {
        cells
            .into_iter()
            .enumerate()
            .map(|(i, cells)| Row {
                number: i + 2,
                cells,
            })
            .collect()
    }

    #[test]
    fn test_resolve_korean_headers() {
        let map = ColumnMap::resolve(&headers(&["제품명", "모델명", "일시불단가"])).unwrap();
        assert_eq!(
            map,
            ColumnMap {
                product_name: 0,
                model_name: 1,
                price: 2
            }
        );
    }

    #[test]
    fn test_resolve_ignores_case_and_whitespace() {
        let map =
            ColumnMap::resolve(&headers(&["  Unit PRICE ", "\u{feff}Product Name", "MODEL"]))
                .unwrap();
        assert_eq!(map.price, 0);
        assert_eq!(map.product_name, 1);
        assert_eq!(map.model_name, 2);
    }

    #[test]
    fn test_model_name_does_not_shadow_product_name() {
        let map = ColumnMap::resolve(&headers(&["Model Name", "Name", "Price"])).unwrap();
        assert_eq!(map.model_name, 0);
        assert_eq!(map.product_name, 1);
    }

    #[test]
    fn test_resolve_lump_sum_price_header() {
        let map = ColumnMap::resolve(&headers(&["품명", "모델", "일시불"])).unwrap();
        assert_eq!(map.price, 2);
    }

    #[test]
    fn test_skipped_rows_keep_source_numbers() {
        let table = Table {
            headers: headers(&["product", "model", "price"]),
            rows: vec![
                Row {
                    number: 3,
                    cells: vec![text("A"), text("a"), text("10")],
                },
                Row {
                    number: 5,
                    cells: vec![text("B"), text("b"), text("oops")],
                },
            ],
        };
        let ingested = table.into_products().unwrap();
        assert_eq!(ingested.skipped[0].row, 5);
    }

    #[test]
    fn test_missing_column() {
        let err = ColumnMap::resolve(&headers(&["제품명", "모델명", "수량"])).unwrap_err();
        match err {
            IngestionError::MissingColumn { field, headers } => {
                assert_eq!(field, "price");
                assert!(headers.contains("수량"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_products_skips_and_reports_rows() {
        let table = Table {
            headers: headers(&["제품명", "모델명", "가격"]),
            rows: rows(vec![
                vec![text("에어컨"), text("AC-2000"), text("1,200,000")],
                vec![text(""), text("X"), text("1000")],
                vec![text("TV"), text("T-1"), text("call us")],
                vec![Cell::Empty, Cell::Empty, Cell::Empty],
                vec![text("냉장고"), text("REF-500"), Cell::Number(Some(dec!(1500000)))],
                vec![text("히터"), text("H-1"), text("0")],
                vec![text("선풍기"), text("F-1")],
            ]),
        };

        let ingested = table.into_products().unwrap();
        assert_eq!(ingested.products.len(), 2);
        assert_eq!(ingested.products[0].price, dec!(1200000));
        assert_eq!(ingested.products[1].model_name, "REF-500");

        let issues: Vec<(usize, RowRejection)> = ingested
            .skipped
            .into_iter()
            .map(|i| (i.row, i.reason))
            .collect();
        assert_eq!(
            issues,
            vec![
                (3, RowRejection::MissingProductName),
                (4, RowRejection::InvalidPrice("call us".to_string())),
                (7, RowRejection::NonPositivePrice(dec!(0))),
                (8, RowRejection::MissingPrice),
            ]
        );
    }

    #[test]
    fn test_nan_cell_is_rejected() {
        let table = Table {
            headers: headers(&["product", "model", "price"]),
            rows: rows(vec![
                vec![text("A"), text("a"), Cell::Number(None)],
                vec![text("B"), text("b"), text("10")],
            ]),
        };
        let ingested = table.into_products().unwrap();
        assert_eq!(ingested.products.len(), 1);
        assert!(matches!(
            ingested.skipped[0].reason,
            RowRejection::InvalidPrice(_)
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let table = Table {
            headers: headers(&["product", "model", "price"]),
            rows: vec![],
        };
        assert!(matches!(
            table.into_products(),
            Err(IngestionError::EmptyDataset { skipped: 0 })
        ));

        let table = Table {
            headers: headers(&["product", "model", "price"]),
            rows: rows(vec![vec![text("A"), text("a"), text("-1")]]),
        };
        assert!(matches!(
            table.into_products(),
            Err(IngestionError::EmptyDataset { skipped: 1 })
        ));
    }

    #[test]
    fn test_numeric_model_name_is_kept_as_text() {
        let table = Table {
            headers: headers(&["product", "model", "price"]),
            rows: rows(vec![vec![
                text("A"),
                Cell::Number(Some(dec!(2000))),
                text("10"),
            ]]),
        };
        let ingested = table.into_products().unwrap();
        assert_eq!(ingested.products[0].model_name, "2000");
    }
}
