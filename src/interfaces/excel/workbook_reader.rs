//! Workbook ingestion (xlsx, xlsm, xls, ods).

use crate::domain::ports::IngestedProducts;
use crate::error::{IngestionError, Result};
use crate::interfaces::table::{Cell, Row, Table};
use calamine::{DataType, Reader, open_workbook_auto_from_rs};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::io::Cursor;

/// Reads the first worksheet of an in-memory workbook. Its first row is the
/// header row.
pub struct WorkbookReader {
    data: Vec<u8>,
}

impl WorkbookReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn table(self) -> Result<Table> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(self.data))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| IngestionError::Unreadable("workbook has no worksheets".to_string()))??;

        // the used range need not start at A1
        let header_number = range.start().map_or(1, |(row, _)| row as usize + 1);
        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
            None => return Err(IngestionError::EmptyDataset { skipped: 0 }.into()),
        };
        let rows = rows
            .enumerate()
            .map(|(i, row)| Row {
                number: header_number + 1 + i,
                cells: row.iter().map(to_cell).collect(),
            })
            .collect();

        Ok(Table { headers, rows })
    }

    pub fn products(self) -> Result<IngestedProducts> {
        Ok(self.table()?.into_products()?)
    }
}

fn to_cell(value: &DataType) -> Cell {
    match value {
        DataType::Empty => Cell::Empty,
        DataType::Int(i) => Cell::Number(Some(Decimal::from(*i))),
        DataType::Float(f) => Cell::Number(Decimal::from_f64(*f)),
        DataType::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}
