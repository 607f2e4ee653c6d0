use crate::domain::ports::IngestedProducts;
use crate::error::Result;
use crate::interfaces::table::{Cell, Row, Table};
use std::io::Read;

/// Reads products from delimited text.
///
/// The first record is the header row. Columns are located by name (see
/// [`crate::interfaces::table::ColumnMap`]), so column order and extra
/// columns do not matter.
pub struct ProductReader<R: Read> {
    source: R,
    delimiter: u8,
}

impl<R: Read> ProductReader<R> {
    /// Creates a comma-separated reader over any `Read` source.
    pub fn new(source: R) -> Self {
        Self::with_delimiter(source, b',')
    }

    pub fn with_delimiter(source: R, delimiter: u8) -> Self {
        Self { source, delimiter }
    }

    /// Reads the whole source into a header + rows table.
    pub fn table(mut self) -> Result<Table> {
        let mut data = Vec::new();
        self.source.read_to_end(&mut data)?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data.as_slice());
        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let number = record
                .position()
                .map_or(rows.len() + 2, |position| record_line(&data, position));
            let cells = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect();
            rows.push(Row { number, cells });
        }
        Ok(Table { headers, rows })
    }

    pub fn products(self) -> Result<IngestedProducts> {
        Ok(self.table()?.into_products()?)
    }
}

/// The line a record starts on. `csv` stamps a record with the position where
/// it started scanning, which is before any blank lines it skipped.
fn record_line(data: &[u8], position: &csv::Position) -> usize {
    let start = usize::try_from(position.byte()).unwrap_or(data.len());
    let blank_lines = data
        .get(start..)
        .unwrap_or_default()
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .filter(|&&b| b == b'\n')
        .count();
    position.line() as usize + blank_lines
}
