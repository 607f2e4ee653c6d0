#![allow(dead_code)]

use std::io::Error;
use tempfile::NamedTempFile;

/// Writes rows (header first) to a temporary `.csv` file.
pub fn csv_file(rows: &[&[&str]]) -> Result<NamedTempFile, Error> {
    let file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    let mut wtr = csv::WriterBuilder::new().from_path(file.path())?;
    for row in rows {
        wtr.write_record(*row)?;
    }
    wtr.flush()?;
    Ok(file)
}

/// Generates a product file with `rows` products priced 10,000 apart.
pub fn generate_products_csv(rows: usize) -> Result<NamedTempFile, Error> {
    let file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    let mut wtr = csv::WriterBuilder::new().from_path(file.path())?;
    wtr.write_record(["제품명", "모델명", "일시불단가"])?;

    for i in 1..=rows {
        wtr.write_record([
            format!("product-{i}"),
            format!("M-{i}"),
            format!("{}", i * 10_000),
        ])?;
    }

    wtr.flush()?;
    Ok(file)
}
