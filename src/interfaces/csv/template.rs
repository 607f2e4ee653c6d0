use crate::error::Result;
use std::io::Write;

/// Header row of the sample input file: product name, model name, cash price.
pub const TEMPLATE_HEADERS: [&str; 3] = ["제품명", "모델명", "일시불단가"];

const SAMPLE_ROWS: [[&str; 3]; 2] = [
    ["에어컨", "AC-2000", "1200000"],
    ["냉장고", "REF-500", "1500000"],
];

/// Writes a sample input file that the product reader accepts as-is.
pub fn write_template<W: Write>(sink: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(TEMPLATE_HEADERS)?;
    for row in SAMPLE_ROWS {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
