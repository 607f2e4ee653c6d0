//! Adapters between the pricing core and the outside world: spreadsheet and
//! delimited-text ingestion, and result export.

pub mod csv;
pub mod excel;
pub mod table;
