pub mod workbook_reader;
