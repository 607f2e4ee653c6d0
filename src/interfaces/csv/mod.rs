pub mod product_reader;
pub mod result_writer;
pub mod template;
