pub mod ports;
pub mod product;
pub mod rates;
pub mod rental;
