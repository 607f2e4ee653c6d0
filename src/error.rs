use rust_decimal::Decimal;
use thiserror::Error;

/// A `RateConfig` that cannot be used for a calculation.
///
/// Always fatal to the whole call: no product is processed against a broken
/// configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no rental periods configured")]
    NoPeriods,
    #[error("rental period must be positive")]
    ZeroPeriod,
    #[error("rental period {0} is listed more than once")]
    DuplicatePeriod(u32),
    #[error("supply rate must be positive, got {0}%")]
    NonPositiveSupplyRate(Decimal),
    #[error("missing discount rate for {0}-month period")]
    MissingDiscountRate(u32),
    #[error("missing fee rate for {0}-month period")]
    MissingFeeRate(u32),
    #[error("discount rate given for unconfigured {0}-month period")]
    UnexpectedDiscountRate(u32),
    #[error("fee rate given for unconfigured {0}-month period")]
    UnexpectedFeeRate(u32),
    #[error("discount rate for {period}-month period must be positive, got {value}%")]
    NonPositiveDiscountRate { period: u32, value: Decimal },
    #[error("fee rate for {period}-month period must not be negative, got {value}%")]
    NegativeFeeRate { period: u32, value: Decimal },
    #[error("selected period {0} is not one of the configured periods")]
    UnknownSelectedPeriod(u32),
}

/// Why a single product was left out of a calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProductValidationError {
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    #[error("product name is empty")]
    EmptyProductName,
    #[error("rental figures for price {0} are out of range")]
    OutOfRange(Decimal),
}

/// Why a single input row was left out during ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowRejection {
    #[error("missing product name")]
    MissingProductName,
    #[error("missing price")]
    MissingPrice,
    #[error("price {0:?} is not a number")]
    InvalidPrice(String),
    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),
}

/// Failures of the ingestion step. The calculation is never invoked after one.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("unsupported file type {0:?} (expected csv, tsv, txt, xlsx, xlsm, xls or ods)")]
    UnsupportedFormat(String),
    #[error("could not find a {field} column (headers: {headers})")]
    MissingColumn {
        field: &'static str,
        headers: String,
    },
    #[error("no usable product rows found ({skipped} rows skipped)")]
    EmptyDataset { skipped: usize },
    #[error("could not read input: {0}")]
    Unreadable(String),
}

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Ingestion error: {0}")]
    Ingestion(#[from] IngestionError),
    #[error("Product error: {0}")]
    Product(#[from] ProductValidationError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, RentalError>;
