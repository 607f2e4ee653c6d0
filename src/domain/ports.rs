use crate::error::{Result, RowRejection};
use super::product::RawProduct;
use async_trait::async_trait;

/// An input row that ingestion dropped, with its 1-based sheet row number
/// (the header is row 1).
#[derive(Debug, Clone, PartialEq)]
pub struct RowIssue {
    pub row: usize,
    pub reason: RowRejection,
}

/// Products delivered by a source, plus the rows it had to skip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IngestedProducts {
    pub products: Vec<RawProduct>,
    pub skipped: Vec<RowIssue>,
}

/// Where the product list comes from. Implementations must hand back a
/// complete, validated list; the engine never sees partial input.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn load(&self) -> Result<IngestedProducts>;
}

pub type ProductSourceBox = Box<dyn ProductSource>;
