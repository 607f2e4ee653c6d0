use crate::domain::ports::{IngestedProducts, ProductSource};
use crate::error::{IngestionError, RentalError, Result};
use crate::interfaces::csv::product_reader::ProductReader;
use crate::interfaces::excel::workbook_reader::WorkbookReader;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// Input file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited(u8),
    Workbook,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> std::result::Result<Self, IngestionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Delimited(b',')),
            "tsv" | "txt" => Ok(Self::Delimited(b'\t')),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Workbook),
            _ => Err(IngestionError::UnsupportedFormat(extension)),
        }
    }
}

/// Loads products from a file on disk.
///
/// The file is read asynchronously and parsed on the blocking pool, so a large
/// workbook does not stall the runtime.
pub struct FileProductSource {
    path: PathBuf,
    format: SourceFormat,
}

impl FileProductSource {
    /// Fails early when the extension is not a supported format.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let format = SourceFormat::from_path(&path)?;
        Ok(Self { path, format })
    }
}

#[async_trait]
impl ProductSource for FileProductSource {
    async fn load(&self) -> Result<IngestedProducts> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            IngestionError::Unreadable(format!("{}: {e}", self.path.display()))
        })?;
        info!(path = %self.path.display(), bytes = data.len(), "read input file");

        let format = self.format;
        tokio::task::spawn_blocking(move || match format {
            SourceFormat::Delimited(delimiter) => {
                ProductReader::with_delimiter(data.as_slice(), delimiter).products()
            }
            SourceFormat::Workbook => WorkbookReader::new(data).products(),
        })
        .await
        .map_err(|e| RentalError::Internal(e.to_string()))?
    }
}
