use std::path::Path;

use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};
use crate::models::document::SourceFormat;

/// Text layer extraction via `pdf-extract`. Runs on the blocking pool; a panic
/// inside the parser comes back as `ExtractionError::Task`.
pub struct PdfTextExtractor;

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Pdf
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let path = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        Ok(text.trim().to_string())
    }
}
