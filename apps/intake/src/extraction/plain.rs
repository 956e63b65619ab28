use std::path::Path;

use async_trait::async_trait;

use super::{ExtractionError, TextExtractor};
use crate::models::document::SourceFormat;

/// Reads the file as UTF-8, replacing invalid sequences.
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::PlainText
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }
}
