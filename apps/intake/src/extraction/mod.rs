//! Turns an uploaded file into plain UTF-8 text.
//!
//! One adapter per source format, selected by file extension through
//! `ExtractorRegistry`. Adapters report failure as `ExtractionError`; the
//! prefilter turns that into a rejection reason.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::document::{Document, ExtractedText, SourceFormat};

pub mod ocr;
pub mod pdf;
pub mod plain;
pub mod word;

pub use ocr::TesseractOcrExtractor;
pub use pdf::PdfTextExtractor;
pub use plain::PlainTextExtractor;
pub use word::WordTextExtractor;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("Word document extraction failed: {0}")]
    Word(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("extraction task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ExtractionError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExtractionError::Task(e.to_string())
    }
}

/// A text extraction backend for one source format.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    fn format(&self) -> SourceFormat;

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

const DEFAULT_EXTENSIONS: &[&str] = &[".txt", ".pdf", ".doc", ".docx", ".png", ".jpg", ".jpeg"];

/// Maps lowercased extensions (".pdf") to the adapter that handles them.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    by_extension: HashMap<String, Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Plain text, PDF, Word, and Tesseract OCR for images, one entry per
    /// extension in `DEFAULT_EXTENSIONS`.
    pub fn with_defaults() -> Self {
        let plain: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor);
        let pdf: Arc<dyn TextExtractor> = Arc::new(PdfTextExtractor);
        let word: Arc<dyn TextExtractor> = Arc::new(WordTextExtractor);
        let ocr: Arc<dyn TextExtractor> = Arc::new(TesseractOcrExtractor::default());

        DEFAULT_EXTENSIONS
            .iter()
            .fold(Self::empty(), |registry, ext| {
                let extractor = match SourceFormat::for_extension(ext) {
                    Some(SourceFormat::PlainText) => &plain,
                    Some(SourceFormat::Pdf) => &pdf,
                    Some(SourceFormat::Word) => &word,
                    Some(SourceFormat::Image) => &ocr,
                    None => return registry,
                };
                registry.register(ext, extractor.clone())
            })
    }

    pub fn register(mut self, extension: &str, extractor: Arc<dyn TextExtractor>) -> Self {
        self.by_extension.insert(extension.to_lowercase(), extractor);
        self
    }

    pub fn for_extension(&self, extension: &str) -> Option<Arc<dyn TextExtractor>> {
        self.by_extension.get(extension).cloned()
    }

    /// Runs the adapter registered for the document's extension.
    pub async fn extract(&self, document: &Document) -> Result<ExtractedText, ExtractionError> {
        let extractor = self
            .for_extension(&document.extension)
            .ok_or_else(|| ExtractionError::Unsupported(document.extension.clone()))?;
        let text = extractor.extract(&document.path).await?;
        Ok(ExtractedText::new(text, extractor.format()))
    }
}
