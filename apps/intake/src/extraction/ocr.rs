use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::warn;

use super::{ExtractionError, TextExtractor};
use crate::models::document::SourceFormat;

/// OCR through the `tesseract` command-line tool (`tesseract <image> stdout`).
///
/// Low-quality scans often make tesseract exit non-zero while still printing
/// the text it did recognise; that partial output is kept.
pub struct TesseractOcrExtractor {
    binary: PathBuf,
}

impl Default for TesseractOcrExtractor {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
        }
    }
}

#[cfg(test)]
impl TesseractOcrExtractor {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for TesseractOcrExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Image
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let output = Command::new(&self.binary)
            .arg(path)
            .arg("stdout")
            .output()
            .await
            .map_err(|e| {
                ExtractionError::Ocr(format!("could not run {}: {e}", self.binary.display()))
            })?;

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if text.is_empty() {
                return Err(ExtractionError::Ocr(format!(
                    "tesseract exited with {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }
            warn!(
                "tesseract exited with {} on {}; keeping {} chars of partial output",
                output.status,
                path.display(),
                text.len()
            );
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_ocr_error() {
        let ocr = TesseractOcrExtractor::with_binary("/nonexistent/tesseract-binary");
        let err = ocr.extract(Path::new("scan.png")).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Ocr(ref msg) if msg.contains("could not run")));
    }
}
