use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An uploaded file for the duration of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub declared_filename: String,
    pub size_bytes: u64,
    /// Lowercased, including the leading dot (".pdf"). Empty when neither the
    /// stored path nor the declared filename carries one.
    pub extension: String,
}

impl Document {
    /// Stats the file on disk. Fails when the path does not exist or is not a
    /// regular file.
    pub async fn load(path: &Path, declared_filename: &str) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            declared_filename: declared_filename.to_string(),
            size_bytes: metadata.len(),
            extension: detect_extension(path, declared_filename),
        })
    }

    /// Identifier recorded alongside review records and log lines.
    pub fn reference(&self) -> String {
        document_reference(&self.path, &self.declared_filename)
    }
}

/// The declared filename, or the stored path when none was declared.
pub fn document_reference(path: &Path, declared_filename: &str) -> String {
    if declared_filename.trim().is_empty() {
        path.display().to_string()
    } else {
        declared_filename.to_string()
    }
}

/// Extension of the stored path, falling back to the declared filename.
pub fn detect_extension(path: &Path, declared_filename: &str) -> String {
    path.extension()
        .or_else(|| Path::new(declared_filename).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Format the text was recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Pdf,
    Word,
    PlainText,
    Image,
}

impl SourceFormat {
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            ".pdf" => Some(Self::Pdf),
            ".doc" | ".docx" => Some(Self::Word),
            ".txt" => Some(Self::PlainText),
            ".png" | ".jpg" | ".jpeg" => Some(Self::Image),
            _ => None,
        }
    }
}

/// Text recovered from a document. Never mutated once produced.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    text: String,
    source_format: SourceFormat,
}

impl ExtractedText {
    pub fn new(text: String, source_format: SourceFormat) -> Self {
        Self {
            text,
            source_format,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn source_format(&self) -> SourceFormat {
        self.source_format
    }
}
