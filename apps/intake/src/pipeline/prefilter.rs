//! Cheap structural and content checks that run before any model inference.
//!
//! Checks run in order and stop at the first failure:
//! existence → extension allow-list → size bounds → filename heuristic
//! (informational) → text extraction → minimum text length → section keywords.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::extraction::ExtractorRegistry;
use crate::models::document::{Document, ExtractedText};
use crate::pipeline::config::PipelineConfig;

/// Section words whose presence marks a document as résumé-like.
const RESUME_INDICATORS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "work history",
    "objective",
    "summary",
    "employment",
    "qualifications",
    "achievements",
    "projects",
    "certifications",
];

/// Distinct indicators required when the filename gives no hint.
const MIN_INDICATORS: usize = 2;

pub const NOT_A_RESUME: &str = "Document does not appear to be a résumé";

/// Keyword patterns, matched against the lowercased filename.
static FILENAME_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"resume|résumé|curriculum|vitae|(?:^|[^a-z])(?:cv|bio|profile)(?:[^a-z]|$)")
        .expect("valid regex")
});

/// "FirstName_LastName" shape, matched against the filename as given.
static FILENAME_PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^A-Za-z])[A-Z][a-z]+_[A-Z][a-z]+(?:[^a-z]|$)").expect("valid regex")
});

/// Outcome of the prefilter stage. `text` is present whenever extraction
/// succeeded, including content-based rejections.
#[derive(Debug, Clone)]
pub struct PrefilterOutcome {
    pub valid: bool,
    pub reason: String,
    pub text: Option<ExtractedText>,
}

impl PrefilterOutcome {
    fn reject(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            text: None,
        }
    }
}

pub struct Prefilter {
    config: PipelineConfig,
    extractors: ExtractorRegistry,
}

impl Prefilter {
    pub fn new(config: PipelineConfig, extractors: ExtractorRegistry) -> Self {
        Self { config, extractors }
    }

    /// Runs every check against the file at `path`.
    pub async fn evaluate(&self, path: &Path, declared_filename: &str) -> PrefilterOutcome {
        let document = match Document::load(path, declared_filename).await {
            Ok(document) => document,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return PrefilterOutcome::reject("File does not exist");
            }
            Err(e) => return PrefilterOutcome::reject(format!("File is not readable: {e}")),
        };
        self.check(&document).await
    }

    /// Checks 2–7 on an already-loaded document.
    pub async fn check(&self, document: &Document) -> PrefilterOutcome {
        if !self
            .config
            .allowed_extensions
            .iter()
            .any(|ext| *ext == document.extension)
        {
            let shown = if document.extension.is_empty() {
                "(none)"
            } else {
                document.extension.as_str()
            };
            return PrefilterOutcome::reject(format!("Invalid file type: {shown}"));
        }

        if document.size_bytes > self.config.max_file_bytes {
            return PrefilterOutcome::reject(format!(
                "File too large: {:.2}MB (maximum {:.2}MB)",
                document.size_bytes as f64 / 1024.0 / 1024.0,
                self.config.max_file_bytes as f64 / 1024.0 / 1024.0
            ));
        }

        if document.size_bytes < self.config.min_file_bytes {
            return PrefilterOutcome::reject(format!(
                "Insufficient content: file is {} bytes (minimum {})",
                document.size_bytes, self.config.min_file_bytes
            ));
        }

        let filename_hint = filename_looks_like_resume(&document.declared_filename);
        debug!(
            "Filename heuristic for '{}': {}",
            document.declared_filename, filename_hint
        );

        let text = match self.extractors.extract(document).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction failed for {}: {}", document.reference(), e);
                return PrefilterOutcome::reject(format!("Error extracting text: {e}"));
            }
        };

        let char_count = text.as_str().trim().chars().count();
        if char_count < self.config.min_text_chars {
            return PrefilterOutcome::reject(format!(
                "Insufficient text content: {} characters (minimum {})",
                char_count, self.config.min_text_chars
            ));
        }

        let indicators = count_resume_indicators(text.as_str());
        debug!(
            "Found {} resume indicators in {}",
            indicators,
            document.reference()
        );

        if indicators >= MIN_INDICATORS || filename_hint {
            PrefilterOutcome {
                valid: true,
                reason: "Prefilter passed".to_string(),
                text: Some(text),
            }
        } else {
            PrefilterOutcome {
                valid: false,
                reason: NOT_A_RESUME.to_string(),
                text: Some(text),
            }
        }
    }
}

/// True when the filename carries a résumé keyword or a "First_Last" name shape.
pub fn filename_looks_like_resume(filename: &str) -> bool {
    FILENAME_KEYWORDS.is_match(&filename.to_lowercase()) || FILENAME_PERSON.is_match(filename)
}

/// Number of distinct section indicators present in the text.
pub fn count_resume_indicators(text: &str) -> usize {
    let lower = text.to_lowercase();
    RESUME_INDICATORS
        .iter()
        .filter(|indicator| lower.contains(*indicator))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME_BODY: &str = "Summary\nBackend engineer.\n\nExperience\nEngineer - Acme\nBuilt services.\n\nEducation\nB.S. in Physics\n";

    fn prefilter() -> Prefilter {
        Prefilter::new(PipelineConfig::default(), ExtractorRegistry::with_defaults())
    }

    fn write(dir: &tempfile::TempDir, name: &str, body: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_filename_keywords() {
        assert!(filename_looks_like_resume("resume.pdf"));
        assert!(filename_looks_like_resume("My_CV_2024.docx"));
        assert!(filename_looks_like_resume("Curriculum Vitae.pdf"));
        assert!(filename_looks_like_resume("jane-bio.txt"));
        assert!(!filename_looks_like_resume("cvs_receipt.pdf"));
        assert!(!filename_looks_like_resume("invoice_0042.pdf"));
    }

    #[test]
    fn test_filename_first_last_shape() {
        assert!(filename_looks_like_resume("John_Smith.pdf"));
        assert!(!filename_looks_like_resume("john_smith.pdf"));
        for name in ["Meeting Notes.txt", "Cover Letter.docx", "Quarterly Report.pdf"] {
            assert!(!filename_looks_like_resume(name), "{name}");
        }
    }

    #[test]
    fn test_indicator_count_is_distinct() {
        assert_eq!(count_resume_indicators("skills skills SKILLS"), 1);
        assert_eq!(count_resume_indicators("Work History and Education"), 2);
        assert_eq!(count_resume_indicators("Dear hiring manager"), 0);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let outcome = prefilter()
            .evaluate(Path::new("/no/such/resume.pdf"), "resume.pdf")
            .await;
        assert!(!outcome.valid);
        assert_eq!(outcome.reason, "File does not exist");
    }

    #[tokio::test]
    async fn test_disallowed_extension_named_in_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "resume.exe", &[b'a'; 500]);
        let outcome = prefilter().evaluate(&path, "resume.exe").await;
        assert!(!outcome.valid);
        assert!(outcome.reason.contains(".exe"), "{}", outcome.reason);
    }

    #[tokio::test]
    async fn test_missing_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "upload", &[b'a'; 500]);
        let outcome = prefilter().evaluate(&path, "resume").await;
        assert!(!outcome.valid);
        assert!(outcome.reason.contains("(none)"));
    }

    #[tokio::test]
    async fn test_too_small() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "resume.txt", &[b'a'; 50]);
        let outcome = prefilter().evaluate(&path, "resume.txt").await;
        assert!(!outcome.valid);
        assert!(outcome.reason.contains("Insufficient content"));
        assert!(outcome.text.is_none());
    }

    #[tokio::test]
    async fn test_too_large() {
        let config = PipelineConfig {
            max_file_bytes: 1000,
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "resume.txt", &[b'a'; 2000]);
        let outcome = Prefilter::new(config, ExtractorRegistry::with_defaults())
            .evaluate(&path, "resume.txt")
            .await;
        assert!(!outcome.valid);
        assert!(outcome.reason.starts_with("File too large"));
    }

    #[tokio::test]
    async fn test_extraction_error_wrapped_in_reason() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "resume.docx", &[b'x'; 400]);
        let outcome = prefilter().evaluate(&path, "resume.docx").await;
        assert!(!outcome.valid);
        assert!(outcome.reason.starts_with("Error extracting text"));
    }

    #[tokio::test]
    async fn test_insufficient_text_after_trimming() {
        let dir = tempfile::tempdir().unwrap();
        let mut body = vec![b' '; 300];
        body.extend_from_slice(b"Skills: Rust");
        let path = write(&dir, "resume.txt", &body);
        let outcome = prefilter().evaluate(&path, "resume.txt").await;
        assert!(!outcome.valid);
        assert!(outcome.reason.contains("Insufficient text content"));
    }

    #[tokio::test]
    async fn test_accepts_on_indicators() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "upload.txt", RESUME_BODY.repeat(2).as_bytes());
        let outcome = prefilter().evaluate(&path, "document.txt").await;
        assert!(outcome.valid, "{}", outcome.reason);
        assert!(outcome.text.is_some());
    }

    #[tokio::test]
    async fn test_accepts_on_filename_alone() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Jane Doe. Backend engineer who enjoys building reliable distributed services.";
        let path = write(&dir, "upload.txt", body.repeat(3).as_bytes());
        let outcome = prefilter().evaluate(&path, "Jane_Doe.txt").await;
        assert!(outcome.valid, "{}", outcome.reason);
    }

    #[tokio::test]
    async fn test_content_rejection_keeps_text() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Dear Hiring Manager, I am writing to express my interest in the open role at your company.";
        let path = write(&dir, "letter.txt", body.repeat(3).as_bytes());
        let outcome = prefilter().evaluate(&path, "letter.txt").await;
        assert!(!outcome.valid);
        assert_eq!(outcome.reason, NOT_A_RESUME);
        assert!(outcome.text.is_some());
    }

    #[tokio::test]
    async fn test_spaced_title_filename_still_needs_indicators() {
        let dir = tempfile::tempdir().unwrap();
        let body = "Agenda for Monday: budget review, hiring plan, and the office move timeline.";
        let path = write(&dir, "upload.txt", body.repeat(3).as_bytes());
        let outcome = prefilter().evaluate(&path, "Meeting Notes.txt").await;
        assert!(!outcome.valid);
        assert_eq!(outcome.reason, NOT_A_RESUME);
    }
}
