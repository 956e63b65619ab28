//! In-memory collaborators shared by the pipeline tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::embeddings::{Embedder, EmbeddingError};
use crate::extraction::ExtractorRegistry;
use crate::llm_client::{GenerationLimits, LlmError, TextGenerator};
use crate::models::feedback::FeedbackRecord;
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::feedback::{FeedbackError, FeedbackStore};
use crate::pipeline::orchestrator::{Collaborators, ResumePipeline};
use crate::pipeline::redaction::PiiRedactor;

/// Default-config pipeline over the keyword embedder and stub generator.
pub fn stub_pipeline(store: Arc<dyn FeedbackStore>) -> ResumePipeline {
    ResumePipeline::new(
        PipelineConfig::default(),
        Collaborators {
            extractors: ExtractorRegistry::with_defaults(),
            embedder: Arc::new(KeywordEmbedder),
            generator: Arc::new(StubGenerator::default()),
            feedback_store: store,
        },
        PiiRedactor::default(),
    )
    .unwrap()
}

const RESUME_WORDS: &[&str] = &[
    "experience",
    "education",
    "skills",
    "summary",
    "certifications",
    "work history",
    "employment",
];

const NON_RESUME_WORDS: &[&str] = &[
    "dear",
    "sincerely",
    "invoice",
    "agenda",
    "meeting",
    "purchase",
    "order",
    "specifications",
    "writing to",
];

/// Two-dimensional bag-of-words embedder: `[résumé words, non-résumé words]`.
/// Résumé prototypes land on the first axis and non-résumé prototypes on the second.
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                let count = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as f32;
                vec![count(RESUME_WORDS), count(NON_RESUME_WORDS)]
            })
            .collect())
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::Api {
            status: 503,
            message: "embedding service unavailable".to_string(),
        })
    }
}

/// Answers by instruction keyword, the way a well-behaved model would.
pub struct StubGenerator {
    pub name: String,
    pub location: String,
    pub summary: String,
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self {
            name: "John Smith".to_string(),
            location: "Austin, TX".to_string(),
            summary: "Backend engineer focused on data platforms.".to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        instruction: &str,
        _context: &str,
        _limits: GenerationLimits,
    ) -> Result<String, LlmError> {
        let reply = if instruction.contains("name") {
            &self.name
        } else if instruction.contains("location") {
            &self.location
        } else if instruction.contains("summary") {
            &self.summary
        } else {
            ""
        };
        Ok(reply.to_string())
    }
}

pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(
        &self,
        _instruction: &str,
        _context: &str,
        _limits: GenerationLimits,
    ) -> Result<String, LlmError> {
        Err(LlmError::RateLimited { retries: 3 })
    }
}

#[derive(Default)]
pub struct RecordingFeedbackStore {
    pub records: Mutex<Vec<(String, FeedbackRecord)>>,
}

impl RecordingFeedbackStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedbackStore for RecordingFeedbackStore {
    async fn persist(&self, key: &str, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        self.records
            .lock()
            .unwrap()
            .push((key.to_string(), record.clone()));
        Ok(())
    }
}

pub struct FailingFeedbackStore;

#[async_trait]
impl FeedbackStore for FailingFeedbackStore {
    async fn persist(&self, _key: &str, _record: &FeedbackRecord) -> Result<(), FeedbackError> {
        Err(FeedbackError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only volume",
        )))
    }
}
