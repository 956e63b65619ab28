//! Prototype-anchored "is this a résumé" scoring.
//!
//! The leading slice of the document is embedded and compared (cosine) with
//! two prototype sets. The per-set average similarities give:
//!
//! ```text
//! confidence = clamp((avg_resume - avg_non_resume + 1) / 2, 0, 1)
//! is_resume  = avg_resume > avg_non_resume && confidence > threshold
//! ```
//!
//! Prototype embeddings are computed on first use and reused afterwards.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::embeddings::{cosine_similarity, Embedder, EmbeddingError};
use crate::pipeline::config::PipelineConfig;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("embedding service error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("prototype set '{0}' is empty")]
    EmptyPrototypes(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationOutcome {
    pub is_resume: bool,
    /// Normalised to [0, 1].
    pub confidence: f64,
}

struct PrototypeEmbeddings {
    resume: Vec<Vec<f32>>,
    non_resume: Vec<Vec<f32>>,
}

pub struct ResumeClassifier {
    embedder: Arc<dyn Embedder>,
    resume_prototypes: Vec<String>,
    non_resume_prototypes: Vec<String>,
    input_chars: usize,
    threshold: f64,
    prototypes: OnceCell<PrototypeEmbeddings>,
}

impl ResumeClassifier {
    pub fn new(embedder: Arc<dyn Embedder>, config: &PipelineConfig) -> Result<Self, ClassifierError> {
        if config.resume_prototypes.is_empty() {
            return Err(ClassifierError::EmptyPrototypes("resume"));
        }
        if config.non_resume_prototypes.is_empty() {
            return Err(ClassifierError::EmptyPrototypes("non_resume"));
        }

        Ok(Self {
            embedder,
            resume_prototypes: config.resume_prototypes.clone(),
            non_resume_prototypes: config.non_resume_prototypes.clone(),
            input_chars: config.classifier_input_chars,
            threshold: config.classification_threshold,
            prototypes: OnceCell::new(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub async fn classify(&self, text: &str) -> Result<ClassificationOutcome, ClassifierError> {
        let prototypes = self
            .prototypes
            .get_or_try_init(|| self.embed_prototypes())
            .await?;

        let leading: String = text.chars().take(self.input_chars).collect();
        let embedded = self.embedder.embed(&[leading]).await?;
        let input = embedded
            .first()
            .ok_or(EmbeddingError::CountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let avg_resume = average_similarity(input, &prototypes.resume);
        let avg_non_resume = average_similarity(input, &prototypes.non_resume);
        let outcome = score(avg_resume, avg_non_resume, self.threshold);

        info!(
            "Classification: resume_sim={:.3}, non_resume_sim={:.3}, confidence={:.3}, is_resume={}",
            avg_resume, avg_non_resume, outcome.confidence, outcome.is_resume
        );

        Ok(outcome)
    }

    async fn embed_prototypes(&self) -> Result<PrototypeEmbeddings, ClassifierError> {
        let all: Vec<String> = self
            .resume_prototypes
            .iter()
            .chain(self.non_resume_prototypes.iter())
            .cloned()
            .collect();
        let mut vectors = self.embedder.embed(&all).await?;
        crate::embeddings::check_shape(all.len(), &vectors)?;

        let non_resume = vectors.split_off(self.resume_prototypes.len());
        Ok(PrototypeEmbeddings {
            resume: vectors,
            non_resume,
        })
    }
}

fn average_similarity(input: &[f32], prototypes: &[Vec<f32>]) -> f64 {
    if prototypes.is_empty() {
        return 0.0;
    }
    let total: f64 = prototypes
        .iter()
        .map(|p| f64::from(cosine_similarity(input, p)))
        .sum();
    total / prototypes.len() as f64
}

/// Turns the two set averages into the final decision.
pub fn score(avg_resume: f64, avg_non_resume: f64, threshold: f64) -> ClassificationOutcome {
    let confidence = ((avg_resume - avg_non_resume + 1.0) / 2.0).clamp(0.0, 1.0);
    ClassificationOutcome {
        is_resume: avg_resume > avg_non_resume && confidence > threshold,
        confidence,
    }
}
