//! Pipeline Orchestrator — drives one document through every stage.
//!
//! ```text
//! prefilter → classification → extraction → validation → (log redaction, feedback) → done
//! ```
//!
//! Only prefilter and classification can end an invocation early. Everything
//! after classification degrades gracefully and always reaches `done`.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::embeddings::Embedder;
use crate::extraction::ExtractorRegistry;
use crate::llm_client::TextGenerator;
use crate::models::document::document_reference;
use crate::models::result::{PipelineResult, Stage};
use crate::pipeline::classifier::{ClassifierError, ResumeClassifier};
use crate::pipeline::config::PipelineConfig;
use crate::pipeline::feedback::{FeedbackSink, FeedbackStore};
use crate::pipeline::fields::FieldExtractor;
use crate::pipeline::prefilter::Prefilter;
use crate::pipeline::redaction::{PiiRedactor, RedactionLevel};
use crate::pipeline::validation;

/// Shared, read-only backends constructed once at startup.
pub struct Collaborators {
    pub extractors: ExtractorRegistry,
    pub embedder: Arc<dyn Embedder>,
    pub generator: Arc<dyn TextGenerator>,
    pub feedback_store: Arc<dyn FeedbackStore>,
}

pub struct ResumePipeline {
    prefilter: Prefilter,
    classifier: ResumeClassifier,
    fields: FieldExtractor,
    redactor: PiiRedactor,
    log_redaction: RedactionLevel,
    feedback: FeedbackSink,
}

impl ResumePipeline {
    pub fn new(
        config: PipelineConfig,
        collaborators: Collaborators,
        redactor: PiiRedactor,
    ) -> Result<Self, ClassifierError> {
        let classifier = ResumeClassifier::new(collaborators.embedder, &config)?;
        let fields = FieldExtractor::new(collaborators.generator, config.generation);
        let feedback = FeedbackSink::new(
            collaborators.feedback_store,
            config.feedback_threshold,
            redactor.clone(),
            config.feedback_redaction,
        );
        let log_redaction = config.log_redaction;
        let prefilter = Prefilter::new(config, collaborators.extractors);

        Ok(Self {
            prefilter,
            classifier,
            fields,
            redactor,
            log_redaction,
            feedback,
        })
    }

    /// Runs the full pipeline on one stored file. Never fails: every outcome,
    /// including collaborator errors, is expressed in the returned result.
    pub async fn process_document(&self, path: &Path, declared_filename: &str) -> PipelineResult {
        let document_ref = document_reference(path, declared_filename);
        info!("Processing {}", document_ref);

        // ── Prefilter ────────────────────────────────────────────────────────
        let outcome = self.prefilter.evaluate(path, declared_filename).await;
        let text = match (outcome.valid, outcome.text) {
            (true, Some(text)) => text,
            _ => {
                info!("Prefilter rejected {}: {}", document_ref, outcome.reason);
                return PipelineResult::rejected(
                    Stage::Prefilter,
                    0.0,
                    format!("Prefilter failed: {}", outcome.reason),
                );
            }
        };
        debug!(
            "Prefilter passed for {} ({:?}, {} chars)",
            document_ref,
            text.source_format(),
            text.as_str().chars().count()
        );

        // ── Classification ───────────────────────────────────────────────────
        let classification = match self.classifier.classify(text.as_str()).await {
            Ok(classification) => classification,
            Err(e) => {
                error!("Classifier unavailable for {}: {}", document_ref, e);
                return PipelineResult::rejected(
                    Stage::Classification,
                    0.0,
                    format!("Classification failed: {e}"),
                );
            }
        };
        let confidence = classification.confidence;
        if !classification.is_resume {
            info!(
                "Classification rejected {} (confidence={:.3})",
                document_ref, confidence
            );
            return PipelineResult::rejected(
                Stage::Classification,
                confidence,
                format!(
                    "Classification failed: confidence={:.2} (threshold={})",
                    confidence,
                    self.classifier.threshold()
                ),
            );
        }

        // ── Extraction + validation ──────────────────────────────────────────
        let profile = self.fields.extract(text.as_str()).await;
        let profile = validation::normalize(profile);
        if profile.name_incomplete {
            warn!("Incomplete candidate name in {}", document_ref);
        }

        // ── Side effects ─────────────────────────────────────────────────────
        let view = self.redactor.redact(&profile, self.log_redaction);
        info!(
            "Extracted profile from {} (confidence={:.3}): {}",
            document_ref,
            confidence,
            serde_json::to_string(&view).unwrap_or_default()
        );
        self.feedback.capture(&document_ref, &profile, confidence).await;

        PipelineResult::accepted(profile, confidence)
    }
}
