//! Pipeline policy: thresholds, limits, and classifier prototypes.
//!
//! Defaults reproduce the production constants; every field can be
//! overridden from the environment (see `crate::config`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::llm_client::GenerationLimits;
use crate::pipeline::redaction::RedactionLevel;

pub const DEFAULT_CLASSIFICATION_THRESHOLD: f64 = 0.85;
pub const DEFAULT_FEEDBACK_THRESHOLD: f64 = 0.90;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &[".pdf", ".doc", ".docx", ".txt", ".png", ".jpg", ".jpeg"];

pub const DEFAULT_RESUME_PROTOTYPES: &[&str] = &[
    "Professional experience working as software engineer with skills in Python, Java",
    "Education: Bachelor's degree in Computer Science from University",
    "Summary: Results-driven professional with 5 years of experience",
    "Work History: Senior Developer at Tech Company 2020-2023",
    "Skills: Project Management, Leadership, Communication, Technical Skills",
    "Certifications: AWS Certified Solutions Architect, PMP",
];

pub const DEFAULT_NON_RESUME_PROTOTYPES: &[&str] = &[
    "Dear Hiring Manager, I am writing to express my interest",
    "Invoice for services rendered. Total amount due: $500",
    "Meeting agenda for Q4 planning session scheduled for Monday",
    "Product specifications and technical documentation for Model X",
    "Thank you for your purchase. Your order has been shipped",
];

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub allowed_extensions: Vec<String>,
    pub min_file_bytes: u64,
    pub max_file_bytes: u64,
    /// Minimum trimmed character count of extracted text.
    pub min_text_chars: usize,
    /// Acceptance threshold; `confidence` must exceed it.
    pub classification_threshold: f64,
    /// Accepted documents below this confidence are queued for review.
    pub feedback_threshold: f64,
    /// Leading characters of the document passed to the embedder.
    pub classifier_input_chars: usize,
    pub resume_prototypes: Vec<String>,
    pub non_resume_prototypes: Vec<String>,
    pub generation: GenerationLimits,
    pub log_redaction: RedactionLevel,
    pub feedback_redaction: RedactionLevel,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: to_strings(DEFAULT_ALLOWED_EXTENSIONS),
            min_file_bytes: 100,
            max_file_bytes: 10 * 1024 * 1024,
            min_text_chars: 50,
            classification_threshold: DEFAULT_CLASSIFICATION_THRESHOLD,
            feedback_threshold: DEFAULT_FEEDBACK_THRESHOLD,
            classifier_input_chars: 1000,
            resume_prototypes: to_strings(DEFAULT_RESUME_PROTOTYPES),
            non_resume_prototypes: to_strings(DEFAULT_NON_RESUME_PROTOTYPES),
            generation: GenerationLimits::default(),
            log_redaction: RedactionLevel::Partial,
            feedback_redaction: RedactionLevel::None,
        }
    }
}

/// On-disk override for the classifier prototype sets.
#[derive(Debug, Deserialize)]
pub struct PrototypeSets {
    pub resume: Vec<String>,
    pub non_resume: Vec<String>,
}

impl PrototypeSets {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read prototype file {}", path.display()))?;
        let sets: PrototypeSets = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid prototype file {}", path.display()))?;
        anyhow::ensure!(
            !sets.resume.is_empty() && !sets.non_resume.is_empty(),
            "Prototype file {} must define non-empty 'resume' and 'non_resume' sets",
            path.display()
        );
        Ok(sets)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
