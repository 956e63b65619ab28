use serde::{Deserialize, Serialize};

use crate::models::profile::CandidateProfile;

/// The pipeline stage an invocation ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prefilter,
    Classification,
    Extraction,
    Validation,
}

/// The single return value of `ResumePipeline::process_document`.
///
/// `success == true` carries a validated profile; `success == false` carries no
/// profile and at least one error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    pub stage: Stage,
    pub confidence: f64,
    pub data: Option<CandidateProfile>,
    pub errors: Vec<String>,
}

impl PipelineResult {
    pub fn rejected(stage: Stage, confidence: f64, error: String) -> Self {
        Self {
            success: false,
            stage,
            confidence,
            data: None,
            errors: vec![error],
        }
    }

    pub fn accepted(profile: CandidateProfile, confidence: f64) -> Self {
        Self {
            success: true,
            stage: Stage::Validation,
            confidence,
            data: Some(profile),
            errors: Vec::new(),
        }
    }
}
