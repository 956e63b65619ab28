use tracing::warn;

use crate::llm_client::{GenerationLimits, TextGenerator};

pub const NAME_INSTRUCTION: &str = "Extract the candidate's full name";
pub const LOCATION_INSTRUCTION: &str = "Extract the candidate's location or address";
pub const SUMMARY_INSTRUCTION: &str = "Extract the professional summary or objective";

/// Replies a model gives when the field is not in the document.
const ABSENT_REPLIES: &[&str] = &[
    "n/a",
    "na",
    "none",
    "null",
    "unknown",
    "not found",
    "not specified",
    "not provided",
    "not available",
];

/// Asks the generator for one free-text field. Any failure leaves the field empty.
pub async fn extract_free_text(
    generator: &dyn TextGenerator,
    instruction: &str,
    text: &str,
    limits: GenerationLimits,
) -> Option<String> {
    match generator.generate(instruction, text, limits).await {
        Ok(reply) => clean_reply(&reply),
        Err(e) => {
            warn!("Generative extraction failed ({}): {}", instruction, e);
            None
        }
    }
}

fn clean_reply(reply: &str) -> Option<String> {
    let trimmed = reply.trim();
    let bare = trimmed.trim_end_matches('.').to_lowercase();
    if trimmed.is_empty() || ABSENT_REPLIES.contains(&bare.as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}
