// Shared prompt constants for single-field extraction.
// Field-specific instructions live next to the extractor that uses them.

/// System prompt that keeps replies to the bare field value.
pub const FIELD_EXTRACTION_SYSTEM: &str = "\
    You are a precise resume field extractor. \
    Reply with the requested value only, copied from the resume text. \
    Do NOT add labels, quotes, explanations, or markdown. \
    If the resume does not contain the value, reply with an empty message.";

/// User prompt wrapping one instruction around a bounded resume snippet.
pub const FIELD_PROMPT_TEMPLATE: &str = "{instruction} from this resume:\n\n{snippet}\n\nAnswer:";
