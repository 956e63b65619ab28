use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::profile::RedactedProfile;

/// A low-confidence outcome queued for human review.
///
/// `reviewed` and `corrections` are filled in later by the review tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub document_ref: String,
    pub confidence: f64,
    pub extracted_data: RedactedProfile,
    pub timestamp: DateTime<Utc>,
    pub reviewed: bool,
    pub corrections: HashMap<String, Value>,
}

impl FeedbackRecord {
    pub fn new(document_ref: String, confidence: f64, extracted_data: RedactedProfile) -> Self {
        Self {
            document_ref,
            confidence,
            extracted_data,
            timestamp: Utc::now(),
            reviewed: false,
            corrections: HashMap::new(),
        }
    }

    /// Storage key derived from the record timestamp plus a random suffix.
    pub fn storage_key(&self) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "feedback_{}_{}",
            self.timestamp.format("%Y%m%d_%H%M%S"),
            &suffix[..8]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_unreviewed() {
        let r = FeedbackRecord::new("cv.pdf".to_string(), 0.87, RedactedProfile::default());
        assert!(!r.reviewed);
        assert!(r.corrections.is_empty());
    }

    #[test]
    fn test_storage_key_shape() {
        let r = FeedbackRecord::new("cv.pdf".to_string(), 0.87, RedactedProfile::default());
        let key = r.storage_key();
        assert!(key.starts_with("feedback_"));
        // feedback_ + YYYYmmdd_HHMMSS + _ + 8 hex
        assert_eq!(key.len(), "feedback_".len() + 15 + 1 + 8);
        assert_ne!(key, r.storage_key());
    }
}
