//! PII redaction levels and the projection they produce.
//!
//! The canonical `CandidateProfile` is never modified; callers always get the
//! full profile back, and only logs and review storage see the projection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::profile::{CandidateProfile, RedactedProfile};

pub const REDACTED_MARKER: &str = "[REDACTED]";
const HASH_HEX_CHARS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedactionLevel {
    None,
    Partial,
    Full,
}

impl FromStr for RedactionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "partial" => Ok(Self::Partial),
            "full" => Ok(Self::Full),
            other => Err(format!(
                "unknown redaction level '{other}' (expected none, partial or full)"
            )),
        }
    }
}

impl fmt::Display for RedactionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::Partial => "partial",
            Self::Full => "full",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    salt: Option<String>,
}

impl PiiRedactor {
    pub fn new(salt: Option<String>) -> Self {
        Self { salt }
    }

    pub fn redact(&self, profile: &CandidateProfile, level: RedactionLevel) -> RedactedProfile {
        let mut view = RedactedProfile::from(profile);
        match level {
            RedactionLevel::None => {}
            RedactionLevel::Partial => {
                view.email = profile.email.as_deref().map(mask_email);
                view.phone = profile.phone.as_deref().map(mask_phone);
            }
            RedactionLevel::Full => {
                view.name_hash = profile.name.as_deref().map(|v| self.hash(v));
                view.email_hash = profile.email.as_deref().map(|v| self.hash(v));
                view.phone_hash = profile.phone.as_deref().map(|v| self.hash(v));
                view.name = profile.name.as_ref().map(|_| REDACTED_MARKER.to_string());
                view.email = profile.email.as_ref().map(|_| REDACTED_MARKER.to_string());
                view.phone = profile.phone.as_ref().map(|_| REDACTED_MARKER.to_string());
            }
        }
        view
    }

    /// Truncated hex SHA-256 of the salted value.
    fn hash(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(salt) = &self.salt {
            hasher.update(salt.as_bytes());
        }
        hasher.update(value.as_bytes());
        let mut hex = format!("{:x}", hasher.finalize());
        hex.truncate(HASH_HEX_CHARS);
        hex
    }
}

/// `jo***@example.com`
fn mask_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{visible}***@{domain}")
        }
        None => "***".to_string(),
    }
}

/// `***-***-5678`
fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 4 {
        return "***".to_string();
    }
    let last4: String = digits[digits.len() - 4..].iter().collect();
    format!("***-***-{last4}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            name: Some("John Smith".to_string()),
            email: Some("john.smith@example.com".to_string()),
            phone: Some("(555) 234-5678".to_string()),
            location: Some("Austin, TX".to_string()),
            skills: vec!["Python".to_string()],
            ..Default::default()
        }
    }

    /// Raw PII strings from the canonical profile that survive in the view.
    fn leaked(view: &RedactedProfile, original: &CandidateProfile) -> usize {
        let json = serde_json::to_string(view).unwrap();
        [
            original.name.as_deref(),
            original.email.as_deref(),
            original.phone.as_deref(),
            original.email.as_deref().and_then(|e| e.split('@').next()),
        ]
        .into_iter()
        .flatten()
        .filter(|raw| json.contains(raw))
        .count()
    }

    #[test]
    fn test_none_is_pass_through() {
        let p = profile();
        assert_eq!(
            PiiRedactor::default().redact(&p, RedactionLevel::None),
            RedactedProfile::from(&p)
        );
    }

    #[test]
    fn test_partial_masks_email_and_phone() {
        let view = PiiRedactor::default().redact(&profile(), RedactionLevel::Partial);
        assert_eq!(view.email.as_deref(), Some("jo***@example.com"));
        assert_eq!(view.phone.as_deref(), Some("***-***-5678"));
        assert_eq!(view.name.as_deref(), Some("John Smith"));
        assert!(view.email_hash.is_none());
    }

    #[test]
    fn test_full_replaces_with_marker_and_hash() {
        let view = PiiRedactor::default().redact(&profile(), RedactionLevel::Full);
        assert_eq!(view.name.as_deref(), Some(REDACTED_MARKER));
        assert_eq!(view.email.as_deref(), Some(REDACTED_MARKER));
        assert_eq!(view.phone.as_deref(), Some(REDACTED_MARKER));
        let hash = view.email_hash.unwrap();
        assert_eq!(hash.len(), HASH_HEX_CHARS);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(view.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_full_keeps_absent_fields_absent() {
        let view = PiiRedactor::default().redact(&CandidateProfile::default(), RedactionLevel::Full);
        assert_eq!(view.name, None);
        assert_eq!(view.name_hash, None);
    }

    #[test]
    fn test_salt_changes_hash() {
        let p = profile();
        let unsalted = PiiRedactor::default().redact(&p, RedactionLevel::Full);
        let salted = PiiRedactor::new(Some("pepper".to_string())).redact(&p, RedactionLevel::Full);
        assert_ne!(unsalted.email_hash, salted.email_hash);
        // Stable for the same salt.
        let again = PiiRedactor::new(Some("pepper".to_string())).redact(&p, RedactionLevel::Full);
        assert_eq!(salted.email_hash, again.email_hash);
    }

    #[test]
    fn test_information_loss_is_monotonic() {
        let p = profile();
        let redactor = PiiRedactor::default();
        let none = leaked(&redactor.redact(&p, RedactionLevel::None), &p);
        let partial = leaked(&redactor.redact(&p, RedactionLevel::Partial), &p);
        let full = leaked(&redactor.redact(&p, RedactionLevel::Full), &p);
        assert!(full < partial, "full={full} partial={partial}");
        assert!(partial < none, "partial={partial} none={none}");
    }

    #[test]
    fn test_canonical_profile_untouched() {
        let p = profile();
        let before = p.clone();
        for level in [RedactionLevel::None, RedactionLevel::Partial, RedactionLevel::Full] {
            let _ = PiiRedactor::default().redact(&p, level);
        }
        assert_eq!(p, before);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("FULL".parse::<RedactionLevel>(), Ok(RedactionLevel::Full));
        assert_eq!(" partial ".parse::<RedactionLevel>(), Ok(RedactionLevel::Partial));
        assert!("masked".parse::<RedactionLevel>().is_err());
        assert_eq!(RedactionLevel::None.to_string(), "none");
    }

    #[test]
    fn test_mask_edge_cases() {
        assert_eq!(mask_email("a@x.io"), "a***@x.io");
        assert_eq!(mask_email("no-at-sign"), "***");
        assert_eq!(mask_phone("12"), "***");
    }
}
