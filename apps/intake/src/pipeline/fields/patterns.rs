//! Deterministic pattern extractors: email, phone, and skill keywords.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

static PHONE_US: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?1?\s*\(?(\d{3})\)?[\s.-]?(\d{3})[\s.-]?(\d{4})").expect("valid regex")
});

static PHONE_INTL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?\d{1,3}[\s.-]?\(?\d{2,3}\)?[\s.-]?\d{3,4}[\s.-]?\d{4}").expect("valid regex")
});

/// Skills recognised anywhere in the text, case-insensitively.
pub const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "golang",
    "rust",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "sql",
    "postgresql",
    "mongodb",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "git",
    "linux",
    "agile",
    "scrum",
    "leadership",
    "communication",
    "project management",
    "problem solving",
];

/// First thing shaped like an email address. Strict validation happens later.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// First phone number: US form as `(AAA) EEE-SSSS`, otherwise the digits of
/// the first international-looking number.
pub fn extract_phone(text: &str) -> Option<String> {
    if let Some(caps) = PHONE_US.captures(text) {
        return Some(format!("({}) {}-{}", &caps[1], &caps[2], &caps[3]));
    }
    PHONE_INTL.find(text).map(|m| {
        m.as_str()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    })
}

/// Keywords from `SKILL_KEYWORDS` found as whole tokens, in list order.
pub fn match_skill_keywords(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .filter(|kw| contains_token(&lower, kw))
        .map(|kw| kw.to_string())
        .collect()
}

/// Substring match that is not glued to surrounding letters or digits, so
/// "java" does not hit "javascript" and "sql" does not hit "mysql".
fn contains_token(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
