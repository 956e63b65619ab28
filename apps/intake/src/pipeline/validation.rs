//! Pure, idempotent cleanup of an extracted profile.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::profile::CandidateProfile;

static STRICT_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("valid regex")
});

/// Lowercased alias → canonical name. Every canonical name is also a key
/// mapping to itself.
const SKILL_SYNONYMS: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("javascript", "JavaScript"),
    ("ts", "TypeScript"),
    ("typescript", "TypeScript"),
    ("py", "Python"),
    ("python", "Python"),
    ("golang", "Go"),
    ("go", "Go"),
    ("sql", "SQL"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("k8s", "Kubernetes"),
    ("kubernetes", "Kubernetes"),
    ("react", "React"),
    ("reactjs", "React"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("node.js", "Node.js"),
    ("c++", "C++"),
    ("c#", "C#"),
];

pub fn normalize(mut profile: CandidateProfile) -> CandidateProfile {
    if let Some(email) = profile.email.take() {
        if STRICT_EMAIL.is_match(&email) {
            profile.email = Some(email);
        } else {
            debug!("Cleared malformed email");
        }
    }

    profile.phone = profile.phone.as_deref().and_then(normalize_phone);
    profile.skills = canonicalize_skills(&profile.skills);
    profile.name_incomplete = profile
        .name
        .as_deref()
        .is_some_and(|name| name.split_whitespace().count() < 2);

    profile
}

/// `(AAA) EEE-SSSS` for 10 digits, `+1 (AAA) EEE-SSSS` for 11 digits with a
/// leading 1, the bare digits otherwise. No digits at all clears the field.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0 => None,
        10 => Some(format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..]
        )),
        11 if digits.starts_with('1') => Some(format!(
            "+1 ({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..]
        )),
        _ => Some(digits),
    }
}

/// Synonym lookup, title case for the rest, then first-seen deduplication.
pub fn canonicalize_skills(skills: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if skill.is_empty() {
            continue;
        }
        let canonical = canonical_skill(skill);
        if !out.contains(&canonical) {
            out.push(canonical);
        }
    }
    out
}

fn canonical_skill(skill: &str) -> String {
    let key = skill.to_lowercase();
    SKILL_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| title_case(skill))
}

/// Uppercases the first letter of every alphabetic run and lowercases the
/// rest (`node-red` → `Node-Red`). Separators are kept as written.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }
    out
}
