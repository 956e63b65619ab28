use serde::{Deserialize, Serialize};

/// One job entry from the experience section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub description: String,
}

/// One degree from the education section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// The schema of record produced by field extraction and cleaned up by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    /// Discovery order, no case-insensitive duplicates.
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub name_incomplete: bool,
}

impl CandidateProfile {
    /// Appends a skill unless an entry with the same case-folded text exists.
    /// Returns whether it was added.
    pub fn push_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() {
            return false;
        }
        let folded = skill.to_lowercase();
        if self.skills.iter().any(|s| s.to_lowercase() == folded) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }
}

/// A privacy-reduced projection of a `CandidateProfile` for logs and review storage.
/// Never replaces the canonical profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedactedProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    pub name_incomplete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_hash: Option<String>,
}

impl From<&CandidateProfile> for RedactedProfile {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            location: profile.location.clone(),
            summary: profile.summary.clone(),
            skills: profile.skills.clone(),
            experience: profile.experience.clone(),
            education: profile.education.clone(),
            certifications: profile.certifications.clone(),
            name_incomplete: profile.name_incomplete,
            name_hash: None,
            email_hash: None,
            phone_hash: None,
        }
    }
}
