//! Best-effort population of a `CandidateProfile`.
//!
//! Scalar fields pick one of two strategies explicitly: a deterministic
//! pattern, or a generative call for free-text fields that regexes cannot
//! capture. Section fields (skills, experience, education, certifications)
//! are parsed from the document structure. Nothing here fails: a field that
//! cannot be found is left empty.

pub mod generative;
pub mod patterns;
pub mod sections;

use std::sync::Arc;

use tracing::debug;

use crate::llm_client::{GenerationLimits, TextGenerator};
use crate::models::profile::CandidateProfile;
use sections::SectionKind;

/// Upper bound on the merged skill list.
pub const MAX_SKILLS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Name,
    Email,
    Phone,
    Location,
    Summary,
}

/// How a scalar field is pulled out of the text.
#[derive(Clone, Copy)]
pub enum FieldStrategy {
    Pattern(fn(&str) -> Option<String>),
    Generative { instruction: &'static str },
}

/// Per-field strategy selection, in extraction order.
pub const SCALAR_FIELDS: &[(ScalarField, FieldStrategy)] = &[
    (
        ScalarField::Name,
        FieldStrategy::Generative {
            instruction: generative::NAME_INSTRUCTION,
        },
    ),
    (ScalarField::Email, FieldStrategy::Pattern(patterns::extract_email)),
    (ScalarField::Phone, FieldStrategy::Pattern(patterns::extract_phone)),
    (
        ScalarField::Location,
        FieldStrategy::Generative {
            instruction: generative::LOCATION_INSTRUCTION,
        },
    ),
    (
        ScalarField::Summary,
        FieldStrategy::Generative {
            instruction: generative::SUMMARY_INSTRUCTION,
        },
    ),
];

pub struct FieldExtractor {
    generator: Arc<dyn TextGenerator>,
    limits: GenerationLimits,
}

impl FieldExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>, limits: GenerationLimits) -> Self {
        Self { generator, limits }
    }

    pub async fn extract(&self, text: &str) -> CandidateProfile {
        let mut profile = CandidateProfile::default();

        for (field, strategy) in SCALAR_FIELDS {
            let value = self.run(strategy, text).await;
            debug!("Field {:?}: {}", field, if value.is_some() { "found" } else { "empty" });
            let slot = match field {
                ScalarField::Name => &mut profile.name,
                ScalarField::Email => &mut profile.email,
                ScalarField::Phone => &mut profile.phone,
                ScalarField::Location => &mut profile.location,
                ScalarField::Summary => &mut profile.summary,
            };
            *slot = value;
        }

        let sections = sections::split_sections(text);

        for skill in patterns::match_skill_keywords(text)
            .into_iter()
            .chain(sections::skill_items(sections::find(&sections, SectionKind::Skills)))
        {
            if profile.skills.len() == MAX_SKILLS {
                break;
            }
            profile.push_skill(&skill);
        }

        profile.experience = sections::experience(sections::find(&sections, SectionKind::Experience));
        profile.education = sections::education(sections::find(&sections, SectionKind::Education));
        profile.certifications =
            sections::certifications(sections::find(&sections, SectionKind::Certifications));

        profile
    }

    async fn run(&self, strategy: &FieldStrategy, text: &str) -> Option<String> {
        match strategy {
            FieldStrategy::Pattern(extract) => extract(text),
            FieldStrategy::Generative { instruction } => {
                generative::extract_free_text(self.generator.as_ref(), instruction, text, self.limits)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{FailingGenerator, StubGenerator};

    const RESUME: &str = "\
John Smith
john.smith@example.com | 555-234-5678

Summary
Backend engineer building data platforms on AWS.

Experience
Senior Engineer - Acme Corp
Built the ingestion pipeline in Python.

Education
B.S. in Computer Science, University of Texas, 2012

Skills: Python, AWS, SQL, Terraform
";

    #[tokio::test]
    async fn test_full_profile() {
        let extractor = FieldExtractor::new(Arc::new(StubGenerator::default()), GenerationLimits::default());
        let profile = extractor.extract(RESUME).await;

        assert_eq!(profile.name.as_deref(), Some("John Smith"));
        assert_eq!(profile.email.as_deref(), Some("john.smith@example.com"));
        assert_eq!(profile.phone.as_deref(), Some("(555) 234-5678"));
        assert_eq!(profile.location.as_deref(), Some("Austin, TX"));
        assert!(profile.summary.is_some());
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.education.len(), 1);
        // Keyword hits first, then section items not already present.
        assert_eq!(profile.skills, vec!["python", "sql", "aws", "terraform"]);
    }

    #[tokio::test]
    async fn test_generator_failure_is_not_fatal() {
        let extractor = FieldExtractor::new(Arc::new(FailingGenerator), GenerationLimits::default());
        let profile = extractor.extract(RESUME).await;

        assert_eq!(profile.name, None);
        assert_eq!(profile.location, None);
        assert_eq!(profile.summary, None);
        assert_eq!(profile.email.as_deref(), Some("john.smith@example.com"));
    }

    #[tokio::test]
    async fn test_skills_capped() {
        let items: Vec<String> = (0..30).map(|i| format!("Tool{i:02}")).collect();
        let text = format!(
            "Python Java SQL AWS Docker Git Linux Rust React Azure Agile Scrum\nSkills: {}",
            items.join(", ")
        );
        let extractor = FieldExtractor::new(Arc::new(StubGenerator::default()), GenerationLimits::default());
        let profile = extractor.extract(&text).await;

        assert_eq!(profile.skills.len(), MAX_SKILLS);
        // Section contributes at most ten items.
        assert_eq!(profile.skills.iter().filter(|s| s.starts_with("Tool")).count(), 8);
    }

    #[tokio::test]
    async fn test_empty_text_gives_empty_profile() {
        let extractor = FieldExtractor::new(Arc::new(FailingGenerator), GenerationLimits::default());
        assert_eq!(extractor.extract("").await, CandidateProfile::default());
    }

    #[test]
    fn test_strategy_selection() {
        let generative: Vec<ScalarField> = SCALAR_FIELDS
            .iter()
            .filter(|(_, s)| matches!(s, FieldStrategy::Generative { .. }))
            .map(|(f, _)| *f)
            .collect();
        assert_eq!(
            generative,
            vec![ScalarField::Name, ScalarField::Location, ScalarField::Summary]
        );
    }
}
