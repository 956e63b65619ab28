//! Section-based extraction: skills, experience, education, certifications.
//!
//! Headings are recognised line by line and may carry their content inline
//! (`Skills: Python, AWS`). A section runs until the next recognised heading;
//! list-shaped sections (skills, certifications) also end at the first blank
//! line after content.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::profile::{EducationEntry, ExperienceEntry};

pub const MAX_SECTION_SKILLS: usize = 10;
pub const MAX_EXPERIENCE: usize = 5;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const MAX_EDUCATION: usize = 3;
pub const MAX_CERTIFICATIONS: usize = 10;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#+\s*)?(professional summary|summary|objective|profile|work experience|professional experience|experience|work history|employment history|employment|education|technical skills|skills|core competencies|certifications|certificates|licenses|projects|achievements|qualifications|awards|references|languages|interests)\s*(?::\s*(.*))?$",
    )
    .expect("valid regex")
});

static LIST_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\n•·|]").expect("valid regex"));

static JOB_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][^|–—]*?)(?:\s+-\s+|\s*[–—|]\s*)([A-Z].*?)\s*$").expect("valid regex")
});

static MONTH_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d")
        .expect("valid regex")
});

static DEGREE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(Bachelor(?:'?s)?|Master(?:'?s)?|Associate(?:'?s)?|Doctorate|Ph\.?D\.?|MBA|B\.?Sc\.?|M\.?Sc\.?|B\.?Eng\.?|M\.?Eng\.?|B\.?S\.?|B\.?A\.?|M\.?S\.?|M\.?A\.?)(?:[^A-Za-z]|$)",
    )
    .expect("valid regex")
});

static SEGMENT_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;|()–—]|\s-\s").expect("valid regex"));

static INSTITUTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy|polytechnic)\b")
        .expect("valid regex")
});

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Other,
}

impl SectionKind {
    fn from_heading(heading: &str) -> Self {
        match heading.to_lowercase().as_str() {
            "summary" | "professional summary" | "objective" | "profile" => Self::Summary,
            "experience" | "work experience" | "professional experience" | "work history"
            | "employment" | "employment history" => Self::Experience,
            "education" => Self::Education,
            "skills" | "technical skills" | "core competencies" => Self::Skills,
            "certifications" | "certificates" | "licenses" => Self::Certifications,
            _ => Self::Other,
        }
    }

    fn is_list(self) -> bool {
        matches!(self, Self::Skills | Self::Certifications)
    }
}

#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub kind: SectionKind,
    /// Non-blank body lines, inline heading content first.
    pub lines: Vec<&'a str>,
    closed: bool,
}

/// Splits the text into recognised sections, in document order.
pub fn split_sections(text: &str) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = HEADING.captures(line) {
            let kind = SectionKind::from_heading(&caps[1]);
            let lines = caps
                .get(2)
                .map(|inline| inline.as_str().trim())
                .filter(|inline| !inline.is_empty())
                .into_iter()
                .collect();
            sections.push(Section {
                kind,
                lines,
                closed: false,
            });
            continue;
        }

        let Some(current) = sections.last_mut() else {
            continue;
        };
        if current.closed {
            continue;
        }
        if line.trim().is_empty() {
            if current.kind.is_list() && !current.lines.is_empty() {
                current.closed = true;
            }
            continue;
        }
        current.lines.push(line.trim());
    }

    sections
}

/// First section of the given kind.
pub fn find<'s, 'a>(sections: &'s [Section<'a>], kind: SectionKind) -> Option<&'s Section<'a>> {
    sections.iter().find(|s| s.kind == kind)
}

/// Free-text items from the skills section, at most `MAX_SECTION_SKILLS`.
pub fn skill_items(section: Option<&Section<'_>>) -> Vec<String> {
    list_items(section, 2, MAX_SECTION_SKILLS)
}

pub fn certifications(section: Option<&Section<'_>>) -> Vec<String> {
    list_items(section, 3, MAX_CERTIFICATIONS)
}

/// Delimited items longer than `min_chars`, bullets stripped.
fn list_items(section: Option<&Section<'_>>, min_chars: usize, cap: usize) -> Vec<String> {
    let Some(section) = section else {
        return Vec::new();
    };
    let body = section.lines.join("\n");
    LIST_DELIMITERS
        .split(&body)
        .map(strip_bullet)
        .filter(|item| item.chars().count() > min_chars)
        .take(cap)
        .map(str::to_string)
        .collect()
}

fn strip_bullet(item: &str) -> &str {
    item.trim()
        .trim_start_matches(['-', '*', '▪', '◦', '‣', '>'])
        .trim()
}

/// Job entries: a `Title - Company` line followed by its description lines.
pub fn experience(section: Option<&Section<'_>>) -> Vec<ExperienceEntry> {
    let Some(section) = section else {
        return Vec::new();
    };

    let mut entries: Vec<(ExperienceEntry, Vec<&str>)> = Vec::new();
    for line in &section.lines {
        if let Some((title, company)) = job_header(line) {
            if entries.len() == MAX_EXPERIENCE {
                break;
            }
            entries.push((
                ExperienceEntry {
                    title,
                    company,
                    description: String::new(),
                },
                Vec::new(),
            ));
        } else if let Some((_, description)) = entries.last_mut() {
            description.push(strip_bullet(line));
        }
    }

    entries
        .into_iter()
        .map(|(mut entry, description)| {
            entry.description = description
                .join("\n")
                .chars()
                .take(MAX_DESCRIPTION_CHARS)
                .collect();
            entry
        })
        .collect()
}

fn job_header(line: &str) -> Option<(String, String)> {
    let caps = JOB_HEADER.captures(line)?;
    let title = caps[1].trim();
    if MONTH_PREFIX.is_match(title) {
        return None;
    }
    Some((title.to_string(), caps[2].trim().to_string()))
}

/// One entry per line carrying a recognised degree.
pub fn education(section: Option<&Section<'_>>) -> Vec<EducationEntry> {
    let Some(section) = section else {
        return Vec::new();
    };

    section
        .lines
        .iter()
        .filter_map(|line| education_entry(line))
        .take(MAX_EDUCATION)
        .collect()
}

fn education_entry(line: &str) -> Option<EducationEntry> {
    let start = DEGREE
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .find(|m| !is_state_abbreviation(line, m.start(), m.as_str()))?
        .start();
    let rest = &line[start..];
    let end = SEGMENT_BREAK.find(rest).map_or(rest.len(), |m| m.start());
    let degree = YEAR.replace_all(&rest[..end], "").trim().to_string();

    let institution = SEGMENT_BREAK
        .split(line)
        .map(str::trim)
        .find(|segment| INSTITUTION.is_match(segment))
        .map(|segment| YEAR.replace_all(segment, "").trim().to_string())
        .unwrap_or_default();

    let year = YEAR
        .find_iter(line)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    Some(EducationEntry {
        degree,
        institution,
        year,
    })
}

/// Undotted `MA`, `MS` and the like right after a comma read as a US state
/// (`Boston, MA`), not a degree.
fn is_state_abbreviation(line: &str, start: usize, token: &str) -> bool {
    token.len() == 2 && line[..start].trim_end().ends_with(',')
}
