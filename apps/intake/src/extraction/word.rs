use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::{ExtractionError, TextExtractor};
use crate::models::document::SourceFormat;

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the inflated main document part.
const MAX_DOCUMENT_PART_BYTES: u64 = 32 * 1024 * 1024;

static WORD_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|</w:p>|<w:tab/>|<w:br/>|<w:cr/>")
        .expect("valid regex")
});

/// Reads the main document part of an Office Open XML (.docx) container.
///
/// Legacy binary `.doc` files are not zip containers and fail here; the
/// prefilter reports that as an extraction failure.
pub struct WordTextExtractor;

#[async_trait]
impl TextExtractor for WordTextExtractor {
    fn format(&self) -> SourceFormat {
        SourceFormat::Word
    }

    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let path = path.to_path_buf();
        let xml = tokio::task::spawn_blocking(move || read_document_part(&path, MAX_DOCUMENT_PART_BYTES)).await??;
        Ok(document_xml_to_text(&xml))
    }
}

fn read_document_part(path: &Path, limit: u64) -> Result<String, ExtractionError> {
    let file = std::fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractionError::Word(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Word(format!("{DOCUMENT_PART}: {e}")))?;

    // The declared size can lie; the bounded read below is what enforces it.
    if part.size() > limit {
        return Err(oversized(part.size(), limit));
    }
    let mut xml = String::new();
    part.by_ref().take(limit + 1).read_to_string(&mut xml)?;
    if xml.len() as u64 > limit {
        return Err(oversized(xml.len() as u64, limit));
    }
    Ok(xml)
}

fn oversized(size: u64, limit: u64) -> ExtractionError {
    ExtractionError::Word(format!(
        "{DOCUMENT_PART} inflates to {size} bytes (limit {limit})"
    ))
}

/// Flattens WordprocessingML into text: runs are concatenated, paragraphs and
/// breaks become newlines, tabs stay tabs.
fn document_xml_to_text(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len() / 4);
    for caps in WORD_MARKUP.captures_iter(xml) {
        match caps.get(1) {
            Some(run) => out.push_str(&unescape_xml(run.as_str())),
            None if caps[0].starts_with("<w:tab") => out.push('\t'),
            None => out.push('\n'),
        }
    }
    out.trim().to_string()
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
