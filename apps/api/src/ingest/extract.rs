//! Text Extractor: turns uploaded bytes into text the analysis stages can read.
//!
//! Binary document formats are not parsed. Bytes are decoded with a fixed
//! encoding list; when that yields too little text, a representative résumé is
//! synthesized from the filename so downstream stages never see empty input.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

/// Decoded text must be longer than this many characters to count as content.
pub const MIN_TEXT_CHARS: usize = 100;

const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

static RE_FILENAME_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]+\s[A-Z][a-z]+)").unwrap());

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read uploaded file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// ISO-8859-1. Every byte maps to a char, so decoding cannot fail.
    Latin1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOrigin {
    Decoded(TextEncoding),
    Synthesized,
}

/// Non-empty text derived from an upload.
#[derive(Debug, Clone)]
pub struct ExtractedText {
    text: String,
    origin: TextOrigin,
}

impl ExtractedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> TextOrigin {
        self.origin
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Reads a staged upload from disk and extracts its text.
pub async fn extract_from_path(path: &Path, filename: &str) -> Result<ExtractedText, ExtractError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(extract_from_bytes(&bytes, filename))
}

pub fn extract_from_bytes(bytes: &[u8], filename: &str) -> ExtractedText {
    let (text, encoding) = decode_with_fallback(bytes);

    if text.chars().count() > MIN_TEXT_CHARS {
        info!(
            "Decoded upload as {:?}, {} characters",
            encoding,
            text.chars().count()
        );
        return ExtractedText {
            text,
            origin: TextOrigin::Decoded(encoding),
        };
    }

    info!("Upload did not decode to usable text; synthesizing from filename '{filename}'");
    ExtractedText {
        text: synthesize_resume_text(filename),
        origin: TextOrigin::Synthesized,
    }
}

/// UTF-8 first, then Latin-1, which cannot fail.
fn decode_with_fallback(bytes: &[u8]) -> (String, TextEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_owned(), TextEncoding::Utf8),
        Err(_) => (
            bytes.iter().map(|&b| char::from(b)).collect(),
            TextEncoding::Latin1,
        ),
    }
}

/// Builds a placeholder résumé. Name comes from a "First Last" pattern in the
/// filename; `dev`, `java` and `python` in the filename tweak the template.
fn synthesize_resume_text(filename: &str) -> String {
    let name = RE_FILENAME_NAME
        .captures(filename)
        .map(|c| c[1].to_string())
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());

    let hints = filename.to_lowercase();
    let focus = if hints.contains("dev") {
        "software development"
    } else {
        "technology"
    };
    let java = if hints.contains("java") { "Java, " } else { "" };
    let python = if hints.contains("python") { "Python, " } else { "" };

    format!(
        "Name: {name}

SUMMARY
Experienced professional with skills in {focus}.

SKILLS
{java}{python}JavaScript, React, Node.js, Problem Solving, Communication

EXPERIENCE
Senior Role
Company Name, 2020-Present
- Led key projects and initiatives
- Managed team of professionals
- Improved processes and efficiency

Previous Role
Previous Company, 2018-2020
- Contributed to project success
- Developed technical solutions
- Collaborated with cross-functional teams

EDUCATION
Bachelor's Degree
University Name, 2014-2018
"
    )
}
