//! Response Normalizer: recovers a JSON object from near-miss model output.
//!
//! Model text is untrusted. Recovery runs a fixed sequence and stops at the
//! first success, so it always terminates in a bounded number of steps:
//!
//! 1. Take the interior of a ```` ``` ```` / ```` ```json ```` fence, else the trimmed text.
//! 2. Strip `//` comments and parse strictly.
//! 3. Repair (crop to the outer braces, strip comments, quote bare keys,
//!    convert single quotes, drop trailing commas, collapse whitespace, wrap
//!    in braces) and parse strictly again.
//!
//! Only syntax is recovered here. Whether the object matches the analysis
//! schema is decided by the caller.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

static RE_FENCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n?(.*?)```").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("no JSON object could be recovered: {0}")]
    Unrecoverable(#[source] serde_json::Error),
}

/// Which stage produced the object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStage {
    Direct,
    Repaired,
}

#[derive(Debug)]
pub struct Recovered {
    pub object: Map<String, Value>,
    pub stage: RecoveryStage,
}

pub fn normalize(raw: &str) -> Result<Recovered, NormalizeError> {
    let candidate = fenced_interior(raw);

    if let Some(object) = parse_object(&strip_comments(&candidate, false)) {
        return Ok(Recovered {
            object,
            stage: RecoveryStage::Direct,
        });
    }

    let repaired = repair(&candidate);
    serde_json::from_str::<Map<String, Value>>(&repaired)
        .map(|object| Recovered {
            object,
            stage: RecoveryStage::Repaired,
        })
        .map_err(NormalizeError::Unrecoverable)
}

fn fenced_interior(raw: &str) -> String {
    RE_FENCED
        .captures(raw)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Strict parse that only accepts a top-level object.
fn parse_object(text: &str) -> Option<Map<String, Value>> {
    serde_json::from_str(text).ok()
}

fn repair(candidate: &str) -> String {
    let cropped = crop_to_braces(candidate);
    let s = strip_comments(cropped, true);
    let s = requote(&s);
    let s = RE_WHITESPACE.replace_all(&s, " ").trim().to_string();

    let mut wrapped = String::with_capacity(s.len() + 2);
    if !s.starts_with('{') {
        wrapped.push('{');
    }
    wrapped.push_str(&s);
    if !s.ends_with('}') {
        wrapped.push('}');
    }
    wrapped
}

/// Drops everything before the first `{` and after the last `}`.
fn crop_to_braces(text: &str) -> &str {
    let start = text.find('{').unwrap_or(text.len());
    let rest = &text[start..];
    match rest.rfind('}') {
        Some(end) => &rest[..=end],
        None => "",
    }
}

/// Removes `//` line comments (and `/* */` block comments when asked),
/// leaving comment markers inside string literals untouched.
fn strip_comments(text: &str, block_comments: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                out.extend(chars.next());
            } else if c == q {
                quote = None;
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"' | '\'', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&n| n != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) if block_comments => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Token-level repairs outside string literals: quotes bare keys that follow
/// `{` or `,`, rewrites `'...'` literals as `"..."` (escaping any `"` they
/// contain) and drops commas before `]` or `}`. Double-quoted string contents
/// pass through unchanged, apostrophes included.
fn requote(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut quote: Option<char> = None;
    // Last non-whitespace char emitted outside a string literal.
    let mut last = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            match c {
                '\\' => match chars.get(i + 1).copied() {
                    Some('\'') if q == '\'' => {
                        out.push('\'');
                        i += 1;
                    }
                    Some(n) => {
                        out.push('\\');
                        out.push(n);
                        i += 1;
                    }
                    None => out.push('\\'),
                },
                '"' if q == '\'' => out.push_str("\\\""),
                _ if c == q => {
                    quote = None;
                    out.push('"');
                    last = Some('"');
                }
                _ => out.push(c),
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push('"');
            }
            ',' if matches!(next_significant(&chars, i + 1), Some(']' | '}')) => {}
            _ if is_ident_start(c) && matches!(last, Some('{' | ',')) => {
                let end = chars[i..]
                    .iter()
                    .position(|&n| !is_ident_char(n))
                    .map_or(chars.len(), |p| i + p);
                let ident: String = chars[i..end].iter().collect();
                if next_significant(&chars, end) == Some(':') {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
                last = Some(chars[end - 1]);
                i = end;
                continue;
            }
            _ => {
                out.push(c);
                if !c.is_whitespace() {
                    last = Some(c);
                }
            }
        }
        i += 1;
    }

    out
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars.get(from..)?.iter().copied().find(|c| !c.is_whitespace())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
