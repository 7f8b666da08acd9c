//! Payload Decoder: pulls the single uploaded file out of a `multipart/form-data` body.
//!
//! This is deliberately narrow: one file part, ASCII boundary, no nested
//! multipart. Anything outside that envelope is a `MultipartError`, never a panic.
//!
//! The body is walked by a three-state machine:
//!
//! ```text
//! SeekingPart --delimiter--> InHeaders --filename + CRLFCRLF--> InBody --CRLF delimiter--> done
//!      ^                         |
//!      +------ no filename ------+
//! ```
//!
//! A part body only ends at `CRLF--boundary`. A `--boundary` sequence inside
//! binary content that is not preceded by CRLF is ordinary content.

use bytes::Bytes;
use thiserror::Error;

const CRLF: &[u8] = b"\r\n";
const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";
/// RFC 2046 upper bound on boundary length.
const MAX_BOUNDARY_LEN: usize = 70;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("missing Content-Type header")]
    MissingContentType,

    #[error("expected multipart/form-data, got '{0}'")]
    NotMultipart(String),

    #[error("multipart Content-Type has no boundary parameter")]
    MissingBoundary,

    #[error("multipart boundary is empty, too long, or not printable ASCII")]
    InvalidBoundary,

    #[error("no file uploaded")]
    NoFilePart,

    #[error("no file selected")]
    EmptyFilename,

    #[error("file part has no blank line between headers and content")]
    MissingHeaderSeparator,

    #[error("file part is not terminated by a closing boundary")]
    UnterminatedPart,
}

/// The uploaded file, borrowed from the request body without copying.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Headers of one body part that matter to the decoder.
#[derive(Debug, Default, PartialEq)]
struct PartHeaders {
    filename: Option<String>,
    content_type: Option<String>,
}

enum State {
    SeekingPart { from: usize },
    InHeaders { start: usize },
    InBody {
        start: usize,
        end: Option<usize>,
        headers: PartHeaders,
    },
}

/// Reads the boundary token out of a request `Content-Type` header value.
pub fn boundary_from_content_type(content_type: &str) -> Result<String, MultipartError> {
    let mut params = content_type.split(';');
    let media_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    if !media_type.starts_with("multipart/") {
        return Err(MultipartError::NotMultipart(content_type.to_string()));
    }

    let boundary = params
        .filter_map(|p| p.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .ok_or(MultipartError::MissingBoundary)?;

    let printable = boundary.bytes().all(|b| b == b' ' || b.is_ascii_graphic());
    if boundary.is_empty() || boundary.len() > MAX_BOUNDARY_LEN || !printable {
        return Err(MultipartError::InvalidBoundary);
    }

    Ok(boundary)
}

/// Locates the first part carrying a `filename` attribute and returns its content.
pub fn decode_upload(body: &Bytes, boundary: &str) -> Result<UploadedFile, MultipartError> {
    let delimiter = format!("--{boundary}");
    let body_end_delimiter = format!("\r\n--{boundary}");
    let delimiter = delimiter.as_bytes();
    let body_end_delimiter = body_end_delimiter.as_bytes();

    let mut state = State::SeekingPart { from: 0 };

    loop {
        state = match state {
            State::SeekingPart { from } => {
                let pos = find(body, delimiter, from).ok_or(MultipartError::NoFilePart)?;
                let after = pos + delimiter.len();
                if body[after..].starts_with(b"--") {
                    // Closing delimiter: every part has been seen.
                    return Err(MultipartError::NoFilePart);
                }
                State::InHeaders {
                    start: skip_to_next_line(body, after),
                }
            }

            State::InHeaders { start } => {
                let part_end = find(body, body_end_delimiter, start);
                let limit = part_end.unwrap_or(body.len());

                // A part with no headers starts directly with the blank line.
                let separator = if body[start..limit].starts_with(CRLF) {
                    Some((start, start + CRLF.len()))
                } else {
                    find(&body[..limit], HEADER_SEPARATOR, start)
                        .map(|pos| (pos, pos + HEADER_SEPARATOR.len()))
                };

                let header_end = separator.map(|(end, _)| end).unwrap_or(limit);
                let headers = PartHeaders::parse(&body[start..header_end]);

                match (headers.filename.is_some(), separator) {
                    // The separator lies before `part_end`, so the first
                    // delimiter after the headers also ends the content.
                    (true, Some((_, content_start))) => State::InBody {
                        start: content_start,
                        end: part_end,
                        headers,
                    },
                    (true, None) => return Err(MultipartError::MissingHeaderSeparator),
                    (false, _) => match part_end {
                        Some(pos) => State::SeekingPart {
                            from: pos + CRLF.len(),
                        },
                        None => return Err(MultipartError::NoFilePart),
                    },
                }
            }

            State::InBody {
                start,
                end,
                headers,
            } => {
                let end = end.ok_or(MultipartError::UnterminatedPart)?;
                let filename = headers.filename.unwrap_or_default();
                if filename.is_empty() {
                    return Err(MultipartError::EmptyFilename);
                }
                return Ok(UploadedFile {
                    filename,
                    content_type: headers.content_type,
                    bytes: body.slice(start..end),
                });
            }
        };
    }
}

impl PartHeaders {
    fn parse(block: &[u8]) -> Self {
        let text = String::from_utf8_lossy(block);
        let mut headers = PartHeaders::default();

        for line in text.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.eq_ignore_ascii_case("content-disposition") {
                headers.filename = filename_param(value).map(|f| base_name(&f).to_string());
            } else if name.eq_ignore_ascii_case("content-type") {
                headers.content_type = Some(value.trim().to_string());
            }
        }

        headers
    }
}

/// Extracts the `filename` parameter of a Content-Disposition value.
/// Quoted values may contain `;` and `\"`. Browsers send any other backslash
/// as-is (Windows client paths), so it stays literal.
fn filename_param(disposition: &str) -> Option<String> {
    let lower = disposition.to_ascii_lowercase();
    let mut search_from = 0;
    let value_start = loop {
        let idx = search_from + lower[search_from..].find("filename=")?;
        // Reject matches that are the tail of a longer parameter name.
        let preceded_ok = lower[..idx]
            .chars()
            .last()
            .map_or(true, |c| c == ';' || c.is_whitespace());
        if preceded_ok {
            break idx + "filename=".len();
        }
        search_from = idx + 1;
    };

    let rest = &disposition[value_start..];
    if let Some(quoted) = rest.strip_prefix('"') {
        let mut value = String::new();
        let mut chars = quoted.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&'"') => value.extend(chars.next()),
                '"' => return Some(value),
                _ => value.push(c),
            }
        }
        // Unterminated quote: take what was there.
        Some(value)
    } else {
        Some(rest.split(';').next().unwrap_or_default().trim().to_string())
    }
}

/// Browsers on some platforms send the full client path; keep the last component.
fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
}

fn skip_to_next_line(body: &[u8], from: usize) -> usize {
    // Transport padding (spaces/tabs) may follow a delimiter before its CRLF.
    let mut pos = from;
    while pos < body.len() && matches!(body[pos], b' ' | b'\t') {
        pos += 1;
    }
    if body[pos..].starts_with(CRLF) {
        pos + CRLF.len()
    } else if body[pos..].starts_with(b"\n") {
        pos + 1
    } else {
        pos
    }
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

    fn body(parts: &[&[u8]]) -> Bytes {
        let mut out = Vec::new();
        for part in parts {
            out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            out.extend_from_slice(part);
            out.extend_from_slice(b"\r\n");
        }
        out.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Bytes::from(out)
    }

    fn file_part(filename: &str, content: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "Content-Disposition: form-data; name=\"resume\"; filename=\"{filename}\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        part.extend_from_slice(content);
        part
    }

    #[test]
    fn test_boundary_from_content_type() {
        let ct = format!("multipart/form-data; boundary={BOUNDARY}");
        assert_eq!(boundary_from_content_type(&ct).unwrap(), BOUNDARY);
    }

    #[test]
    fn test_boundary_quoted_and_case_insensitive() {
        let ct = "Multipart/Form-Data; charset=utf-8; BOUNDARY=\"abc def\"";
        assert_eq!(boundary_from_content_type(ct).unwrap(), "abc def");
    }

    #[test]
    fn test_boundary_rejects_non_multipart() {
        assert!(matches!(
            boundary_from_content_type("application/json"),
            Err(MultipartError::NotMultipart(_))
        ));
    }

    #[test]
    fn test_boundary_missing() {
        assert_eq!(
            boundary_from_content_type("multipart/form-data"),
            Err(MultipartError::MissingBoundary)
        );
    }

    #[test]
    fn test_boundary_non_ascii_is_invalid() {
        assert_eq!(
            boundary_from_content_type("multipart/form-data; boundary=grenzé"),
            Err(MultipartError::InvalidBoundary)
        );
    }

    #[test]
    fn test_decode_single_file_part() {
        let b = body(&[&file_part("resume.txt", b"hello world")]);
        let file = decode_upload(&b, BOUNDARY).unwrap();
        assert_eq!(file.filename, "resume.txt");
        assert_eq!(file.content_type.as_deref(), Some("text/plain"));
        assert_eq!(&file.bytes[..], b"hello world");
    }

    #[test]
    fn test_decode_skips_plain_fields_before_file() {
        let field = b"Content-Disposition: form-data; name=\"note\"\r\n\r\njust a field".to_vec();
        let b = body(&[&field, &file_part("cv.pdf", b"%PDF-1.4 data")]);
        let file = decode_upload(&b, BOUNDARY).unwrap();
        assert_eq!(file.filename, "cv.pdf");
        assert_eq!(&file.bytes[..], b"%PDF-1.4 data");
    }

    #[test]
    fn test_decode_keeps_boundary_lookalike_inside_binary_content() {
        let mut content = vec![0x00, 0xff, 0x10];
        content.extend_from_slice(format!("--{BOUNDARY}").as_bytes());
        content.extend_from_slice(&[0x7f, 0x80]);
        let b = body(&[&file_part("blob.bin", &content)]);
        let file = decode_upload(&b, BOUNDARY).unwrap();
        assert_eq!(&file.bytes[..], &content[..]);
    }

    #[test]
    fn test_decode_preserves_trailing_crlf_in_content() {
        let b = body(&[&file_part("notes.txt", b"line one\r\n")]);
        let file = decode_upload(&b, BOUNDARY).unwrap();
        assert_eq!(&file.bytes[..], b"line one\r\n");
    }

    #[test]
    fn test_decode_without_filename_is_no_file_part() {
        let field = b"Content-Disposition: form-data; name=\"resume\"\r\n\r\nplain text".to_vec();
        let b = body(&[&field]);
        assert_eq!(
            decode_upload(&b, BOUNDARY).unwrap_err(),
            MultipartError::NoFilePart
        );
    }

    #[test]
    fn test_decode_name_param_is_not_mistaken_for_filename() {
        let field = b"Content-Disposition: form-data; myfilename=\"x\"\r\n\r\nv".to_vec();
        let b = body(&[&field]);
        assert_eq!(
            decode_upload(&b, BOUNDARY).unwrap_err(),
            MultipartError::NoFilePart
        );
    }

    #[test]
    fn test_decode_empty_filename() {
        let b = body(&[&file_part("", b"content")]);
        assert_eq!(
            decode_upload(&b, BOUNDARY).unwrap_err(),
            MultipartError::EmptyFilename
        );
    }

    #[test]
    fn test_decode_missing_header_separator() {
        let raw = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\nbody\r\n--{BOUNDARY}--\r\n"
        );
        assert_eq!(
            decode_upload(&Bytes::from(raw), BOUNDARY).unwrap_err(),
            MultipartError::MissingHeaderSeparator
        );
    }

    #[test]
    fn test_decode_unterminated_part() {
        let raw = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\n\r\nno end"
        );
        assert_eq!(
            decode_upload(&Bytes::from(raw), BOUNDARY).unwrap_err(),
            MultipartError::UnterminatedPart
        );
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(
            decode_upload(&Bytes::new(), BOUNDARY).unwrap_err(),
            MultipartError::NoFilePart
        );
    }

    #[test]
    fn test_decode_strips_client_path_from_filename() {
        let b = body(&[&file_part("C:\\Users\\jane\\Jane Doe.docx", b"x")]);
        assert_eq!(decode_upload(&b, BOUNDARY).unwrap().filename, "Jane Doe.docx");
    }

    #[test]
    fn test_filename_param_with_semicolon_and_escape() {
        assert_eq!(
            filename_param(" form-data; name=\"f\"; filename=\"a;b \\\"c\\\".txt\"").as_deref(),
            Some("a;b \"c\".txt")
        );
    }

    #[test]
    fn test_filename_param_keeps_path_backslashes() {
        assert_eq!(
            filename_param(" form-data; filename=\"C:\\cv\\new.txt\"").as_deref(),
            Some("C:\\cv\\new.txt")
        );
    }

    #[test]
    fn test_decode_content_ends_at_first_delimiter() {
        let field = b"Content-Disposition: form-data; name=\"note\"\r\n\r\nafter".to_vec();
        let b = body(&[&file_part("cv.txt", b"first"), &field]);
        let file = decode_upload(&b, BOUNDARY).unwrap();
        assert_eq!(&file.bytes[..], b"first");
    }

    #[test]
    fn test_filename_param_unquoted() {
        assert_eq!(
            filename_param(" form-data; filename=cv.txt; size=3").as_deref(),
            Some("cv.txt")
        );
    }
}
