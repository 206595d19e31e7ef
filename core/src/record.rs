use crate::error::{IndexError, Result};

/// Field separator of the line-oriented corpus format (ASCII 3).
pub const RECORD_SEPARATOR: char = '\u{3}';

/// One corpus line: title, url and markup-free body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub url: String,
    pub body: String,
}

impl Record {
    pub fn new(title: impl Into<String>, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), body: body.into() }
    }

    /// Split a raw corpus line. `line_no` is only used for error reporting.
    pub fn parse(line_no: usize, raw: &str) -> Result<Self> {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let fields: Vec<&str> = raw.split(RECORD_SEPARATOR).collect();
        match fields.as_slice() {
            [title, url, body] => Ok(Self::new(*title, *url, *body)),
            _ => Err(IndexError::MalformedRecord { line: line_no, fields: fields.len() }),
        }
    }

    /// Encode as a single corpus line (without the trailing newline).
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            sanitize(&self.title),
            sanitize(&self.url),
            sanitize(&self.body),
            sep = RECORD_SEPARATOR
        )
    }
}

// Separator and line breaks would change the field count of the encoded line.
fn sanitize(field: &str) -> String {
    field
        .chars()
        .map(|c| if c == RECORD_SEPARATOR || c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
