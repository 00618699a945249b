//! Syntax errors in data documents, with source-annotated reports

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A syntax or schema error found while parsing a JSON or TOML document
#[derive(Error, Debug)]
#[error("{format} error at {span:?}: {message}")]
pub struct SyntaxError {
    pub format: &'static str,
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    /// Build from a serde_json error, converting its line/column into a byte span
    pub fn from_json(err: &serde_json::Error, source: &str) -> Self {
        let start = line_column_to_offset(source, err.line(), err.column());
        let end = (start + 1).min(source.len()).max(start);
        Self {
            format: "JSON",
            span: start..end,
            message: err.to_string(),
        }
    }

    /// Build from a TOML error, using its span when it has one
    pub fn from_toml(err: &toml::de::Error) -> Self {
        Self {
            format: "TOML",
            span: err.span().unwrap_or(0..0),
            message: err.message().to_string(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = char_span(source, &self.span);
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(format!("invalid {} document", self.format))
            .with_label(
                Label::new((filename, span))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Byte offset of a 1-based line and column; clamps to the source length
fn line_column_to_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

/// Convert a byte span into the char span ariadne labels are indexed by
fn char_span(source: &str, span: &Span) -> Span {
    let to_char = |byte: usize| {
        let mut end = byte.min(source.len());
        while !source.is_char_boundary(end) {
            end -= 1;
        }
        source[..end].chars().count()
    };
    to_char(span.start)..to_char(span.end)
}
