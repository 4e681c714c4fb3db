use std::ops::Range;

use thiserror::Error;

/// Byte range into the data sheet source.
pub type Span = Range<usize>;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not read data sheet: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected four bit groups followed by a handler name, found {found} token(s)")]
    MalformedLine {
        line: usize,
        found: usize,
        span: Span,
    },

    #[error("Template \"{template}\" is {len} characters long, expected 16")]
    TemplateLength {
        line: usize,
        template: String,
        len: usize,
        span: Span,
    },

    #[error("Invalid template character {ch:?} (only '0', '1' and letters are allowed)")]
    InvalidCharacter { line: usize, ch: char, span: Span },

    #[error("Invalid handler name \"{name}\"")]
    InvalidHandler {
        line: usize,
        name: String,
        span: Span,
    },
}

pub type Result<T> = std::result::Result<T, ParseError>;

impl ParseError {
    /// The 1-based source line the error was found on.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::MalformedLine { line, .. }
            | ParseError::TemplateLength { line, .. }
            | ParseError::InvalidCharacter { line, .. }
            | ParseError::InvalidHandler { line, .. } => Some(*line),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Io(_) => None,
            ParseError::MalformedLine { span, .. }
            | ParseError::TemplateLength { span, .. }
            | ParseError::InvalidCharacter { span, .. }
            | ParseError::InvalidHandler { span, .. } => Some(span.clone()),
        }
    }
}
