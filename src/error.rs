use std::fmt;

/// Errors raised by [`Document::parse`][crate::Document::parse] when `throw_errors` is enabled.
///
/// In lenient mode none of these are produced; malformed input is repaired or kept as literal text instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input ended while `tag` was still open.
    MissingEndTag { tag: String },
    /// A block level `tag` was opened inside the inline tag `parent`.
    InvalidNesting { tag: String, parent: String },
}

impl ParseError {
    /// The tag the error is about.
    pub fn tag(&self) -> &str {
        match self {
            ParseError::MissingEndTag { tag } => tag,
            ParseError::InvalidNesting { tag, .. } => tag,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingEndTag { tag } => write!(f, "Missing closing tag for tag [{}]", tag),
            ParseError::InvalidNesting { tag, parent } => write!(
                f,
                "Block level tag [{}] was opened within an inline tag [{}]",
                tag, parent
            ),
        }
    }
}

impl std::error::Error for ParseError {}
