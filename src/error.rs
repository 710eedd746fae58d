//! Flat, `Display`-implementing error types used throughout the scanner.
//!
//! No `thiserror`: errors here are small enough to write by hand, matching the teacher's
//! own `ImplementationError`/`ParseError` style.
use std::fmt::{Display, Formatter};

/// The kind of failure a [ScanError] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// A malformed token: unterminated string or block comment.
    Tokenization,
    /// A required symbol (e.g. `;`, `)`) was missing.
    RequiredSymbolMissing,
    /// A declaration that must be named (class, enum, function) had none.
    MissingName,
    /// A token appeared where the grammar expected something else.
    UnexpectedToken,
    /// The scope stack exceeded its fixed capacity.
    ScopeOverflow,
}

impl Display for ScanErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ScanErrorKind::Tokenization => "tokenization error",
            ScanErrorKind::RequiredSymbolMissing => "required symbol missing",
            ScanErrorKind::MissingName => "missing name",
            ScanErrorKind::UnexpectedToken => "unexpected token",
            ScanErrorKind::ScopeOverflow => "scope overflow",
        };
        write!(f, "{}", label)
    }
}

/// A single scan error: what went wrong, where, and a human-readable message.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub line: usize,
    pub message: String,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, line: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            message: message.into(),
        }
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ line {}: {}", self.kind, self.line, self.message)
    }
}

impl std::error::Error for ScanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_line_and_message() {
        let err = ScanError::new(ScanErrorKind::MissingName, 12, "class has no name");
        assert_eq!(err.to_string(), "missing name @ line 12: class has no name");
    }
}
