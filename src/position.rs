//! Lazy source-line lookup, used only to decorate CLI-facing diagnostics with the
//! offending line's text.
//!
//! Scan errors already carry a 1-based line number; splitting the whole source into lines
//! up front is wasted work on the success path, which is the overwhelmingly common case.
//! [Position] defers that split until a diagnostic actually needs it.
use once_cell::unsync::OnceCell;

/// Borrowed source text with a lazily-built index of line boundaries.
pub struct Position<'a> {
    source: &'a str,
    lines: OnceCell<Vec<&'a str>>,
}

impl<'a> Position<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: OnceCell::new(),
        }
    }

    fn lines(&self) -> &Vec<&'a str> {
        self.lines.get_or_init(|| self.source.lines().collect())
    }

    /// The text of 1-based `line`, or `None` if it's out of range.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        line.checked_sub(1).and_then(|index| self.lines().get(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_one_based_line_numbers() {
        let pos = Position::new("first\nsecond\nthird");
        assert_eq!(pos.line_text(1), Some("first"));
        assert_eq!(pos.line_text(2), Some("second"));
        assert_eq!(pos.line_text(3), Some("third"));
    }

    #[test]
    fn out_of_range_line_is_none() {
        let pos = Position::new("only one line");
        assert_eq!(pos.line_text(0), None);
        assert_eq!(pos.line_text(2), None);
    }

    #[test]
    fn index_is_built_lazily_and_reused() {
        let pos = Position::new("a\nb");
        assert!(pos.lines.get().is_none());
        pos.line_text(1);
        assert!(pos.lines.get().is_some());
    }
}
