//! Character-level lexical analysis.
//!
//! [Tokenizer] walks a borrowed source buffer one byte at a time, transparently skipping
//! whitespace and `//`/`/* */` comments, and produces [Token]s on demand. It never buffers
//! the whole token stream: callers pull tokens one at a time, with a single-slot `unget`
//! at both the character and token granularity.
use crate::token::{ConstKind, ConstValue, Token, TokenKind};
use crate::util::Log;

/// Sentinel byte returned by the internal character reader at end of input.
///
/// Source text containing a literal NUL is not a supported input, exactly as in the
/// original scanner this one is modeled on.
const EOF: u8 = 0;

const TWO_CHAR_SYMBOLS: &[&str] = &[
    "<<", ">>", "->", "!=", "<=", ">=", "++", "--", "+=", "-=", "*=", "/=", "^=", "|=", "&=",
    "~=", "%=", "&&", "||", "==", "::",
];

/// A comment block gathered while skipping whitespace before a token.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub start_line: usize,
    pub end_line: usize,
}

#[derive(Debug, Default)]
struct CommentAccumulator {
    lines: Vec<String>,
    start_line: Option<usize>,
    end_line: usize,
    last_line_indent: Option<usize>,
}

impl CommentAccumulator {
    fn push_line_comment(&mut self, indent: usize, text: &str, line: usize) {
        let trimmed = text.trim();
        if self.start_line.is_none() {
            self.start_line = Some(line);
        }
        self.end_line = line;

        let continuation = self.last_line_indent.is_some_and(|prev| indent > prev);
        if continuation {
            match self.lines.last_mut() {
                Some(last) if !trimmed.is_empty() => {
                    if !last.is_empty() {
                        last.push(' ');
                    }
                    last.push_str(trimmed);
                }
                _ => self.lines.push(trimmed.to_string()),
            }
        } else {
            self.lines.push(trimmed.to_string());
        }
        self.last_line_indent = Some(indent);
    }

    fn push_block_comment(&mut self, raw: &str, start_line: usize, end_line: usize) {
        if self.start_line.is_none() {
            self.start_line = Some(start_line);
        }
        self.end_line = end_line;

        let mut lines: Vec<String> = raw
            .split('\n')
            .map(|line| line.trim_start().trim_start_matches('*').trim().to_string())
            .collect();
        while matches!(lines.last(), Some(l) if l.is_empty()) {
            lines.pop();
        }
        self.lines.extend(lines);
        self.last_line_indent = None;
    }

    fn is_empty(&self) -> bool {
        self.start_line.is_none()
    }

    fn take(&mut self) -> Option<Comment> {
        if self.is_empty() {
            return None;
        }
        let comment = Comment {
            text: self.lines.join("\n"),
            start_line: self.start_line.unwrap(),
            end_line: self.end_line,
        };
        *self = CommentAccumulator::default();
        Some(comment)
    }
}

/// A cursor-driven, restartable character and token stream over a borrowed input buffer.
pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    prev_pos: usize,
    prev_line: usize,
    current_comment: CommentAccumulator,
    last_comment: Option<Comment>,
    has_error: bool,
    debug: Log<&'static str>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut tokenizer = Self {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            prev_pos: 0,
            prev_line: 1,
            current_comment: CommentAccumulator::default(),
            last_comment: None,
            has_error: false,
            debug: Log::None,
        };
        tokenizer.reset(input, 1);
        tokenizer
    }

    pub fn set_log(&mut self, log: Log<&'static str>) {
        self.debug = log;
    }

    /// Reset the tokenizer to scan `input` from scratch, starting line numbering at
    /// `starting_line`.
    pub fn reset(&mut self, input: &'a str, starting_line: usize) {
        self.input = input.as_bytes();
        self.pos = 0;
        self.line = starting_line;
        self.prev_pos = 0;
        self.prev_line = starting_line;
        self.current_comment = CommentAccumulator::default();
        self.last_comment = None;
        self.has_error = false;
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn current_line(&self) -> usize {
        self.line
    }

    /// The most recently completed comment block, if the whitespace skipped just before
    /// the current cursor position contained one.
    pub fn last_comment(&self) -> Option<&Comment> {
        self.last_comment.as_ref()
    }

    /// Record a sticky tokenization error and report it to standard error.
    pub fn error(&mut self, message: impl Into<String>) -> bool {
        self.has_error = true;
        let message = message.into();
        eprintln!("error: {} @ line {}", message, self.line);
        self.debug.trace_error(self.line, &message);
        false
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_byte(&self) -> u8 {
        if self.pos < self.input.len() {
            self.input[self.pos]
        } else {
            EOF
        }
    }

    fn peek_byte_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.input.len() {
            self.input[idx]
        } else {
            EOF
        }
    }

    /// Read and consume the next raw byte, recording the pre-read cursor so the caller can
    /// recover the exact start offset/line of whatever byte this call returns.
    fn raw_char(&mut self) -> u8 {
        self.prev_pos = self.pos;
        self.prev_line = self.line;

        if self.pos < self.input.len() {
            let c = self.input[self.pos];
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
            }
            c
        } else {
            self.pos += 1;
            EOF
        }
    }

    fn unget_token_inner(&mut self, start_offset: usize, start_line: usize) {
        self.pos = start_offset;
        self.line = start_line;
    }

    /// Reset the cursor to the start of `token`, as if it had never been read.
    pub fn unget_token(&mut self, token: &Token) {
        self.unget_token_inner(token.start_offset, token.start_line);
    }

    /// Consume raw characters through the next newline (or end of input), bypassing
    /// tokenization. Used by preprocessor-directive skipping. Returns the last character
    /// consumed before the newline, so a caller can detect a trailing `\` continuation.
    pub fn skip_to_end_of_line(&mut self) -> u8 {
        let mut last = EOF;
        loop {
            if self.is_eof() {
                break;
            }
            let c = self.raw_char();
            if c == b'\n' {
                break;
            }
            last = c;
        }
        last
    }

    /// Skip whitespace and comments, returning the next significant character (already
    /// consumed) or [EOF] if the input is exhausted.
    fn leading_char(&mut self) -> u8 {
        let mut line_indent = 0usize;
        loop {
            if self.is_eof() {
                self.current_comment.take().map(|c| self.last_comment = Some(c));
                return EOF;
            }
            let c = self.raw_char();
            match c {
                b' ' | b'\t' | b'\r' => line_indent += 1,
                b'\n' => line_indent = 0,
                b'/' if self.peek_byte() == b'/' => {
                    self.raw_char();
                    self.consume_line_comment(line_indent);
                    line_indent = 0;
                }
                b'/' if self.peek_byte() == b'*' => {
                    self.raw_char();
                    self.consume_block_comment();
                    line_indent = 0;
                }
                _ => {
                    if let Some(comment) = self.current_comment.take() {
                        self.last_comment = Some(comment);
                    }
                    return c;
                }
            }
        }
    }

    fn consume_line_comment(&mut self, indent: usize) {
        let start_line = self.line;
        let mut text = String::new();
        loop {
            if self.is_eof() {
                break;
            }
            let c = self.peek_byte();
            if c == b'\n' {
                break;
            }
            self.raw_char();
            text.push(c as char);
        }
        self.current_comment.push_line_comment(indent, &text, start_line);
    }

    fn consume_block_comment(&mut self) {
        let start_line = self.line;
        let mut text = String::new();
        loop {
            if self.is_eof() {
                self.error("unterminated block comment");
                break;
            }
            let c = self.raw_char();
            if c == b'*' && self.peek_byte() == b'/' {
                self.raw_char();
                break;
            }
            text.push(c as char);
        }
        let end_line = self.line;
        self.current_comment.push_block_comment(&text, start_line, end_line);
    }

    /// Parse the next token, or `None` at end of input.
    ///
    /// `angle_brackets_for_strings` treats a leading `<` as a string literal closed by `>`
    /// (used by `#include <...>`). `separate_braces` suppresses the `>>` two-character
    /// symbol so nested template closings (`Template<U<V>>`) split into two `>` tokens.
    pub fn get_token(&mut self, angle_brackets_for_strings: bool, separate_braces: bool) -> Option<Token> {
        let c = self.leading_char();
        if c == EOF && self.is_eof() {
            return None;
        }
        let start_offset = self.prev_pos;
        let start_line = self.prev_line;

        let token = if c.is_ascii_alphabetic() || c == b'_' {
            self.read_identifier(c, start_offset, start_line)
        } else if c.is_ascii_digit() || ((c == b'+' || c == b'-') && self.peek_byte().is_ascii_digit()) {
            self.read_number(c, start_offset, start_line)
        } else if c == b'"' {
            self.read_string(c, start_offset, start_line, b'"')
        } else if c == b'<' && angle_brackets_for_strings {
            self.read_string(c, start_offset, start_line, b'>')
        } else {
            self.read_symbol(c, start_offset, start_line, separate_braces)
        };

        self.debug.trace_token(token.start_line, &token.text);
        Some(token)
    }

    fn read_identifier(&mut self, first: u8, start_offset: usize, start_line: usize) -> Token {
        let mut text = String::new();
        text.push(first as char);
        loop {
            let c = self.peek_byte();
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.raw_char();
                text.push(c as char);
            } else {
                break;
            }
        }

        match text.as_str() {
            "true" => Token::constant(text, start_offset, start_line, ConstKind::Boolean, ConstValue::Boolean(true)),
            "false" => Token::constant(text, start_offset, start_line, ConstKind::Boolean, ConstValue::Boolean(false)),
            _ => Token::identifier(text, start_offset, start_line),
        }
    }

    fn read_number(&mut self, first: u8, start_offset: usize, start_line: usize) -> Token {
        let mut text = String::new();
        text.push(first as char);

        let mut is_hex = false;
        let mut is_float = false;

        loop {
            let c = self.peek_byte();
            if c.is_ascii_digit() {
                self.raw_char();
                text.push(c as char);
            } else if !is_hex && (c == b'x' || c == b'X') {
                self.raw_char();
                text.push(c as char);
                is_hex = true;
            } else if is_hex && c.is_ascii_hexdigit() {
                self.raw_char();
                text.push(c as char);
            } else if !is_float && c == b'.' {
                self.raw_char();
                text.push(c as char);
                is_float = true;
            } else {
                break;
            }
        }

        if self.peek_byte() == b'f' || self.peek_byte() == b'F' {
            self.raw_char();
            is_float = true;
        }

        let (const_kind, const_value) = decode_number(&text, is_float, is_hex);
        Token::constant(text, start_offset, start_line, const_kind, const_value)
    }

    fn read_string(&mut self, _first: u8, start_offset: usize, start_line: usize, closing: u8) -> Token {
        let mut text = String::new();
        loop {
            if self.is_eof() {
                self.error("unterminated string literal");
                break;
            }
            let c = self.raw_char();
            if c == closing {
                break;
            }
            if c == b'\\' {
                let escaped = self.raw_char();
                let decoded = match escaped {
                    b'n' => '\n',
                    b't' => '\t',
                    b'r' => '\r',
                    b'"' => '"',
                    other => other as char,
                };
                text.push(decoded);
            } else {
                text.push(c as char);
            }
        }
        Token::constant(text.clone(), start_offset, start_line, ConstKind::String, ConstValue::String(text))
    }

    fn read_symbol(&mut self, first: u8, start_offset: usize, start_line: usize, separate_braces: bool) -> Token {
        let mut text = String::new();
        text.push(first as char);

        let next = self.peek_byte();
        if next != EOF || !self.is_eof() {
            let candidate: String = [first as char, next as char].iter().collect();
            let suppress_shift = separate_braces && candidate == ">>";
            if !suppress_shift && TWO_CHAR_SYMBOLS.contains(&candidate.as_str()) {
                self.raw_char();
                text.push(next as char);
            }
        }

        Token::symbol(text, start_offset, start_line)
    }

    /// Parse the next token and require it to be an identifier, ungetting otherwise.
    pub fn get_identifier(&mut self) -> Option<Token> {
        let token = self.get_token(false, false)?;
        if token.kind == TokenKind::Identifier {
            Some(token)
        } else {
            self.unget_token(&token);
            None
        }
    }

    /// Parse the next token and require it to be a constant, ungetting otherwise.
    pub fn get_const(&mut self) -> Option<Token> {
        let token = self.get_token(false, false)?;
        if token.kind == TokenKind::Const {
            Some(token)
        } else {
            self.unget_token(&token);
            None
        }
    }

    pub fn match_identifier(&mut self, text: &str) -> bool {
        match self.get_token(false, false) {
            Some(token) if token.is_identifier(text) => true,
            Some(token) => {
                self.unget_token(&token);
                false
            }
            None => false,
        }
    }

    pub fn match_symbol(&mut self, text: &str) -> bool {
        self.match_symbol_inner(text, false)
    }

    /// Like [Self::match_symbol], but reads with `separate_braces = true` so a fused `>>`
    /// splits into two `>` tokens. Used to close nested template argument lists.
    pub fn match_symbol_separate_braces(&mut self, text: &str) -> bool {
        self.match_symbol_inner(text, true)
    }

    fn match_symbol_inner(&mut self, text: &str, separate_braces: bool) -> bool {
        match self.get_token(false, separate_braces) {
            Some(token) if token.is_symbol(text) => true,
            Some(token) => {
                self.unget_token(&token);
                false
            }
            None => false,
        }
    }

    pub fn require_identifier(&mut self, text: &str) -> bool {
        if self.match_identifier(text) {
            true
        } else {
            self.error(format!("expected identifier '{}'", text))
        }
    }

    pub fn require_symbol(&mut self, text: &str) -> bool {
        if self.match_symbol(text) {
            true
        } else {
            self.error(format!("expected symbol '{}'", text))
        }
    }

    /// Like [Self::require_symbol], but reads with `separate_braces = true`.
    pub fn require_symbol_separate_braces(&mut self, text: &str) -> bool {
        if self.match_symbol_separate_braces(text) {
            true
        } else {
            self.error(format!("expected symbol '{}'", text))
        }
    }
}

fn decode_number(text: &str, is_float: bool, is_hex: bool) -> (ConstKind, ConstValue) {
    if is_float {
        let value: f64 = text.parse().unwrap_or(0.0);
        return (ConstKind::Real, ConstValue::Real(value));
    }

    let negative = text.starts_with('-');
    let unsigned_text = text.trim_start_matches(['+', '-']);
    let digits = if is_hex {
        unsigned_text
            .trim_start_matches("0x")
            .trim_start_matches("0X")
    } else {
        unsigned_text
    };
    let radix = if is_hex { 16 } else { 10 };

    if !negative {
        if let Ok(v) = u32::from_str_radix(digits, radix) {
            return (ConstKind::UInt32, ConstValue::UInt32(v));
        }
        if let Ok(v) = u64::from_str_radix(digits, radix) {
            return (ConstKind::UInt64, ConstValue::UInt64(v));
        }
        (ConstKind::UInt64, ConstValue::UInt64(u64::MAX))
    } else {
        if let Ok(v) = i32::from_str_radix(digits, radix) {
            return (ConstKind::Int32, ConstValue::Int32(-v));
        }
        if let Ok(v) = i64::from_str_radix(digits, radix) {
            return (ConstKind::Int64, ConstValue::Int64(-v));
        }
        (ConstKind::Int64, ConstValue::Int64(i64::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_and_keywords() {
        let mut t = Tokenizer::new("foo_bar true false");
        let a = t.get_token(false, false).unwrap();
        assert_eq!(a.kind, TokenKind::Identifier);
        assert_eq!(a.text, "foo_bar");

        let b = t.get_token(false, false).unwrap();
        assert_eq!(b.as_bool(), Some(true));

        let c = t.get_token(false, false).unwrap();
        assert_eq!(c.as_bool(), Some(false));

        assert!(t.get_token(false, false).is_none());
    }

    #[test]
    fn unget_token_restores_cursor() {
        let mut t = Tokenizer::new("alpha beta");
        let first = t.get_token(false, false).unwrap();
        t.unget_token(&first);
        let again = t.get_token(false, false).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn numbers_decimal_hex_and_float() {
        let mut t = Tokenizer::new("42 -7 0xFF 0.5f");
        assert_eq!(t.get_token(false, false).unwrap().const_value, Some(ConstValue::UInt32(42)));
        assert_eq!(t.get_token(false, false).unwrap().const_value, Some(ConstValue::Int32(-7)));
        assert_eq!(t.get_token(false, false).unwrap().const_value, Some(ConstValue::UInt32(255)));
        assert_eq!(t.get_token(false, false).unwrap().const_value, Some(ConstValue::Real(0.5)));
    }

    #[test]
    fn string_literal_decodes_escapes() {
        let mut t = Tokenizer::new(r#""hello\nworld""#);
        let token = t.get_token(false, false).unwrap();
        assert_eq!(token.as_string(), Some("hello\nworld"));
    }

    #[test]
    fn angle_bracket_include_path() {
        let mut t = Tokenizer::new("<vector>");
        let token = t.get_token(true, false).unwrap();
        assert_eq!(token.as_string(), Some("vector"));
    }

    #[test]
    fn nested_template_closing_splits_shift() {
        let mut t = Tokenizer::new("Map<String, Vec<int>>");
        assert!(t.match_identifier("Map"));
        assert!(t.match_symbol("<"));
        assert!(t.match_identifier("String"));
        assert!(t.match_symbol(","));
        assert!(t.match_identifier("Vec"));
        assert!(t.match_symbol("<"));
        assert!(t.match_identifier("int"));
        // Without separate_braces the lexer would fuse this into a single `>>` token.
        let close1 = t.get_token(false, true).unwrap();
        assert_eq!(close1.text, ">");
        let close2 = t.get_token(false, true).unwrap();
        assert_eq!(close2.text, ">");
    }

    #[test]
    fn line_comment_attaches_as_last_comment_when_adjacent() {
        let mut t = Tokenizer::new("// hello\nfoo");
        let token = t.get_token(false, false).unwrap();
        assert_eq!(token.text, "foo");
        let comment = t.last_comment().unwrap();
        assert_eq!(comment.text, "hello");
        assert_eq!(comment.end_line, token.start_line - 1);
    }

    #[test]
    fn block_comment_strips_stars_and_leading_whitespace() {
        let mut t = Tokenizer::new("/**\n * line one\n * line two\n */\nfoo");
        let _ = t.get_token(false, false).unwrap();
        let comment = t.last_comment().unwrap();
        assert_eq!(comment.text, "\nline one\nline two");
    }

    #[test]
    fn two_char_symbols_are_fused() {
        let mut t = Tokenizer::new("-> == :: <=");
        assert_eq!(t.get_token(false, false).unwrap().text, "->");
        assert_eq!(t.get_token(false, false).unwrap().text, "==");
        assert_eq!(t.get_token(false, false).unwrap().text, "::");
        assert_eq!(t.get_token(false, false).unwrap().text, "<=");
    }
}
