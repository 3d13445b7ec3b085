//! Cursor-based input reading.
//!
//! `StringReader` is the positional reader every parse runs on: a borrowed
//! window over the command input plus a byte cursor. All typed decoders
//! (strings, integers, floats, bools) live here; each failure carries the
//! cursor at the point of failure so callers can point at the offending spot.

use serde::{Deserialize, Serialize};

use crate::errors::{EdictError, ErrorKind};

/// Separator between individual arguments in a command input string.
pub const ARGUMENT_SEPARATOR: char = ' ';

/// Double quote, opening or closing a quoted string.
pub const SYNTAX_DOUBLE_QUOTE: char = '"';
/// Single quote, opening or closing a quoted string.
pub const SYNTAX_SINGLE_QUOTE: char = '\'';
/// Escape character inside quoted strings.
pub const SYNTAX_ESCAPE: char = '\\';

/// A half-open `[start, end)` range of byte offsets into a command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StringRange {
    pub start: usize,
    pub end: usize,
}

impl StringRange {
    /// A range covering `[start, end)`.
    pub fn between(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty range anchored at `pos`.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// The substring of `s` covered by this range.
    pub fn get<'a>(&self, s: &'a str) -> &'a str {
        &s[self.start..self.end]
    }

    /// The smallest range covering both `a` and `b`.
    pub fn encompassing(a: StringRange, b: StringRange) -> StringRange {
        StringRange {
            start: a.start.min(b.start),
            end: a.end.max(b.end),
        }
    }
}

/// Whether `c` may appear in a number token.
pub fn is_allowed_number(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == '-'
}

/// Whether `c` starts (and terminates) a quoted string.
pub fn is_quoted_string_start(c: char) -> bool {
    c == SYNTAX_DOUBLE_QUOTE || c == SYNTAX_SINGLE_QUOTE
}

/// Whether `c` may appear in an unquoted string.
pub fn is_allowed_in_unquoted_string(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' || c == '+'
}

/// Parses an integer token with base autodetection: a multi-digit token with
/// a leading zero is octal, anything else is decimal. So `010` is 8, and
/// `08` fails on the invalid octal digit.
fn parse_int_token(token: &str) -> Option<i64> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    if body.len() > 1 && body.starts_with('0') {
        let magnitude = u64::from_str_radix(&body[1..], 8).ok()?;
        if negative {
            0i64.checked_sub_unsigned(magnitude)
        } else {
            i64::try_from(magnitude).ok()
        }
    } else {
        token.parse().ok()
    }
}

/// A positional reader over a command input string.
///
/// The cursor is a byte offset and the only mutable state. Every syntax test
/// here is against ASCII bytes; UTF-8 continuation bytes (0x80..=0xBF) never
/// match any delimiter class, so byte-wise scanning is sound.
#[derive(Debug, Clone, Default)]
pub struct StringReader {
    string: String,
    cursor: usize,
}

impl StringReader {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            string: input.into(),
            cursor: 0,
        }
    }

    /// A reader positioned at `cursor`, so parsing may begin mid-string.
    pub fn at(input: impl Into<String>, cursor: usize) -> Self {
        Self {
            string: input.into(),
            cursor,
        }
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    pub fn total_len(&self) -> usize {
        self.string.len()
    }

    pub fn can_read(&self) -> bool {
        self.can_read_len(1)
    }

    pub fn can_read_len(&self, length: usize) -> bool {
        self.cursor + length <= self.string.len()
    }

    /// The next byte as a char, without advancing.
    pub fn peek(&self) -> char {
        self.string.as_bytes()[self.cursor] as char
    }

    /// Reads and consumes the next byte.
    pub fn read(&mut self) -> char {
        let c = self.string.as_bytes()[self.cursor] as char;
        self.cursor += 1;
        c
    }

    pub fn skip(&mut self) {
        self.cursor += 1;
    }

    /// The remaining input from the cursor to the end.
    pub fn remaining(&self) -> &str {
        &self.string[self.cursor..]
    }

    pub fn remaining_len(&self) -> usize {
        self.string.len() - self.cursor
    }

    fn error(&self, kind: ErrorKind) -> EdictError {
        EdictError::new(kind, self.string.clone(), self.cursor)
    }

    /// Reads while the next byte is in the unquoted-string set. May be empty.
    pub fn read_unquoted_string(&mut self) -> &str {
        let start = self.cursor;
        while self.can_read() && is_allowed_in_unquoted_string(self.peek()) {
            self.skip();
        }
        &self.string[start..self.cursor]
    }

    /// Reads a quoted string, honoring escape sequences.
    ///
    /// Empty input reads as the empty string. A missing opener is
    /// `ExpectedStartOfQuote`; a missing terminator is `ExpectedEndOfQuote`.
    pub fn read_quoted_string(&mut self) -> Result<String, EdictError> {
        if !self.can_read() {
            return Ok(String::new());
        }
        let next = self.peek();
        if !is_quoted_string_start(next) {
            return Err(self.error(ErrorKind::ExpectedStartOfQuote));
        }
        self.skip();
        self.read_string_until(next)
    }

    /// Reads until `terminator`, unescaping the terminator and the escape
    /// character. Any other escape rewinds onto the offending character.
    pub fn read_string_until(&mut self, terminator: char) -> Result<String, EdictError> {
        let mut result = String::new();
        let mut escaped = false;
        while self.can_read() {
            let c = self.read();
            if escaped {
                if c == terminator || c == SYNTAX_ESCAPE {
                    result.push(c);
                    escaped = false;
                } else {
                    self.cursor -= 1;
                    return Err(self.error(ErrorKind::InvalidEscape(c)));
                }
            } else if c == SYNTAX_ESCAPE {
                escaped = true;
            } else if c == terminator {
                return Ok(result);
            } else {
                result.push(c);
            }
        }
        Err(self.error(ErrorKind::ExpectedEndOfQuote))
    }

    /// Reads a quoted or unquoted string depending on the next byte.
    pub fn read_string(&mut self) -> Result<String, EdictError> {
        if !self.can_read() {
            return Ok(String::new());
        }
        let next = self.peek();
        if is_quoted_string_start(next) {
            self.skip();
            return self.read_string_until(next);
        }
        Ok(self.read_unquoted_string().to_string())
    }

    /// Reads a string and matches it case-insensitively against true/false.
    pub fn read_bool(&mut self) -> Result<bool, EdictError> {
        let start = self.cursor;
        let value = self.read_string()?;
        if value.is_empty() {
            return Err(self.error(ErrorKind::ExpectedBool));
        }
        if value.eq_ignore_ascii_case("true") {
            return Ok(true);
        }
        if value.eq_ignore_ascii_case("false") {
            return Ok(false);
        }
        self.cursor = start;
        Err(self.error(ErrorKind::InvalidBool(value)))
    }

    fn read_number_token(&mut self) -> &str {
        let start = self.cursor;
        while self.can_read() && is_allowed_number(self.peek()) {
            self.skip();
        }
        &self.string[start..self.cursor]
    }

    /// Reads an `i64` from the longest prefix of number bytes, detecting the
    /// base from the token (a leading zero selects octal).
    pub fn read_i64(&mut self) -> Result<i64, EdictError> {
        let start = self.cursor;
        let token = self.read_number_token().to_string();
        if token.is_empty() {
            return Err(self.error(ErrorKind::ExpectedInt));
        }
        match parse_int_token(&token) {
            Some(value) => Ok(value),
            None => {
                self.cursor = start;
                Err(self.error(ErrorKind::InvalidInt(token)))
            }
        }
    }

    /// Reads an `i32`; a value outside the 32-bit range is an invalid int.
    pub fn read_i32(&mut self) -> Result<i32, EdictError> {
        let start = self.cursor;
        let token = self.read_number_token().to_string();
        if token.is_empty() {
            return Err(self.error(ErrorKind::ExpectedInt));
        }
        match parse_int_token(&token).and_then(|value| i32::try_from(value).ok()) {
            Some(value) => Ok(value),
            None => {
                self.cursor = start;
                Err(self.error(ErrorKind::InvalidInt(token)))
            }
        }
    }

    /// Reads an `f64` from the longest prefix of number bytes.
    pub fn read_f64(&mut self) -> Result<f64, EdictError> {
        let start = self.cursor;
        let token = self.read_number_token().to_string();
        if token.is_empty() {
            return Err(self.error(ErrorKind::ExpectedFloat));
        }
        match token.parse::<f64>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.cursor = start;
                Err(self.error(ErrorKind::InvalidFloat(token)))
            }
        }
    }

    /// Reads an `f32` from the longest prefix of number bytes.
    pub fn read_f32(&mut self) -> Result<f32, EdictError> {
        let start = self.cursor;
        let token = self.read_number_token().to_string();
        if token.is_empty() {
            return Err(self.error(ErrorKind::ExpectedFloat));
        }
        match token.parse::<f32>() {
            Ok(value) => Ok(value),
            Err(_) => {
                self.cursor = start;
                Err(self.error(ErrorKind::InvalidFloat(token)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_read() {
        let mut r = StringReader::new("abc");
        assert!(r.can_read());
        r.skip(); // a
        assert!(r.can_read());
        r.skip(); // b
        assert!(r.can_read());
        r.skip(); // c
        assert!(!r.can_read());
    }

    #[test]
    fn test_remaining_len() {
        let mut r = StringReader::new("abc");
        assert_eq!(r.remaining_len(), 3);
        r.skip();
        assert_eq!(r.remaining_len(), 2);
        r.skip();
        assert_eq!(r.remaining_len(), 1);
        r.skip();
        assert_eq!(r.remaining_len(), 0);
    }

    #[test]
    fn test_peek() {
        let mut r = StringReader::new("abc");
        assert_eq!(r.peek(), 'a');
        assert_eq!(r.cursor(), 0);
        r.set_cursor(2);
        assert_eq!(r.peek(), 'c');
        assert_eq!(r.cursor(), 2);
    }

    #[test]
    fn test_read() {
        let mut r = StringReader::new("abc");
        assert_eq!(r.read(), 'a');
        assert_eq!(r.read(), 'b');
        assert_eq!(r.read(), 'c');
        assert_eq!(r.cursor(), 3);
    }

    #[test]
    fn test_remaining() {
        let mut r = StringReader::new("Hello!");
        assert_eq!(r.remaining(), "Hello!");
        r.set_cursor(3);
        assert_eq!(r.remaining(), "lo!");
        r.set_cursor(6);
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_unquoted_string() {
        let mut r = StringReader::new("hello world");
        assert_eq!(r.read_unquoted_string(), "hello");
        assert_eq!(r.remaining(), " world");
    }

    #[test]
    fn test_read_unquoted_string_empty_with_remaining() {
        let mut r = StringReader::new(" hello world");
        assert_eq!(r.read_unquoted_string(), "");
        assert_eq!(r.remaining(), " hello world");
    }

    #[test]
    fn test_read_quoted_string() {
        let mut r = StringReader::new(r#""hello world""#);
        assert_eq!(r.read_quoted_string().unwrap(), "hello world");
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_quoted_string_mixed_quotes() {
        let mut r = StringReader::new(r#"'hello "world"'"#);
        assert_eq!(r.read_quoted_string().unwrap(), r#"hello "world""#);
        assert_eq!(r.remaining(), "");

        let mut r = StringReader::new(r#""hello 'world'""#);
        assert_eq!(r.read_quoted_string().unwrap(), "hello 'world'");
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_quoted_string_empty_input() {
        let mut r = StringReader::new("");
        assert_eq!(r.read_quoted_string().unwrap(), "");
    }

    #[test]
    fn test_read_quoted_string_empty_quoted() {
        let mut r = StringReader::new(r#""" hello world"#);
        assert_eq!(r.read_quoted_string().unwrap(), "");
        assert_eq!(r.remaining(), " hello world");
    }

    #[test]
    fn test_read_quoted_string_escaped_quote() {
        let mut r = StringReader::new("\"hello \\\"world\\\"\"");
        assert_eq!(r.read_quoted_string().unwrap(), "hello \"world\"");
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_quoted_string_escaped_escape() {
        let mut r = StringReader::new("\"\\\\o/\"");
        assert_eq!(r.read_quoted_string().unwrap(), "\\o/");
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_quoted_string_with_remaining() {
        let mut r = StringReader::new("\"hello world\" foo bar");
        assert_eq!(r.read_quoted_string().unwrap(), "hello world");
        assert_eq!(r.remaining(), " foo bar");

        let mut r = StringReader::new("\"hello world\"foo bar");
        assert_eq!(r.read_quoted_string().unwrap(), "hello world");
        assert_eq!(r.remaining(), "foo bar");
    }

    #[test]
    fn test_read_quoted_string_no_open() {
        let mut r = StringReader::new("hello world\"");
        let err = r.read_quoted_string().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpectedStartOfQuote);
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_quoted_string_no_close() {
        let mut r = StringReader::new("\"hello world");
        let err = r.read_quoted_string().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpectedEndOfQuote);
        assert_eq!(err.cursor(), 12);
    }

    #[test]
    fn test_read_quoted_string_invalid_escape() {
        let mut r = StringReader::new("\"hello\\nworld\"");
        let err = r.read_quoted_string().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidEscape('n'));
        assert_eq!(err.cursor(), 7);
    }

    #[test]
    fn test_read_quoted_string_invalid_quote_escape() {
        let mut r = StringReader::new("'hello\\\"'world");
        let err = r.read_quoted_string().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidEscape('"'));
        assert_eq!(err.cursor(), 7);
    }

    #[test]
    fn test_read_string_no_quotes() {
        let mut r = StringReader::new("hello world");
        assert_eq!(r.read_string().unwrap(), "hello");
        assert_eq!(r.remaining(), " world");
    }

    #[test]
    fn test_read_string_quoted() {
        let mut r = StringReader::new("'hello world'");
        assert_eq!(r.read_string().unwrap(), "hello world");
        assert_eq!(r.remaining(), "");

        let mut r = StringReader::new(r#""hello world""#);
        assert_eq!(r.read_string().unwrap(), "hello world");
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_i32() {
        let mut r = StringReader::new("1234567890");
        assert_eq!(r.read_i32().unwrap(), 1234567890);
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_i32_negative() {
        let mut r = StringReader::new("-1234567890");
        assert_eq!(r.read_i32().unwrap(), -1234567890);
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_i32_invalid() {
        let mut r = StringReader::new("12.34");
        let err = r.read_i32().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidInt("12.34".to_string()));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_i32_none() {
        let mut r = StringReader::new("");
        let err = r.read_i32().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpectedInt);
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_i32_with_immediate_remaining() {
        let mut r = StringReader::new("1234567890foo bar");
        assert_eq!(r.read_i32().unwrap(), 1234567890);
        assert_eq!(r.remaining(), "foo bar");
    }

    #[test]
    fn test_read_int_leading_zero_is_octal() {
        let mut r = StringReader::new("010");
        assert_eq!(r.read_i32().unwrap(), 8);
        assert_eq!(r.remaining(), "");

        let mut r = StringReader::new("-010");
        assert_eq!(r.read_i64().unwrap(), -8);

        let mut r = StringReader::new("0");
        assert_eq!(r.read_i32().unwrap(), 0);
    }

    #[test]
    fn test_read_int_invalid_octal_digit() {
        let mut r = StringReader::new("08");
        let err = r.read_i32().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidInt("08".to_string()));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_i64_overflows_i32() {
        let mut r = StringReader::new("9999999999");
        assert_eq!(r.read_i64().unwrap(), 9999999999);

        let mut r = StringReader::new("9999999999");
        let err = r.read_i32().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidInt(_)));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_f64() {
        let mut r = StringReader::new("12.34");
        assert_eq!(r.read_f64().unwrap(), 12.34);
        assert_eq!(r.remaining(), "");
    }

    #[test]
    fn test_read_f64_invalid() {
        let mut r = StringReader::new("12.34.56");
        let err = r.read_f64().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidFloat("12.34.56".to_string()));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_bool() {
        let mut r = StringReader::new("true");
        assert!(r.read_bool().unwrap());
        assert_eq!(r.remaining(), "");

        let mut r = StringReader::new("FALSE");
        assert!(!r.read_bool().unwrap());
    }

    #[test]
    fn test_read_bool_incorrect() {
        let mut r = StringReader::new("tuesday");
        let err = r.read_bool().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidBool("tuesday".to_string()));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_read_bool_none() {
        let mut r = StringReader::new("");
        let err = r.read_bool().unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpectedBool);
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_range_encompassing() {
        let a = StringRange::between(2, 5);
        let b = StringRange::between(4, 9);
        assert_eq!(StringRange::encompassing(a, b), StringRange::between(2, 9));
        assert!(StringRange::at(3).is_empty());
        assert_eq!(StringRange::between(0, 5).get("hello world"), "hello");
    }
}
