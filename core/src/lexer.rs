// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character-level scanning of SGF text

use crate::ParseError;

/// Whitespace skipped between SGF tokens
const WHITESPACE: &str = " \t\n\r\u{0c}\u{0b}";

/// Newline sequence stored for comment-like values
pub const CANONICAL_NEWLINE: &str = "\r\n";

/// Cursor over SGF text
///
/// Positions reported in errors are character offsets into the input.
pub struct Lexer {
    /// Input characters
    chars: Vec<char>,
    /// Index of the next unread character
    index: usize,
}

impl Lexer {
    /// Create a lexer positioned at the start of `text`
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            index: 0,
        }
    }

    /// Current character offset
    pub fn location(&self) -> usize {
        self.index
    }

    /// True while unread characters remain
    pub fn has_data(&self) -> bool {
        self.index < self.chars.len()
    }

    /// Skip whitespace and consume one of `charset`
    ///
    /// Fails if another non-whitespace character comes first, or if the
    /// input ends before any character is found.
    pub fn scan_for(&mut self, charset: &str) -> Result<char, ParseError> {
        match self.peek_for(charset) {
            Some((next, c)) => {
                self.index = next;
                Ok(c)
            }
            None if self.only_whitespace_remains() => Err(ParseError::UnexpectedEndOfInput {
                position: self.chars.len(),
            }),
            None => Err(ParseError::Expected {
                expected: charset.to_string(),
                position: self.index,
            }),
        }
    }

    /// Like [`Lexer::scan_for`] without consuming anything
    ///
    /// Returns the offset just past the found character and the character.
    pub fn peek_for(&self, charset: &str) -> Option<(usize, char)> {
        let mut i = self.index;
        while let Some(&c) = self.chars.get(i) {
            i += 1;
            if WHITESPACE.contains(c) {
                continue;
            }
            if charset.contains(c) {
                return Some((i, c));
            }
            return None;
        }
        None
    }

    /// Move the cursor to an offset previously returned by [`Lexer::peek_for`]
    pub fn set_location(&mut self, index: usize) {
        self.index = index.min(self.chars.len());
    }

    /// Consume a property identifier
    ///
    /// Leading whitespace is skipped. Returns `None` without consuming
    /// anything when no alphabetic run follows.
    pub fn get_property_id(&mut self) -> Option<String> {
        let mut i = self.index;
        while self.chars.get(i).is_some_and(|c| WHITESPACE.contains(*c)) {
            i += 1;
        }
        let start = i;
        while self.chars.get(i).is_some_and(|c| c.is_ascii_alphabetic()) {
            i += 1;
        }
        if i == start {
            return None;
        }
        self.index = i;
        Some(self.chars[start..i].iter().collect())
    }

    /// Consume a property value up to its closing `]`
    ///
    /// The opening `[` must already be consumed. A backslash keeps the next
    /// character verbatim and removes an escaped newline. Unescaped newline
    /// sequences become [`CANONICAL_NEWLINE`] when `keep_newlines` is set
    /// and a space otherwise; other control characters become a space.
    pub fn get_property_value(&mut self, keep_newlines: bool) -> Result<String, ParseError> {
        let mut value = String::new();
        while let Some(&c) = self.chars.get(self.index) {
            self.index += 1;
            if c < ' ' {
                if self.gobble_newline(c) && keep_newlines {
                    value.push_str(CANONICAL_NEWLINE);
                } else {
                    value.push(' ');
                }
            } else if c == '\\' {
                let escaped = *self.chars.get(self.index).ok_or(ParseError::UnexpectedEndOfInput {
                    position: self.chars.len(),
                })?;
                self.index += 1;
                if !self.gobble_newline(escaped) {
                    value.push(escaped);
                }
            } else if c == ']' {
                return Ok(value);
            } else {
                value.push(c);
            }
        }
        Err(ParseError::UnexpectedEndOfInput {
            position: self.chars.len(),
        })
    }

    /// If `c` starts a newline sequence, consume its optional second char
    fn gobble_newline(&mut self, c: char) -> bool {
        if c != '\n' && c != '\r' {
            return false;
        }
        if matches!(self.chars.get(self.index), Some('\n') | Some('\r')) {
            self.index += 1;
        }
        true
    }

    fn only_whitespace_remains(&self) -> bool {
        self.chars[self.index..].iter().all(|c| WHITESPACE.contains(*c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_for_skips_whitespace() {
        let mut lexer = Lexer::new(" \t\r\n(;");
        assert_eq!(lexer.scan_for("(").unwrap(), '(');
        assert_eq!(lexer.scan_for(";()").unwrap(), ';');
        assert!(!lexer.has_data());
    }

    #[test]
    fn test_scan_for_rejects_other_chars() {
        let mut lexer = Lexer::new("  x(");
        let err = lexer.scan_for("(").unwrap_err();
        assert_eq!(
            err,
            ParseError::Expected {
                expected: "(".to_string(),
                position: 0
            }
        );
        assert_eq!(lexer.location(), 0);
    }

    #[test]
    fn test_scan_for_at_end() {
        let mut lexer = Lexer::new("   ");
        assert!(matches!(
            lexer.scan_for(";"),
            Err(ParseError::UnexpectedEndOfInput { .. })
        ));
    }

    #[test]
    fn test_peek_for_does_not_consume() {
        let lexer = Lexer::new("  [ab]");
        assert_eq!(lexer.peek_for("["), Some((3, '[')));
        assert_eq!(lexer.location(), 0);
        assert_eq!(lexer.peek_for(";"), None);
    }

    #[test]
    fn test_property_id() {
        let mut lexer = Lexer::new(" GC[x]");
        assert_eq!(lexer.get_property_id().as_deref(), Some("GC"));
        assert_eq!(lexer.scan_for("[").unwrap(), '[');

        let mut lexer = Lexer::new("  ;B[aa]");
        assert_eq!(lexer.get_property_id(), None);
        assert_eq!(lexer.location(), 0);
    }

    #[test]
    fn test_value_escapes() {
        let mut lexer = Lexer::new(r"a\]b\\c]rest");
        assert_eq!(lexer.get_property_value(false).unwrap(), r"a]b\c");
        assert_eq!(lexer.location(), 8);
    }

    #[test]
    fn test_value_newlines() {
        let mut lexer = Lexer::new("one\r\ntwo\n\nthree\tfour]");
        assert_eq!(
            lexer.get_property_value(true).unwrap(),
            "one\r\ntwo\r\nthree four"
        );

        let mut lexer = Lexer::new("one\r\ntwo\nthree]");
        assert_eq!(lexer.get_property_value(false).unwrap(), "one two three");
    }

    #[test]
    fn test_escaped_newline_is_removed() {
        let mut lexer = Lexer::new("long\\\r\nline]");
        assert_eq!(lexer.get_property_value(true).unwrap(), "longline");
    }

    #[test]
    fn test_unterminated_value() {
        let mut lexer = Lexer::new("never closed");
        assert_eq!(
            lexer.get_property_value(false),
            Err(ParseError::UnexpectedEndOfInput { position: 12 })
        );

        let mut lexer = Lexer::new("trailing\\");
        assert!(lexer.get_property_value(false).is_err());
    }
}
