//! Lexer (tokenizer) for the layout format.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{LabError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in the layout format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A keyword or component name
    Identifier,
    /// A number, possibly signed and with a unit suffix
    Number,
    /// A directive (starts with '.')
    Directive,
    /// Equals sign '='
    Equals,
    Newline,
    Eof,
}

/// Lexer for tokenizing layout input.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        let line = self.line;
        let column = self.column;
        let token = |kind, text: String| Token {
            kind,
            text,
            line,
            column,
        };

        let Some(&ch) = self.chars.peek() else {
            return Ok(token(TokenKind::Eof, String::new()));
        };

        match ch {
            '\n' => {
                self.advance();
                Ok(token(TokenKind::Newline, "\n".to_string()))
            }
            '=' => {
                self.advance();
                Ok(token(TokenKind::Equals, "=".to_string()))
            }
            '.' => {
                self.advance();
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(LabError::lexer(line, column, "expected directive name after '.'"));
                }
                Ok(token(TokenKind::Directive, format!(".{}", name)))
            }
            '-' | '+' | '0'..='9' => {
                let text = self.read_number();
                if !text.chars().any(|c| c.is_ascii_digit()) {
                    return Err(LabError::lexer(line, column, format!("malformed number '{}'", text)));
                }
                Ok(token(TokenKind::Number, text))
            }
            _ if ch.is_alphabetic() || ch == '_' => Ok(token(TokenKind::Identifier, self.read_identifier())),
            _ => Err(LabError::lexer(line, column, format!("unexpected character '{}'", ch))),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '#' | ';' => {
                    while self.chars.peek().is_some_and(|&c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn read_while(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(&ch) = self.chars.peek() {
            if !pred(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        self.read_while(&mut text, |c| c.is_alphanumeric() || c == '_' || c == '-');
        text
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();
        if let Some(sign) = self.chars.next_if(|&c| c == '-' || c == '+') {
            text.push(sign);
            self.column += 1;
        }
        self.read_while(&mut text, |c| c.is_ascii_digit());
        if self.chars.peek() == Some(&'.') {
            text.push('.');
            self.advance();
            self.read_while(&mut text, |c| c.is_ascii_digit());
        }
        if let Some(suffix) = self.chars.next_if(|&c| matches!(c, 'm' | 'k' | 'K' | 'M')) {
            text.push(suffix);
            self.column += 1;
        }
        text
    }
}

/// Parse a number with an optional unit suffix (`m`, `k`/`K`, `M`).
pub fn parse_value(text: &str) -> Option<f64> {
    let text = text.trim();
    let (digits, multiplier) = match text.chars().last()? {
        'm' => (&text[..text.len() - 1], 1e-3),
        'k' | 'K' => (&text[..text.len() - 1], 1e3),
        'M' => (&text[..text.len() - 1], 1e6),
        _ => (text, 1.0),
    };
    digits.parse::<f64>().ok().map(|v| v * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut kinds = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            kinds.push(tok.kind);
            if tok.kind == TokenKind::Eof {
                return kinds;
            }
        }
    }

    #[test]
    fn test_parse_value() {
        assert_relative_eq!(parse_value("2.2k").unwrap(), 2200.0);
        assert_relative_eq!(parse_value("1.5").unwrap(), 1.5);
        assert_relative_eq!(parse_value("-40").unwrap(), -40.0);
        assert_relative_eq!(parse_value("500m").unwrap(), 0.5);
        assert_relative_eq!(parse_value("1M").unwrap(), 1e6);
        assert!(parse_value("k").is_none());
        assert!(parse_value("").is_none());
    }

    #[test]
    fn test_lexer_component_line() {
        assert_eq!(
            kinds("battery B1 0 -40 40 0 v=9\n"),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_directive_and_comments() {
        let mut lexer = Lexer::new("# header\n.require switch_on ; trailing\n");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Directive);
        assert_eq!(tok.text, ".require");
        assert_eq!(tok.line, 2);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.text, "switch_on");
        assert_eq!(tok.column, 10);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Newline);
    }

    #[test]
    fn test_lexer_rejects_stray_characters() {
        let mut lexer = Lexer::new("wire W1 @");
        lexer.next_token().unwrap();
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, LabError::LexerError { line: 1, column: 9, .. }));
    }
}
