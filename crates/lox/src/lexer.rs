//! The scanner: turns source text into the token stream the parser consumes.
//!
//! The smallest of the pipeline stages, but fully implemented here since the
//! `tokenize` subcommand and every later pipeline stage depend on its output.

use crate::{
    error::ScanError,
    token::{Literal, Token, TokenKind},
};

/// Scans a complete source string into tokens, always ending in an EOF sentinel.
///
/// Lexical errors do not stop scanning: every unexpected character and unterminated
/// string is collected and returned together, matching the parser/resolver's
/// accumulate-and-continue error policy.
pub fn scan(source: &str) -> (Vec<Token>, Vec<ScanError>) {
    Scanner::new(source).scan_tokens()
}

struct Scanner<'a> {
    source: &'a [u8],
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn scan_tokens(mut self) -> (Vec<Token>, Vec<ScanError>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.line));
        (self.tokens, self.errors)
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.matches('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_identifier_start(c) => self.identifier(),
            other => self.errors.push(ScanError {
                line: self.line,
                message: format!("Unexpected character: {other}"),
            }),
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.errors.push(ScanError {
                line: self.line,
                message: "Unterminated string.".to_owned(),
            });
            return;
        }

        // The closing quote.
        self.advance();

        let value = self.slice_between(self.start + 1, self.current - 1);
        self.add_literal_token(TokenKind::String, Some(Literal::String(value)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Only consume the fractional part if a digit actually follows the dot; a bare
        // trailing `.` is left for the caller to scan as its own DOT token.
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.slice_between(self.start, self.current);
        let value: f64 = text.parse().expect("scanned number lexeme must parse as f64");
        self.add_literal_token(TokenKind::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while is_identifier_continue(self.peek()) {
            self.advance();
        }
        let text = self.slice_between(self.start, self.current);
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal_token(kind, None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let text = self.slice_between(self.start, self.current);
        self.tokens.push(Token::new(kind, text, literal, self.line));
    }

    fn slice_between(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.source[start..end]).into_owned()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current] as char;
        self.current += 1;
        c
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] as char != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        if self.is_at_end() { '\0' } else { self.source[self.current] as char }
    }

    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1] as char
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty(), "unexpected scan errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn scans_single_char_tokens() {
        assert_eq!(
            kinds("(){},.-+;*"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Semicolon,
                TokenKind::Star,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_two_char_operators() {
        assert_eq!(
            kinds("!= == <= >= ! = < >"),
            vec![
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Bang,
                TokenKind::Equal,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_does_not_consume_trailing_dot_without_digit() {
        let (tokens, errors) = scan("1.");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "1");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn number_leading_dot_is_not_a_number() {
        let (tokens, errors) = scan(".5");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::Dot);
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].lexeme, "5");
    }

    #[test]
    fn strings_can_span_multiple_lines() {
        let (tokens, errors) = scan("\"a\nb\"");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].literal, Some(Literal::String("a\nb".to_owned())));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let (_, errors) = scan("\"abc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string.");
    }

    #[test]
    fn unexpected_character_does_not_stop_scanning() {
        let (tokens, errors) = scan("@ 1");
        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Number));
    }

    #[test]
    fn keywords_are_recognized() {
        assert_eq!(
            kinds("and class else false fun for if nil or print return super this true var while"),
            vec![
                TokenKind::And,
                TokenKind::Class,
                TokenKind::Else,
                TokenKind::False,
                TokenKind::Fun,
                TokenKind::For,
                TokenKind::If,
                TokenKind::Nil,
                TokenKind::Or,
                TokenKind::Print,
                TokenKind::Return,
                TokenKind::Super,
                TokenKind::This,
                TokenKind::True,
                TokenKind::Var,
                TokenKind::While,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn line_comments_are_skipped() {
        assert_eq!(kinds("// a comment\n1"), vec![TokenKind::Number, TokenKind::Eof]);
    }
}
