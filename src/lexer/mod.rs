mod cursor;
mod error;
pub mod formatter;

use crate::token::{Literal, Span, Token, TokenKind, KEYWORD_HASHMAP};
use compact_str::CompactString;
use cursor::Cursor;
pub use error::{LexicalError, LexicalErrorKind};

/// Tokens and errors collected from a full pass over the source.
#[derive(Debug, Default)]
pub struct ScannedTokens {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
}

#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            finished: false,
        }
    }

    pub fn get_source(&self) -> &'src str {
        self.source
    }

    /// Scans the whole source. The token list always ends with an `Eof` token and unrecognized
    /// input is collected as errors rather than stopping the scan.
    pub fn scan(self) -> ScannedTokens {
        let mut scanned = ScannedTokens::default();
        for token_or_error in self {
            match token_or_error {
                Ok(token) => scanned.tokens.push(token),
                Err(error) => scanned.errors.push(error),
            }
        }
        scanned
    }

    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        loop {
            let start = self.cursor.offset();
            let Some(current) = self.cursor.advance() else {
                self.finished = true;
                return Ok(Token::eof(self.cursor.line(), self.source.len()));
            };

            let kind = match current.value {
                // Single character tokens
                '(' => TokenKind::LeftParenthesis,
                ')' => TokenKind::RightParenthesis,
                '{' => TokenKind::LeftBrace,
                '}' => TokenKind::RightBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                '-' => TokenKind::Minus,
                '+' => TokenKind::Plus,
                ';' => TokenKind::Semicolon,
                '*' => TokenKind::Star,
                // One or two character tokens
                '!' => self.either('=', TokenKind::BangEqual, TokenKind::Bang),
                '=' => self.either('=', TokenKind::EqualEqual, TokenKind::Equal),
                '<' => self.either('=', TokenKind::LessThanEqual, TokenKind::LessThan),
                '>' => self.either('=', TokenKind::GreaterThanEqual, TokenKind::GreaterThan),
                '/' => {
                    if self.cursor.advance_if('/') {
                        self.cursor.advance_while(|c| c != '\n');
                        continue;
                    }
                    TokenKind::Slash
                }
                '"' => return self.lex_string(start),
                '0'..='9' => return Ok(self.lex_number(start)),
                'a'..='z' | 'A'..='Z' | '_' => return Ok(self.lex_ident_or_keyword(start)),
                c if c.is_ascii_whitespace() => continue,
                c => {
                    return Err(LexicalError {
                        kind: LexicalErrorKind::Unrecognized(c),
                        line: self.cursor.line(),
                        span: Span::new(start, c.len_utf8()),
                    })
                }
            };
            return Ok(self.make_token(kind, start, None));
        }
    }
}

impl<'src> Lexer<'src> {
    fn either(&mut self, next: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.cursor.advance_if(next) {
            matched
        } else {
            otherwise
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, literal: Option<Literal>) -> Token {
        let lexeme = self.cursor.slice_from(start);
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line: self.cursor.line(),
            span: Span::new(start, lexeme.len()),
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, LexicalError> {
        self.cursor.advance_while(|c| c != '"');
        if !self.cursor.advance_if('"') {
            return Err(LexicalError {
                kind: LexicalErrorKind::UnclosedString,
                line: self.cursor.line(),
                span: Span::new(start, self.cursor.offset() - start),
            });
        }
        let lexeme = self.cursor.slice_from(start);
        let value = CompactString::from(&lexeme[1..lexeme.len() - 1]);
        Ok(self.make_token(
            TokenKind::StringLiteral,
            start,
            Some(Literal::String(value)),
        ))
    }

    fn lex_number(&mut self, start: usize) -> Token {
        self.cursor.advance_while(|c| c.is_ascii_digit());
        // A trailing `.` is only part of the number when a digit follows it.
        if self.cursor.peek() == Some('.') && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            let _ = self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }
        let value: f64 = self
            .cursor
            .slice_from(start)
            .parse()
            .expect("Numeric literals are guaranteed to be parseable into f64.");
        self.make_token(TokenKind::NumericLiteral, start, Some(Literal::Number(value)))
    }

    fn lex_ident_or_keyword(&mut self, start: usize) -> Token {
        self.cursor
            .advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = self.cursor.slice_from(start);
        let kind = KEYWORD_HASHMAP
            .get(lexeme)
            .copied()
            .unwrap_or(TokenKind::Ident);
        self.make_token(kind, start, None)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token, LexicalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            None
        } else {
            Some(self.next_token())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .scan()
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn two_character_operators_are_greedy() {
        assert_eq!(
            kinds("!= == <= >= ! = < >"),
            vec![
                TokenKind::BangEqual,
                TokenKind::EqualEqual,
                TokenKind::LessThanEqual,
                TokenKind::GreaterThanEqual,
                TokenKind::Bang,
                TokenKind::Equal,
                TokenKind::LessThan,
                TokenKind::GreaterThan,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        let scanned = Lexer::new("12.").scan();
        assert!(scanned.errors.is_empty());
        assert_eq!(scanned.tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(scanned.tokens[1].kind, TokenKind::Dot);
    }

    #[test]
    fn multiline_string_advances_line_counter() {
        let scanned = Lexer::new("\"a\nb\"\nx").scan();
        assert_eq!(
            scanned.tokens[0].literal,
            Some(Literal::String("a\nb".into()))
        );
        assert_eq!(scanned.tokens[1].line, 3);
    }

    #[test]
    fn errors_do_not_stop_scanning() {
        let scanned = Lexer::new("@ var # x").scan();
        assert_eq!(scanned.errors.len(), 2);
        assert_eq!(
            scanned.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::KeywordVar, TokenKind::Ident, TokenKind::Eof]
        );
    }
}
