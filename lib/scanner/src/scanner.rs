use cursor::{Cursor, Line};
use errors::LoxError;

pub mod token;
pub use token::{Literal, Token, TokenType};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
    /// Byte offset where the offending lexeme starts
    pub offset: usize,
}

impl From<ScanError> for LoxError {
    fn from(e: ScanError) -> Self {
        LoxError::new(e.line, e.error)
    }
}

/// Result of a full scan. `tokens` always ends with exactly one EOF token, even if
/// `errors` is not empty.
#[derive(Debug, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: Vec<ScanError>,
}

pub fn scan(source: &str) -> Scanned<'_> {
    Scanner::new(source).scan_tokens()
}

#[derive(Debug)]
pub struct Scanner<'a> {
    /// Start of the token currently being scanned
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            current: Cursor::new(source),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> Scanned<'a> {
        use TokenType::*;

        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => self.add_token_if_equal(BangEqual, Bang),
                '=' => self.add_token_if_equal(EqualEqual, Equal),
                '<' => self.add_token_if_equal(LessEqual, Less),
                '>' => self.add_token_if_equal(GreaterEqual, Greater),

                '/' => {
                    if self.current.next_if('/') {
                        // Comment
                        self.current.eat_while(|c| c != '\n');
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

                // The cursor counts newlines itself
                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanErrorType::UnexpectedCharacter(c)),
            }
        }

        self.tokens.push(Token::eof(self.current.line(), self.current.offset()));
        log::debug!("Scanned {} tokens, {} errors", self.tokens.len(), self.errors.len());

        Scanned { tokens: self.tokens, errors: self.errors }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token(&mut self, ty: TokenType) {
        self.add_literal_token(ty, Literal::None)
    }

    fn add_literal_token(&mut self, ty: TokenType, literal: Literal<'a>) {
        let token =
            Token::new(ty, self.lexeme(), literal, self.start.line(), self.start.offset());
        log::trace!("Scanned token: {token}");
        self.tokens.push(token);
    }

    fn add_token_if_equal(&mut self, combined: TokenType, single: TokenType) {
        if self.current.next_if('=') {
            self.add_token(combined)
        } else {
            self.add_token(single)
        }
    }

    fn error(&mut self, error: ScanErrorType) {
        log::debug!("Scan error at {:?}: {error}", self.start);
        self.errors.push(ScanError { error, line: self.start.line(), offset: self.start.offset() });
    }

    fn string(&mut self) {
        loop {
            match self.current.next() {
                Some('"') => break,
                Some('\n') => {
                    // Leave the newline to the main loop
                    self.current.retreat();
                    return self.error(ScanErrorType::UnterminatedString);
                }
                None => return self.error(ScanErrorType::UnterminatedString),
                Some(_) => (),
            }
        }

        let lexeme = self.lexeme();
        self.add_literal_token(TokenType::String, Literal::Str(&lexeme[1..lexeme.len() - 1]));
    }

    fn number(&mut self) {
        self.current.eat_while(|c| c.is_ascii_digit());

        // A trailing dot is not part of the number
        if self.current.peek() == Some('.')
            && self.current.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.current.next();
            self.current.eat_while(|c| c.is_ascii_digit());
        }

        // Digit runs too long for f64 parse as infinity
        let lexeme = self.lexeme();
        match lexeme.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                self.add_literal_token(TokenType::Number, Literal::Number(n))
            }
            _ => self.error(ScanErrorType::InvalidNumber(lexeme.to_string())),
        }
    }

    fn identifier(&mut self) {
        self.current.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');

        let ty = TokenType::keyword(self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(ty);
    }
}
