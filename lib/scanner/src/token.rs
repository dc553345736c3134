use std::fmt::{self, Display, Formatter};

use cursor::Line;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'a> {
    pub ty: TokenType,
    pub lexeme: &'a str,
    pub literal: Literal<'a>,
    pub line: Line,
    /// Byte offset of the lexeme in the source
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(
        ty: TokenType,
        lexeme: &'a str,
        literal: Literal<'a>,
        line: Line,
        offset: usize,
    ) -> Self {
        Self { ty, lexeme, literal, line, offset }
    }

    pub fn eof(line: Line, offset: usize) -> Self {
        Self::new(TokenType::Eof, "", Literal::None, line, offset)
    }
}

/// `<KIND> <lexeme> <literal>`, e.g. `NUMBER 1.50 1.5` or `EOF  null`.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.ty, self.lexeme, self.literal)
    }
}

/// Normalized value of a NUMBER or STRING token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Number(f64),
    /// String content without the surrounding quotes.
    Str(&'a str),
    None,
}

impl Display for Literal<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            // Shortest round-trip form, always with a fractional part: 1 -> 1.0, 1.50 -> 1.5
            Literal::Number(n) => {
                let formatted = n.to_string();
                if formatted.contains('.') {
                    write!(f, "{formatted}")
                } else {
                    write!(f, "{formatted}.0")
                }
            }
            Literal::Str(s) => write!(f, "{s}"),
            Literal::None => write!(f, "null"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenType {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    String,
    Number,

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenType {
    pub fn keyword(text: &str) -> Option<TokenType> {
        use TokenType::*;
        Some(match text {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}
