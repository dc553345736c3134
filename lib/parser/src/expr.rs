use std::fmt::{self, Display, Formatter};

use scanner::{Literal, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    /// A NUMBER, STRING, TRUE, FALSE or NIL token.
    Literal(Token<'a>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
}

/// Fully parenthesized prefix notation, e.g. `(* (group (+ 1.0 2.0)) 3.0)`.
impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(token) => match token.literal {
                Literal::None => write!(f, "{}", token.lexeme),
                literal => write!(f, "{literal}"),
            },
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator.lexeme, right)
            }
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator.lexeme, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
        }
    }
}
