use cursor::Line;
use errors::LoxError;
use scanner::{Token, TokenType};

mod expr;
pub use expr::Expr;

use TokenType::{
    Bang, BangEqual, Eof, EqualEqual, False, Greater, GreaterEqual, LeftParen, Less, LessEqual,
    Minus, Nil, Number, Plus, RightParen, Slash, Star, True,
};

pub type Result<'a, T> = std::result::Result<T, ParseError<'a>>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("unmatched parenthesis")]
    UnmatchedParenthesis,
    #[error("expected expression")]
    ExpectedExpression,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {}] Error: {error}", .token.line)]
pub struct ParseError<'a> {
    pub error: ParseErrorType,
    /// The token the parser was looking at when it gave up
    pub token: Token<'a>,
}

impl<'a> ParseError<'a> {
    fn new(error: ParseErrorType, token: Token<'a>) -> Self {
        Self { error, token }
    }
}

impl From<ParseError<'_>> for LoxError {
    fn from(e: ParseError<'_>) -> Self {
        LoxError::new(e.token.line, e.error)
    }
}

#[derive(Debug, PartialEq)]
pub struct Parsed<'a> {
    pub exprs: Vec<Expr<'a>>,
    pub errors: Vec<ParseError<'a>>,
}

pub fn parse<'a>(tokens: &[Token<'a>]) -> Parsed<'a> {
    Parser::new(tokens).parse()
}

/// Recursive descent parser over a scanned token slice.
///
/// Grammar, loosest binding first:
///
/// ```text
/// expression -> equality
/// equality   -> comparison ( ( "!=" | "==" ) comparison )*
/// comparison -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       -> factor ( ( "-" | "+" ) factor )*
/// factor     -> unary ( ( "/" | "*" ) unary )*
/// unary      -> ( "!" | "-" ) unary | primary
/// primary    -> NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
#[derive(Debug)]
pub struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    current: usize,
    /// Returned by `peek` once the slice is exhausted, in case it lacks a trailing EOF
    eof: Token<'a>,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>]) -> Self {
        let eof = tokens
            .last()
            .map_or(Token::eof(Line(1), 0), |t| Token::eof(t.line, t.offset + t.lexeme.len()));
        Self { tokens, current: 0, eof }
    }

    /// Parses top-level expressions until EOF. A syntax error drops the expression it
    /// occurred in, parsing then resumes at the next unconsumed token.
    pub fn parse(mut self) -> Parsed<'a> {
        let mut exprs = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.expression() {
                Ok(expr) => {
                    log::trace!("Parsed expression: {expr}");
                    exprs.push(expr)
                }
                Err(e) => {
                    log::debug!("Hit error: {e}, skipping expression");
                    errors.push(e)
                }
            }
        }

        Parsed { exprs, errors }
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.consume_any(&[BangEqual, EqualEqual]) {
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.term()?;

        while let Some(operator) = self.consume_any(&[Greater, GreaterEqual, Less, LessEqual]) {
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.factor()?;

        while let Some(operator) = self.consume_any(&[Plus, Minus]) {
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.consume_any(&[Star, Slash]) {
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right }
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.consume_any(&[Bang, Minus]) {
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.peek();
        match token.ty {
            False | True | Nil | Number | TokenType::String => {
                self.advance();
                Ok(Expr::Literal(token))
            }
            LeftParen => {
                self.advance();
                let expr = self.expression()?;

                self.consume_or_error(RightParen, ParseErrorType::UnmatchedParenthesis)?;

                Ok(Expr::Grouping(Box::new(expr)))
            }
            // Never step past the end
            Eof => Err(ParseError::new(ParseErrorType::ExpectedExpression, token)),
            _ => {
                self.advance();
                Err(ParseError::new(ParseErrorType::ExpectedExpression, token))
            }
        }
    }
}

// Helpers
impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> Token<'a> {
        self.tokens.get(self.current).copied().unwrap_or(self.eof)
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().ty == Eof
    }

    fn consume_any(&mut self, types: &[TokenType]) -> Option<Token<'a>> {
        types.contains(&self.peek().ty).then(|| self.advance())
    }

    fn consume_or_error(&mut self, ty: TokenType, error: ParseErrorType) -> Result<'a, Token<'a>> {
        self.consume_any(&[ty]).ok_or_else(|| ParseError::new(error, self.peek()))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use scanner::scan;

    use super::*;

    /// Parses `source` into printed expressions and reported error lines.
    fn parse_source(source: &str) -> (Vec<String>, Vec<String>) {
        let scanned = scan(source);
        assert!(scanned.errors.is_empty(), "unexpected scan errors: {:?}", scanned.errors);

        let parsed = parse(&scanned.tokens);
        (
            parsed.exprs.iter().map(|e| e.to_string()).collect_vec(),
            parsed.errors.into_iter().map(|e| LoxError::from(e).to_string()).collect_vec(),
        )
    }

    fn printed(source: &str) -> Vec<String> {
        let (exprs, errors) = parse_source(source);
        assert_eq!(errors, Vec::<String>::new());
        exprs
    }

    #[test]
    fn literals() {
        assert_eq!(
            printed("true false nil 42 3.140 \"hello world\""),
            vec!["true", "false", "nil", "42.0", "3.14", "hello world"]
        );
    }

    #[test]
    fn left_associativity() {
        assert_eq!(printed("1 - 2 - 3"), vec!["(- (- 1.0 2.0) 3.0)"]);
        assert_eq!(printed("8 / 4 / 2"), vec!["(/ (/ 8.0 4.0) 2.0)"]);
        assert_eq!(printed("1 == 2 != true"), vec!["(!= (== 1.0 2.0) true)"]);
    }

    #[test]
    fn precedence() {
        assert_eq!(printed("2 + 3 * 4"), vec!["(+ 2.0 (* 3.0 4.0))"]);
        assert_eq!(printed("1 < 2 == 3 >= 4"), vec!["(== (< 1.0 2.0) (>= 3.0 4.0))"]);
        assert_eq!(printed("-1 * 2"), vec!["(* (- 1.0) 2.0)"]);
        assert_eq!(printed("1 + 2 > 3 - 4 / 5"), vec!["(> (+ 1.0 2.0) (- 3.0 (/ 4.0 5.0)))"]);
    }

    #[test]
    fn unary_is_right_associative() {
        assert_eq!(printed("!!true"), vec!["(! (! true))"]);
        assert_eq!(printed("- -3"), vec!["(- (- 3.0))"]);
    }

    #[test]
    fn grouping() {
        assert_eq!(printed("(1 + 2) * 3"), vec!["(* (group (+ 1.0 2.0)) 3.0)"]);
        assert_eq!(printed("((\"foo\"))"), vec!["(group (group foo))"]);
    }

    #[test]
    fn multiple_top_level_expressions() {
        assert_eq!(printed("1 2\n\"a\" + \"b\""), vec!["1.0", "2.0", "(+ a b)"]);
    }

    #[test]
    fn unmatched_parenthesis() {
        let (exprs, errors) = parse_source("(1 + 2");
        assert!(exprs.is_empty());
        assert_eq!(errors, vec!["[line 1] Error: unmatched parenthesis"]);
    }

    #[test]
    fn expected_expression_at_end() {
        let (exprs, errors) = parse_source("1 +\n");
        assert!(exprs.is_empty());
        assert_eq!(errors, vec!["[line 2] Error: expected expression"]);
    }

    #[test]
    fn parsing_resumes_after_an_error() {
        let (exprs, errors) = parse_source(")\n1 + 2\n) 3");
        assert_eq!(exprs, vec!["(+ 1.0 2.0)", "3.0"]);
        assert_eq!(
            errors,
            vec!["[line 1] Error: expected expression", "[line 3] Error: expected expression"]
        );
    }

    #[test]
    fn missing_paren_leaves_the_offending_token() {
        let (exprs, errors) = parse_source("(1 2)");
        assert_eq!(exprs, vec!["2.0"]);
        assert_eq!(
            errors,
            vec!["[line 1] Error: unmatched parenthesis", "[line 1] Error: expected expression"]
        );
    }

    #[test]
    fn typed_errors_point_at_tokens() {
        let scanned = scan("foo");
        let parsed = parse(&scanned.tokens);
        assert_eq!(parsed.exprs, vec![]);
        assert_eq!(
            parsed.errors,
            vec![ParseError::new(ParseErrorType::ExpectedExpression, scanned.tokens[0])]
        );
    }

    #[test]
    fn empty_input() {
        assert_eq!(parse(&[]), Parsed { exprs: vec![], errors: vec![] });
        assert_eq!(printed("// nothing here"), Vec::<String>::new());
    }
}
