use cursor::Line;
use parser::Expr;
use scanner::{Literal, Token, TokenType};

mod value;
pub use value::Value;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeNumbersOrStrings,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}\n[line {line}]")]
pub struct RuntimeError {
    pub error: RuntimeErrorType,
    /// Line of the operator that failed
    pub line: Line,
}

impl RuntimeError {
    fn at(error: RuntimeErrorType, operator: &Token) -> Self {
        log::debug!("Runtime error at '{}': {error}", operator.lexeme);
        Self { error, line: operator.line }
    }
}

pub fn evaluate(expr: &Expr) -> Result<Value> {
    let value = match expr {
        Expr::Literal(token) => literal(token),

        Expr::Grouping(expr) => evaluate(expr)?,

        Expr::Unary { operator, right } => {
            let right = evaluate(right)?;
            match (operator.ty, right) {
                (TokenType::Minus, Value::Number(n)) => (-n).into(),
                (TokenType::Minus, _) => {
                    return Err(RuntimeError::at(RuntimeErrorType::OperandMustBeNumber, operator))
                }
                (TokenType::Bang, v) => (!v.is_truthy()).into(),
                _ => unreachable!("not a unary operator: {}", operator.lexeme),
            }
        }

        Expr::Binary { left, operator, right } => {
            let left = evaluate(left)?;
            let right = evaluate(right)?;
            binary(left, operator, right)?
        }
    };

    log::trace!("{expr} => {value}");
    Ok(value)
}

fn literal(token: &Token) -> Value {
    match (token.ty, token.literal) {
        (_, Literal::Number(n)) => n.into(),
        (_, Literal::Str(s)) => s.into(),
        (TokenType::True, Literal::None) => true.into(),
        (TokenType::False, Literal::None) => false.into(),
        (TokenType::Nil, Literal::None) => Value::Nil,
        _ => unreachable!("not a literal token: {}", token),
    }
}

fn binary(left: Value, operator: &Token, right: Value) -> Result<Value> {
    use RuntimeErrorType::*;
    use TokenType::*;

    Ok(match (left, operator.ty, right) {
        (Value::Number(l), Plus, Value::Number(r)) => (l + r).into(),
        (Value::Str(l), Plus, Value::Str(r)) => (l + &r).into(),
        (_, Plus, _) => return Err(RuntimeError::at(OperandsMustBeNumbersOrStrings, operator)),

        // Division by zero follows IEEE 754
        (Value::Number(l), Minus, Value::Number(r)) => (l - r).into(),
        (Value::Number(l), Star, Value::Number(r)) => (l * r).into(),
        (Value::Number(l), Slash, Value::Number(r)) => (l / r).into(),

        (Value::Number(l), Greater, Value::Number(r)) => (l > r).into(),
        (Value::Number(l), GreaterEqual, Value::Number(r)) => (l >= r).into(),
        (Value::Number(l), Less, Value::Number(r)) => (l < r).into(),
        (Value::Number(l), LessEqual, Value::Number(r)) => (l <= r).into(),

        (l, EqualEqual, r) => (l == r).into(),
        (l, BangEqual, r) => (l != r).into(),

        (_, Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual, _) => {
            return Err(RuntimeError::at(OperandsMustBeNumbers, operator))
        }

        _ => unreachable!("not a binary operator: {}", operator.lexeme),
    })
}
