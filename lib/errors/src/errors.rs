use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use cursor::Line;
use itertools::Itertools;

/// A static (scan or parse) error, ready to be reported.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error: {message}")]
pub struct LoxError {
    pub line: Line,
    pub message: String,
}

impl LoxError {
    pub fn new(line: Line, message: impl ToString) -> Self {
        Self { line, message: message.to_string() }
    }
}

#[derive(thiserror::Error, Debug, Default, PartialEq)]
pub struct LoxErrors(pub Vec<LoxError>);

impl From<LoxError> for LoxErrors {
    fn from(e: LoxError) -> Self {
        Self(vec![e])
    }
}

impl FromIterator<LoxError> for LoxErrors {
    fn from_iter<T: IntoIterator<Item = LoxError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<LoxError> for LoxErrors {
    fn extend<T: IntoIterator<Item = LoxError>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl Deref for LoxErrors {
    type Target = Vec<LoxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LoxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for LoxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

/// Process exit status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Scanner or parser reported at least one error (EX_DATAERR).
    StaticError,
    /// Evaluation failed at runtime (EX_SOFTWARE).
    RuntimeError,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::StaticError => 65,
            ExitStatus::RuntimeError => 70,
        }
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn error_format() {
        let error = LoxError::new(Line(3), "Unexpected character: $");
        assert_eq!(error.to_string(), "[line 3] Error: Unexpected character: $");
    }

    #[test]
    fn errors_are_joined_by_newlines() {
        let errors: LoxErrors = [
            LoxError::new(Line(1), "Unterminated string."),
            LoxError::new(Line(2), "expected expression"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unterminated string.\n[line 2] Error: expected expression"
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(LoxErrors::default().to_string(), "");
    }

    #[test]
    fn exit_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_eq!(ExitStatus::StaticError.code(), 65);
        assert_eq!(ExitStatus::RuntimeError.code(), 70);
    }
}
