//! Drives the scanner, parser and evaluator for each command and reports their results.
//!
//! Output goes to `out`, error lines to `err`. Every command returns the exit status the
//! process should end with; nothing in here terminates the process.

use std::{borrow::Cow, io::Write};

use errors::{ExitStatus, LoxError, LoxErrors};
use parser::Parsed;
use scanner::Scanned;

/// Source files are not required to be valid UTF-8, invalid sequences become U+FFFD.
fn decode(source: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(source)
}

/// Collects scanner and parser errors into one list ordered by source position.
fn static_errors(scanned: &Scanned, parsed: Option<&Parsed>) -> LoxErrors {
    let scan_errors = scanned.errors.iter().map(|e| (e.offset, LoxError::from(e.clone())));
    let parse_errors = parsed
        .into_iter()
        .flat_map(|parsed| &parsed.errors)
        .map(|e| (e.token.offset, LoxError::from(e.clone())));

    let mut errors: Vec<_> = scan_errors.chain(parse_errors).collect();
    errors.sort_by_key(|(offset, _)| *offset);
    errors.into_iter().map(|(_, e)| e).collect()
}

fn report(err: &mut impl Write, errors: &LoxErrors) -> std::io::Result<ExitStatus> {
    if errors.is_empty() {
        return Ok(ExitStatus::Success);
    }
    writeln!(err, "{errors}")?;
    Ok(ExitStatus::StaticError)
}

/// Prints one `<KIND> <lexeme> <literal>` line per token.
pub fn tokenize(
    source: &[u8],
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<ExitStatus> {
    let source = decode(source);
    let scanned = scanner::scan(&source);

    let status = report(err, &static_errors(&scanned, None))?;
    for token in &scanned.tokens {
        writeln!(out, "{token}")?;
    }
    Ok(status)
}

/// Prints one line of prefix notation per top-level expression. Scanner errors do not
/// prevent parsing the tokens that were produced.
pub fn parse(
    source: &[u8],
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<ExitStatus> {
    let source = decode(source);
    let scanned = scanner::scan(&source);
    let parsed = parser::parse(&scanned.tokens);

    let status = report(err, &static_errors(&scanned, Some(&parsed)))?;
    for expr in &parsed.exprs {
        writeln!(out, "{expr}")?;
    }
    Ok(status)
}

/// Prints the value of each top-level expression. Nothing is evaluated if scanning or
/// parsing failed; evaluation stops at the first runtime error.
pub fn evaluate(
    source: &[u8],
    out: &mut impl Write,
    err: &mut impl Write,
) -> std::io::Result<ExitStatus> {
    let source = decode(source);
    let scanned = scanner::scan(&source);
    let parsed = parser::parse(&scanned.tokens);

    let status = report(err, &static_errors(&scanned, Some(&parsed)))?;
    if status != ExitStatus::Success {
        log::debug!("Skipping evaluation after static errors");
        return Ok(status);
    }

    for expr in &parsed.exprs {
        match interpreter::evaluate(expr) {
            Ok(value) => writeln!(out, "{value}")?,
            Err(e) => {
                writeln!(err, "{e}")?;
                return Ok(ExitStatus::RuntimeError);
            }
        }
    }
    Ok(ExitStatus::Success)
}
