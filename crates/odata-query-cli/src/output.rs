//! Helpers for rendering parsed options.

use std::fmt::Display;
use std::io::Write;

use eyre::{Context, Result};
use odata_query::{ParseNode, Token};
use serde::Serialize;

/// Write one token per line as `kind<TAB>position<TAB>value`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_tokens(writer: &mut dyn Write, tokens: &[Token]) -> Result<()> {
    for token in tokens {
        writeln!(
            writer,
            "{}\t{}\t{}",
            token.kind(),
            token.position(),
            token.value()
        )
        .wrap_err_with(|| format!("failed to write token '{}'", token.value()))?;
    }
    Ok(())
}

/// Write token values on one line separated by spaces.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_postfix<'a>(
    writer: &mut dyn Write,
    tokens: impl IntoIterator<Item = &'a Token>,
) -> Result<()> {
    let line = tokens
        .into_iter()
        .map(Token::value)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{line}").wrap_err("failed to write postfix order")
}

/// Write an indented tree rendering of `node`.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_tree(writer: &mut dyn Write, node: &ParseNode) -> Result<()> {
    write!(writer, "{node}")
        .wrap_err_with(|| format!("failed to write tree rooted at '{}'", node.token().value()))
}

/// Write any displayable value followed by a newline.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_line(writer: &mut dyn Write, value: impl Display) -> Result<()> {
    writeln!(writer, "{value}").wrap_err("failed to write output line")
}

/// Write `value` as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialisation or the writer fails.
pub fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).wrap_err("failed to serialise output")?;
    writeln!(writer).wrap_err("failed to terminate JSON output")
}
