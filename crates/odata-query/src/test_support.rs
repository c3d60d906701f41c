//! Test helpers shared by the unit test modules.

use std::fmt::Display;

use crate::token::{Token, TokenKind};

pub(crate) fn expect_ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("{context}: {err}"),
    }
}

pub(crate) fn expect_err<T, E>(result: Result<T, E>, context: &str) -> E {
    match result {
        Ok(_) => panic!("{context}: expected error"),
        Err(err) => err,
    }
}

/// Build a token stream from `(value, kind)` pairs.
pub(crate) fn tokens(pairs: &[(&str, TokenKind)]) -> Vec<Token> {
    pairs
        .iter()
        .map(|&(value, kind)| Token::new(value, kind))
        .collect()
}

pub(crate) fn values<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Vec<&'a str> {
    tokens.into_iter().map(Token::value).collect()
}
