//! The `$search` grammar: terms, quoted phrases and `AND`/`OR`/`NOT`.

use std::sync::LazyLock;

use super::{Grammar, shared};
use crate::errors::{GrammarError, QueryError};
use crate::parser::{Associativity, ParseNode, Parser};
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

const RULES: &[(&str, TokenKind)] = &[
    (r#""[^"]+""#, TokenKind::Literal),
    (r"\(", TokenKind::OpenParen),
    (r"\)", TokenKind::CloseParen),
    (r"(?:OR|AND|NOT)\b", TokenKind::Operator),
    (r"\w+", TokenKind::Literal),
];

static SEARCH: LazyLock<Result<Grammar, GrammarError>> = LazyLock::new(search_grammar);

/// A parsed `$search` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SearchQuery {
    tree: ParseNode,
}

impl SearchQuery {
    /// Root of the expression tree.
    #[must_use]
    pub const fn tree(&self) -> &ParseNode {
        &self.tree
    }

    /// Take ownership of the expression tree.
    #[must_use]
    pub fn into_tree(self) -> ParseNode {
        self.tree
    }
}

/// Build a fresh `$search` grammar.
///
/// # Errors
///
/// Returns [`GrammarError`] if a built-in rule fails to compile.
pub fn search_grammar() -> Result<Grammar, GrammarError> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.ignore(r"\s+", TokenKind::Whitespace)?;
    for &(pattern, kind) in RULES {
        tokenizer.add(pattern, kind)?;
    }

    let mut parser = Parser::new();
    parser.define_operator("NOT", 1, Associativity::None, 3);
    parser.define_operator("AND", 2, Associativity::Left, 2);
    parser.define_operator("OR", 2, Associativity::Left, 1);
    log::debug!("built $search grammar: {} rules", tokenizer.rules().len());
    Ok(Grammar::new(tokenizer, parser))
}

/// The process-wide `$search` grammar used by [`parse_search_string`].
///
/// # Errors
///
/// Returns an internal [`QueryError`] if the grammar could not be built.
pub fn shared_search_grammar() -> Result<&'static Grammar, QueryError> {
    shared(&SEARCH)
}

/// Parse the value of a `$search` query option.
///
/// Quoted phrases keep their quotes and are leaves like single terms.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] when the expression is malformed and
/// an internal one if the shared grammar could not be built.
///
/// # Examples
/// ```
/// use odata_query::parse_search_string;
///
/// let query = parse_search_string("\"blue sky\" OR NOT green")?;
/// let root = query.tree();
/// assert_eq!(root.token().value(), "OR");
/// assert_eq!(root.child(0).map(|n| n.token().value()), Some("\"blue sky\""));
/// assert_eq!(root.child(1).map(|n| n.token().value()), Some("NOT"));
/// # Ok::<(), odata_query::QueryError>(())
/// ```
pub fn parse_search_string(search: &str) -> Result<SearchQuery, QueryError> {
    let tree = shared_search_grammar()?
        .parse(search)
        .inspect_err(|err| log::debug!("rejected $search `{search}`: {err}"))?;
    Ok(SearchQuery { tree })
}
