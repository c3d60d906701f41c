//! The `$filter` grammar.

use std::sync::LazyLock;

use super::{Grammar, shared};
use crate::classify::WordClassifier;
use crate::errors::{GrammarError, QueryError};
use crate::parser::{Associativity, ParseNode, Parser};
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Lexical rules in matching order. Whitespace is registered first and
/// ignored.
const RULES: &[(&str, TokenKind)] = &[
    (r"(?P<token>geography|geometry)'", TokenKind::Geography),
    (r"'(?:[^']|'')*'", TokenKind::String),
    (
        r"[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\b",
        TokenKind::Guid,
    ),
    (
        r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:\d{2})?",
        TokenKind::DateTime,
    ),
    (r"\d{4}-\d{2}-\d{2}\b", TokenKind::Date),
    (r"-?\d+(?:\.\d+(?:[eE][+-]?\d+)?|[eE][+-]?\d+)\b", TokenKind::Float),
    (r"-?\d+\b", TokenKind::Integer),
    (r"\(", TokenKind::OpenParen),
    (r"\)", TokenKind::CloseParen),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    ("/", TokenKind::Nav),
    (r"(?:eq|ne|gt|ge|lt|le|and|or|not)\b", TokenKind::Logical),
    (r"(?:add|sub|mul|div|mod|has)\b", TokenKind::Operator),
    (r"(?:true|false)\b", TokenKind::Boolean),
    (r"null\b", TokenKind::Null),
    (r"[$@]?[A-Za-z_][A-Za-z0-9_.]*", TokenKind::Literal),
];

const OPERATORS: &[(&str, usize, Associativity, i32)] = &[
    ("geography", 1, Associativity::None, 10),
    ("geometry", 1, Associativity::None, 10),
    ("/", 2, Associativity::Left, 9),
    ("has", 2, Associativity::Left, 8),
    ("not", 1, Associativity::None, 7),
    ("mul", 2, Associativity::Left, 6),
    ("div", 2, Associativity::Left, 6),
    ("mod", 2, Associativity::Left, 6),
    ("add", 2, Associativity::Left, 5),
    ("sub", 2, Associativity::Left, 5),
    ("gt", 2, Associativity::Left, 4),
    ("ge", 2, Associativity::Left, 4),
    ("lt", 2, Associativity::Left, 4),
    ("le", 2, Associativity::Left, 4),
    ("eq", 2, Associativity::Left, 3),
    ("ne", 2, Associativity::Left, 3),
    ("and", 2, Associativity::Left, 2),
    ("or", 2, Associativity::Left, 1),
    // Lowest precedence so the variable binds the whole lambda body.
    (":", 2, Associativity::Left, 0),
];

const FUNCTIONS: &[(&str, usize)] = &[
    // string
    ("contains", 2),
    ("endswith", 2),
    ("startswith", 2),
    ("length", 1),
    ("indexof", 2),
    ("substring", 2),
    ("substringof", 2),
    ("tolower", 1),
    ("toupper", 1),
    ("trim", 1),
    ("concat", 2),
    ("matchesPattern", 2),
    // date and time
    ("year", 1),
    ("month", 1),
    ("day", 1),
    ("hour", 1),
    ("minute", 1),
    ("second", 1),
    ("fractionalseconds", 1),
    ("date", 1),
    ("time", 1),
    ("totaloffsetminutes", 1),
    ("totalseconds", 1),
    ("now", 0),
    ("maxdatetime", 0),
    ("mindatetime", 0),
    // arithmetic
    ("round", 1),
    ("floor", 1),
    ("ceiling", 1),
    // type
    ("isof", 2),
    ("cast", 2),
    // geo
    ("geo.distance", 2),
    ("geo.intersects", 2),
    ("geo.length", 1),
    ("st_within", 2),
    ("st_intersects", 2),
    ("st_contains", 2),
    ("st_distance", 2),
    ("st_length", 1),
    // lambda
    ("any", 1),
    ("all", 1),
];

const LAMBDAS: [&str; 2] = ["any", "all"];

static FILTER: LazyLock<Result<Grammar, GrammarError>> = LazyLock::new(filter_grammar);

/// A parsed `$filter` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilterQuery {
    tree: ParseNode,
}

impl FilterQuery {
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

/// Build a fresh `$filter` grammar.
///
/// [`parse_filter_string`] uses a process-wide instance; build a private
/// one to register additional functions or operators.
///
/// # Errors
///
/// Returns [`GrammarError`] if a built-in rule fails to compile.
pub fn filter_grammar() -> Result<Grammar, GrammarError> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.ignore(r"\s+", TokenKind::Whitespace)?;
    for &(pattern, kind) in RULES {
        tokenizer.add(pattern, kind)?;
    }

    let mut parser = Parser::new();
    for &(name, arity, associativity, precedence) in OPERATORS {
        parser.define_operator(name, arity, associativity, precedence);
    }
    for &(name, arity) in FUNCTIONS {
        parser.define_function(name, arity);
    }

    let classifier = WordClassifier::new()
        .with_functions(parser.function_names())
        .with_lambdas(LAMBDAS);
    log::debug!(
        "built $filter grammar: {} rules, {} functions",
        tokenizer.rules().len(),
        FUNCTIONS.len()
    );
    Ok(Grammar::new(tokenizer, parser).with_classifier(classifier))
}

/// The process-wide `$filter` grammar used by [`parse_filter_string`].
///
/// It is built on first use and shared by every caller.
///
/// # Errors
///
/// Returns an internal [`QueryError`] if the grammar could not be built.
pub fn shared_filter_grammar() -> Result<&'static Grammar, QueryError> {
    shared(&FILTER)
}

/// Parse the value of a `$filter` query option.
///
/// The input must already be URL-decoded.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] when the expression is malformed and
/// an internal one if the shared grammar could not be built.
///
/// # Examples
/// ```
/// use odata_query::parse_filter_string;
///
/// let query = parse_filter_string("Address/City eq 'Redmond'")?;
/// let root = query.tree();
/// assert_eq!(root.token().value(), "eq");
/// assert_eq!(root.child(0).map(|n| n.token().value()), Some("/"));
/// assert_eq!(root.child(1).map(|n| n.token().value()), Some("'Redmond'"));
/// # Ok::<(), odata_query::QueryError>(())
/// ```
pub fn parse_filter_string(filter: &str) -> Result<FilterQuery, QueryError> {
    let tree = shared_filter_grammar()?
        .parse(filter)
        .inspect_err(|err| log::debug!("rejected $filter `{filter}`: {err}"))?;
    Ok(FilterQuery { tree })
}
