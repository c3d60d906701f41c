//! Error types shared by the tokenizer, the parser and the grammar entry points.

use std::fmt;
use thiserror::Error;

use crate::token::Token;

/// The registry a missing symbol was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// An operator token had no [`OperatorDefinition`](crate::OperatorDefinition).
    Operator,
    /// A function or lambda token had no [`FunctionDefinition`](crate::FunctionDefinition).
    Function,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator => f.write_str("operator"),
            Self::Function => f.write_str("function"),
        }
    }
}

/// Failures caused by the query text itself.
///
/// Every variant describes malformed client input, so callers facing HTTP
/// can map any of them to a bad-request response without inspecting the
/// details.
///
/// # Examples
/// ```
/// use odata_query::ParseError;
/// let err = ParseError::Lex { position: 4, fragment: "#x".into() };
/// assert_eq!(
///     err.to_string(),
///     "no token rule matches at byte 4 (zero-based) near `#x`"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No rule matched the remaining input.
    #[error("no token rule matches at byte {position} (zero-based) near `{fragment}`")]
    Lex {
        /// Byte offset of the first unmatched character.
        position: usize,
        /// A short excerpt of the input starting at `position`.
        fragment: String,
    },
    /// An operator or function token is missing from the registry.
    #[error("unknown {kind} `{symbol}`")]
    UnknownSymbol {
        /// The token text.
        symbol: String,
        /// Which registry was consulted.
        kind: SymbolKind,
    },
    /// Mismatched parentheses, misplaced separators or malformed calls.
    #[error("{reason} at `{token}` (byte {position})")]
    Structural {
        /// The offending token text.
        token: String,
        /// Byte offset of the offending token.
        position: usize,
        /// What was wrong.
        reason: &'static str,
    },
    /// An operator or function did not receive its declared operand count.
    #[error("`{symbol}` expects {expected} operand(s) but found {found}")]
    ArityMismatch {
        /// The operator or function name.
        symbol: String,
        /// The arity from the registry.
        expected: usize,
        /// The operands actually available.
        found: usize,
    },
    /// Reduction finished with more than one disconnected subtree.
    #[error("expression does not reduce to a single root ({remaining} subtrees remain)")]
    Malformed {
        /// Number of subtrees left on the node stack.
        remaining: usize,
    },
    /// The input held no tokens.
    #[error("expression is empty")]
    EmptyExpression,
    /// The tree would nest deeper than the parser allows.
    #[error("expression nests deeper than {limit} levels")]
    TooDeep {
        /// The parser's depth limit.
        limit: usize,
    },
    /// A scalar query option carried a value outside its domain.
    #[error("invalid {option} value `{value}`")]
    InvalidOption {
        /// The query option, e.g. `$top`.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Failures while assembling a grammar.
///
/// These indicate a defect in a rule table rather than in a query, so they
/// belong to the internal error class.
#[derive(Debug, Clone, Error)]
pub enum GrammarError {
    /// A token rule pattern is not a valid regular expression.
    #[error("invalid token rule `{pattern}`: {source}")]
    InvalidRule {
        /// The pattern as registered.
        pattern: String,
        /// The compilation failure.
        source: regex::Error,
    },
}

/// Coarse classification used by HTTP-facing collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The query text is at fault.
    BadRequest,
    /// The parser configuration is at fault.
    Internal,
}

/// Error returned by the `parse_*_string` entry points.
///
/// # Examples
/// ```
/// use odata_query::{ErrorClass, QueryError, parse_filter_string};
/// let Err(err) = parse_filter_string("Price lt") else {
///     panic!("a dangling operator must be rejected");
/// };
/// assert!(err.is_bad_request());
/// assert_eq!(err.class(), ErrorClass::BadRequest);
/// ```
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The query text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The grammar used to parse it could not be built.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl QueryError {
    /// Classify the error for response mapping.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Parse(_) => ErrorClass::BadRequest,
            Self::Grammar(_) => ErrorClass::Internal,
        }
    }

    /// Returns `true` when the client's query text caused the failure.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(self.class(), ErrorClass::BadRequest)
    }

    /// Borrow the underlying parse failure, if any.
    #[must_use]
    pub const fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Grammar(_) => None,
        }
    }
}

pub(crate) fn structural(token: &Token, reason: &'static str) -> ParseError {
    ParseError::Structural {
        token: token.value().to_owned(),
        position: token.position(),
        reason,
    }
}

pub(crate) fn unknown_symbol(token: &Token, kind: SymbolKind) -> ParseError {
    ParseError::UnknownSymbol {
        symbol: token.value().to_owned(),
        kind,
    }
}

pub(crate) fn invalid_option(option: &'static str, value: &str) -> ParseError {
    ParseError::InvalidOption {
        option,
        value: value.to_owned(),
    }
}
