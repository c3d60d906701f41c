//! Parsing for OData query options.
//!
//! The crate is built around a small, reusable engine:
//!
//! - a [`Tokenizer`] driven by an ordered list of regex [`TokenRule`]s;
//! - a [`WordClassifier`] that turns bare words into function or lambda
//!   tokens when an opening parenthesis follows them;
//! - a [`Parser`] holding user-defined operators and functions, which turns
//!   token streams into postfix order and then into [`ParseNode`] trees.
//!
//! The `$filter` and `$search` grammars are assembled from these pieces and
//! exposed through [`parse_filter_string`] and [`parse_search_string`]. The
//! remaining option parsers ([`parse_orderby_string`],
//! [`parse_select_string`], [`parse_top_string`] and friends) return typed
//! values.
//!
//! ```
//! use odata_query::parse_filter_string;
//!
//! let query = parse_filter_string("Name eq 'Milk' and Price lt 2.55")?;
//! assert_eq!(query.tree().token().value(), "and");
//! # Ok::<(), odata_query::QueryError>(())
//! ```

mod classify;
mod errors;
mod grammar;
mod options;
mod parser;
mod token;
mod tokenizer;

#[cfg(test)]
mod test_support;

pub use classify::WordClassifier;
pub use errors::{ErrorClass, GrammarError, ParseError, QueryError, SymbolKind};
pub use grammar::{
    FilterQuery, Grammar, SearchQuery, filter_grammar, parse_filter_string, parse_search_string,
    search_grammar, shared_filter_grammar, shared_search_grammar,
};
pub use options::{
    InlineCount, OrderByItem, OrderByQuery, SelectItem, SelectQuery, SortDirection,
    parse_count_string, parse_inline_count_string, parse_orderby_string, parse_select_string,
    parse_skip_string, parse_top_string,
};
pub use parser::{Associativity, FunctionDefinition, OperatorDefinition, ParseNode, Parser};
pub use token::{Token, TokenKind, TokenRole};
pub use tokenizer::{TokenRule, Tokenizer};
