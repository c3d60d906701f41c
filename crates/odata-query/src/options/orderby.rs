//! `$orderby`: comma-separated sort expressions with optional direction.

use std::fmt;

use crate::errors::{QueryError, invalid_option};
use crate::grammar::shared_filter_grammar;
use crate::parser::ParseNode;
use crate::token::{Token, TokenKind};

/// Sort direction of an `$orderby` item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortDirection {
    /// Ascending; the default when no direction is given.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderByItem {
    /// The expression to sort by, parsed with the `$filter` grammar.
    pub expression: ParseNode,
    /// Requested direction.
    pub direction: SortDirection,
}

/// A parsed `$orderby` option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderByQuery {
    items: Vec<OrderByItem>,
}

impl OrderByQuery {
    /// Sort keys in priority order.
    #[must_use]
    pub fn items(&self) -> &[OrderByItem] {
        &self.items
    }
}

/// Parse the value of `$orderby`.
///
/// Items are split on commas outside parentheses, so function calls with
/// several arguments stay intact. A trailing `asc` or `desc` word sets the
/// item's direction.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] for empty items or malformed
/// expressions and an internal one if the shared grammar could not be built.
///
/// # Examples
/// ```
/// use odata_query::{SortDirection, parse_orderby_string};
///
/// let query = parse_orderby_string("concat(First, Last) desc, Age")?;
/// let items = query.items();
/// assert_eq!(items.len(), 2);
/// assert_eq!(items.first().map(|i| i.direction), Some(SortDirection::Desc));
/// assert_eq!(items.get(1).map(|i| i.expression.token().value()), Some("Age"));
/// # Ok::<(), odata_query::QueryError>(())
/// ```
pub fn parse_orderby_string(orderby: &str) -> Result<OrderByQuery, QueryError> {
    let grammar = shared_filter_grammar()?;
    let tokens = grammar.tokenize(orderby)?;
    let mut items = Vec::new();
    for mut group in split_top_level(tokens) {
        let direction = take_direction(&mut group);
        if group.is_empty() {
            return Err(invalid_option("$orderby", orderby).into());
        }
        let expression = grammar.parse_tokens(group)?;
        items.push(OrderByItem {
            expression,
            direction,
        });
    }
    Ok(OrderByQuery { items })
}

/// Split on commas at parenthesis depth zero.
fn split_top_level(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut groups = vec![Vec::new()];
    let mut depth = 0_usize;
    for token in tokens {
        match token.kind() {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                groups.push(Vec::new());
                continue;
            }
            _ => {}
        }
        if let Some(current) = groups.last_mut() {
            current.push(token);
        }
    }
    groups
}

fn take_direction(group: &mut Vec<Token>) -> SortDirection {
    let keyword = match group.as_slice() {
        [_, .., last] if last.kind() == TokenKind::Literal => {
            SortDirection::from_keyword(last.value())
        }
        _ => None,
    };
    if keyword.is_some() {
        group.pop();
    }
    keyword.unwrap_or_default()
}
