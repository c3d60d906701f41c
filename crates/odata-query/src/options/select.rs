//! `$select`: comma-separated property paths or `*`.

use std::fmt;

use crate::errors::{QueryError, invalid_option};

/// One selected property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectItem {
    /// `*`: every structural property.
    All,
    /// A `/`-separated property path.
    Path(Vec<String>),
}

impl fmt::Display for SelectItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Path(segments) => f.write_str(&segments.join("/")),
        }
    }
}

/// A parsed `$select` option.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectQuery {
    items: Vec<SelectItem>,
}

impl SelectQuery {
    /// Selected items in request order.
    #[must_use]
    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }
}

/// Parse the value of `$select`.
///
/// Whitespace around items is ignored. Path segments are identifiers that
/// may contain dots for qualified names.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] when an item is empty or a segment
/// is not an identifier.
///
/// # Examples
/// ```
/// use odata_query::{SelectItem, parse_select_string};
///
/// let query = parse_select_string("Name, Address/City")?;
/// assert_eq!(
///     query.items(),
///     [
///         SelectItem::Path(vec!["Name".into()]),
///         SelectItem::Path(vec!["Address".into(), "City".into()]),
///     ]
/// );
/// # Ok::<(), odata_query::QueryError>(())
/// ```
pub fn parse_select_string(select: &str) -> Result<SelectQuery, QueryError> {
    let items = select
        .split(',')
        .map(|item| parse_item(item.trim()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            log::debug!("rejected $select `{select}`");
            invalid_option("$select", select)
        })?;
    Ok(SelectQuery { items })
}

fn parse_item(item: &str) -> Option<SelectItem> {
    if item == "*" {
        return Some(SelectItem::All);
    }
    item.split('/')
        .map(|segment| is_identifier(segment).then(|| segment.to_owned()))
        .collect::<Option<Vec<_>>>()
        .map(SelectItem::Path)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}
