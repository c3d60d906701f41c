//! Parsers for the scalar and list-valued query options that accompany
//! `$filter` and `$search`.

mod orderby;
mod select;

use std::fmt;
use std::str::FromStr;

use crate::errors::{ParseError, QueryError, invalid_option};

pub use orderby::{OrderByItem, OrderByQuery, SortDirection, parse_orderby_string};
pub use select::{SelectItem, SelectQuery, parse_select_string};

/// Value of the `$inlinecount` query option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum InlineCount {
    /// `allpages`: include the total count of matching entities.
    AllPages,
    /// `none`: omit the count.
    None,
}

impl InlineCount {
    /// The query-string spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllPages => "allpages",
            Self::None => "none",
        }
    }
}

impl fmt::Display for InlineCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InlineCount {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "allpages" => Ok(Self::AllPages),
            "none" => Ok(Self::None),
            other => Err(invalid_option("$inlinecount", other)),
        }
    }
}

/// Parse the value of `$inlinecount`.
///
/// Only the exact, lowercase spellings `allpages` and `none` are accepted.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] for any other value.
///
/// # Examples
/// ```
/// use odata_query::{InlineCount, parse_inline_count_string};
///
/// assert_eq!(parse_inline_count_string("allpages")?, InlineCount::AllPages);
/// assert!(parse_inline_count_string("AllPages").is_err());
/// # Ok::<(), odata_query::QueryError>(())
/// ```
pub fn parse_inline_count_string(inline_count: &str) -> Result<InlineCount, QueryError> {
    Ok(inline_count.parse()?)
}

/// Parse the value of `$top`: a non-negative decimal integer.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] for signs, whitespace, empty input or
/// values that overflow `u64`.
pub fn parse_top_string(top: &str) -> Result<u64, QueryError> {
    parse_count_value("$top", top)
}

/// Parse the value of `$skip`: a non-negative decimal integer.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] for signs, whitespace, empty input or
/// values that overflow `u64`.
pub fn parse_skip_string(skip: &str) -> Result<u64, QueryError> {
    parse_count_value("$skip", skip)
}

/// Parse the value of `$count`.
///
/// # Errors
///
/// Returns a bad-request [`QueryError`] unless the value is `true` or
/// `false`.
pub fn parse_count_string(count: &str) -> Result<bool, QueryError> {
    match count {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(invalid_option("$count", other).into()),
    }
}

fn parse_count_value(option: &'static str, value: &str) -> Result<u64, QueryError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_option(option, value).into());
    }
    value
        .parse()
        .map_err(|_| invalid_option(option, value).into())
}
