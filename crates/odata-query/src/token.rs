//! Token model shared by every grammar.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Lexical class of a [`Token`].
///
/// The set is closed: grammars pick the kinds they need and the parser
/// derives each kind's structural role through [`TokenKind::role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TokenKind {
    /// A bare word: property name, lambda variable, search term.
    Literal,
    /// A quoted string, quotes included.
    String,
    /// A decimal number without a fractional part.
    Integer,
    /// A decimal number with a fractional part or exponent.
    Float,
    /// An ISO-8601 date and time, optionally with fraction and offset.
    DateTime,
    /// A calendar date (`yyyy-mm-dd`).
    Date,
    /// A GUID in 8-4-4-4-12 form.
    Guid,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// A comparison or boolean keyword such as `eq` or `and`.
    Logical,
    /// An arithmetic or search operator.
    Operator,
    /// The `geography` or `geometry` prefix of a spatial literal.
    Geography,
    /// A word that names a registered function and opens a call.
    Function,
    /// `any` or `all` opening a lambda predicate.
    Lambda,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `,`
    Comma,
    /// `:` binding a lambda variable.
    Colon,
    /// `/` separating navigation path segments.
    Nav,
    /// Matched but dropped from the token stream.
    Whitespace,
}

/// How the shunting-yard parser treats a token kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenRole {
    /// Goes straight to the output queue.
    Operand,
    /// Looked up in the operator registry.
    Operator,
    /// Looked up in the function registry; must open a call.
    Callable,
    /// Opens a group or an argument list.
    Open,
    /// Closes a group or an argument list.
    Close,
    /// Separates call arguments.
    Separator,
    /// Never reaches the parser.
    Ignored,
}

impl TokenKind {
    /// Return the kind name used in diagnostics.
    ///
    /// # Examples
    /// ```
    /// use odata_query::TokenKind;
    /// assert_eq!(TokenKind::DateTime.as_str(), "datetime");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Guid => "guid",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Logical => "logical",
            Self::Operator => "operator",
            Self::Geography => "geography",
            Self::Function => "function",
            Self::Lambda => "lambda",
            Self::OpenParen => "open-paren",
            Self::CloseParen => "close-paren",
            Self::Comma => "comma",
            Self::Colon => "colon",
            Self::Nav => "nav",
            Self::Whitespace => "whitespace",
        }
    }

    /// Structural role of this kind during infix-to-postfix conversion.
    ///
    /// The spatial prefix is an operator so that it binds the quoted literal
    /// that follows it.
    #[must_use]
    pub const fn role(self) -> TokenRole {
        match self {
            Self::Literal
            | Self::String
            | Self::Integer
            | Self::Float
            | Self::DateTime
            | Self::Date
            | Self::Guid
            | Self::Boolean
            | Self::Null => TokenRole::Operand,
            Self::Logical | Self::Operator | Self::Geography | Self::Colon | Self::Nav => {
                TokenRole::Operator
            }
            Self::Function | Self::Lambda => TokenRole::Callable,
            Self::OpenParen => TokenRole::Open,
            Self::CloseParen => TokenRole::Close,
            Self::Comma => TokenRole::Separator,
            Self::Whitespace => TokenRole::Ignored,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lexical unit: the matched text and its kind.
///
/// Tokens are immutable. The byte position is diagnostic metadata only, so
/// equality and hashing consider the value and kind alone; a hand-built
/// token compares equal to the one the tokenizer produces.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    value: String,
    kind: TokenKind,
    position: usize,
}

impl Token {
    /// Create a token without source position.
    ///
    /// # Examples
    /// ```
    /// use odata_query::{Token, TokenKind};
    /// let token = Token::new("eq", TokenKind::Logical);
    /// assert_eq!(token.value(), "eq");
    /// assert_eq!(token.kind(), TokenKind::Logical);
    /// assert_eq!(token.position(), 0);
    /// ```
    #[must_use]
    pub fn new(value: impl Into<String>, kind: TokenKind) -> Self {
        Self::at(value, kind, 0)
    }

    /// Create a token matched at byte offset `position`.
    #[must_use]
    pub fn at(value: impl Into<String>, kind: TokenKind, position: usize) -> Self {
        Self {
            value: value.into(),
            kind,
            position,
        }
    }

    /// The matched text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The lexical class.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Byte offset in the tokenized input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Build the token that replaces `self` once its right context is known.
    pub(crate) fn reclassified(self, kind: TokenKind) -> Self {
        Self { kind, ..self }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.kind.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
