//! Operator and function registry plus the shunting-yard parser built on it.
//!
//! A [`Parser`] knows nothing about text: it consumes the tokens a
//! [`Tokenizer`](crate::Tokenizer) produced, converts them to postfix order
//! with [`Parser::infix_to_postfix`] and folds the postfix queue into a
//! [`ParseNode`] tree with [`Parser::postfix_to_tree`].

mod postfix;
mod tree;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::errors::{ParseError, SymbolKind, unknown_symbol};
use crate::token::Token;

pub use tree::ParseNode;

/// How operators of equal precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Associativity {
    /// `a - b - c` groups as `(a - b) - c`.
    Left,
    /// `a ^ b ^ c` groups as `a ^ (b ^ c)`.
    Right,
    /// No grouping rule; used for prefix operators.
    None,
}

/// A registered operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperatorDefinition {
    /// The token text that selects this operator.
    pub name: String,
    /// Number of operands; `1` marks a prefix operator.
    pub arity: usize,
    /// Grouping of equal-precedence chains.
    pub associativity: Associativity,
    /// Binding strength; higher binds tighter.
    pub precedence: i32,
}

/// A registered function with a fixed argument count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionDefinition {
    /// The token text that selects this function.
    pub name: String,
    /// Number of arguments a call must supply.
    pub arity: usize,
}

/// Operator-precedence parser configured through a symbol registry.
///
/// Registration requires `&mut self`; once a parser is shared behind a
/// shared reference it is effectively frozen.
///
/// Trees are limited to [`Parser::DEFAULT_MAX_DEPTH`] levels unless
/// [`Parser::set_max_depth`] says otherwise.
///
/// # Examples
/// ```
/// use odata_query::{Associativity, Parser, Token, TokenKind};
///
/// let mut parser = Parser::new();
/// parser.define_operator("+", 2, Associativity::Left, 4);
/// parser.define_operator("*", 2, Associativity::Left, 5);
///
/// let tokens = vec![
///     Token::new("1", TokenKind::Integer),
///     Token::new("+", TokenKind::Operator),
///     Token::new("2", TokenKind::Integer),
///     Token::new("*", TokenKind::Operator),
///     Token::new("3", TokenKind::Integer),
/// ];
/// let postfix = parser.infix_to_postfix(tokens)?;
/// let order: Vec<_> = postfix.iter().map(|t| t.value()).collect();
/// assert_eq!(order, ["1", "2", "3", "*", "+"]);
///
/// let root = parser.postfix_to_tree(postfix)?;
/// assert_eq!(root.token().value(), "+");
/// assert_eq!(root.depth(), 3);
/// # Ok::<(), odata_query::ParseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Parser {
    operators: HashMap<String, OperatorDefinition>,
    functions: HashMap<String, FunctionDefinition>,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            operators: HashMap::new(),
            functions: HashMap::new(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Parser {
    /// Deepest tree [`Parser::postfix_to_tree`] builds by default.
    pub const DEFAULT_MAX_DEPTH: usize = 256;

    /// Create a parser with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of levels a built tree may have.
    ///
    /// Cloning, comparing and serialising a [`ParseNode`] recurse once per
    /// level, so the limit bounds their stack use.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth;
    }

    /// The current tree depth limit.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Register an operator, replacing any definition with the same name.
    ///
    /// Returns the replaced definition, if there was one.
    pub fn define_operator(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        associativity: Associativity,
        precedence: i32,
    ) -> Option<OperatorDefinition> {
        let name = name.into();
        let definition = OperatorDefinition {
            name: name.clone(),
            arity,
            associativity,
            precedence,
        };
        let previous = self.operators.insert(name, definition);
        if let Some(old) = &previous {
            log::debug!("operator `{}` redefined; previous definition replaced", old.name);
        }
        previous
    }

    /// Register a function, replacing any definition with the same name.
    ///
    /// Returns the replaced definition, if there was one.
    pub fn define_function(
        &mut self,
        name: impl Into<String>,
        arity: usize,
    ) -> Option<FunctionDefinition> {
        let name = name.into();
        let definition = FunctionDefinition {
            name: name.clone(),
            arity,
        };
        let previous = self.functions.insert(name, definition);
        if let Some(old) = &previous {
            log::debug!("function `{}` redefined; previous definition replaced", old.name);
        }
        previous
    }

    /// Look up an operator by its exact token text.
    #[must_use]
    pub fn operator(&self, name: &str) -> Option<&OperatorDefinition> {
        self.operators.get(name)
    }

    /// Look up a function by its exact token text.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    /// Names of all registered functions, in no particular order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    fn operator_for(&self, token: &Token) -> Result<&OperatorDefinition, ParseError> {
        self.operator(token.value())
            .ok_or_else(|| unknown_symbol(token, SymbolKind::Operator))
    }

    fn function_for(&self, token: &Token) -> Result<&FunctionDefinition, ParseError> {
        self.function(token.value())
            .ok_or_else(|| unknown_symbol(token, SymbolKind::Function))
    }
}
