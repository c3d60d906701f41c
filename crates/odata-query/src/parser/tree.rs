//! Expression trees and the postfix reducer that builds them.

use std::fmt;

use super::Parser;
use crate::errors::{ParseError, structural};
use crate::token::{Token, TokenRole};

/// A node of a parsed expression.
///
/// Operands are leaves; operators and functions own exactly as many
/// children as their registered arity, in source order. Trees are built
/// bottom-up and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseNode {
    token: Token,
    children: Vec<ParseNode>,
}

impl ParseNode {
    /// Create a leaf node.
    #[must_use]
    pub fn leaf(token: Token) -> Self {
        Self {
            token,
            children: Vec::new(),
        }
    }

    /// Create a node owning `children`.
    #[must_use]
    pub fn new(token: Token, children: Vec<Self>) -> Self {
        Self { token, children }
    }

    /// The token this node was built from.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// Children in source order.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// The child at `index`, if present.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels below and including this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Re-linearise the tree into postfix order.
    ///
    /// Parsing the returned stream with the same parser rebuilds an equal
    /// tree.
    #[must_use]
    pub fn postfix(&self) -> Vec<Token> {
        // Node-then-children-reversed pre-order, flipped at the end.
        let mut reversed = Vec::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            reversed.push(node.token.clone());
            pending.extend(node.children.iter());
        }
        reversed.reverse();
        reversed
    }
}

impl Drop for ParseNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Display for ParseNode {
    /// Render one node per line, children indented by two spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0_usize)];
        while let Some((node, level)) = pending.pop() {
            writeln!(
                f,
                "{:indent$}{} ({})",
                "",
                node.token.value(),
                node.token.kind(),
                indent = level * 2
            )?;
            pending.extend(node.children.iter().rev().map(|child| (child, level + 1)));
        }
        Ok(())
    }
}

impl Parser {
    /// Fold a postfix token stream into a single expression tree.
    ///
    /// Each operator or function pops exactly its registered arity from the
    /// node stack; the last node popped becomes the rightmost child.
    ///
    /// # Errors
    ///
    /// - [`ParseError::ArityMismatch`] when fewer nodes are available than
    ///   an operator or function requires.
    /// - [`ParseError::EmptyExpression`] when the stream is empty.
    /// - [`ParseError::Malformed`] when more than one subtree remains.
    /// - [`ParseError::TooDeep`] when the tree would exceed
    ///   [`Parser::max_depth`] levels.
    /// - [`ParseError::UnknownSymbol`] for unregistered symbols and
    ///   [`ParseError::Structural`] for parentheses or separators, which
    ///   never appear in well-formed postfix input.
    pub fn postfix_to_tree(
        &self,
        postfix: impl IntoIterator<Item = Token>,
    ) -> Result<ParseNode, ParseError> {
        let mut nodes: Vec<ParseNode> = Vec::new();
        // Height of each entry in `nodes`, kept in step with it.
        let mut heights: Vec<usize> = Vec::new();
        for token in postfix {
            let arity = match token.kind().role() {
                TokenRole::Operand => {
                    nodes.push(ParseNode::leaf(token));
                    heights.push(1);
                    continue;
                }
                TokenRole::Ignored => continue,
                TokenRole::Operator => self.operator_for(&token)?.arity,
                TokenRole::Callable => self.function_for(&token)?.arity,
                TokenRole::Open | TokenRole::Close | TokenRole::Separator => {
                    return Err(structural(&token, "unexpected token in postfix input"));
                }
            };
            let Some(split) = nodes.len().checked_sub(arity) else {
                return Err(ParseError::ArityMismatch {
                    symbol: token.value().to_owned(),
                    expected: arity,
                    found: nodes.len(),
                });
            };
            let height = heights.split_off(split).into_iter().max().unwrap_or(0) + 1;
            if height > self.max_depth {
                log::debug!("tree depth limit {} exceeded at `{}`", self.max_depth, token);
                return Err(ParseError::TooDeep {
                    limit: self.max_depth,
                });
            }
            let children = nodes.split_off(split);
            nodes.push(ParseNode::new(token, children));
            heights.push(height);
        }
        let remaining = nodes.len();
        match nodes.pop() {
            None => Err(ParseError::EmptyExpression),
            Some(root) if remaining == 1 => Ok(root),
            Some(_) => Err(ParseError::Malformed { remaining }),
        }
    }
}
