//! Tokenizer and parser bundles for the supported query options.

mod filter;
mod search;

use std::collections::VecDeque;

use crate::classify::WordClassifier;
use crate::errors::{GrammarError, ParseError, QueryError};
use crate::parser::{ParseNode, Parser};
use crate::token::Token;
use crate::tokenizer::Tokenizer;

pub use filter::{FilterQuery, filter_grammar, parse_filter_string, shared_filter_grammar};
pub use search::{SearchQuery, parse_search_string, search_grammar, shared_search_grammar};

/// A complete text-to-tree pipeline.
///
/// # Examples
/// ```
/// use odata_query::search_grammar;
///
/// let grammar = search_grammar()?;
/// let root = grammar.parse("blue AND NOT green")?;
/// assert_eq!(root.token().value(), "AND");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    tokenizer: Tokenizer,
    classifier: Option<WordClassifier>,
    parser: Parser,
}

impl Grammar {
    /// Bundle a tokenizer and a parser.
    #[must_use]
    pub fn new(tokenizer: Tokenizer, parser: Parser) -> Self {
        Self {
            tokenizer,
            classifier: None,
            parser,
        }
    }

    /// Reclassify words with `classifier` after rule matching.
    #[must_use]
    pub fn with_classifier(mut self, classifier: WordClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// The rule set.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// The symbol registry and parser.
    #[must_use]
    pub const fn parser(&self) -> &Parser {
        &self.parser
    }

    /// The word classifier, when the grammar uses one.
    #[must_use]
    pub const fn classifier(&self) -> Option<&WordClassifier> {
        self.classifier.as_ref()
    }

    /// Tokenize and classify `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Lex`] when the tokenizer cannot advance.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, ParseError> {
        let tokens = self.tokenizer.tokenize(input)?;
        Ok(match &self.classifier {
            Some(classifier) => classifier.classify(tokens),
            None => tokens,
        })
    }

    /// Tokenize `input` and convert it to postfix order.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer and [`Parser::infix_to_postfix`] failures.
    pub fn postfix(&self, input: &str) -> Result<VecDeque<Token>, ParseError> {
        let tokens = self.tokenize(input)?;
        self.parser.infix_to_postfix(tokens)
    }

    /// Parse `input` into a single expression tree.
    ///
    /// # Errors
    ///
    /// Propagates tokenizer, postfix conversion and tree-building failures.
    pub fn parse(&self, input: &str) -> Result<ParseNode, ParseError> {
        let tokens = self.tokenize(input)?;
        self.parse_tokens(tokens)
    }

    /// Parse an already tokenized and classified stream.
    ///
    /// # Errors
    ///
    /// Propagates postfix conversion and tree-building failures.
    pub fn parse_tokens(&self, tokens: Vec<Token>) -> Result<ParseNode, ParseError> {
        let postfix = self.parser.infix_to_postfix(tokens)?;
        self.parser.postfix_to_tree(postfix)
    }
}

/// Borrow a lazily built process-wide grammar, cloning its build failure.
fn shared(
    grammar: &'static Result<Grammar, GrammarError>,
) -> Result<&'static Grammar, QueryError> {
    grammar.as_ref().map_err(|err| {
        log::error!("grammar construction failed: {err}");
        QueryError::Grammar(err.clone())
    })
}
