//! Context-sensitive reclassification of bare words.
//!
//! A word only names a function when an opening parenthesis follows it, so
//! the decision is taken after rule matching with one token of lookahead.

use std::collections::BTreeSet;

use crate::token::{Token, TokenKind};

/// Promotes [`TokenKind::Literal`] words to function or lambda tokens.
///
/// # Examples
/// ```
/// use odata_query::{Token, TokenKind, WordClassifier};
///
/// let classifier = WordClassifier::new()
///     .with_functions(["length"])
///     .with_lambdas(["any"]);
/// let tokens = classifier.classify(vec![
///     Token::new("length", TokenKind::Literal),
///     Token::new("(", TokenKind::OpenParen),
///     Token::new("length", TokenKind::Literal),
///     Token::new(")", TokenKind::CloseParen),
/// ]);
/// let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Function, TokenKind::OpenParen, TokenKind::Literal, TokenKind::CloseParen]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordClassifier {
    functions: BTreeSet<String>,
    lambdas: BTreeSet<String>,
}

impl WordClassifier {
    /// Create a classifier that leaves every word untouched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add names that become [`TokenKind::Function`] before `(`.
    #[must_use]
    pub fn with_functions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.functions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add names that become [`TokenKind::Lambda`] before `(`.
    ///
    /// Lambda names take priority over function names.
    #[must_use]
    pub fn with_lambdas<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lambdas.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether `word` would be promoted to a function before `(`.
    #[must_use]
    pub fn is_function(&self, word: &str) -> bool {
        self.functions.contains(word)
    }

    /// Whether `word` would be promoted to a lambda before `(`.
    #[must_use]
    pub fn is_lambda(&self, word: &str) -> bool {
        self.lambdas.contains(word)
    }

    /// Reclassify words using the kind of the token that follows each one.
    ///
    /// The stream must already be free of ignored tokens, so `time (` and
    /// `time(` classify the same way.
    #[must_use]
    pub fn classify(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut output = Vec::with_capacity(tokens.len());
        let mut stream = tokens.into_iter().peekable();
        while let Some(token) = stream.next() {
            let opens_call = stream
                .peek()
                .is_some_and(|next| next.kind() == TokenKind::OpenParen);
            output.push(self.promote(token, opens_call));
        }
        output
    }

    fn promote(&self, token: Token, opens_call: bool) -> Token {
        if !opens_call || token.kind() != TokenKind::Literal {
            return token;
        }
        if self.is_lambda(token.value()) {
            token.reclassified(TokenKind::Lambda)
        } else if self.is_function(token.value()) {
            token.reclassified(TokenKind::Function)
        } else {
            token
        }
    }
}
