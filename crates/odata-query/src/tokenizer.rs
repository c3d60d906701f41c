//! Ordered, regex-driven tokenizer.
//!
//! Rules are tried in registration order at the current input position and
//! the first one that matches consumes its text. Rules registered with
//! [`Tokenizer::ignore`] advance the position without emitting a token.

use regex::Regex;

use crate::errors::{GrammarError, ParseError};
use crate::token::{Token, TokenKind};

const TOKEN_GROUP: &str = "token";
const FRAGMENT_CHARS: usize = 16;

/// A single lexical rule.
///
/// The pattern is anchored at the current input position. When it contains
/// a named group `token`, only the group's text is consumed and emitted; the
/// rest of the match is right context that must be present but stays in the
/// input for the next rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pattern: String,
    regex: Regex,
    kind: TokenKind,
    ignore: bool,
    has_token_group: bool,
}

struct RuleMatch<'a> {
    value: &'a str,
    offset: usize,
    consumed: usize,
}

impl TokenRule {
    /// Compile a rule emitting tokens of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRule`] when `pattern` is not a valid
    /// regular expression.
    pub fn new(pattern: &str, kind: TokenKind) -> Result<Self, GrammarError> {
        let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
            GrammarError::InvalidRule {
                pattern: pattern.to_owned(),
                source,
            }
        })?;
        let has_token_group = regex.capture_names().any(|name| name == Some(TOKEN_GROUP));
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
            kind,
            ignore: false,
            has_token_group,
        })
    }

    /// Compile a rule whose matches are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRule`] when `pattern` is not a valid
    /// regular expression.
    pub fn ignored(pattern: &str, kind: TokenKind) -> Result<Self, GrammarError> {
        Ok(Self {
            ignore: true,
            ..Self::new(pattern, kind)?
        })
    }

    /// The pattern as registered, without the start anchor.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The kind assigned to emitted tokens.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Whether matches are dropped from the output.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignore
    }

    fn match_prefix<'a>(&self, rest: &'a str) -> Option<RuleMatch<'a>> {
        if !self.has_token_group {
            return self.regex.find(rest).map(|found| RuleMatch {
                value: found.as_str(),
                offset: 0,
                consumed: found.end(),
            });
        }
        let captures = self.regex.captures(rest)?;
        let whole = captures.get(0)?;
        Some(captures.name(TOKEN_GROUP).map_or_else(
            || RuleMatch {
                value: whole.as_str(),
                offset: 0,
                consumed: whole.end(),
            },
            |group| RuleMatch {
                value: group.as_str(),
                offset: group.start(),
                consumed: group.end(),
            },
        ))
    }
}

/// An ordered rule set turning query text into tokens.
///
/// # Examples
/// ```
/// use odata_query::{Tokenizer, TokenKind};
///
/// let mut tokenizer = Tokenizer::new();
/// tokenizer.ignore(r"\s+", TokenKind::Whitespace)?;
/// tokenizer.add(r"\d+", TokenKind::Integer)?;
/// tokenizer.add(r"\+", TokenKind::Operator)?;
///
/// let tokens = tokenizer.tokenize("1 + 22")?;
/// let values: Vec<_> = tokens.iter().map(|t| t.value()).collect();
/// assert_eq!(values, ["1", "+", "22"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    rules: Vec<TokenRule>,
}

impl Tokenizer {
    /// Create a tokenizer without rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule emitting tokens of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRule`] when `pattern` does not compile.
    pub fn add(&mut self, pattern: &str, kind: TokenKind) -> Result<(), GrammarError> {
        self.push_rule(TokenRule::new(pattern, kind)?);
        Ok(())
    }

    /// Append a rule whose matches are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRule`] when `pattern` does not compile.
    pub fn ignore(&mut self, pattern: &str, kind: TokenKind) -> Result<(), GrammarError> {
        self.push_rule(TokenRule::ignored(pattern, kind)?);
        Ok(())
    }

    /// Append a precompiled rule.
    pub fn push_rule(&mut self, rule: TokenRule) {
        log::trace!("registered token rule `{}` ({})", rule.pattern(), rule.kind());
        self.rules.push(rule);
    }

    /// The rules in matching order.
    #[must_use]
    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    /// Split `input` into tokens.
    ///
    /// Empty input yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Lex`] when no rule matches at some position, or
    /// when the first matching rule matches the empty string there. No
    /// partial result is returned.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut position = 0;
        loop {
            let rest = input.get(position..).unwrap_or_default();
            if rest.is_empty() {
                return Ok(tokens);
            }
            let Some((rule, found)) = self
                .rules
                .iter()
                .find_map(|rule| rule.match_prefix(rest).map(|found| (rule, found)))
            else {
                return Err(lex_error(rest, position));
            };
            if found.consumed == 0 {
                return Err(lex_error(rest, position));
            }
            if !rule.ignore {
                tokens.push(Token::at(found.value, rule.kind, position + found.offset));
            }
            position += found.consumed;
        }
    }
}

fn lex_error(rest: &str, position: usize) -> ParseError {
    let fragment: String = rest.chars().take(FRAGMENT_CHARS).collect();
    log::debug!("tokenizer stopped at byte {position} near `{fragment}`");
    ParseError::Lex { position, fragment }
}
