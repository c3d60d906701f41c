//! Shunting-yard conversion from infix token order to postfix order.

use std::collections::VecDeque;

use super::{Associativity, Parser};
use crate::errors::{ParseError, structural};
use crate::token::{Token, TokenKind, TokenRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Operand,
    Operator,
}

/// Entries held back on the operator stack.
#[derive(Debug)]
enum Pending {
    Operator { token: Token, precedence: i32 },
    Group { open: Token },
    Call {
        function: Token,
        open: Token,
        separators: usize,
    },
}

struct Conversion<'p> {
    parser: &'p Parser,
    output: VecDeque<Token>,
    stack: Vec<Pending>,
    expect: Expect,
    previous: Option<TokenKind>,
}

impl Parser {
    /// Reorder `tokens` into postfix (reverse Polish) order.
    ///
    /// Parentheses and separators shape the output but are never emitted;
    /// each function token follows its arguments.
    ///
    /// # Errors
    ///
    /// - [`ParseError::UnknownSymbol`] for operators or functions missing
    ///   from the registry.
    /// - [`ParseError::Structural`] for unbalanced parentheses, misplaced
    ///   commas, empty groups, a `:` outside a lambda, or a function name
    ///   not followed by `(`.
    /// - [`ParseError::ArityMismatch`] when a call supplies a different
    ///   number of arguments than the function declares.
    ///
    /// A trailing operator is accepted here and rejected by
    /// [`Parser::postfix_to_tree`].
    pub fn infix_to_postfix(
        &self,
        tokens: impl IntoIterator<Item = Token>,
    ) -> Result<VecDeque<Token>, ParseError> {
        let mut conversion = Conversion::new(self);
        let mut stream = tokens
            .into_iter()
            .filter(|token| token.kind().role() != TokenRole::Ignored);
        while let Some(token) = stream.next() {
            match token.kind().role() {
                TokenRole::Operand => conversion.operand(token),
                TokenRole::Callable => {
                    let open = stream.next();
                    conversion.call(token, open)?;
                }
                TokenRole::Open => conversion.open(token),
                TokenRole::Close => conversion.close(&token)?,
                TokenRole::Separator => conversion.separator(&token)?,
                TokenRole::Operator => conversion.operator(token)?,
                TokenRole::Ignored => {}
            }
        }
        conversion.finish()
    }
}

impl<'p> Conversion<'p> {
    fn new(parser: &'p Parser) -> Self {
        Self {
            parser,
            output: VecDeque::new(),
            stack: Vec::new(),
            expect: Expect::Operand,
            previous: None,
        }
    }

    fn operand(&mut self, token: Token) {
        self.previous = Some(token.kind());
        self.output.push_back(token);
        self.expect = Expect::Operator;
    }

    fn call(&mut self, function: Token, open: Option<Token>) -> Result<(), ParseError> {
        self.parser.function_for(&function)?;
        let Some(open) = open.filter(|next| next.kind() == TokenKind::OpenParen) else {
            return Err(structural(&function, "function name must be followed by '('"));
        };
        self.stack.push(Pending::Call {
            function,
            open,
            separators: 0,
        });
        self.previous = Some(TokenKind::OpenParen);
        self.expect = Expect::Operand;
        Ok(())
    }

    fn open(&mut self, open: Token) {
        self.stack.push(Pending::Group { open });
        self.previous = Some(TokenKind::OpenParen);
        self.expect = Expect::Operand;
    }

    fn operator(&mut self, token: Token) -> Result<(), ParseError> {
        let parser = self.parser;
        let definition = parser.operator_for(&token)?;
        if token.kind() == TokenKind::Colon && !self.inside_lambda() {
            return Err(structural(&token, "':' is only valid inside a lambda"));
        }
        let precedence = definition.precedence;
        let left = definition.associativity == Associativity::Left;
        let prefix = self.expect == Expect::Operand && definition.arity == 1;
        if !prefix {
            self.pop_operators(|top| top > precedence || (top == precedence && left));
        }
        self.previous = Some(token.kind());
        self.stack.push(Pending::Operator { token, precedence });
        self.expect = Expect::Operand;
        Ok(())
    }

    fn separator(&mut self, token: &Token) -> Result<(), ParseError> {
        if self.expect == Expect::Operand {
            return Err(structural(token, "missing argument before ','"));
        }
        self.pop_operators(|_| true);
        match self.stack.last_mut() {
            Some(Pending::Call { separators, .. }) => *separators += 1,
            _ => return Err(structural(token, "',' outside an argument list")),
        }
        self.previous = Some(TokenKind::Comma);
        self.expect = Expect::Operand;
        Ok(())
    }

    fn close(&mut self, token: &Token) -> Result<(), ParseError> {
        self.pop_operators(|_| true);
        let previous = self.previous.replace(TokenKind::CloseParen);
        self.expect = Expect::Operator;
        match self.stack.pop() {
            None | Some(Pending::Operator { .. }) => Err(structural(token, "unmatched ')'")),
            Some(Pending::Group { .. }) if previous == Some(TokenKind::OpenParen) => {
                Err(structural(token, "empty parentheses"))
            }
            Some(Pending::Group { .. }) => Ok(()),
            Some(Pending::Call {
                function,
                separators,
                ..
            }) => {
                if previous == Some(TokenKind::Comma) {
                    return Err(structural(token, "trailing ',' in argument list"));
                }
                let found = if previous == Some(TokenKind::OpenParen) {
                    0
                } else {
                    separators + 1
                };
                let expected = self.parser.function_for(&function)?.arity;
                if found != expected {
                    return Err(ParseError::ArityMismatch {
                        symbol: function.value().to_owned(),
                        expected,
                        found,
                    });
                }
                self.output.push_back(function);
                Ok(())
            }
        }
    }

    fn finish(mut self) -> Result<VecDeque<Token>, ParseError> {
        while let Some(entry) = self.stack.pop() {
            match entry {
                Pending::Operator { token, .. } => self.output.push_back(token),
                Pending::Group { open } | Pending::Call { open, .. } => {
                    return Err(structural(&open, "unclosed '('"));
                }
            }
        }
        log::trace!("postfix conversion produced {} tokens", self.output.len());
        Ok(self.output)
    }

    fn inside_lambda(&self) -> bool {
        let frame = self
            .stack
            .iter()
            .rev()
            .find(|entry| !matches!(entry, Pending::Operator { .. }));
        matches!(
            frame,
            Some(Pending::Call { function, .. }) if function.kind() == TokenKind::Lambda
        )
    }

    fn pop_operators(&mut self, mut should_pop: impl FnMut(i32) -> bool) {
        while let Some(Pending::Operator { precedence, .. }) = self.stack.last() {
            if !should_pop(*precedence) {
                break;
            }
            if let Some(Pending::Operator { token, .. }) = self.stack.pop() {
                self.output.push_back(token);
            }
        }
    }
}
