//! Parser infrastructure — token navigation and error handling.

use amyr_ast::Expr;
use thiserror::Error;

use crate::scope::ScopeStack;
use crate::token::{ParseToken, ParseTokenKind};

/// Parse error with the line it occurred on. Displays in the shape all
/// front-end diagnostics share: `Line <n>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {message}")]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

impl ParseError {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// The parser. Consumes a cooked token list and produces an AST,
/// stopping at the first error.
pub struct Parser {
    pub(crate) tokens: Vec<ParseToken>,
    pub(crate) pos: usize,
    pub(crate) scopes: ScopeStack,
}

impl Parser {
    /// `tokens` must end with an `Eof` token, as produced by
    /// [`cook`](crate::token::cook).
    pub fn new(tokens: Vec<ParseToken>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(ParseTokenKind::Eof)
        ));
        Self {
            tokens,
            pos: 0,
            scopes: ScopeStack::new(),
        }
    }

    /// Parse a program: expressions separated by optional `;` up to end
    /// of input. One expression stays bare; several become a block.
    pub fn parse_program(mut self) -> Result<Expr, ParseError> {
        let mut items = Vec::new();
        while !self.at(&ParseTokenKind::Eof) {
            items.push(self.parse_expression()?);
            self.eat(&ParseTokenKind::Semi);
        }
        Ok(if items.len() == 1 {
            items.pop().unwrap()
        } else {
            Expr::Block(items)
        })
    }

    // ---- Token navigation ----

    pub(crate) fn current(&self) -> &ParseToken {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().unwrap())
    }

    pub(crate) fn advance(&mut self) -> ParseToken {
        let token = self.current().clone();
        if token.kind != ParseTokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at(&self, kind: &ParseTokenKind) -> bool {
        self.current().kind == *kind
    }

    pub(crate) fn eat(&mut self, kind: &ParseTokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(
        &mut self,
        kind: &ParseTokenKind,
        message: &str,
    ) -> Result<ParseToken, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(message))
        }
    }

    // ---- Error handling ----

    /// An error pointing at the current token's line.
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.current().line(), message)
    }
}
