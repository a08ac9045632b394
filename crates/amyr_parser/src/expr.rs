//! The expression grammar.
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := primary (('*' | '/') primary)*
//! primary    := integer
//!             | identifier [ '(' args ')' ]
//!             | '(' expression ')'
//!             | let_expr
//!             | block
//! let_expr   := 'let' ['mut'] identifier '=' expression
//! block      := '{' (expression ';'?)* '}'
//! ```
//!
//! Both operator levels are left-associative, so `a - b - c` builds a
//! left-leaning tree. Parentheses group without leaving a node behind.

use amyr_ast::{BinOp, Expr, LetExpr, CallExpr};

use crate::parser::{ParseError, Parser};
use crate::token::ParseTokenKind;

impl Parser {
    /// `expression := term (('+' | '-') term)*`
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_term()?;

        loop {
            let op = match self.current().kind {
                ParseTokenKind::Plus => BinOp::Add,
                ParseTokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    /// `term := primary (('*' | '/') primary)*`
    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let op = match self.current().kind {
                ParseTokenKind::Star => BinOp::Mul,
                ParseTokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_primary()?;
            expr = Expr::binary(op, expr, rhs);
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current().kind.clone() {
            ParseTokenKind::Int(value) => {
                self.advance();
                Ok(Expr::Int(value))
            }

            ParseTokenKind::Ident(name) => {
                let line = self.current().line();
                self.advance();

                // A following `(` makes this a call. Functions live in
                // the item layer, so callee names are not checked
                // against the local declaration table.
                if self.at(&ParseTokenKind::LParen) {
                    return self.parse_call(name, line);
                }

                if !self.scopes.is_declared(&name) {
                    return Err(ParseError::new(
                        line,
                        format!("Use of undeclared variable: {name}"),
                    ));
                }
                Ok(Expr::variable(name, line))
            }

            ParseTokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(&ParseTokenKind::RParen, "Expect ')' after expression.")?;
                Ok(expr)
            }

            ParseTokenKind::Let => self.parse_let(),

            ParseTokenKind::LBrace => self.parse_block(),

            _ => Err(self.error_here("Expect expression.")),
        }
    }

    /// `let_expr := 'let' ['mut'] identifier '=' expression`
    ///
    /// The name becomes visible only after its initializer, so
    /// `let x = x` is an undeclared-variable error.
    fn parse_let(&mut self) -> Result<Expr, ParseError> {
        let line = self.current().line();
        self.advance();

        let mutable = self.eat(&ParseTokenKind::Mut);

        let name = match self.current().kind.clone() {
            ParseTokenKind::Ident(name) => {
                self.advance();
                name
            }
            _ => return Err(self.error_here("Expect identifier after 'let'.")),
        };

        self.expect(&ParseTokenKind::Eq, "Expect '=' after variable name.")?;

        let init = self.parse_expression()?;
        self.scopes.declare(name.clone());

        Ok(Expr::Let(Box::new(LetExpr {
            name,
            mutable,
            init,
            line,
        })))
    }

    /// `block := '{' (expression ';'?)* '}'`
    fn parse_block(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.scopes.enter();

        let mut items = Vec::new();
        while !self.at(&ParseTokenKind::RBrace) && !self.at(&ParseTokenKind::Eof) {
            items.push(self.parse_expression()?);
            // The final expression may omit the semicolon.
            self.eat(&ParseTokenKind::Semi);
        }

        self.expect(&ParseTokenKind::RBrace, "Expect '}' after block.")?;
        self.scopes.exit();

        Ok(Expr::Block(items))
    }

    /// `args := expression (',' expression)*`
    fn parse_call(&mut self, callee: String, line: u32) -> Result<Expr, ParseError> {
        self.advance();

        let mut args = Vec::new();
        if !self.at(&ParseTokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.eat(&ParseTokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&ParseTokenKind::RParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call(Box::new(CallExpr { callee, args, line })))
    }
}
