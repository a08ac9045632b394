//! Amayori parser — builds an AST from source text.
//!
//! Parsing happens in two layers. The cooking layer drives the
//! low-level lexer, keeps absolute offsets and line numbers, resolves
//! keywords and literal values, and materializes the token list. The
//! grammar layer is a classic recursive-descent parser over that list:
//! `*`/`/` bind tighter than `+`/`-`, both are left-associative, and
//! blocks open and close scopes in the declared-name table.
//!
//! The parser fails fast: the first unexpected token or unresolved
//! name aborts with a `Line <n>:`-prefixed error.

pub mod scope;
pub mod token;

mod expr;
mod parser;


pub use parser::{ParseError, Parser};
pub use scope::ScopeStack;
pub use token::{cook, ParseToken, ParseTokenKind};

use amyr_ast::Expr;

/// Parse a whole source text into one expression root. A program is a
/// sequence of expressions with optional `;` separators; a single
/// expression is returned as-is, several are wrapped in a block.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = cook(source)?;
    Parser::new(tokens).parse_program()
}
