//! Amayori AST — the tree produced by the parser and consumed by the
//! borrow checker and the IR emitter.
//!
//! Expressions are a single sum type rather than a class hierarchy:
//! every pass walks the tree by matching on the variant, which keeps
//! additions exhaustive-checked and the layout flat. Each node owns its
//! children exclusively; dropping the root releases the whole tree in
//! one pass.

pub mod common;
pub mod expr;
pub mod item;
pub mod pretty;

pub use common::{BorrowKind, Location, Span};
pub use expr::{BinOp, BinaryExpr, CallExpr, Expr, LetExpr, VariableExpr};
pub use item::{BorrowInfo, Function, FunctionPrototype};
pub use pretty::{pretty_print, PrettyPrinter};
