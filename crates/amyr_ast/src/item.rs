//! Top-level items: function prototypes and definitions.
//!
//! The expression parser never produces these; they belong to the item
//! layer that sits above it and to the IR-emitter boundary, which needs
//! a stable shape for function signatures.

use crate::common::BorrowKind;
use crate::expr::Expr;

/// Per-parameter borrow annotation on a prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowInfo {
    pub kind: BorrowKind,
    pub mutable: bool,
}

impl Default for BorrowInfo {
    fn default() -> Self {
        Self {
            kind: BorrowKind::None,
            mutable: false,
        }
    }
}

/// A function signature: name, parameter names, and how each parameter
/// is passed.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionPrototype {
    pub name: String,
    pub params: Vec<String>,
    pub param_borrows: Vec<BorrowInfo>,
}

impl FunctionPrototype {
    /// `param_borrows` is padded with defaults so that it always matches
    /// `params` in length.
    pub fn new(
        name: impl Into<String>,
        params: Vec<String>,
        mut param_borrows: Vec<BorrowInfo>,
    ) -> Self {
        let name = name.into();
        param_borrows.resize(params.len(), BorrowInfo::default());
        Self {
            name,
            params,
            param_borrows,
        }
    }
}

/// A function definition: a prototype plus a body expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub prototype: FunctionPrototype,
    pub body: Expr,
}

impl Function {
    pub fn new(prototype: FunctionPrototype, body: Expr) -> Self {
        Self { prototype, body }
    }
}
