//! Expression AST nodes.

use std::fmt;

use crate::common::BorrowKind;

/// Expression node. Children are owned exclusively by their parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal.
    Int(i64),
    /// Reference to a named binding.
    Variable(VariableExpr),
    /// `let [mut] name = init`.
    Let(Box<LetExpr>),
    /// `lhs op rhs`.
    Binary(Box<BinaryExpr>),
    /// `callee(args)`.
    Call(Box<CallExpr>),
    /// `{ expr; expr; ... }` — introduces a scope.
    Block(Vec<Expr>),
}

impl Expr {
    /// Build a variable reference with the default shared borrow kind.
    pub fn variable(name: impl Into<String>, line: u32) -> Expr {
        Expr::Variable(VariableExpr {
            name: name.into(),
            borrow_kind: BorrowKind::Shared,
            line,
        })
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(Box::new(BinaryExpr { op, lhs, rhs }))
    }
}

/// A use of a named binding.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: String,
    /// How this use borrows the binding. The parser constructs every
    /// reference as `Shared`; later layers may rewrite it.
    pub borrow_kind: BorrowKind,
    pub line: u32,
}

/// A `let` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct LetExpr {
    pub name: String,
    pub mutable: bool,
    pub init: Expr,
    pub line: u32,
}

/// Binary arithmetic.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub lhs: Expr,
    pub rhs: Expr,
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn as_char(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A call of a named function.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: String,
    pub args: Vec<Expr>,
    pub line: u32,
}
