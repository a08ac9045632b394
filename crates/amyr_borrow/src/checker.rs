//! The borrow-check walk.
//!
//! Post-order over the expression tree: initializers before their
//! bindings, left operands before right, block items in order. Every
//! variable reference is treated as a read with that reference's
//! borrow kind; reads that the ownership rules reject become
//! violations. Violations accumulate in source order; the first one is
//! what the driver reports.

use amyr_ast::{BorrowKind, Expr, Function, LetExpr, VariableExpr};
use thiserror::Error;

use crate::ownership::OwnershipTracker;

/// The violation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A borrow was requested while an incompatible borrow is held.
    BorrowWhileMutable,
    /// A binding was read, borrowed, or moved after its value moved.
    UseAfterMove,
    /// Everything else the rules reject: mutable borrow of an
    /// immutable binding, duplicate declaration, unknown name.
    InvalidBorrow,
}

/// A borrow-rule violation, displayed as `Line <n>: <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {message}")]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
    pub line: u32,
}

impl Violation {
    fn new(kind: ViolationKind, message: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
        }
    }
}

/// Walks an AST and records every ownership violation it finds.
#[derive(Debug, Default)]
pub struct BorrowChecker {
    tracker: OwnershipTracker,
    violations: Vec<Violation>,
}

impl BorrowChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check an expression tree. Clears previous violations first and
    /// returns whether the tree is clean.
    pub fn check(&mut self, root: &Expr) -> bool {
        self.violations.clear();
        self.check_expr(root);
        self.violations.is_empty()
    }

    /// Check a function: parameters register as bindings in the body's
    /// scope, mutable when their prototype says so.
    pub fn check_function(&mut self, function: &Function) -> bool {
        self.violations.clear();
        self.tracker.enter_scope();
        let prototype = &function.prototype;
        for (param, info) in prototype.params.iter().zip(&prototype.param_borrows) {
            self.tracker.register_variable(param, info.mutable);
        }
        self.check_expr(&function.body);
        self.tracker.exit_scope();
        self.violations.is_empty()
    }

    /// All violations from the last check, in source order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The underlying tracker, for callers that register borrows
    /// themselves before checking.
    pub fn tracker_mut(&mut self) -> &mut OwnershipTracker {
        &mut self.tracker
    }

    // ---- The walk ----------------------------------------------------

    fn check_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Int(_) => {}
            Expr::Variable(var) => self.check_variable(var),
            Expr::Let(let_expr) => self.check_let(let_expr),
            Expr::Binary(binary) => {
                self.check_expr(&binary.lhs);
                self.check_expr(&binary.rhs);
            }
            Expr::Call(call) => {
                for arg in &call.args {
                    self.check_expr(arg);
                }
            }
            Expr::Block(items) => {
                self.tracker.enter_scope();
                for item in items {
                    self.check_expr(item);
                }
                self.tracker.exit_scope();
            }
        }
    }

    fn check_let(&mut self, let_expr: &LetExpr) {
        // The initializer is evaluated before the name exists.
        self.check_expr(&let_expr.init);
        if !self.tracker.register_variable(&let_expr.name, let_expr.mutable) {
            self.violation(
                ViolationKind::InvalidBorrow,
                format!("Variable '{}' is already declared", let_expr.name),
                let_expr.line,
            );
        }
    }

    fn check_variable(&mut self, var: &VariableExpr) {
        if self.tracker.can_borrow(&var.name, var.borrow_kind) {
            // A move read consumes the value.
            if var.borrow_kind == BorrowKind::Move {
                self.tracker.mark_moved(&var.name);
            }
            return;
        }

        let (kind, message) = match self.tracker.get(&var.name) {
            None => (
                ViolationKind::InvalidBorrow,
                format!("Use of undeclared variable '{}'", var.name),
            ),
            Some(record) if record.moved => (
                ViolationKind::UseAfterMove,
                format!("Use of moved value '{}'", var.name),
            ),
            Some(record) if !record.borrowers.is_empty() => (
                ViolationKind::BorrowWhileMutable,
                format!(
                    "Cannot borrow variable '{}' while it is already borrowed",
                    var.name
                ),
            ),
            Some(_) => (
                ViolationKind::InvalidBorrow,
                format!("Cannot mutably borrow immutable variable '{}'", var.name),
            ),
        };
        self.violation(kind, message, var.line);
    }

    fn violation(&mut self, kind: ViolationKind, message: impl Into<String>, line: u32) {
        self.violations.push(Violation::new(kind, message, line));
    }
}
