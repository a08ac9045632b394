//! AST pretty printer — renders the tree in an indented format for
//! debugging and golden tests.
//!
//! ```text
//! Block
//!   Let "x" (mut)
//!     Int 1
//!   Binary +
//!     Variable "x" (shared borrow)
//!     Variable "x" (shared borrow)
//! ```

use crate::expr::Expr;
use crate::item::Function;

/// Accumulates the rendered tree.
pub struct PrettyPrinter {
    output: String,
    indent: usize,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Render an expression tree, returning the accumulated text.
    pub fn print_expr(&mut self, expr: &Expr) -> &str {
        self.expr(expr);
        &self.output
    }

    /// Render a function: header line, then parameters and body.
    pub fn print_function(&mut self, function: &Function) -> &str {
        let prototype = &function.prototype;
        self.line(&format!("Function \"{}\"", prototype.name));
        self.indent += 1;
        if prototype.params.is_empty() {
            self.line("Params: (none)");
        } else {
            self.line("Params");
            self.indent += 1;
            for (param, info) in prototype.params.iter().zip(&prototype.param_borrows) {
                let mutability = if info.mutable { " (mut)" } else { "" };
                self.line(&format!("{param}: {}{mutability}", info.kind));
            }
            self.indent -= 1;
        }
        self.line("Body");
        self.indent += 1;
        self.expr(&function.body);
        self.indent -= 2;
        &self.output
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Int(value) => self.line(&format!("Int {value}")),
            Expr::Variable(var) => {
                self.line(&format!("Variable \"{}\" ({})", var.name, var.borrow_kind));
            }
            Expr::Let(let_expr) => {
                let mutability = if let_expr.mutable { " (mut)" } else { "" };
                self.line(&format!("Let \"{}\"{mutability}", let_expr.name));
                self.nested(&let_expr.init);
            }
            Expr::Binary(binary) => {
                self.line(&format!("Binary {}", binary.op));
                self.indent += 1;
                self.expr(&binary.lhs);
                self.expr(&binary.rhs);
                self.indent -= 1;
            }
            Expr::Call(call) => {
                self.line(&format!("Call \"{}\"", call.callee));
                self.indent += 1;
                for arg in &call.args {
                    self.expr(arg);
                }
                self.indent -= 1;
            }
            Expr::Block(items) => {
                self.line("Block");
                self.indent += 1;
                for item in items {
                    self.expr(item);
                }
                self.indent -= 1;
            }
        }
    }

    fn nested(&mut self, expr: &Expr) {
        self.indent += 1;
        self.expr(expr);
        self.indent -= 1;
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for PrettyPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one expression tree to a string.
pub fn pretty_print(expr: &Expr) -> String {
    let mut printer = PrettyPrinter::new();
    printer.print_expr(expr);
    printer.output
}
