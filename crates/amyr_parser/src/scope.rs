//! Declared-name tracking — a stack of per-scope name sets.
//!
//! The parser pushes a level on every block it enters and pops it on
//! the way out, so a name declared inside a block stops resolving the
//! moment the block ends. There is no shadowing analysis beyond that.

use std::collections::HashSet;

#[derive(Debug)]
pub struct ScopeStack {
    levels: Vec<HashSet<String>>,
}

impl ScopeStack {
    /// A fresh stack with the outermost scope already open.
    pub fn new() -> Self {
        Self {
            levels: vec![HashSet::new()],
        }
    }

    /// Open a nested scope.
    pub fn enter(&mut self) {
        self.levels.push(HashSet::new());
    }

    /// Close the innermost scope, discarding every name declared in it.
    /// The outermost scope is never popped.
    pub fn exit(&mut self) {
        if self.levels.len() > 1 {
            self.levels.pop();
        }
    }

    /// Record a declaration in the innermost scope. Returns false if
    /// the name is already declared at this level.
    pub fn declare(&mut self, name: impl Into<String>) -> bool {
        self.levels
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.into())
    }

    /// Is the name visible from the innermost scope?
    pub fn is_declared(&self, name: &str) -> bool {
        self.levels.iter().rev().any(|level| level.contains(name))
    }

    /// Nesting depth; the outermost scope is depth 0.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
