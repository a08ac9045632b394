//! Ownership state tracking for bindings.
//!
//! The `OwnershipTracker` owns one record per live binding and a scope
//! counter. Scopes nest by number: registering happens at the current
//! level, and leaving a scope drops every record created at that level
//! along with every borrow that originated there.

use std::collections::HashMap;

use amyr_ast::BorrowKind;

/// One outstanding borrow against a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrower {
    /// Caller-chosen identifier, used in diagnostics.
    pub id: String,
    pub kind: BorrowKind,
    /// Scope level the borrow was created at; it is released when that
    /// scope ends.
    pub scope_level: u32,
}

/// The ownership state of one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipRecord {
    pub mutable: bool,
    pub moved: bool,
    /// Outstanding borrows, in registration order.
    pub borrowers: Vec<Borrower>,
    pub scope_level: u32,
}

/// Tracks ownership records for every binding in scope.
///
/// Invariant: a moved binding has no borrowers — `mark_moved` refuses
/// while borrows are outstanding, and nothing can borrow a moved
/// binding afterwards.
#[derive(Debug, Default)]
pub struct OwnershipTracker {
    records: HashMap<String, OwnershipRecord>,
    current_scope: u32,
}

impl OwnershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_scope(&self) -> u32 {
        self.current_scope
    }

    /// Enter a nested scope.
    pub fn enter_scope(&mut self) {
        self.current_scope += 1;
    }

    /// Leave the current scope: drop every record registered at this
    /// level, release borrows that originated here from the surviving
    /// records, then decrement the level.
    pub fn exit_scope(&mut self) {
        let level = self.current_scope;
        self.records.retain(|_, record| record.scope_level != level);
        for record in self.records.values_mut() {
            record.borrowers.retain(|b| b.scope_level != level);
        }
        self.current_scope = self.current_scope.saturating_sub(1);
    }

    /// Register a new binding at the current scope level. Fails if a
    /// binding with that name already exists at any level.
    pub fn register_variable(&mut self, name: &str, mutable: bool) -> bool {
        if self.records.contains_key(name) {
            return false;
        }
        self.records.insert(
            name.to_string(),
            OwnershipRecord {
                mutable,
                moved: false,
                borrowers: Vec::new(),
                scope_level: self.current_scope,
            },
        );
        true
    }

    /// Would a borrow of `kind` against `name` be legal right now?
    ///
    /// Any outstanding borrow blocks further borrows of every kind —
    /// shared borrows do not stack. A mutable borrow additionally
    /// requires the binding to be declared `mut`.
    pub fn can_borrow(&self, name: &str, kind: BorrowKind) -> bool {
        let Some(record) = self.records.get(name) else {
            return false;
        };
        if record.moved {
            return false;
        }
        match kind {
            BorrowKind::None => true,
            BorrowKind::Shared => record.borrowers.is_empty(),
            BorrowKind::Mutable => record.borrowers.is_empty() && record.mutable,
            BorrowKind::Move => record.borrowers.is_empty(),
        }
    }

    /// Record a borrow of `var` held by `borrower`. Succeeds only when
    /// [`can_borrow`](OwnershipTracker::can_borrow) allows it.
    pub fn register_borrow(&mut self, var: &str, borrower: &str, kind: BorrowKind) -> bool {
        if !self.can_borrow(var, kind) {
            return false;
        }
        let scope_level = self.current_scope;
        let Some(record) = self.records.get_mut(var) else {
            return false;
        };
        record.borrowers.push(Borrower {
            id: borrower.to_string(),
            kind,
            scope_level,
        });
        true
    }

    /// Move the value out of `name`. Fails if it is unknown, already
    /// moved, or currently borrowed.
    pub fn mark_moved(&mut self, name: &str) -> bool {
        match self.records.get_mut(name) {
            Some(record) if !record.moved && record.borrowers.is_empty() => {
                record.moved = true;
                true
            }
            _ => false,
        }
    }

    /// The record for `name`, if the binding is live.
    pub fn get(&self, name: &str) -> Option<&OwnershipRecord> {
        self.records.get(name)
    }
}
