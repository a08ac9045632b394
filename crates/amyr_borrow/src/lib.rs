//! Amayori borrow checker — enforces ownership and borrowing rules
//! over the AST.
//!
//! Every binding in scope has an ownership record: whether it was
//! declared mutable, whether its value has been moved out, and which
//! borrows are currently held against it. The checker walks the tree
//! after parsing and enforces:
//!
//! - At most one mutable borrow, and only of a `mut` binding.
//! - No borrow of any kind while another borrow is outstanding (this
//!   is deliberately stricter than Rust: shared borrows do not stack).
//! - No use, borrow, or move of a value after it has been moved.
//! - Borrows and bindings die with the scope that created them.

pub mod checker;
pub mod ownership;

#[cfg(test)]
mod adversarial_tests;

pub use checker::{BorrowChecker, Violation, ViolationKind};
pub use ownership::{Borrower, OwnershipRecord, OwnershipTracker};
