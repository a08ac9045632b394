//! Adversarial borrow-checker tests — invariants under hostile
//! sequences of operations.

use amyr_ast::{BorrowKind, Expr, LetExpr, VariableExpr};

use crate::checker::{BorrowChecker, ViolationKind};
use crate::ownership::OwnershipTracker;

fn read(name: &str, kind: BorrowKind, line: u32) -> Expr {
    Expr::Variable(VariableExpr {
        name: name.to_string(),
        borrow_kind: kind,
        line,
    })
}

// ========================================================
// Tracker state-machine invariants
// ========================================================

#[test]
fn test_moved_implies_no_borrowers() {
    let mut tracker = OwnershipTracker::new();
    tracker.register_variable("x", false);
    assert!(tracker.register_borrow("x", "r", BorrowKind::Shared));

    // Cannot move while borrowed...
    assert!(!tracker.mark_moved("x"));
    // ...and the failed move must not have changed anything.
    assert!(!tracker.get("x").unwrap().moved);
    assert_eq!(tracker.get("x").unwrap().borrowers.len(), 1);
}

#[test]
fn test_shared_borrows_do_not_stack() {
    // Stricter than Rust on purpose: one shared borrow blocks the next.
    let mut tracker = OwnershipTracker::new();
    tracker.register_variable("x", false);
    assert!(tracker.register_borrow("x", "r1", BorrowKind::Shared));
    assert!(!tracker.register_borrow("x", "r2", BorrowKind::Shared));
}

#[test]
fn test_unknown_names_always_fail() {
    let mut tracker = OwnershipTracker::new();
    assert!(!tracker.can_borrow("ghost", BorrowKind::Shared));
    assert!(!tracker.register_borrow("ghost", "r", BorrowKind::Shared));
    assert!(!tracker.mark_moved("ghost"));
    assert!(tracker.get("ghost").is_none());
}

#[test]
fn test_duplicate_registration_fails_across_levels() {
    let mut tracker = OwnershipTracker::new();
    assert!(tracker.register_variable("x", false));
    tracker.enter_scope();
    // Same name at a deeper level is still a duplicate.
    assert!(!tracker.register_variable("x", true));
    tracker.exit_scope();
}

#[test]
fn test_exit_scope_releases_inner_borrows_of_outer_records() {
    let mut tracker = OwnershipTracker::new();
    tracker.register_variable("x", false);

    tracker.enter_scope();
    assert!(tracker.register_borrow("x", "inner", BorrowKind::Shared));
    assert!(!tracker.can_borrow("x", BorrowKind::Shared));
    tracker.exit_scope();

    // The borrow originated in the dead scope, so `x` is free again.
    assert!(tracker.can_borrow("x", BorrowKind::Shared));
    assert!(tracker.get("x").unwrap().borrowers.is_empty());
}

#[test]
fn test_outer_borrow_survives_inner_scope() {
    let mut tracker = OwnershipTracker::new();
    tracker.register_variable("x", false);
    assert!(tracker.register_borrow("x", "outer", BorrowKind::Shared));

    tracker.enter_scope();
    tracker.exit_scope();

    // The borrow was created at the outer level and must still hold.
    assert_eq!(tracker.get("x").unwrap().borrowers.len(), 1);
    assert!(!tracker.can_borrow("x", BorrowKind::Shared));
}

#[test]
fn test_deep_scope_nesting() {
    let mut tracker = OwnershipTracker::new();
    for i in 0..100 {
        tracker.enter_scope();
        assert!(tracker.register_variable(&format!("v{i}"), false));
    }
    assert_eq!(tracker.current_scope(), 100);
    for _ in 0..100 {
        tracker.exit_scope();
    }
    assert_eq!(tracker.current_scope(), 0);
    for i in 0..100 {
        assert!(tracker.get(&format!("v{i}")).is_none());
    }
}

#[test]
fn test_exit_scope_at_level_zero_is_harmless() {
    let mut tracker = OwnershipTracker::new();
    tracker.register_variable("x", false);
    tracker.exit_scope();
    tracker.exit_scope();
    assert_eq!(tracker.current_scope(), 0);
    // Level-0 records die with level 0; re-registration works.
    assert!(tracker.register_variable("x", false));
}

// ========================================================
// Walk-order pathology
// ========================================================

#[test]
fn test_move_in_lhs_poisons_rhs() {
    use amyr_ast::BinOp;
    let ast = Expr::Block(vec![
        Expr::Let(Box::new(LetExpr {
            name: "x".to_string(),
            mutable: false,
            init: Expr::Int(1),
            line: 1,
        })),
        Expr::binary(
            BinOp::Add,
            read("x", BorrowKind::Move, 2),
            read("x", BorrowKind::Shared, 2),
        ),
    ]);
    let mut checker = BorrowChecker::new();
    assert!(!checker.check(&ast));
    assert_eq!(checker.violations().len(), 1);
    assert_eq!(checker.violations()[0].kind, ViolationKind::UseAfterMove);
}

#[test]
fn test_move_inside_block_does_not_escape_record_cleanup() {
    // Moving a block-local binding is invisible outside the block.
    let ast = Expr::Block(vec![
        Expr::Block(vec![
            Expr::Let(Box::new(LetExpr {
                name: "x".to_string(),
                mutable: false,
                init: Expr::Int(1),
                line: 1,
            })),
            read("x", BorrowKind::Move, 1),
        ]),
        Expr::Let(Box::new(LetExpr {
            name: "x".to_string(),
            mutable: false,
            init: Expr::Int(2),
            line: 2,
        })),
        read("x", BorrowKind::Shared, 2),
    ]);
    let mut checker = BorrowChecker::new();
    assert!(checker.check(&ast), "{:?}", checker.violations());
}

#[test]
fn test_outer_move_seen_from_inner_scope() {
    let ast = Expr::Block(vec![
        Expr::Let(Box::new(LetExpr {
            name: "x".to_string(),
            mutable: false,
            init: Expr::Int(1),
            line: 1,
        })),
        read("x", BorrowKind::Move, 2),
        Expr::Block(vec![read("x", BorrowKind::Shared, 3)]),
    ]);
    let mut checker = BorrowChecker::new();
    assert!(!checker.check(&ast));
    assert_eq!(checker.violations()[0].kind, ViolationKind::UseAfterMove);
    assert_eq!(checker.violations()[0].line, 3);
}

#[test]
fn test_every_failing_read_is_reported() {
    // One moved binding, three later reads: three violations, in order.
    let ast = Expr::Block(vec![
        Expr::Let(Box::new(LetExpr {
            name: "x".to_string(),
            mutable: false,
            init: Expr::Int(1),
            line: 1,
        })),
        read("x", BorrowKind::Move, 2),
        read("x", BorrowKind::Shared, 3),
        read("x", BorrowKind::Shared, 4),
        read("x", BorrowKind::Move, 5),
    ]);
    let mut checker = BorrowChecker::new();
    assert!(!checker.check(&ast));
    let lines: Vec<u32> = checker.violations().iter().map(|v| v.line).collect();
    assert_eq!(lines, vec![3, 4, 5]);
}

#[test]
fn test_check_clears_previous_violations() {
    let bad = read("ghost", BorrowKind::Shared, 1);
    let mut checker = BorrowChecker::new();
    assert!(!checker.check(&bad));
    assert_eq!(checker.violations().len(), 1);

    // A clean tree afterwards reports clean.
    assert!(checker.check(&Expr::Int(1)));
    assert!(checker.violations().is_empty());
}

#[test]
fn test_none_kind_read_only_checks_moves() {
    let mut checker = BorrowChecker::new();
    checker.tracker_mut().register_variable("x", false);
    assert!(checker
        .tracker_mut()
        .register_borrow("x", "r", BorrowKind::Shared));

    // A value-position read does not conflict with the borrow...
    assert!(checker.check(&read("x", BorrowKind::None, 1)));

    // ...but a moved value is unusable even in value position.
    let mut checker = BorrowChecker::new();
    checker.tracker_mut().register_variable("y", false);
    checker.tracker_mut().mark_moved("y");
    assert!(!checker.check(&read("y", BorrowKind::None, 1)));
    assert_eq!(checker.violations()[0].kind, ViolationKind::UseAfterMove);
}
