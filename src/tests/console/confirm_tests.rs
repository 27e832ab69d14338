use super::*;
use crate::error::ConsoleError;

#[test]
fn closed_gate_never_confirms() {
    let mut gate = ConfirmationGate::new();
    let mut calls = 0;
    assert!(gate.confirm(|_| -> ConsoleResult<()> { calls += 1; Ok(()) }).is_none());
    assert_eq!(calls, 0);
}

#[test]
fn near_miss_keeps_action_disabled() {
    let mut gate = ConfirmationGate::new();
    gate.open("DELETE", vec!["x".to_string()]);
    for c in "DELET".chars() {
        gate.push_char(c);
    }
    assert!(!gate.can_confirm());

    let mut calls = 0;
    for _ in 0..3 {
        let out = gate.confirm(|_| -> ConsoleResult<()> {
            calls += 1;
            Ok(())
        });
        assert!(out.is_none());
    }
    assert_eq!(calls, 0);
    assert!(gate.is_open());

    gate.push_char('E');
    assert!(gate.can_confirm());
    let mut seen = Vec::new();
    let out = gate.confirm(|ids| -> ConsoleResult<()> {
        seen.extend_from_slice(ids);
        Ok(())
    });
    assert!(matches!(out, Some(Ok(()))));
    assert_eq!(seen, vec!["x".to_string()]);
    assert_eq!(gate.state(), &GateState::Closed);
}

#[test]
fn comparison_is_case_sensitive_and_exact() {
    let mut gate = ConfirmationGate::new();
    gate.open("DELETE", vec!["x".to_string()]);
    for attempt in ["delete", "DELETE ", " DELETE", "Delete"] {
        gate.set_input(attempt);
        assert!(!gate.can_confirm(), "{:?} should not match", attempt);
    }
    gate.set_input("DELETE");
    assert!(gate.can_confirm());
}

#[test]
fn failure_reopens_with_error_for_retry() {
    let mut gate = ConfirmationGate::new();
    gate.open("DELETE", vec!["x".to_string()]);
    gate.set_input("DELETE");
    let out = gate.confirm(|_| -> ConsoleResult<()> { Err(ConsoleError::EmptyTargets) });
    assert!(matches!(out, Some(Err(_))));

    let pending = gate.pending().expect("still open");
    assert!(pending.error.is_some());
    assert!(gate.can_confirm());

    let retried = gate.confirm(|_| -> ConsoleResult<()> { Ok(()) });
    assert!(matches!(retried, Some(Ok(()))));
    assert!(!gate.is_open());
}

#[test]
fn reopening_never_prefills_input() {
    let mut gate = ConfirmationGate::new();
    gate.open("DELETE", vec!["x".to_string()]);
    gate.set_input("DELETE");
    gate.cancel();
    gate.open("DELETE", vec!["y".to_string()]);
    let pending = gate.pending().expect("open");
    assert!(pending.input.is_empty());
    assert_eq!(pending.ids, vec!["y".to_string()]);
    assert!(!gate.can_confirm());
}

#[test]
fn input_is_ignored_while_closed() {
    let mut gate = ConfirmationGate::new();
    gate.set_input("DELETE");
    gate.push_char('x');
    assert!(gate.pending().is_none());
}
