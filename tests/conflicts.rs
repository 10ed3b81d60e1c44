//! Conflict-detection and protocol-violation tests.
//!
//! Every decisive disagreement must fail loudly with a report naming the
//! handlers involved; silent precedence would make the system impossible to
//! reason about.

use launch_gate::{
    Command, CommandAction, Fault, GateError, HandlerChain, LaunchHandler, ProtocolError,
    Replacement, Session,
};
use std::sync::{Arc, Mutex};

struct Fixed {
    name: &'static str,
    verdict: CommandAction,
}

impl Fixed {
    fn new(name: &'static str, verdict: CommandAction) -> Self {
        Self { name, verdict }
    }
}

impl LaunchHandler for Fixed {
    fn name(&self) -> &str {
        self.name
    }

    fn on_command(&mut self, _cmd: &Command) -> Result<CommandAction, GateError> {
        Ok(self.verdict.clone())
    }
}

fn conflict_reports(err: GateError) -> Vec<(usize, String, CommandAction)> {
    let GateError::Protocol(ProtocolError::HandlerConflict { reports }) = err else {
        panic!("expected HandlerConflict, got {err:?}");
    };
    reports
        .into_iter()
        .map(|r| (r.index, r.name, r.verdict))
        .collect()
}

#[test]
fn test_drop_vs_use_conflict_names_both_handlers() {
    let session = Session::new();
    session
        .register(Fixed::new("h1", CommandAction::Drop))
        .unwrap();
    session
        .register(Fixed::new("h2", CommandAction::Use))
        .unwrap();
    session.start(&[]).unwrap();

    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    let reports = conflict_reports(err);
    assert_eq!(
        reports,
        vec![
            (0, "h1".to_string(), CommandAction::Drop),
            (1, "h2".to_string(), CommandAction::Use),
        ]
    );
}

#[test]
fn test_abstainers_are_not_named_in_conflict() {
    let session = Session::new();
    session
        .register(Fixed::new("quiet", CommandAction::Pass))
        .unwrap();
    session
        .register(Fixed::new("veto", CommandAction::Drop))
        .unwrap();
    session
        .register(Fixed::new("approve", CommandAction::Use))
        .unwrap();
    session.start(&[]).unwrap();

    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    let reports = conflict_reports(err);
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|(_, name, _)| name != "quiet"));
    // Positions are chain positions, not positions among decisive handlers.
    assert_eq!(reports[0].0, 1);
    assert_eq!(reports[1].0, 2);
}

#[test]
fn test_three_way_agreement_is_not_a_conflict() {
    let session = Session::new();
    for name in ["a", "b", "c"] {
        session.register(Fixed::new(name, CommandAction::Drop)).unwrap();
    }
    session.start(&[]).unwrap();

    let action = session.dispatch(&Command::new(["rm", "-rf"])).unwrap();
    assert_eq!(action, CommandAction::Drop);
}

#[test]
fn test_replace_agreement_requires_identical_payload() {
    let same = CommandAction::replace_one(["echo", "hi"]).unwrap();

    let session = Session::new();
    session.register(Fixed::new("a", same.clone())).unwrap();
    session.register(Fixed::new("b", same.clone())).unwrap();
    session.start(&[]).unwrap();
    assert_eq!(session.dispatch(&Command::new(["ls"])).unwrap(), same);

    let session = Session::new();
    session
        .register(Fixed::new(
            "a",
            CommandAction::replace_one(["echo", "hi"]).unwrap(),
        ))
        .unwrap();
    session
        .register(Fixed::new(
            "b",
            CommandAction::replace_one(["echo", "HI"]).unwrap(),
        ))
        .unwrap();
    session.start(&[]).unwrap();
    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    assert!(matches!(
        err,
        GateError::Protocol(ProtocolError::HandlerConflict { .. })
    ));
}

#[test]
fn test_use_vs_replace_conflicts() {
    let session = Session::new();
    session.register(Fixed::new("a", CommandAction::Use)).unwrap();
    session
        .register(Fixed::new(
            "b",
            CommandAction::replace_one(["true"]).unwrap(),
        ))
        .unwrap();
    session.start(&[]).unwrap();

    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    assert!(matches!(
        err,
        GateError::Protocol(ProtocolError::HandlerConflict { .. })
    ));
}

#[test]
fn test_conflict_is_broadcast_before_propagating() {
    struct FaultProbe(Arc<Mutex<Vec<Fault>>>);

    impl LaunchHandler for FaultProbe {
        fn name(&self) -> &str {
            "probe"
        }

        fn on_command(&mut self, _cmd: &Command) -> Result<CommandAction, GateError> {
            Ok(CommandAction::Pass)
        }

        fn on_error(&mut self, fault: &Fault) {
            self.0.lock().unwrap().push(fault.clone());
        }
    }

    let faults = Arc::new(Mutex::new(Vec::new()));
    let session = Session::new();
    session.register(FaultProbe(Arc::clone(&faults))).unwrap();
    session.register(Fixed::new("a", CommandAction::Drop)).unwrap();
    session.register(Fixed::new("b", CommandAction::Use)).unwrap();
    session.start(&[]).unwrap();

    let cmd = Command::new(["ls", "-la"]);
    assert!(session.dispatch(&cmd).is_err());

    let seen = faults.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, launch_gate::FaultKind::Protocol);
    assert_eq!(seen[0].command.as_ref().map(|c| c.raw.as_str()), Some("ls -la"));
    assert!(seen[0].message.contains("a[1]: drop"));
    assert!(seen[0].message.contains("b[2]: use"));
}

#[test]
fn test_inner_chain_conflict_fails_at_inner_boundary() {
    let inner = HandlerChain::named("inner")
        .with(Fixed::new("i1", CommandAction::Drop))
        .with(Fixed::new("i2", CommandAction::Use));

    let session = Session::new();
    session.register(inner).unwrap();
    // The outer handler would agree with i2, but never gets the chance to
    // outvote the inner disagreement.
    session.register(Fixed::new("outer", CommandAction::Use)).unwrap();
    session.start(&[]).unwrap();

    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    let reports = conflict_reports(err);
    assert_eq!(reports[0].1, "i1");
    assert_eq!(reports[1].1, "i2");
}

#[test]
fn test_empty_replacement_rejected_at_construction() {
    assert!(matches!(
        Replacement::new(vec![]),
        Err(ProtocolError::InvalidReplacement { .. })
    ));
    assert!(matches!(
        Replacement::new(vec![vec![], vec!["ok".to_string()]]),
        Err(ProtocolError::InvalidReplacement { .. })
    ));
}

#[test]
fn test_registration_after_start_rejected() {
    let session = Session::new();
    session.start(&[]).unwrap();
    let result = session.register(Fixed::new("late", CommandAction::Pass));
    assert!(matches!(
        result,
        Err(GateError::Protocol(ProtocolError::RegistrationAfterStart))
    ));
}

#[test]
fn test_explicit_pass_and_absent_hook_reduce_identically() {
    struct NoHooks;

    impl LaunchHandler for NoHooks {}

    let with_explicit = Session::new();
    with_explicit
        .register(Fixed::new("explicit", CommandAction::Pass))
        .unwrap();
    with_explicit
        .register(Fixed::new("decider", CommandAction::Use))
        .unwrap();
    with_explicit.start(&[]).unwrap();

    let with_absent = Session::new();
    with_absent.register(NoHooks).unwrap();
    with_absent
        .register(Fixed::new("decider", CommandAction::Use))
        .unwrap();
    with_absent.start(&[]).unwrap();

    let cmd = Command::new(["ls"]);
    assert_eq!(
        with_explicit.dispatch(&cmd).unwrap(),
        with_absent.dispatch(&cmd).unwrap()
    );
}

#[test]
fn test_handler_error_during_on_command_aborts_reduction() {
    struct Failing;

    impl LaunchHandler for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_command(&mut self, _cmd: &Command) -> Result<CommandAction, GateError> {
            Err(GateError::Handler {
                name: "failing".to_string(),
                hook: "on_command",
                message: "cache poisoned".to_string(),
            })
        }
    }

    let session = Session::new();
    session.register(Failing).unwrap();
    session.register(Fixed::new("after", CommandAction::Use)).unwrap();
    session.start(&[]).unwrap();

    let err = session.dispatch(&Command::new(["ls"])).unwrap_err();
    assert!(matches!(err, GateError::Handler { .. }));
    assert!(err.to_string().contains("cache poisoned"));
}
