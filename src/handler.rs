//! Handler contract.
//!
//! A handler implements whichever subset of the lifecycle hooks it cares
//! about; every hook has a no-op default, so absence of a capability is the
//! same as abstention.

use crate::action::CommandAction;
use crate::command::Command;
use crate::error::{Fault, GateError};

/// A participant in the interception chain.
///
/// The session invokes hooks in this order: `receive_args` once, `on_start`
/// once, `on_command` once per intercepted launch, `on_finished` once.
/// `on_error` may arrive at any point with a diagnostic fault.
///
/// Handlers are driven from whichever thread the native capture layer runs
/// on (hence the `Send` bound on registration), but the engine never invokes
/// a handler concurrently with itself. Handlers that keep state across calls
/// only need internal synchronization if they share it outside the chain.
pub trait LaunchHandler {
    /// Name used in diagnostics and conflict reports.
    fn name(&self) -> &str {
        "handler"
    }

    /// Receive the host process's invocation arguments, once per session.
    fn receive_args(&mut self, _args: &[String]) -> Result<(), GateError> {
        Ok(())
    }

    /// Session start notification.
    fn on_start(&mut self) -> Result<(), GateError> {
        Ok(())
    }

    /// Inspect one intercepted command and return a verdict.
    ///
    /// The default abstains: a handler without an opinion and a handler that
    /// never implemented this hook reduce identically.
    fn on_command(&mut self, _cmd: &Command) -> Result<CommandAction, GateError> {
        Ok(CommandAction::Pass)
    }

    /// Diagnostic fault notification. Telemetry only; cannot alter an
    /// outcome already decided, and therefore has no return value.
    fn on_error(&mut self, _fault: &Fault) {}

    /// Session end notification.
    fn on_finished(&mut self) -> Result<(), GateError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inert;

    impl LaunchHandler for Inert {}

    #[test]
    fn test_default_hooks_abstain() {
        let mut handler = Inert;
        assert_eq!(handler.name(), "handler");
        assert!(handler.receive_args(&[]).is_ok());
        assert!(handler.on_start().is_ok());
        let verdict = handler.on_command(&Command::new(["ls"])).unwrap();
        assert_eq!(verdict, CommandAction::Pass);
        assert!(handler.on_finished().is_ok());
    }
}
