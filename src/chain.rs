//! Handler chain engine.
//!
//! Reduces the independent verdicts of an ordered handler sequence into
//! exactly one [`CommandAction`] per command, and drives the lifecycle
//! broadcasts. A chain is itself a [`LaunchHandler`], so chains nest; a
//! nested chain surfaces a single reduced verdict upward and conflicts fail
//! at the boundary that produced them.

use crate::action::CommandAction;
use crate::command::Command;
use crate::error::{Fault, GateError, ProtocolError, VerdictReport};
use crate::handler::LaunchHandler;

/// An ordered, composable group of handlers.
///
/// Order is registration order and determines query order. Order is
/// observable (it fixes which handler appears first in a conflict report)
/// but confers no precedence among decisive verdicts: the policy is agree
/// or fail, never first-wins.
pub struct HandlerChain {
    name: String,
    handlers: Vec<Box<dyn LaunchHandler + Send>>,
}

impl HandlerChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            name: "chain".to_string(),
            handlers: Vec::new(),
        }
    }

    /// Create an empty chain with a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Append a handler, builder style.
    pub fn with(mut self, handler: impl LaunchHandler + Send + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Append a boxed handler.
    pub fn push(&mut self, handler: Box<dyn LaunchHandler + Send>) {
        self.handlers.push(handler);
    }

    /// Number of directly held handlers (nested chains count as one).
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the chain holds no handlers.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Reduce all handlers' verdicts for one command into a single verdict.
    ///
    /// Every handler is queried, in order, before any outcome is chosen:
    /// all abstain reduces to `Pass`, a lone decisive verdict wins from any
    /// position, and multiple decisive verdicts must agree in kind and
    /// payload or the reduction fails.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::HandlerConflict`] when decisive verdicts disagree,
    /// naming every decisive handler. A handler's own `on_command` failure
    /// aborts the reduction and propagates.
    fn reduce(&mut self, cmd: &Command) -> Result<CommandAction, GateError> {
        let mut decisive: Vec<VerdictReport> = Vec::new();

        for (index, handler) in self.handlers.iter_mut().enumerate() {
            let verdict = handler
                .on_command(cmd)
                .map_err(|err| wrap_hook_error(err, handler.name(), "on_command"))?;
            if verdict.is_decisive() {
                decisive.push(VerdictReport {
                    index,
                    name: handler.name().to_string(),
                    verdict,
                });
            }
        }

        let Some(first) = decisive.first() else {
            return Ok(CommandAction::Pass);
        };

        if decisive.iter().all(|report| report.verdict == first.verdict) {
            Ok(first.verdict.clone())
        } else {
            Err(ProtocolError::HandlerConflict { reports: decisive }.into())
        }
    }

    /// Deliver a fire-and-forget broadcast to every handler in order.
    ///
    /// A failing hook never blocks delivery to the handlers after it; each
    /// failure is reported to all handlers via `on_error` once the broadcast
    /// completes.
    fn broadcast<F>(&mut self, hook: &'static str, mut deliver: F)
    where
        F: FnMut(&mut (dyn LaunchHandler + Send)) -> Result<(), GateError>,
    {
        let mut faults: Vec<Fault> = Vec::new();

        for handler in self.handlers.iter_mut() {
            if let Err(err) = deliver(handler.as_mut()) {
                let wrapped = wrap_hook_error(err, handler.name(), hook);
                faults.push(Fault::from_error(&wrapped, None));
            }
        }

        for fault in &faults {
            self.report(fault);
        }
    }

    /// Deliver a fault to every handler in order.
    pub(crate) fn report(&mut self, fault: &Fault) {
        for handler in self.handlers.iter_mut() {
            handler.on_error(fault);
        }
    }
}

/// Attribute a hook failure to the handler that raised it.
///
/// Protocol errors pass through untouched so a conflict inside a nested
/// chain is still recognizable as a conflict at the outer boundary; an
/// already-attributed handler fault keeps its original attribution.
fn wrap_hook_error(err: GateError, name: &str, hook: &'static str) -> GateError {
    match err {
        GateError::Protocol(_) | GateError::Handler { .. } => err,
        other => GateError::Handler {
            name: name.to_string(),
            hook,
            message: other.to_string(),
        },
    }
}

impl Default for HandlerChain {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchHandler for HandlerChain {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive_args(&mut self, args: &[String]) -> Result<(), GateError> {
        self.broadcast("receive_args", |handler| handler.receive_args(args));
        Ok(())
    }

    fn on_start(&mut self) -> Result<(), GateError> {
        self.broadcast("on_start", |handler| handler.on_start());
        Ok(())
    }

    fn on_command(&mut self, cmd: &Command) -> Result<CommandAction, GateError> {
        self.reduce(cmd)
    }

    fn on_error(&mut self, fault: &Fault) {
        self.report(fault);
    }

    fn on_finished(&mut self) -> Result<(), GateError> {
        self.broadcast("on_finished", |handler| handler.on_finished());
        Ok(())
    }
}
