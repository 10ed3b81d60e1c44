//! Interception session.
//!
//! The session is the surface the native capture layer drives: it owns the
//! root handler chain, enforces the registration and lifecycle ordering
//! rules, and serializes command reductions so two concurrently captured
//! launches are never reduced at the same time.

use crate::action::CommandAction;
use crate::chain::HandlerChain;
use crate::command::Command;
use crate::error::{Fault, FaultKind, GateError, ProtocolError};
use crate::handler::LaunchHandler;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    /// Handlers may register; no events delivered yet.
    Pending,
    /// Started; commands are being dispatched.
    Running,
    /// Finished; no further events accepted.
    Finished,
}

impl SessionState {
    fn label(self) -> &'static str {
        match self {
            SessionState::Pending => "pending",
            SessionState::Running => "running",
            SessionState::Finished => "finished",
        }
    }
}

struct Inner {
    chain: HandlerChain,
    state: SessionState,
}

/// One interception session: a registration phase, a start broadcast, a
/// strictly sequential stream of command decisions, and a finish broadcast.
///
/// Each session is independent; create one per process (or per test). All
/// entry points funnel through a single internal lock, so the native layer
/// may call them from any thread, and a command reduction always completes
/// before the next begins.
pub struct Session {
    inner: Mutex<Inner>,
}

impl Session {
    /// Create a session with an empty root chain.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                chain: HandlerChain::named("root"),
                state: SessionState::Pending,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock means a handler panicked mid-call; the registry
        // itself is still structurally sound, so keep delivering events.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Attach a handler (or a composed chain) to the session.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::RegistrationAfterStart`] once the session has
    /// started: the handler list is frozen for the whole session so that
    /// ordering stays well-defined.
    pub fn register(&self, handler: impl LaunchHandler + Send + 'static) -> Result<(), GateError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Pending {
            return Err(ProtocolError::RegistrationAfterStart.into());
        }
        inner.chain.push(Box::new(handler));
        Ok(())
    }

    /// Begin the session: deliver `receive_args` then `on_start`, once each.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::SessionNotPending`] if called twice or after
    /// [`finish`](Session::finish).
    pub fn start(&self, args: &[String]) -> Result<(), GateError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Pending {
            return Err(ProtocolError::SessionNotPending {
                state: inner.state.label(),
            }
            .into());
        }
        inner.state = SessionState::Running;
        inner.chain.receive_args(args)?;
        inner.chain.on_start()
    }

    /// Reduce one intercepted command to a single authoritative action.
    ///
    /// The caller (the native capture layer) is the only party authorized
    /// to act on the result: continue the launch unmodified on `Pass` or
    /// `Use`, substitute on `Replace`, suppress on `Drop`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::SessionNotRunning`] outside the running phase.
    /// [`ProtocolError::HandlerConflict`] when decisive verdicts disagree;
    /// the conflict is broadcast to every handler via `on_error` before it
    /// propagates, and the caller decides whether to abort the launch or
    /// treat the failure as a forced drop.
    pub fn dispatch(&self, cmd: &Command) -> Result<CommandAction, GateError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Running {
            return Err(ProtocolError::SessionNotRunning {
                state: inner.state.label(),
            }
            .into());
        }
        match inner.chain.on_command(cmd) {
            Ok(action) => Ok(action),
            Err(err) => {
                let fault = Fault::from_error(&err, Some(cmd));
                inner.chain.report(&fault);
                Err(err)
            }
        }
    }

    /// Broadcast a fault reported by the native capture layer.
    pub fn report_error(&self, message: impl Into<String>, command: Option<Command>) {
        let fault = Fault {
            kind: FaultKind::Capture,
            message: message.into(),
            command,
        };
        self.lock().chain.report(&fault);
    }

    /// End the session: deliver `on_finished` once to every handler.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::SessionNotRunning`] if the session never started or
    /// already finished.
    pub fn finish(&self) -> Result<(), GateError> {
        let mut inner = self.lock();
        if inner.state != SessionState::Running {
            return Err(ProtocolError::SessionNotRunning {
                state: inner.state.label(),
            }
            .into());
        }
        inner.state = SessionState::Finished;
        inner.chain.on_finished()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
