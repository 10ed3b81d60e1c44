//! Error types for launch_gate.
//!
//! This module defines three error categories:
//! - [`ProtocolError`]: decision-protocol violations detected by the chain engine
//! - [`StreamError`]: failures in the byte-stream collaborator, mostly I/O pass-through
//! - [`GateError`]: combined type returned by handler hooks and session entry points

use crate::action::CommandAction;
use crate::command::Command;
use thiserror::Error;

/// One decisive handler's verdict, as recorded for a conflict report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictReport {
    /// Position of the handler in its chain (registration order).
    pub index: usize,

    /// Handler name as reported by [`LaunchHandler::name`](crate::LaunchHandler::name).
    pub name: String,

    /// The verdict the handler returned.
    pub verdict: CommandAction,
}

impl std::fmt::Display for VerdictReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.name, self.index, self.verdict)
    }
}

fn format_reports(reports: &[VerdictReport]) -> String {
    reports
        .iter()
        .map(VerdictReport::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decision-protocol violation detected by the chain engine or the session.
///
/// These errors are fatal to the evaluation of one command (or one session
/// operation); the engine never guesses a resolution. All messages are safe
/// to log.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProtocolError {
    /// Two or more handlers returned decisive, disagreeing verdicts for
    /// the same command. The report lists every decisive handler.
    #[error("handlers returned conflicting verdicts: {}", format_reports(.reports))]
    HandlerConflict { reports: Vec<VerdictReport> },

    /// A replace verdict was constructed with an empty or malformed
    /// replacement list.
    #[error("invalid replacement: {reason}")]
    InvalidReplacement { reason: &'static str },

    /// A handler was registered after the session had already started.
    #[error("handler registered after session start")]
    RegistrationAfterStart,

    /// The session was started twice, or started after it finished.
    #[error("session already started (state: {state})")]
    SessionNotPending { state: &'static str },

    /// A command was dispatched (or the session finished) outside the
    /// running phase.
    #[error("session is not running (state: {state})")]
    SessionNotRunning { state: &'static str },
}

/// Failure in the byte-stream collaborator.
///
/// I/O errors are passed through uninterpreted; encoding errors carry the
/// offending byte or character.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A byte outside the ASCII range was read while decoding.
    #[error("non-ASCII byte 0x{byte:02x} at offset {offset}")]
    NonAscii { byte: u8, offset: u64 },

    /// A character outside the ASCII range was written to an ASCII stream.
    #[error("character {0:?} is not encodable as ASCII")]
    UnencodableChar(char),
}

/// Combined error type for handler hooks and session entry points.
#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A fault raised by a handler inside one of its own hooks.
    #[error("handler {name} failed during {hook}: {message}")]
    Handler {
        name: String,
        hook: &'static str,
        message: String,
    },
}

/// Category of a reported fault, as seen by `on_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Decision-protocol violation (e.g. a detected conflict).
    Protocol,
    /// A handler failed inside one of its hooks.
    Handler,
    /// A fault reported by the native capture layer.
    Capture,
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FaultKind::Protocol => write!(f, "protocol"),
            FaultKind::Handler => write!(f, "handler"),
            FaultKind::Capture => write!(f, "capture"),
        }
    }
}

/// Diagnostic record broadcast to every handler via `on_error`.
///
/// Telemetry only: receiving a fault cannot alter an outcome already decided.
#[derive(Debug, Clone)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,

    /// The command the fault relates to, when there is one.
    pub command: Option<Command>,
}

impl Fault {
    /// Build a fault record from a failed session operation.
    pub(crate) fn from_error(err: &GateError, command: Option<&Command>) -> Self {
        let kind = match err {
            GateError::Protocol(_) => FaultKind::Protocol,
            _ => FaultKind::Handler,
        };
        Fault {
            kind,
            message: err.to_string(),
            command: command.cloned(),
        }
    }
}
