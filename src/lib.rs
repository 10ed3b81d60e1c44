//! # launch_gate
//!
//! Process-launch interception for build tools, sandboxes, and test
//! harnesses: every external command a host process attempts to execute is
//! funneled through an ordered chain of handlers before it is allowed to
//! run. Each handler abstains, approves, substitutes, or vetoes; the chain
//! reduces all verdicts into exactly one authoritative action and fails
//! loudly when decisive handlers disagree.
//!
//! ## Quick Start
//!
//! ```rust
//! use launch_gate::{Command, CommandAction, GateError, LaunchHandler, Session};
//!
//! /// Veto anything that is not `ls`.
//! struct OnlyLs;
//!
//! impl LaunchHandler for OnlyLs {
//!     fn name(&self) -> &str {
//!         "only-ls"
//!     }
//!
//!     fn on_command(&mut self, cmd: &Command) -> Result<CommandAction, GateError> {
//!         if cmd.argv.first().map(String::as_str) == Some("ls") {
//!             Ok(CommandAction::Pass)
//!         } else {
//!             Ok(CommandAction::Drop)
//!         }
//!     }
//! }
//!
//! # fn main() -> Result<(), GateError> {
//! let session = Session::new();
//! session.register(OnlyLs)?;
//! session.start(&[])?;
//!
//! let action = session.dispatch(&Command::new(["rm", "-rf", "/"]))?;
//! assert_eq!(action, CommandAction::Drop);
//!
//! session.finish()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design Principles
//!
//! - **Agree or fail**: registration order determines query order but never
//!   precedence. Two decisive handlers must return the same verdict, payload
//!   included, or the reduction fails with a conflict naming both.
//! - **Immutable commands**: handlers observe a shared snapshot; changing
//!   execution requires a replace verdict, never edits in place.
//! - **One command at a time**: a reduction runs to completion before the
//!   next captured launch is considered, so handler state never sees two
//!   commands interleaved.
//! - **Explicit sessions**: no ambient globals; each [`Session`] owns its
//!   handler list and lifecycle, so tests can run many side by side.

mod action;
mod chain;
mod command;
pub mod console;
mod error;
mod handler;
mod session;
mod stream;

// Public API
pub use action::{CommandAction, Replacement};
pub use chain::HandlerChain;
pub use command::Command;
pub use console::Color;
pub use error::{Fault, FaultKind, GateError, ProtocolError, StreamError, VerdictReport};
pub use handler::LaunchHandler;
pub use session::Session;
pub use stream::{Encoding, FileStream, TextFileStream};
