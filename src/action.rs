//! Handler verdicts.

use crate::error::ProtocolError;

/// Replacement command lines carried by a replace verdict.
///
/// Validated at construction: the list must be non-empty and every argument
/// vector in it must be non-empty. Consumers can therefore rely on a
/// well-formed payload without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement(Vec<Vec<String>>);

impl Replacement {
    /// Build a replacement set from one or more argument vectors.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidReplacement`] if the list is empty or
    /// any argument vector in it is empty.
    pub fn new(commands: Vec<Vec<String>>) -> Result<Self, ProtocolError> {
        if commands.is_empty() {
            return Err(ProtocolError::InvalidReplacement {
                reason: "replacement list is empty",
            });
        }
        if commands.iter().any(Vec::is_empty) {
            return Err(ProtocolError::InvalidReplacement {
                reason: "replacement contains an empty argument vector",
            });
        }
        Ok(Self(commands))
    }

    /// Build a replacement set holding a single command line.
    pub fn single<I, S>(argv: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(vec![argv.into_iter().map(Into::into).collect()])
    }

    /// The replacement command lines, in execution order.
    pub fn commands(&self) -> &[Vec<String>] {
        &self.0
    }
}

/// The verdict a handler (or a chain reduction) emits for one command.
///
/// Exactly one case is active per verdict. Any verdict other than `Pass` is
/// decisive and participates in conflict detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    /// No opinion; defer to the other handlers.
    Pass,

    /// Explicitly approve the command as given.
    Use,

    /// Substitute the launch with the given command lines.
    Replace(Replacement),

    /// Veto the launch entirely.
    Drop,
}

impl CommandAction {
    /// Shorthand for a validated replace verdict over a single command line.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidReplacement`] on an empty argv.
    pub fn replace_one<I, S>(argv: I) -> Result<Self, ProtocolError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(CommandAction::Replace(Replacement::single(argv)?))
    }

    /// Whether this verdict is decisive (anything but `Pass`).
    pub fn is_decisive(&self) -> bool {
        !matches!(self, CommandAction::Pass)
    }
}

impl std::fmt::Display for CommandAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandAction::Pass => write!(f, "pass"),
            CommandAction::Use => write!(f, "use"),
            CommandAction::Drop => write!(f, "drop"),
            CommandAction::Replace(replacement) => {
                write!(f, "replace(")?;
                for (i, argv) in replacement.commands().iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{:?}", argv)?;
                }
                write!(f, ")")
            }
        }
    }
}
