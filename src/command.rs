//! Intercepted command snapshot.

use std::collections::HashMap;
use std::path::PathBuf;

/// An immutable snapshot of one process-launch attempt.
///
/// Constructed once per intercepted launch by the native capture layer and
/// passed by reference to every handler in the chain. Handlers never mutate a
/// command another handler already observed; a handler that wants different
/// execution must return a replace verdict instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Ordered argument vector. The first element is conventionally the
    /// resolved executable.
    pub argv: Vec<String>,

    /// Resolved path of the executable being launched.
    pub exe: PathBuf,

    /// Working directory of the launching process at capture time.
    pub cwd: PathBuf,

    /// Environment of the launch (keys unique).
    pub env: HashMap<String, String>,

    /// Process id of the launching process.
    pub pid: u32,

    /// Thread id of the launching thread.
    pub tid: u64,

    /// Raw, unparsed command line as captured by the native layer.
    pub raw: String,
}

impl Command {
    /// Create a command from its argument vector.
    ///
    /// `exe` defaults to `argv[0]` and `raw` to the space-joined argv; the
    /// capture layer overrides both with the values it actually observed.
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        let exe = argv.first().map(PathBuf::from).unwrap_or_default();
        let raw = argv.join(" ");
        Self {
            argv,
            exe,
            cwd: PathBuf::new(),
            env: HashMap::new(),
            pid: 0,
            tid: 0,
            raw,
        }
    }

    /// Set the resolved executable path.
    pub fn with_exe(mut self, exe: impl Into<PathBuf>) -> Self {
        self.exe = exe.into();
        self
    }

    /// Set the working directory at launch.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Set the captured environment.
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Add a single environment variable.
    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the owning process and thread ids.
    pub fn with_ids(mut self, pid: u32, tid: u64) -> Self {
        self.pid = pid;
        self.tid = tid;
        self
    }

    /// Set the raw command line as captured.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }
}
