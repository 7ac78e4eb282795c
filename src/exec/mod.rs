//! External process abstraction
//!
//! Every git and docker interaction goes through the [CommandRunner] trait,
//! so the backends can be exercised against scripted output in tests.
//!
//! - [system::SystemRunner]: spawns real processes
//! - [mock::MockRunner]: replays canned output and records invocations

pub mod mock;
pub mod system;

pub use mock::MockRunner;
pub use system::SystemRunner;

use crate::error::{CommandFailure, Result};
use std::fmt;

/// Exit code reported when the program could not be found
pub const EXIT_NOT_FOUND: i32 = 127;

/// A program invocation with its arguments and optional stdin payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandLine {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Exit status and combined stdout/stderr of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub code: i32,
    pub output: String,
}

impl CommandOutput {
    pub fn new(code: i32, output: impl Into<String>) -> Self {
        CommandOutput {
            code,
            output: output.into(),
        }
    }

    pub fn success(output: impl Into<String>) -> Self {
        Self::new(0, output)
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Output with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.output.trim()
    }

    /// Describe this output as a failure of `command`
    pub fn failure(&self, command: &CommandLine) -> CommandFailure {
        CommandFailure::new(command.to_string(), self.code, self.output.clone())
    }
}

/// Runs external commands synchronously.
///
/// A zero exit code is success; anything else is the failure signal for the
/// step that issued the command. Implementations only return `Err` when the
/// process could not be started for a reason other than a missing program.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<R> {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        (**self).run(command)
    }
}
