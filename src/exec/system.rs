use crate::error::Result;
use crate::exec::{CommandLine, CommandOutput, CommandRunner, EXIT_NOT_FOUND};
use log::debug;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Runs commands as real child processes, without a shell
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
}

impl SystemRunner {
    pub fn new() -> Self {
        SystemRunner { working_dir: None }
    }

    /// Run every command inside `dir` instead of the process working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        SystemRunner {
            working_dir: Some(dir.into()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        debug!("running `{}`", command);

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        if command.stdin.is_some() {
            cmd.stdin(Stdio::piped());
        } else {
            cmd.stdin(Stdio::null());
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(CommandOutput::new(
                    EXIT_NOT_FOUND,
                    format!("{}: command not found", command.program),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        if let (Some(input), Some(mut stdin)) = (&command.stdin, child.stdin.take()) {
            stdin.write_all(input.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let code = output.status.code().unwrap_or(-1);
        debug!("`{}` exited with {}", command, code);

        Ok(CommandOutput::new(code, combined))
    }
}
