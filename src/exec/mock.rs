use crate::error::Result;
use crate::exec::{CommandLine, CommandOutput, CommandRunner};
use std::collections::HashMap;
use std::sync::Mutex;

/// Command runner for testing without spawning processes.
///
/// Responses are keyed by the rendered command line; unscripted commands
/// succeed with empty output. Every invocation is recorded in order.
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: HashMap<String, CommandOutput>,
    calls: Mutex<Vec<CommandLine>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the output for a rendered command line such as `git rev-parse --short HEAD`
    pub fn respond(mut self, command: impl Into<String>, code: i32, output: impl Into<String>) -> Self {
        self.responses
            .insert(command.into(), CommandOutput::new(code, output));
        self
    }

    /// Commands issued so far, rendered
    pub fn calls(&self) -> Vec<String> {
        self.invocations().iter().map(|c| c.to_string()).collect()
    }

    /// Commands issued so far, as issued
    pub fn invocations(&self) -> Vec<CommandLine> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &CommandLine) -> Result<CommandOutput> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(command.clone()),
            Err(poisoned) => poisoned.into_inner().push(command.clone()),
        }

        Ok(self
            .responses
            .get(&command.to_string())
            .cloned()
            .unwrap_or_else(|| CommandOutput::success("")))
    }
}
