use crate::domain::ArtifactRef;
use crate::error::{ReleaseError, Result};
use crate::exec::{CommandLine, CommandRunner};

/// [ImageStore](super::ImageStore) backed by the `docker` executable
pub struct DockerCli<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> DockerCli<R> {
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "docker")
    }

    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        DockerCli {
            runner,
            program: program.into(),
        }
    }

    fn exec_checked(&self, command: CommandLine) -> Result<()> {
        let out = self.runner.run(&command)?;
        if !out.is_success() {
            return Err(ReleaseError::Command(out.failure(&command)));
        }
        Ok(())
    }
}

/// Build file that layers a single `ENV` instruction on top of `image`
pub fn env_layer_dockerfile(image: &ArtifactRef, key: &str, value: &str) -> String {
    format!("FROM {}\nENV {} {}\n", image, key, value)
}

impl<R: CommandRunner> super::ImageStore for DockerCli<R> {
    fn exists(&self, reference: &ArtifactRef) -> Result<bool> {
        let command = CommandLine::new(self.program.as_str())
            .args(["image", "inspect", "--format", "{{.Id}}"])
            .arg(reference.to_string());
        let out = self.runner.run(&command)?;
        Ok(out.is_success())
    }

    fn tag(&self, source: &ArtifactRef, target: &ArtifactRef) -> Result<()> {
        self.exec_checked(
            CommandLine::new(self.program.as_str())
                .arg("tag")
                .arg(source.to_string())
                .arg(target.to_string()),
        )
    }

    fn remove(&self, reference: &ArtifactRef) -> Result<()> {
        self.exec_checked(
            CommandLine::new(self.program.as_str())
                .arg("rmi")
                .arg(reference.to_string()),
        )
    }

    fn set_env(&self, reference: &ArtifactRef, key: &str, value: &str) -> Result<()> {
        self.exec_checked(
            CommandLine::new(self.program.as_str())
                .args(["build", "-t"])
                .arg(reference.to_string())
                .arg("-")
                .stdin(env_layer_dockerfile(reference, key, value)),
        )
    }

    fn push(&self, reference: &ArtifactRef) -> Result<()> {
        self.exec_checked(
            CommandLine::new(self.program.as_str())
                .arg("push")
                .arg(reference.to_string()),
        )
    }
}
