use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};
use crate::exec::{CommandLine, CommandOutput, CommandRunner, EXIT_NOT_FOUND};
use log::debug;

/// Exit code git uses for "not a repository" and "no matching ref"
pub const EXIT_GIT_FATAL: i32 = 128;

/// [Repository](super::Repository) backed by the `git` executable
pub struct GitCli<R> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GitCli<R> {
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, "git")
    }

    /// Use a specific git executable
    pub fn with_program(runner: R, program: impl Into<String>) -> Self {
        GitCli {
            runner,
            program: program.into(),
        }
    }

    fn command<I, S>(&self, args: I) -> CommandLine
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine::new(self.program.as_str()).args(args)
    }

    fn exec(&self, command: &CommandLine) -> Result<CommandOutput> {
        self.runner.run(command)
    }

    /// Run and require a zero exit code
    fn exec_checked(&self, command: &CommandLine) -> Result<CommandOutput> {
        let out = self.exec(command)?;
        if !out.is_success() {
            return Err(ReleaseError::Command(out.failure(command)));
        }
        Ok(out)
    }

    fn lines(output: &CommandOutput) -> Vec<String> {
        output
            .output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl<R: CommandRunner> super::Repository for GitCli<R> {
    fn ensure_repository(&self) -> Result<()> {
        let command = self.command(["rev-parse", "--short", "HEAD"]);
        let out = self.exec(&command)?;
        match out.code {
            0 => Ok(()),
            EXIT_NOT_FOUND => Err(ReleaseError::NoBackend),
            EXIT_GIT_FATAL => Err(ReleaseError::NotARepository),
            _ => Err(ReleaseError::Command(out.failure(&command))),
        }
    }

    fn describe_head(&self, pattern: &TagPattern) -> Result<Option<String>> {
        let mut excluded: Vec<String> = Vec::new();
        loop {
            let mut command = self.command([
                "describe",
                "--tags",
                "--match",
                pattern.glob(),
                "--exclude",
                pattern.exclude_glob(),
            ]);
            for tag in &excluded {
                command = command.args(["--exclude", tag.as_str()]);
            }

            let out = self.exec(&command)?;
            let described = match out.code {
                0 if out.trimmed().is_empty() => {
                    return Err(ReleaseError::unexpected_output(
                        command.to_string(),
                        out.output,
                    ))
                }
                0 => out.trimmed().to_string(),
                EXIT_GIT_FATAL => return Ok(None),
                _ => return Err(ReleaseError::Command(out.failure(&command))),
            };

            // Tags with a dash are excluded, so the base tag ends at the first one.
            let base = described.split('-').next().unwrap_or_default().to_string();
            if pattern.matches(&base) {
                return Ok(Some(described));
            }
            if excluded.contains(&base) {
                return Err(ReleaseError::unexpected_output(command.to_string(), described));
            }
            debug!("ignoring tag {}: not a release tag", base);
            excluded.push(base);
        }
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        let range = match since {
            Some(reference) => format!("{}..HEAD", reference),
            None => "HEAD".to_string(),
        };
        let command = self.command(["rev-list".to_string(), range, "--count".to_string()]);
        let out = self.exec_checked(&command)?;
        out.trimmed()
            .parse::<u64>()
            .map_err(|_| ReleaseError::unexpected_output(command.to_string(), out.output.clone()))
    }

    fn short_head(&self) -> Result<String> {
        let command = self.command(["rev-parse", "--short", "HEAD"]);
        let out = self.exec(&command)?;
        match out.code {
            0 if out.trimmed().is_empty() => Err(ReleaseError::unexpected_output(
                command.to_string(),
                out.output,
            )),
            0 => Ok(out.trimmed().to_string()),
            EXIT_GIT_FATAL => Err(ReleaseError::NotARepository),
            _ => Err(ReleaseError::Command(out.failure(&command))),
        }
    }

    fn list_tags(&self, glob: &str) -> Result<Vec<String>> {
        let command = self.command(["tag", "-l", glob]);
        let out = self.exec_checked(&command)?;
        Ok(Self::lines(&out))
    }

    fn root_commits(&self) -> Result<Vec<String>> {
        let command = self.command(["rev-list", "--max-parents=0", "HEAD"]);
        let out = self.exec_checked(&command)?;
        Ok(Self::lines(&out))
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        let command = self.command(["tag", "-a", name, "-m", message]);
        self.exec_checked(&command)?;
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        let command = self.command(["tag", "-d", name]);
        self.exec_checked(&command)?;
        Ok(())
    }

    fn push_ref(&self, remote: &str, refname: &str) -> Result<()> {
        let command = self.command(["push", remote, refname]);
        self.exec_checked(&command)?;
        Ok(())
    }
}
