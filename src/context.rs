//! Project identity resolved lazily from configuration and the environment.
//!
//! Every value is computed at most once per context. Configured values win;
//! missing ones are detected from the host name, the working directory and
//! the repository.

use crate::analyzer::VersionAnalyzer;
use crate::config::ProjectConfig;
use crate::domain::{ArtifactRef, Semver};
use crate::error::{ReleaseError, Result};
use crate::exec::{CommandLine, CommandRunner};
use crate::git::Repository;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Name used when the working directory has no final component
pub const FALLBACK_PROJECT_NAME: &str = "noname";

/// Organization label of a fully qualified host name.
///
/// `user` and `host.domain` use the last label, longer names the
/// second-to-last (`host.sub.domain.tld` gives `domain`).
pub fn organization_from_fqdn(fqdn: &str) -> String {
    let labels: Vec<&str> = fqdn.trim().split('.').collect();
    let label = if labels.len() <= 2 {
        labels[labels.len() - 1]
    } else {
        labels[labels.len() - 2]
    };
    label.trim().to_string()
}

/// Project name derived from a directory path
pub fn project_name_from_dir(dir: &Path) -> String {
    match dir.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => FALLBACK_PROJECT_NAME.to_string(),
    }
}

/// Project identity and version, memoized per instance.
///
/// `G` answers version questions, `R` runs host commands such as
/// `hostname -f`.
pub struct ProjectContext<G, R> {
    project: ProjectConfig,
    repo: G,
    runner: R,
    working_dir: PathBuf,
    organization: OnceLock<String>,
    name: OnceLock<String>,
    version: OnceLock<Semver>,
    image: OnceLock<String>,
}

impl<G: Repository, R: CommandRunner> ProjectContext<G, R> {
    pub fn new(project: ProjectConfig, repo: G, runner: R, working_dir: impl Into<PathBuf>) -> Self {
        ProjectContext {
            project,
            repo,
            runner,
            working_dir: working_dir.into(),
            organization: OnceLock::new(),
            name: OnceLock::new(),
            version: OnceLock::new(),
            image: OnceLock::new(),
        }
    }

    /// Context rooted at the process working directory
    pub fn in_current_dir(project: ProjectConfig, repo: G, runner: R) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(project, repo, runner, cwd))
    }

    pub fn repository(&self) -> &G {
        &self.repo
    }

    pub fn organization(&self) -> Result<&str> {
        if let Some(org) = self.organization.get() {
            return Ok(org);
        }
        let org = match &self.project.organization {
            Some(org) => org.clone(),
            None => self.detect_organization()?,
        };
        Ok(self.organization.get_or_init(|| org))
    }

    pub fn name(&self) -> &str {
        self.name.get_or_init(|| match &self.project.name {
            Some(name) => name.clone(),
            None => project_name_from_dir(&self.working_dir),
        })
    }

    /// Configured version, or the one detected from the repository
    pub fn version(&self) -> Result<&Semver> {
        if let Some(version) = self.version.get() {
            return Ok(version);
        }
        let version = match &self.project.version {
            Some(text) => Semver::parse(text)?,
            None => VersionAnalyzer::default().detect(&self.repo)?,
        };
        Ok(self.version.get_or_init(|| version))
    }

    /// Whether the version comes from configuration rather than git
    pub fn version_is_configured(&self) -> bool {
        self.project.version.is_some()
    }

    /// `<organization>/<name>:<version>` unless configured
    pub fn image(&self) -> Result<&str> {
        if let Some(image) = self.image.get() {
            return Ok(image);
        }
        let image = match &self.project.image {
            Some(image) => image.clone(),
            None => self.artifact()?.to_string(),
        };
        Ok(self.image.get_or_init(|| image))
    }

    /// Image reference for the current version
    pub fn artifact(&self) -> Result<ArtifactRef> {
        Ok(ArtifactRef::new(
            self.organization()?,
            self.name(),
            self.version()?.to_string(),
        ))
    }

    /// Project section with every value filled in
    pub fn resolved(&self) -> Result<ProjectConfig> {
        Ok(ProjectConfig {
            organization: Some(self.organization()?.to_string()),
            name: Some(self.name().to_string()),
            version: Some(self.version()?.to_string()),
            image: Some(self.image()?.to_string()),
        })
    }

    fn detect_organization(&self) -> Result<String> {
        let command = CommandLine::new("hostname").arg("-f");
        let out = self.runner.run(&command)?;
        if !out.is_success() {
            return Err(ReleaseError::Command(out.failure(&command)));
        }
        let fqdn = out.trimmed();
        if fqdn.is_empty() {
            return Err(ReleaseError::unexpected_output(command.to_string(), out.output.clone()));
        }
        debug!("host name {}", fqdn);
        Ok(organization_from_fqdn(fqdn))
    }
}
