use crate::domain::{initial_version, Semver, TagPattern};
use crate::error::Result;
use crate::git::Repository;
use log::{debug, info};

/// Determines the version of what is currently checked out
pub struct VersionAnalyzer {
    pattern: TagPattern,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(pattern: TagPattern) -> Self {
        VersionAnalyzer { pattern }
    }

    /// Describe HEAD as a version.
    ///
    /// Uses the nearest reachable release tag when there is one (the result
    /// already carries a `-<N>-g<sha>` suffix when HEAD is past the tag);
    /// otherwise synthesizes `v0.0.0-<N>-g<sha>` counted from the root.
    pub fn detect<R: Repository>(&self, repo: &R) -> Result<Semver> {
        repo.ensure_repository()?;

        if let Some(described) = repo.describe_head(&self.pattern)? {
            debug!("git describe reported {}", described);
            return Semver::parse(&described);
        }

        info!("no release tag reachable from HEAD, generating initial version");
        let version = self.initial_version(repo)?;
        Semver::parse(&version)
    }

    /// `v0.0.0-<commits since root>-g<short sha>`
    pub fn initial_version<R: Repository>(&self, repo: &R) -> Result<String> {
        let commit_count = repo.count_commits(None)?;
        let short_sha = repo.short_head()?;
        Ok(initial_version(commit_count, &short_sha))
    }
}

impl Default for VersionAnalyzer {
    fn default() -> Self {
        Self::new(TagPattern::release())
    }
}
