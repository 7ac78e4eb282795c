//! Version-control abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations the
//! release workflow needs, with a command-line implementation and an
//! in-memory mock for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations are:
//!
//! - [repository::GitCli]: drives the `git` executable through a
//!   [CommandRunner](crate::exec::CommandRunner)
//! - [mock::MockRepository]: an in-memory history with failure injection
//!
//! # Usage
//!
//! The analyzers and the release transaction depend on the trait, never on a
//! concrete backend.
//!
//! ```rust
//! # use release_bump::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_bump::Result<()> {
//! repo.ensure_repository()?;
//! let sha = repo.short_head()?;
//! let since_root = repo.count_commits(None)?;
//! # let _ = (sha, since_root);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::{GitOp, MockRepository};
pub use repository::GitCli;

use crate::domain::TagPattern;
use crate::error::Result;

/// Git operations used to derive versions and publish release tags
///
/// ## Error Handling
///
/// A failing command surfaces as [ReleaseError::Command](crate::error::ReleaseError::Command)
/// carrying the exit code and raw output, except where a method documents a
/// more specific mapping.
///
/// ## Implementations
///
/// - [GitCli](repository::GitCli): the `git` executable
/// - [MockRepository](mock::MockRepository): test double
pub trait Repository: Send + Sync {
    /// Check that git is installed and the working directory is a repository
    ///
    /// # Returns
    /// * `Ok(())` - HEAD resolves
    /// * `Err(NoBackend)` - git is not installed
    /// * `Err(NotARepository)` - not inside a repository (or no commits yet)
    fn ensure_repository(&self) -> Result<()>;

    /// Describe HEAD relative to the nearest reachable release tag
    ///
    /// Returns the `git describe` form: `v1.2.3` when HEAD is tagged,
    /// `v1.2.3-4-gabc1234` otherwise. Tags that slip through the glob but
    /// fail [TagPattern::matches] (`v1.2.3rc1`) are never the base.
    ///
    /// # Returns
    /// * `Ok(Some(String))` - Description based on a tag matching `pattern`
    /// * `Ok(None)` - No matching tag is reachable from HEAD
    fn describe_head(&self, pattern: &TagPattern) -> Result<Option<String>>;

    /// Count commits reachable from HEAD but not from `since`
    ///
    /// With `since == None` this counts every commit reachable from HEAD,
    /// root commit included.
    fn count_commits(&self, since: Option<&str>) -> Result<u64>;

    /// Abbreviated hash of HEAD
    fn short_head(&self) -> Result<String>;

    /// List tag names matching a glob, one per entry
    fn list_tags(&self, glob: &str) -> Result<Vec<String>>;

    /// Full hashes of every parentless commit reachable from HEAD
    fn root_commits(&self) -> Result<Vec<String>>;

    /// Create an annotated tag at HEAD
    fn create_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push a single ref to a named remote
    ///
    /// # Example
    /// ```rust
    /// # use release_bump::git::Repository;
    /// # fn example<R: Repository>(repo: &R) -> release_bump::Result<()> {
    /// repo.push_ref("origin", "v1.0.0")?;
    /// # Ok(())
    /// # }
    /// ```
    fn push_ref(&self, remote: &str, refname: &str) -> Result<()>;
}

impl<T: Repository + ?Sized> Repository for &T {
    fn ensure_repository(&self) -> Result<()> {
        (**self).ensure_repository()
    }

    fn describe_head(&self, pattern: &TagPattern) -> Result<Option<String>> {
        (**self).describe_head(pattern)
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        (**self).count_commits(since)
    }

    fn short_head(&self) -> Result<String> {
        (**self).short_head()
    }

    fn list_tags(&self, glob: &str) -> Result<Vec<String>> {
        (**self).list_tags(glob)
    }

    fn root_commits(&self) -> Result<Vec<String>> {
        (**self).root_commits()
    }

    fn create_tag(&self, name: &str, message: &str) -> Result<()> {
        (**self).create_tag(name, message)
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        (**self).delete_tag(name)
    }

    fn push_ref(&self, remote: &str, refname: &str) -> Result<()> {
        (**self).push_ref(remote, refname)
    }
}
