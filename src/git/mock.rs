use crate::domain::TagPattern;
use crate::error::{CommandFailure, ReleaseError, Result};
use crate::git::Repository;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Operations of [MockRepository] that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitOp {
    Describe,
    Count,
    ShortHead,
    ListTags,
    RootCommits,
    CreateTag,
    DeleteTag,
    Push,
}

impl GitOp {
    fn name(&self) -> &'static str {
        match self {
            GitOp::Describe => "describe",
            GitOp::Count => "rev-list --count",
            GitOp::ShortHead => "rev-parse --short HEAD",
            GitOp::ListTags => "tag -l",
            GitOp::RootCommits => "rev-list --max-parents=0",
            GitOp::CreateTag => "tag -a",
            GitOp::DeleteTag => "tag -d",
            GitOp::Push => "push",
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    tags: BTreeSet<String>,
    pushed: Vec<(String, String)>,
    events: Vec<String>,
}

/// In-memory repository for testing without a git checkout.
///
/// History is described by distances: how many commits separate each tag or
/// root commit from HEAD.
#[derive(Debug)]
pub struct MockRepository {
    present: bool,
    head: String,
    total_commits: u64,
    describe: Option<String>,
    distances: HashMap<String, u64>,
    roots: Vec<String>,
    failing: HashSet<GitOp>,
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a repository whose HEAD has the given abbreviated hash
    pub fn new(head: impl Into<String>) -> Self {
        MockRepository {
            present: true,
            head: head.into(),
            total_commits: 1,
            describe: None,
            distances: HashMap::new(),
            roots: Vec::new(),
            failing: HashSet::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// A working directory that is not a repository
    pub fn absent() -> Self {
        let mut repo = Self::new("");
        repo.present = false;
        repo
    }

    /// Add a tag `distance` commits behind HEAD
    pub fn add_tag(mut self, name: impl Into<String>, distance: u64) -> Self {
        let name = name.into();
        self.distances.insert(name.clone(), distance);
        self.lock().tags.insert(name);
        self
    }

    /// Add a root commit `distance` commits behind HEAD
    pub fn add_root(mut self, sha: impl Into<String>, distance: u64) -> Self {
        let sha = sha.into();
        self.distances.insert(sha.clone(), distance);
        self.roots.push(sha);
        self
    }

    /// Commits reachable from HEAD, root included
    pub fn with_total_commits(mut self, count: u64) -> Self {
        self.total_commits = count;
        self
    }

    /// What `describe` reports for HEAD
    pub fn with_describe(mut self, description: impl Into<String>) -> Self {
        self.describe = Some(description.into());
        self
    }

    /// Make an operation fail with exit code 1
    pub fn fail_on(mut self, op: GitOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// Local tags currently present
    pub fn tags(&self) -> Vec<String> {
        self.lock().tags.iter().cloned().collect()
    }

    /// `(remote, ref)` pairs pushed so far
    pub fn pushed(&self) -> Vec<(String, String)> {
        self.lock().pushed.clone()
    }

    /// Mutating operations performed, in order
    pub fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check(&self, op: GitOp) -> Result<()> {
        if !self.present {
            return Err(ReleaseError::NotARepository);
        }
        if self.failing.contains(&op) {
            return Err(ReleaseError::Command(CommandFailure::new(
                format!("git {}", op.name()),
                1,
                "injected failure",
            )));
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new("0000000")
    }
}

impl Repository for MockRepository {
    fn ensure_repository(&self) -> Result<()> {
        if self.present {
            Ok(())
        } else {
            Err(ReleaseError::NotARepository)
        }
    }

    fn describe_head(&self, pattern: &TagPattern) -> Result<Option<String>> {
        self.check(GitOp::Describe)?;
        Ok(self
            .describe
            .clone()
            .filter(|d| pattern.matches(d.split('-').next().unwrap_or(""))))
    }

    fn count_commits(&self, since: Option<&str>) -> Result<u64> {
        self.check(GitOp::Count)?;
        match since {
            None => Ok(self.total_commits),
            Some(reference) => self.distances.get(reference).copied().ok_or_else(|| {
                ReleaseError::Command(CommandFailure::new(
                    format!("git rev-list {}..HEAD --count", reference),
                    128,
                    format!("fatal: bad revision '{}..HEAD'", reference),
                ))
            }),
        }
    }

    fn short_head(&self) -> Result<String> {
        self.check(GitOp::ShortHead)?;
        Ok(self.head.clone())
    }

    fn list_tags(&self, _glob: &str) -> Result<Vec<String>> {
        self.check(GitOp::ListTags)?;
        Ok(self.tags())
    }

    fn root_commits(&self) -> Result<Vec<String>> {
        self.check(GitOp::RootCommits)?;
        Ok(self.roots.clone())
    }

    fn create_tag(&self, name: &str, _message: &str) -> Result<()> {
        self.check(GitOp::CreateTag)?;
        let mut state = self.lock();
        if !state.tags.insert(name.to_string()) {
            return Err(ReleaseError::Command(CommandFailure::new(
                format!("git tag -a {}", name),
                128,
                format!("fatal: tag '{}' already exists", name),
            )));
        }
        state.events.push(format!("create-tag {}", name));
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.check(GitOp::DeleteTag)?;
        let mut state = self.lock();
        if !state.tags.remove(name) {
            return Err(ReleaseError::Command(CommandFailure::new(
                format!("git tag -d {}", name),
                1,
                format!("error: tag '{}' not found.", name),
            )));
        }
        state.events.push(format!("delete-tag {}", name));
        Ok(())
    }

    fn push_ref(&self, remote: &str, refname: &str) -> Result<()> {
        self.check(GitOp::Push)?;
        let mut state = self.lock();
        state.pushed.push((remote.to_string(), refname.to_string()));
        state.events.push(format!("push {} {}", remote, refname));
        Ok(())
    }
}
