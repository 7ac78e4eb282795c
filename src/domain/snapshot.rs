//! Snapshot version strings: the bridge between commit history and `Semver`.

/// Base tag used when no release tag is reachable
pub const ROOT_BASE_TAG: &str = "v0.0.0";

/// `<base>-<distance>-g<shortsha>`, the same shape `git describe` prints
pub fn snapshot_version(base_tag: &str, distance: u64, short_sha: &str) -> String {
    format!("{}-{}-g{}", base_tag, distance, short_sha)
}

/// Version for a history that has never been released.
///
/// `commit_count` is git's count of commits reachable from HEAD, which
/// includes the root commit itself; the distance from the root is one less.
pub fn initial_version(commit_count: u64, short_sha: &str) -> String {
    snapshot_version(ROOT_BASE_TAG, commit_count.saturating_sub(1), short_sha)
}
