//! Analysis of repository state: current version and matching snapshot image

pub mod snapshot_resolver;
pub mod version_analyzer;

pub use snapshot_resolver::SnapshotResolver;
pub use version_analyzer::VersionAnalyzer;
