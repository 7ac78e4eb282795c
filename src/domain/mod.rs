//! Domain logic - pure value types independent of git and docker

pub mod artifact;
pub mod snapshot;
pub mod tag;
pub mod version;

pub use artifact::ArtifactRef;
pub use snapshot::{initial_version, snapshot_version, ROOT_BASE_TAG};
pub use tag::TagPattern;
pub use version::{BumpLevel, Semver};
