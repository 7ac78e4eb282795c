//! Image store abstraction
//!
//! Images are never built here; the store only locates, retags, stamps,
//! pushes and removes references to images that already exist.
//!
//! - [docker::DockerCli]: the `docker` executable through a
//!   [CommandRunner](crate::exec::CommandRunner)
//! - [mock::MockImageStore]: in-memory images with failure injection

pub mod docker;
pub mod mock;

pub use docker::DockerCli;
pub use mock::{ImageOp, MockImageStore};

use crate::domain::ArtifactRef;
use crate::error::Result;

/// Reference-level operations on built images
pub trait ImageStore: Send + Sync {
    /// Whether an image is stored under `reference`
    fn exists(&self, reference: &ArtifactRef) -> Result<bool>;

    /// Point `target` at the same image content as `source`
    fn tag(&self, source: &ArtifactRef, target: &ArtifactRef) -> Result<()>;

    /// Remove the reference (the content goes once nothing refers to it)
    fn remove(&self, reference: &ArtifactRef) -> Result<()>;

    /// Bake `key=value` into the image's environment as a new layer,
    /// replacing `reference` with the result
    fn set_env(&self, reference: &ArtifactRef, key: &str, value: &str) -> Result<()>;

    /// Upload `reference` to the registry named in it
    fn push(&self, reference: &ArtifactRef) -> Result<()>;
}

impl<T: ImageStore + ?Sized> ImageStore for &T {
    fn exists(&self, reference: &ArtifactRef) -> Result<bool> {
        (**self).exists(reference)
    }

    fn tag(&self, source: &ArtifactRef, target: &ArtifactRef) -> Result<()> {
        (**self).tag(source, target)
    }

    fn remove(&self, reference: &ArtifactRef) -> Result<()> {
        (**self).remove(reference)
    }

    fn set_env(&self, reference: &ArtifactRef, key: &str, value: &str) -> Result<()> {
        (**self).set_env(reference, key, value)
    }

    fn push(&self, reference: &ArtifactRef) -> Result<()> {
        (**self).push(reference)
    }
}
