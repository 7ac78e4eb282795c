//! Registry push of the project image
//!
//! For every requested tag the local `<organization>/<project>:<version>`
//! image is tagged as `<registry>/<organization>/<project>:<tag>`, pushed,
//! and the registry-prefixed reference is removed again whether or not the
//! push succeeded.

use crate::domain::ArtifactRef;
use crate::error::{ReleaseError, Result};
use crate::image::ImageStore;
use log::{error, info};

/// Tags to push: the additional ones in order, then `version`; blanks dropped
pub fn push_tags(version: &str, additional: &[String]) -> Vec<String> {
    additional
        .iter()
        .map(|tag| tag.trim())
        .chain(std::iter::once(version.trim()))
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pushes one local image to a registry under several tags
pub struct RegistryPush<'a, S> {
    store: &'a S,
    registry: String,
}

impl<'a, S: ImageStore> RegistryPush<'a, S> {
    pub fn new(store: &'a S, registry: impl Into<String>) -> Self {
        RegistryPush {
            store,
            registry: registry.into(),
        }
    }

    /// Push `image` under each of `tags`, stopping at the first failure.
    ///
    /// Returns the registry references that were pushed.
    pub fn run(&self, image: &ArtifactRef, tags: &[String]) -> Result<Vec<ArtifactRef>> {
        let remote_repo = image.in_registry(&self.registry);
        if remote_repo.registry.is_none() {
            return Err(ReleaseError::config("registry must not be empty"));
        }

        let mut pushed = Vec::with_capacity(tags.len());
        for tag in tags {
            let remote = remote_repo.with_version(tag.as_str());
            self.store
                .tag(image, &remote)
                .map_err(|e| e.into_step(ReleaseError::RetagFailed))?;

            let push_result = self
                .store
                .push(&remote)
                .map_err(|e| e.into_step(ReleaseError::ImagePushFailed));
            let cleanup_result = self.store.remove(&remote);

            match (push_result, cleanup_result) {
                (Ok(()), Ok(())) => {
                    info!("pushed {}", remote);
                    pushed.push(remote);
                }
                (Ok(()), Err(cleanup)) => return Err(cleanup),
                (Err(push), Ok(())) => return Err(push),
                (Err(push), Err(cleanup)) => {
                    error!("could not remove {}: {}", remote, cleanup);
                    return Err(push);
                }
            }
        }
        Ok(pushed)
    }
}
