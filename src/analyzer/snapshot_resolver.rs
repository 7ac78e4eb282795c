use crate::domain::{snapshot_version, ArtifactRef, TagPattern, ROOT_BASE_TAG};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::image::ImageStore;
use log::{debug, info};

/// Finds the image that was built for the current commit.
///
/// Candidates are derived from every release tag in ascending version order,
/// then from every root commit with `v0.0.0` as the base. The first candidate
/// that exists wins, so with several ancestor tags the *oldest* one whose
/// image exists is chosen.
pub struct SnapshotResolver {
    repository: ArtifactRef,
    pattern: TagPattern,
}

impl SnapshotResolver {
    /// `organization` and `project` name the image repository to search
    pub fn new(organization: impl Into<String>, project: impl Into<String>) -> Self {
        SnapshotResolver {
            repository: ArtifactRef::new(organization, project, ""),
            pattern: TagPattern::release(),
        }
    }

    pub fn resolve<R: Repository, S: ImageStore>(&self, repo: &R, store: &S) -> Result<ArtifactRef> {
        let short_sha = repo.short_head()?;

        let tags = repo.list_tags(self.pattern.glob())?;
        let mut versions = self
            .pattern
            .release_versions(tags.iter().map(String::as_str));
        versions.sort_by(|a, b| a.compare(b));

        for version in &versions {
            let tag = version.to_string();
            let distance = repo.count_commits(Some(&tag))?;

            // Nothing separates the tag from HEAD, so it cannot be the base
            // of a snapshot build.
            if distance == 0 {
                debug!("skipping {}: no commits since tag", tag);
                continue;
            }

            if let Some(found) = self.existing_image(store, &tag, distance, &short_sha)? {
                return Ok(found);
            }
        }

        for root in repo.root_commits()? {
            let distance = repo.count_commits(Some(&root))?;
            if let Some(found) = self.existing_image(store, ROOT_BASE_TAG, distance, &short_sha)? {
                return Ok(found);
            }
        }

        Err(ReleaseError::ArtifactNotFound { commit: short_sha })
    }

    fn existing_image<S: ImageStore>(
        &self,
        store: &S,
        base: &str,
        distance: u64,
        short_sha: &str,
    ) -> Result<Option<ArtifactRef>> {
        let candidate = self
            .repository
            .with_version(snapshot_version(base, distance, short_sha));
        if store.exists(&candidate)? {
            info!("found snapshot image {}", candidate);
            return Ok(Some(candidate));
        }
        debug!("no image {}", candidate);
        Ok(None)
    }
}
