//! Release bump transaction
//!
//! Promotes the snapshot image built for HEAD to a release:
//!
//! 1. resolve the snapshot image for HEAD
//! 2. compute the release version and refuse if its image already exists
//! 3. create the annotated release tag
//! 4. tag the snapshot image with the release version
//! 5. stamp the release version into the image environment
//! 6. push the release tag
//!
//! Each side effect registers its compensation as soon as it succeeds. When a
//! later step fails, the compensations run in reverse order before the step's
//! error is returned, leaving tags and images as they were.

use crate::analyzer::SnapshotResolver;
use crate::domain::{ArtifactRef, BumpLevel, Semver};
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::image::ImageStore;
use log::{error, info, warn};

/// Knobs of the transaction that come from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSettings {
    /// Remote the release tag is pushed to
    pub remote: String,
    /// Annotation of the release tag; `{version}` is replaced
    pub tag_message: String,
    /// Environment key that receives the version (without leading `v`)
    pub version_env: String,
}

impl Default for ReleaseSettings {
    fn default() -> Self {
        ReleaseSettings {
            remote: "origin".to_string(),
            tag_message: "Release {version}".to_string(),
            version_env: "VERSION".to_string(),
        }
    }
}

impl ReleaseSettings {
    pub fn tag_message_for(&self, version: &Semver) -> String {
        self.tag_message.replace("{version}", &version.to_string())
    }
}

/// Result of a bump that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpOutcome {
    /// HEAD was already a release; nothing was touched
    AlreadyRelease(Semver),
    Released {
        version: Semver,
        snapshot: ArtifactRef,
        image: ArtifactRef,
    },
}

#[derive(Debug, Clone)]
enum Compensation {
    DeleteTag(String),
    RemoveImage(ArtifactRef),
}

/// Side effects to undo if the transaction does not complete
#[derive(Debug, Default)]
struct Rollback {
    steps: Vec<Compensation>,
}

impl Rollback {
    fn push(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    /// Undo everything registered so far, newest first.
    ///
    /// A failing compensation is logged and the remaining ones still run; the
    /// caller returns the original error either way.
    fn unwind<R: Repository, S: ImageStore>(&mut self, repo: &R, store: &S) {
        while let Some(step) = self.steps.pop() {
            let result = match &step {
                Compensation::DeleteTag(tag) => {
                    warn!("rolling back: deleting tag {}", tag);
                    repo.delete_tag(tag)
                }
                Compensation::RemoveImage(image) => {
                    warn!("rolling back: removing image {}", image);
                    store.remove(image)
                }
            };
            if let Err(e) = result {
                error!("rollback step {:?} failed: {}", step, e);
            }
        }
    }
}

/// One release bump against a repository and an image store
pub struct ReleaseBump<'a, R, S> {
    repo: &'a R,
    store: &'a S,
    resolver: SnapshotResolver,
    settings: ReleaseSettings,
}

impl<'a, R: Repository, S: ImageStore> ReleaseBump<'a, R, S> {
    pub fn new(
        repo: &'a R,
        store: &'a S,
        resolver: SnapshotResolver,
        settings: ReleaseSettings,
    ) -> Self {
        ReleaseBump {
            repo,
            store,
            resolver,
            settings,
        }
    }

    /// Release `current` at `level`.
    ///
    /// A release version is left alone and reported as
    /// [BumpOutcome::AlreadyRelease] without touching git or the image store.
    pub fn run(&self, current: &Semver, level: BumpLevel) -> Result<BumpOutcome> {
        if current.is_release() {
            info!("{} is already a release", current);
            return Ok(BumpOutcome::AlreadyRelease(current.clone()));
        }

        let snapshot = self.resolver.resolve(self.repo, self.store)?;
        let version = current.bumped(level);
        info!("releasing {} as {} ({})", current, version, level);

        // Rolling back a retag removes the target reference, which must not
        // take an unrelated image with it.
        let target = snapshot.with_version(version.to_string());
        if self.store.exists(&target)? {
            return Err(ReleaseError::ImageExists {
                image: target.to_string(),
            });
        }

        let mut rollback = Rollback::default();
        match self.apply(&snapshot, &version, &mut rollback) {
            Ok(image) => {
                info!("released {}", version);
                Ok(BumpOutcome::Released {
                    version,
                    snapshot,
                    image,
                })
            }
            Err(e) => {
                warn!("release of {} failed: {}", version, e);
                rollback.unwind(self.repo, self.store);
                Err(e)
            }
        }
    }

    fn apply(
        &self,
        snapshot: &ArtifactRef,
        version: &Semver,
        rollback: &mut Rollback,
    ) -> Result<ArtifactRef> {
        let tag = version.to_string();

        self.repo
            .create_tag(&tag, &self.settings.tag_message_for(version))
            .map_err(|e| e.into_step(ReleaseError::TagCreateFailed))?;
        rollback.push(Compensation::DeleteTag(tag.clone()));
        info!("created tag {}", tag);

        let image = snapshot.with_version(tag.as_str());
        self.store
            .tag(snapshot, &image)
            .map_err(|e| e.into_step(ReleaseError::RetagFailed))?;
        rollback.push(Compensation::RemoveImage(image.clone()));
        info!("tagged {} as {}", snapshot, image);

        self.store
            .set_env(&image, &self.settings.version_env, &version.without_prefix())
            .map_err(|e| e.into_step(ReleaseError::MetadataStampFailed))?;
        info!("set {}={} on {}", self.settings.version_env, version.without_prefix(), image);

        self.repo
            .push_ref(&self.settings.remote, &tag)
            .map_err(|e| e.into_step(ReleaseError::PublishFailed))?;
        info!("pushed {} to {}", tag, self.settings.remote);

        Ok(image)
    }
}
