use crate::domain::ArtifactRef;
use crate::error::{CommandFailure, ReleaseError, Result};
use crate::image::ImageStore;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// Operations of [MockImageStore] that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageOp {
    Exists,
    Tag,
    Remove,
    SetEnv,
    Push,
}

/// Stored content behind a reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockImage {
    pub content: String,
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Default)]
struct StoreState {
    images: BTreeMap<String, MockImage>,
    layers: u64,
    pushed: Vec<String>,
    events: Vec<String>,
}

/// In-memory image store for testing without a docker daemon
#[derive(Debug, Default)]
pub struct MockImageStore {
    failing: HashSet<ImageOp>,
    state: Mutex<StoreState>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing image under `reference`
    pub fn with_image(self, reference: &ArtifactRef) -> Self {
        {
            let mut state = self.lock();
            let content = format!("sha256:{}", reference);
            state.images.insert(
                reference.to_string(),
                MockImage {
                    content,
                    env: Vec::new(),
                },
            );
        }
        self
    }

    /// Make an operation fail with exit code 1
    pub fn fail_on(mut self, op: ImageOp) -> Self {
        self.failing.insert(op);
        self
    }

    /// References currently stored
    pub fn references(&self) -> Vec<String> {
        self.lock().images.keys().cloned().collect()
    }

    pub fn image(&self, reference: &ArtifactRef) -> Option<MockImage> {
        self.lock().images.get(&reference.to_string()).cloned()
    }

    /// References pushed to a registry, in order
    pub fn pushed(&self) -> Vec<String> {
        self.lock().pushed.clone()
    }

    /// Mutating operations performed, in order
    pub fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check(&self, op: ImageOp, command: String) -> Result<()> {
        if self.failing.contains(&op) {
            return Err(ReleaseError::Command(CommandFailure::new(
                command,
                1,
                "injected failure",
            )));
        }
        Ok(())
    }

    fn missing(command: String, reference: &ArtifactRef) -> ReleaseError {
        ReleaseError::Command(CommandFailure::new(
            command,
            1,
            format!("Error: No such image: {}", reference),
        ))
    }
}

impl ImageStore for MockImageStore {
    fn exists(&self, reference: &ArtifactRef) -> Result<bool> {
        self.check(ImageOp::Exists, format!("docker image inspect {}", reference))?;
        Ok(self.lock().images.contains_key(&reference.to_string()))
    }

    fn tag(&self, source: &ArtifactRef, target: &ArtifactRef) -> Result<()> {
        let command = format!("docker tag {} {}", source, target);
        self.check(ImageOp::Tag, command.clone())?;
        let mut state = self.lock();
        let image = state
            .images
            .get(&source.to_string())
            .cloned()
            .ok_or_else(|| Self::missing(command, source))?;
        state.images.insert(target.to_string(), image);
        state.events.push(format!("tag {} {}", source, target));
        Ok(())
    }

    fn remove(&self, reference: &ArtifactRef) -> Result<()> {
        let command = format!("docker rmi {}", reference);
        self.check(ImageOp::Remove, command.clone())?;
        let mut state = self.lock();
        if state.images.remove(&reference.to_string()).is_none() {
            return Err(Self::missing(command, reference));
        }
        state.events.push(format!("rmi {}", reference));
        Ok(())
    }

    fn set_env(&self, reference: &ArtifactRef, key: &str, value: &str) -> Result<()> {
        let command = format!("docker build -t {} -", reference);
        self.check(ImageOp::SetEnv, command.clone())?;
        let mut state = self.lock();
        state.layers += 1;
        let layer = state.layers;
        let image = state
            .images
            .get_mut(&reference.to_string())
            .ok_or_else(|| Self::missing(command, reference))?;
        image.content = format!("{}+layer{}", image.content, layer);
        image.env.push((key.to_string(), value.to_string()));
        state.events.push(format!("env {} {}={}", reference, key, value));
        Ok(())
    }

    fn push(&self, reference: &ArtifactRef) -> Result<()> {
        let command = format!("docker push {}", reference);
        self.check(ImageOp::Push, command.clone())?;
        let mut state = self.lock();
        if !state.images.contains_key(&reference.to_string()) {
            return Err(Self::missing(command, reference));
        }
        state.pushed.push(reference.to_string());
        state.events.push(format!("push {}", reference));
        Ok(())
    }
}
