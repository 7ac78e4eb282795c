use std::fmt;
use thiserror::Error;

/// Positional component of a `major.minor.patch` version string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionPart {
    Major,
    Minor,
    Patch,
}

impl VersionPart {
    /// 1-based position of the component in the version string
    pub fn position(&self) -> usize {
        match self {
            VersionPart::Major => 1,
            VersionPart::Minor => 2,
            VersionPart::Patch => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VersionPart::Major => "major",
            VersionPart::Minor => "minor",
            VersionPart::Patch => "patch",
        }
    }

    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            1 => Some(VersionPart::Major),
            2 => Some(VersionPart::Minor),
            3 => Some(VersionPart::Patch),
            _ => None,
        }
    }
}

/// A failed external command: what ran, how it exited and what it printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    pub command: String,
    pub code: i32,
    pub output: String,
}

impl CommandFailure {
    pub fn new(command: impl Into<String>, code: i32, output: impl Into<String>) -> Self {
        CommandFailure {
            command: command.into(),
            code,
            output: output.into(),
        }
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.output.trim();
        if output.is_empty() {
            write!(f, "`{}` exited with {}", self.command, self.code)
        } else {
            write!(f, "`{}` exited with {}: {}", self.command, self.code, output)
        }
    }
}

/// Unified error type for release-bump operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Malformed version '{input}': {reason}")]
    MalformedVersion {
        input: String,
        part: Option<VersionPart>,
        reason: String,
    },

    #[error("Unknown level '{0}'")]
    UnknownLevel(String),

    #[error("No git executable found")]
    NoBackend,

    #[error("Not a git repository")]
    NotARepository,

    #[error("Docker image for revision {commit} could not be found, build it first")]
    ArtifactNotFound { commit: String },

    #[error("Failed to create release tag: {0}")]
    TagCreateFailed(CommandFailure),

    #[error("Failed to retag image: {0}")]
    RetagFailed(CommandFailure),

    #[error("Failed to stamp release metadata: {0}")]
    MetadataStampFailed(CommandFailure),

    #[error("Failed to push release tag: {0}")]
    PublishFailed(CommandFailure),

    #[error("Image {image} already exists, remove it before releasing")]
    ImageExists { image: String },

    #[error("Failed to push image: {0}")]
    ImagePushFailed(CommandFailure),

    #[error("Command failed: {0}")]
    Command(CommandFailure),

    #[error("Unexpected output from `{command}`: '{output}'")]
    UnexpectedOutput { command: String, output: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in release-bump
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a malformed-version error that names the offending component
    pub fn malformed(input: impl Into<String>, part: VersionPart, reason: impl Into<String>) -> Self {
        ReleaseError::MalformedVersion {
            input: input.into(),
            part: Some(part),
            reason: reason.into(),
        }
    }

    /// Create a malformed-version error about the overall shape
    pub fn malformed_shape(input: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::MalformedVersion {
            input: input.into(),
            part: None,
            reason: reason.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    pub fn unexpected_output(command: impl Into<String>, output: impl Into<String>) -> Self {
        ReleaseError::UnexpectedOutput {
            command: command.into(),
            output: output.into(),
        }
    }

    /// The underlying command failure, if this error wraps one
    pub fn command_failure(&self) -> Option<&CommandFailure> {
        match self {
            ReleaseError::TagCreateFailed(f)
            | ReleaseError::RetagFailed(f)
            | ReleaseError::MetadataStampFailed(f)
            | ReleaseError::PublishFailed(f)
            | ReleaseError::ImagePushFailed(f)
            | ReleaseError::Command(f) => Some(f),
            _ => None,
        }
    }

    /// Re-home a backend failure under a transaction step.
    ///
    /// Errors that carry no command failure are returned unchanged.
    pub fn into_step(self, wrap: fn(CommandFailure) -> ReleaseError) -> ReleaseError {
        match self {
            ReleaseError::Command(failure) => wrap(failure),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("missing project name");
        assert_eq!(err.to_string(), "Configuration error: missing project name");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_image_errors_display() {
        let exists = ReleaseError::ImageExists {
            image: "acme/service:v1.3.0".to_string(),
        };
        assert_eq!(
            exists.to_string(),
            "Image acme/service:v1.3.0 already exists, remove it before releasing"
        );

        let push = ReleaseError::Command(CommandFailure::new("docker push r/a/b:v1", 1, "denied"))
            .into_step(ReleaseError::ImagePushFailed);
        assert_eq!(push.to_string(), "Failed to push image: `docker push r/a/b:v1` exited with 1: denied");
        assert_eq!(push.command_failure().map(|f| f.code), Some(1));
    }

    #[test]
    fn test_unknown_level_display() {
        assert_eq!(ReleaseError::UnknownLevel(String::new()).to_string(), "Unknown level ''");
        assert_eq!(
            ReleaseError::UnknownLevel("aoeu".to_string()).to_string(),
            "Unknown level 'aoeu'"
        );
    }

    #[test]
    fn test_malformed_names_part() {
        let err = ReleaseError::malformed("1..1", VersionPart::Minor, "part 2 empty");
        match &err {
            ReleaseError::MalformedVersion { part, .. } => {
                assert_eq!(*part, Some(VersionPart::Minor));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("part 2 empty"));
    }

    #[test]
    fn test_version_part_positions() {
        for pos in 1..=3 {
            assert_eq!(VersionPart::from_position(pos).unwrap().position(), pos);
        }
        assert_eq!(VersionPart::from_position(0), None);
        assert_eq!(VersionPart::from_position(4), None);
    }

    #[test]
    fn test_command_failure_display() {
        let failure = CommandFailure::new("git push origin v1.0.0", 128, "fatal: no remote\n");
        assert_eq!(
            failure.to_string(),
            "`git push origin v1.0.0` exited with 128: fatal: no remote"
        );

        let quiet = CommandFailure::new("docker tag a b", 1, "");
        assert_eq!(quiet.to_string(), "`docker tag a b` exited with 1");
    }

    #[test]
    fn test_into_step_wraps_command_failures() {
        let failure = CommandFailure::new("git tag -a v1.0.0 -m 'Release v1.0.0'", 128, "exists");
        let err = ReleaseError::Command(failure.clone()).into_step(ReleaseError::TagCreateFailed);
        assert!(matches!(err, ReleaseError::TagCreateFailed(ref f) if *f == failure));
        assert_eq!(err.command_failure(), Some(&failure));
    }

    #[test]
    fn test_into_step_keeps_other_errors() {
        let err = ReleaseError::NotARepository.into_step(ReleaseError::PublishFailed);
        assert!(matches!(err, ReleaseError::NotARepository));
        assert!(err.command_failure().is_none());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let failure = CommandFailure::new("x", 1, "");
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::NoBackend, "No git executable"),
            (ReleaseError::NotARepository, "Not a git repository"),
            (ReleaseError::TagCreateFailed(failure.clone()), "Failed to create release tag"),
            (ReleaseError::RetagFailed(failure.clone()), "Failed to retag image"),
            (ReleaseError::MetadataStampFailed(failure.clone()), "Failed to stamp release metadata"),
            (ReleaseError::PublishFailed(failure), "Failed to push release tag"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_artifact_not_found_names_commit() {
        let err = ReleaseError::ArtifactNotFound {
            commit: "abc1234".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("abc1234"));
        assert!(msg.contains("build it first"));
    }
}
