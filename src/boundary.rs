use crate::domain::Semver;
use std::fmt;

/// Non-fatal conditions met while bumping a release.
/// These are reported to the user but do not change the exit status.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// HEAD already carries a release tag
    AlreadyRelease { version: String },
    /// No release tag is reachable, the version was synthesized from history
    NoReleaseTag { version: String },
    /// The project version comes from configuration, not from git
    VersionOverridden { version: String },
}

impl BoundaryWarning {
    /// Classify a detected or configured version string
    pub fn for_version(version: &Semver, configured: bool) -> Option<Self> {
        let text = version.to_string();
        if configured {
            Some(BoundaryWarning::VersionOverridden { version: text })
        } else if version.is_release() {
            Some(BoundaryWarning::AlreadyRelease { version: text })
        } else if version.compare(&Semver::default()).is_eq() {
            Some(BoundaryWarning::NoReleaseTag { version: text })
        } else {
            None
        }
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::AlreadyRelease { version } => {
                write!(f, "Revision already release '{}'. Doing nothing.", version)
            }
            BoundaryWarning::NoReleaseTag { version } => {
                write!(
                    f,
                    "No release tag reachable from HEAD, using '{}'",
                    version
                )
            }
            BoundaryWarning::VersionOverridden { version } => {
                write!(f, "Project version '{}' is set in configuration", version)
            }
        }
    }
}
