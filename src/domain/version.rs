use crate::error::{ReleaseError, Result, VersionPart};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Semantic version with an optional free-form snapshot suffix.
///
/// An empty `snapshot` marks a release version; anything else is a snapshot
/// (pre-release) version such as `v1.2.3-4-gabc1234`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Semver {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub snapshot: String,
}

impl Semver {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Semver {
            major,
            minor,
            patch,
            snapshot: String::new(),
        }
    }

    /// Create a version carrying a snapshot suffix
    pub fn with_snapshot(major: u64, minor: u64, patch: u64, snapshot: impl Into<String>) -> Self {
        Semver {
            major,
            minor,
            patch,
            snapshot: snapshot.into(),
        }
    }

    /// Parse `v<major>.<minor>.<patch>[-<snapshot>]`; the leading `v` is optional.
    ///
    /// The string is split into at most three dot-separated parts, so dots
    /// inside the snapshot suffix are kept verbatim.
    pub fn parse(text: &str) -> Result<Self> {
        let body = text.strip_prefix('v').unwrap_or(text);

        let parts: Vec<&str> = body.splitn(3, '.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::malformed_shape(
                text,
                "semver requires 3 parts Major.Minor.Patch[-snapshot]",
            ));
        }

        for (i, part) in parts.iter().enumerate() {
            if part.trim().is_empty() {
                let position = i + 1;
                let which = VersionPart::from_position(position).unwrap_or(VersionPart::Patch);
                return Err(ReleaseError::malformed(
                    text,
                    which,
                    format!("part {} empty", position),
                ));
            }
        }

        let major = parse_component(text, parts[0], VersionPart::Major)?;
        let minor = parse_component(text, parts[1], VersionPart::Minor)?;

        let (patch_text, snapshot) = match parts[2].split_once('-') {
            Some((patch, snapshot)) => (patch, snapshot.trim()),
            None => (parts[2], ""),
        };
        let patch = parse_component(text, patch_text, VersionPart::Patch)?;

        Ok(Semver {
            major,
            minor,
            patch,
            snapshot: snapshot.to_string(),
        })
    }

    /// Increment the component named by `level`, clearing the snapshot.
    ///
    /// An unrecognised level leaves the version untouched.
    pub fn bump(&mut self, level: &str) -> Result<()> {
        let level = level.parse::<BumpLevel>()?;
        self.bump_level(level);
        Ok(())
    }

    /// Increment by an already validated level
    pub fn bump_level(&mut self, level: BumpLevel) {
        match level {
            BumpLevel::Major => {
                self.major += 1;
                self.minor = 0;
                self.patch = 0;
            }
            BumpLevel::Minor => {
                self.minor += 1;
                self.patch = 0;
            }
            BumpLevel::Patch => {
                self.patch += 1;
            }
        }
        self.snapshot.clear();
    }

    /// Copy of this version with `level` applied
    pub fn bumped(&self, level: BumpLevel) -> Self {
        let mut next = self.clone();
        next.bump_level(level);
        next
    }

    pub fn is_release(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Order by the numeric triple only.
    ///
    /// Two versions that differ only in their snapshot compare `Equal`, which
    /// is why `Semver` does not implement `Ord`.
    pub fn compare(&self, other: &Semver) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }

    /// `major.minor.patch[-snapshot]` without the leading `v`
    pub fn without_prefix(&self) -> String {
        let rendered = self.to_string();
        rendered.trim_start_matches('v').to_string()
    }
}

fn parse_component(input: &str, text: &str, part: VersionPart) -> Result<u64> {
    text.trim().parse::<u64>().map_err(|_| {
        ReleaseError::malformed(
            input,
            part,
            format!("unable to convert {} '{}' to int", part.name(), text),
        )
    })
}

impl fmt::Display for Semver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.snapshot.is_empty() {
            write!(f, "-{}", self.snapshot)?;
        }
        Ok(())
    }
}

impl FromStr for Semver {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Semver::parse(s)
    }
}

/// Which component of a release version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpLevel {
    Major,
    #[default]
    Minor,
    Patch,
}

impl BumpLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpLevel::Major => "major",
            BumpLevel::Minor => "minor",
            BumpLevel::Patch => "patch",
        }
    }
}

impl FromStr for BumpLevel {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "major" => Ok(BumpLevel::Major),
            "minor" => Ok(BumpLevel::Minor),
            "patch" => Ok(BumpLevel::Patch),
            _ => Err(ReleaseError::UnknownLevel(s.to_string())),
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
