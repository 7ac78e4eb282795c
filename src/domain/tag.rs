use crate::domain::version::Semver;
use regex::Regex;

/// Glob handed to git for release tags (`v<major>.<minor>.<patch>`)
pub const RELEASE_TAG_GLOB: &str = "v[0-9]*.[0-9]*.[0-9]*";

/// Glob for tags that carry a suffix and so are never release tags
pub const SUFFIXED_TAG_GLOB: &str = "v*-*";

/// Strict release tag filter.
///
/// Git globs over-match (`v1.2.3-rc1` and `v1.2.3x` satisfy
/// [`RELEASE_TAG_GLOB`]), so every listed tag is checked again against an
/// anchored regex before it is trusted.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
}

impl TagPattern {
    pub fn release() -> Self {
        TagPattern {
            regex: Regex::new(r"^v\d+\.\d+\.\d+$").expect("release tag regex is valid"),
        }
    }

    /// Glob passed to `git tag -l` / `git describe --match`
    pub fn glob(&self) -> &'static str {
        RELEASE_TAG_GLOB
    }

    /// Glob passed to `git describe --exclude`
    pub fn exclude_glob(&self) -> &'static str {
        SUFFIXED_TAG_GLOB
    }

    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag.trim())
    }

    /// Keep the strict release tags and parse them
    pub fn release_versions<'a>(&self, tags: impl IntoIterator<Item = &'a str>) -> Vec<Semver> {
        tags.into_iter()
            .map(str::trim)
            .filter(|tag| self.matches(tag))
            .filter_map(|tag| Semver::parse(tag).ok())
            .collect()
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        Self::release()
    }
}
