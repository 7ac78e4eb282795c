use std::fmt;

/// Named handle of a built image: `[<registry>/]<organization>/<project>:<version>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    /// Registry host prefix; local images have none
    pub registry: Option<String>,
    pub organization: String,
    pub project: String,
    pub version: String,
}

impl ArtifactRef {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        ArtifactRef {
            registry: None,
            organization: organization.into(),
            project: project.into(),
            version: version.into(),
        }
    }

    /// Same repository, different version
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        ArtifactRef {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Same reference under `registry`; surrounding slashes are dropped
    pub fn in_registry(&self, registry: &str) -> Self {
        let registry = registry.trim_matches('/');
        ArtifactRef {
            registry: (!registry.is_empty()).then(|| registry.to_string()),
            ..self.clone()
        }
    }

    /// `[<registry>/]<organization>/<project>`
    pub fn repository(&self) -> String {
        match &self.registry {
            Some(registry) => format!("{}/{}/{}", registry, self.organization, self.project),
            None => format!("{}/{}", self.organization, self.project),
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository(), self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_display() {
        let artifact = ArtifactRef::new("acme", "service", "v1.2.3-4-gabc1234");
        assert_eq!(artifact.to_string(), "acme/service:v1.2.3-4-gabc1234");
        assert_eq!(artifact.repository(), "acme/service");
    }

    #[test]
    fn test_with_version() {
        let snapshot = ArtifactRef::new("acme", "service", "v1.2.3-4-gabc1234");
        let release = snapshot.with_version("v1.3.0");
        assert_eq!(release.to_string(), "acme/service:v1.3.0");
        assert_eq!(snapshot.version, "v1.2.3-4-gabc1234");
    }

    #[test]
    fn test_in_registry() {
        let release = ArtifactRef::new("acme", "service", "v1.3.0");
        let remote = release.in_registry("registry.acme.io:5000/");
        assert_eq!(remote.to_string(), "registry.acme.io:5000/acme/service:v1.3.0");
        assert_eq!(
            remote.with_version("latest").to_string(),
            "registry.acme.io:5000/acme/service:latest"
        );
        assert_eq!(release.in_registry("/").to_string(), "acme/service:v1.3.0");
    }
}
