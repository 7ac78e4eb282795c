use crate::error::Result;
use crate::release::ReleaseSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-bump.toml";

/// Represents the complete configuration for release-bump.
///
/// Every project value left unset is detected at runtime.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

/// Identity of the project whose images are released.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProjectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_message() -> String {
    "Release {version}".to_string()
}

/// Where and how release tags are published.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_message")]
    pub tag_message: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            tag_message: default_tag_message(),
        }
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_docker() -> String {
    "docker".to_string()
}

/// Executables used for version control and images.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    #[serde(default = "default_git")]
    pub git: String,

    #[serde(default = "default_docker")]
    pub docker: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            git: default_git(),
            docker: default_docker(),
        }
    }
}

fn default_version_env() -> String {
    "VERSION".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_version_env")]
    pub version_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            version_env: default_version_env(),
        }
    }
}

impl Config {
    /// Transaction settings derived from this configuration
    pub fn release_settings(&self) -> ReleaseSettings {
        ReleaseSettings {
            remote: self.git.remote.clone(),
            tag_message: self.git.tag_message.clone(),
            version_env: self.release.version_env.clone(),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Candidate configuration files, most specific first
fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![Path::new(".").join(CONFIG_FILE_NAME)];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(CONFIG_FILE_NAME));
    }
    paths
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-bump.toml` in current directory
/// 3. `release-bump.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or the custom path is missing
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        let text = fs::read_to_string(path)?;
        return Config::from_toml(&text);
    }

    for path in search_paths() {
        if path.exists() {
            log::debug!("loading configuration from {}", path.display());
            let text = fs::read_to_string(&path)?;
            return Config::from_toml(&text);
        }
    }

    Ok(Config::default())
}
