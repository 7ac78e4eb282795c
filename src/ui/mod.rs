//! User interface module.
//!
//! - `formatter` - Pure formatting functions
//! - This module - Rendering of structured output

use crate::config::Config;
use crate::error::{ReleaseError, Result};

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_outcome, display_status, display_success,
    outcome_message,
};

/// Render the configuration as TOML
pub fn render_config(config: &Config) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| ReleaseError::config(e.to_string()))
}

/// Print the configuration as TOML
pub fn display_config(config: &Config) -> Result<()> {
    print!("{}", render_config(config)?);
    Ok(())
}
