pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod image;
pub mod push;
pub mod release;
pub mod ui;

pub use error::{ReleaseError, Result};
