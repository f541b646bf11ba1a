//! # Sparkle Common Library
//!
//! Shared code for the Sparkle player tools including:
//! - Error type
//! - Configuration loading and root folder resolution
//! - On-disk directory layout
//! - Time and file size formatting
//! - Song identifiers

pub mod config;
pub mod error;
pub mod file_size;
pub mod human_time;
pub mod paths;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use paths::AppPaths;
