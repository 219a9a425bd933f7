//! Vidcarve - extract embedded MP4 videos from game asset archives
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod extract;
pub mod input;
pub mod output;
