//! Expose the marksmith CLI and configuration types for the xtask and for
//! integration tests. The rendering API lives in `marksmith_render`.
pub mod cli;
pub mod config;
pub mod error;
