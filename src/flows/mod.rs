//! Flows module - Operations that combine hooks, tags and the file system
//!
//! Provides:
//! - pipeline: Per-file processing (front matter, pre-render hooks, block tags)
//! - build: Run the pipeline over a site tree and report a ResultSet

pub mod build;
pub mod pipeline;
