//! Core module - Fundamental data structures and utilities
//!
//! This module provides:
//! - Slug generation (slug modes, Latin transliteration)
//! - Source documents with front matter
//! - Processing configuration
//! - Unified result model and renderers
//! - Path normalization and common utilities

pub mod config;
pub mod document;
pub mod model;
pub mod paths;
pub mod render;
pub mod slug;
pub mod util;
