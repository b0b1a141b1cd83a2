//! Processing configuration
//!
//! Everything the hook and the build need to know about the environment is
//! passed in explicitly through [`AnchorConfig`].

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::slug::SlugMode;

/// Build environment name that disables anchor injection
pub const EMAIL_BUILD_ENV: &str = "email";

/// Front matter key a document uses to opt out
pub const DEFAULT_OPT_OUT_KEY: &str = "auto_id";

/// Configuration shared by the pre-render hook, the block tag and the build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Slug mode used for anchor ids
    #[serde(default)]
    pub slug_mode: SlugMode,

    /// Formatting for email: the pre-render hook leaves documents alone
    #[serde(default)]
    pub email_mode: bool,

    /// Front matter key whose `false` value opts a document out
    #[serde(default = "default_opt_out_key")]
    pub opt_out_key: String,

    /// File extensions the build processes (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

fn default_opt_out_key() -> String {
    DEFAULT_OPT_OUT_KEY.to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string(), "html".to_string()]
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            slug_mode: SlugMode::default(),
            email_mode: false,
            opt_out_key: default_opt_out_key(),
            extensions: default_extensions(),
        }
    }
}

impl AnchorConfig {
    pub fn with_slug_mode(mut self, slug_mode: SlugMode) -> Self {
        self.slug_mode = slug_mode;
        self
    }

    /// Derive email mode from the build environment name
    pub fn with_build_env(mut self, build_env: Option<&str>) -> Self {
        self.email_mode = build_env == Some(EMAIL_BUILD_ENV);
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Whether the build should process `path`
    pub fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}
