//! Hooks module - Plug-in seams for a host renderer
//!
//! The host wires the anchor transform into two lifecycle points:
//! - [`PreRenderHook`]: runs on whole-document content before templates expand
//! - [`BlockTag`]: runs on the body of a `{% auto_anchor %}...{% endauto_anchor %}`
//!   block, whose output is rendered again as template source

pub mod block_tag;
pub mod engine;
pub mod pre_render;

use thiserror::Error;

use crate::core::document::DocumentError;

pub use block_tag::AutoAnchorTag;
pub use engine::{BlockTag, BlockTagEngine, TemplateEngine, TemplateError};
pub use pre_render::{AutoAnchorHook, HookOutcome, PreRenderHook, SkipReason};

/// Errors surfaced to the host while running hooks and tags
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}
