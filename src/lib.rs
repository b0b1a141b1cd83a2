//! autoanchor - Inject slug anchors into titled Markdown list items
//!
//! autoanchor provides:
//! - The anchor transform ([`auto_anchor`], [`AnchorInjector`])
//! - Jekyll-compatible slug modes ([`slugify`], [`SlugMode`])
//! - A pre-render hook and an `auto_anchor` block tag for host renderers
//! - A site build pipeline with a unified output format (jsonl/json/md/raw)

pub mod anchors;
pub mod cli;
pub mod core;
pub mod flows;
pub mod hooks;

pub use crate::anchors::{auto_anchor, AnchorInjector, InjectedAnchor, TitleKind};
pub use crate::core::config::AnchorConfig;
pub use crate::core::document::Document;
pub use crate::core::slug::{slugify, SlugMode};
pub use crate::flows::pipeline::{Pipeline, Processed};
pub use crate::hooks::{AutoAnchorHook, AutoAnchorTag, BlockTagEngine, PreRenderHook};
