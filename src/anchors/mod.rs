//! Anchors module - Inject slug anchors into titled list items
//!
//! A titled list item is a Markdown list line whose first bold, italic or
//! link-label span names it. The item gets an id attribute and a jump link:
//! `- {:slug .anchor-list} <a href="#slug" class="anchor-list-link">●</a> ...`

pub mod inject;
pub mod title;

pub use inject::{
    anchor_prefix, auto_anchor, duplicate_slugs, AnchorInjector, InjectedAnchor, Rewrite,
};
pub use title::{find_title, TitleKind, TitleSpan};
