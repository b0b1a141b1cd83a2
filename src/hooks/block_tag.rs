//! The `auto_anchor` block tag
//!
//! Used on include files that never pass through the pre-render hook:
//!
//! ```text
//! {% auto_anchor %}
//! {% include faq.md %}
//! {% endauto_anchor %}
//! ```
//!
//! Anchors are injected into the raw body first; the result is then rendered
//! as ordinary template source.

use super::engine::{BlockTag, TemplateEngine, TemplateError};
use crate::anchors::AnchorInjector;

/// Name the tag is registered under
pub const AUTO_ANCHOR_TAG: &str = "auto_anchor";

/// Block tag that injects list anchors into its body
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAnchorTag {
    injector: AnchorInjector,
}

impl AutoAnchorTag {
    pub fn new(injector: AnchorInjector) -> Self {
        Self { injector }
    }
}

impl BlockTag for AutoAnchorTag {
    fn name(&self) -> &str {
        AUTO_ANCHOR_TAG
    }

    fn render(&self, body: &str, engine: &dyn TemplateEngine) -> Result<String, TemplateError> {
        let text = self.injector.transform(body);
        engine.render(&text)
    }
}
