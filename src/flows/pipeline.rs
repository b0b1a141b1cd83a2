//! Per-file pipeline
//!
//! Mirrors what the host renderer does with each source file:
//! 1. split off front matter
//! 2. run pre-render hooks (documents only)
//! 3. expand registered block tags
//! 4. reassemble front matter and content

use crate::anchors::{AnchorInjector, InjectedAnchor};
use crate::core::config::AnchorConfig;
use crate::core::document::Document;
use crate::core::model::{Kind, Status};
use crate::hooks::{
    AutoAnchorHook, AutoAnchorTag, BlockTagEngine, HookError, HookOutcome, PreRenderHook,
    SkipReason, TemplateEngine,
};

/// Result of processing one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub kind: Kind,
    pub status: Status,
    pub output: String,
    /// Anchors injected by pre-render hooks, numbered from the first content line
    pub anchors: Vec<InjectedAnchor>,
    /// Lines before the content (the front matter block)
    pub line_offset: usize,
    pub skip_reason: Option<SkipReason>,
}

/// Hooks and block tags applied to every source
pub struct Pipeline {
    hooks: Vec<Box<dyn PreRenderHook>>,
    engine: BlockTagEngine,
}

impl Pipeline {
    /// Pipeline with no hooks or tags
    pub fn empty() -> Self {
        Self {
            hooks: Vec::new(),
            engine: BlockTagEngine::new(),
        }
    }

    /// Pipeline with the anchor hook and the `auto_anchor` block tag
    pub fn new(config: &AnchorConfig) -> Self {
        Self::empty()
            .with_hook(AutoAnchorHook::new(config))
            .with_engine(
                BlockTagEngine::new()
                    .with_tag(AutoAnchorTag::new(AnchorInjector::new(config.slug_mode))),
            )
    }

    pub fn with_hook(mut self, hook: impl PreRenderHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    pub fn with_engine(mut self, engine: BlockTagEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Process a single source file
    pub fn process(&self, source: &str, path: Option<&str>) -> Result<Processed, HookError> {
        let mut doc = Document::parse(source, path)?;
        let kind = if doc.has_front_matter() {
            Kind::Document
        } else {
            Kind::Fragment
        };

        let mut anchors = Vec::new();
        let mut skip_reason = None;

        if kind == Kind::Document {
            for hook in &self.hooks {
                match hook.pre_render(&mut doc)? {
                    HookOutcome::Rewritten(found) => anchors.extend(found),
                    HookOutcome::Skipped(reason) => {
                        log::debug!("Hook {} skipped ({})", hook.name(), reason);
                        skip_reason.get_or_insert(reason);
                    }
                }
            }
        }

        doc.content = self.engine.render(&doc.content)?;
        let output = doc.to_source();

        let status = if output != source {
            Status::Rewritten
        } else if skip_reason.is_some() {
            Status::Skipped
        } else {
            Status::Unchanged
        };

        Ok(Processed {
            kind,
            status,
            output,
            anchors,
            line_offset: doc.front_matter_lines(),
            skip_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::anchor_prefix;

    #[test]
    fn test_document_gets_hook_and_tags() {
        let pipeline = Pipeline::new(&AnchorConfig::default());
        let source = "---\ntitle: Guide\n---\n- **Setup** first\n";

        let processed = pipeline.process(source, Some("guide.md")).unwrap();

        assert_eq!(processed.kind, Kind::Document);
        assert_eq!(processed.status, Status::Rewritten);
        assert_eq!(processed.anchors.len(), 1);
        assert_eq!(processed.line_offset, 3);
        assert_eq!(
            processed.output,
            format!("---\ntitle: Guide\n---\n{} **Setup** first\n", anchor_prefix("setup"))
        );
    }

    #[test]
    fn test_fragment_only_gets_tags() {
        let pipeline = Pipeline::new(&AnchorConfig::default());
        let source = "- **Loose** item\n{% auto_anchor %}\n- **Tagged** item\n{% endauto_anchor %}\n";

        let processed = pipeline.process(source, Some("_includes/list.md")).unwrap();

        assert_eq!(processed.kind, Kind::Fragment);
        assert!(processed.anchors.is_empty());
        assert!(processed.output.starts_with("- **Loose** item\n"));
        assert!(processed.output.contains(&anchor_prefix("tagged")));
        assert!(!processed.output.contains("auto_anchor %}"));
    }

    #[test]
    fn test_opted_out_document_unchanged() {
        let pipeline = Pipeline::new(&AnchorConfig::default());
        let source = "---\nauto_id: false\n---\n- **Setup** first\n";

        let processed = pipeline.process(source, None).unwrap();

        assert_eq!(processed.status, Status::Skipped);
        assert_eq!(processed.skip_reason, Some(SkipReason::OptedOut));
        assert_eq!(processed.output, source);
    }

    #[test]
    fn test_opted_out_document_still_expands_tags() {
        let pipeline = Pipeline::new(&AnchorConfig::default());
        let source = "---\nauto_id: false\n---\n{% auto_anchor %}\n- **A** x\n{% endauto_anchor %}";

        let processed = pipeline.process(source, None).unwrap();

        assert_eq!(processed.status, Status::Rewritten);
        assert_eq!(processed.skip_reason, Some(SkipReason::OptedOut));
        assert!(processed.output.contains(&anchor_prefix("a")));
    }

    #[test]
    fn test_email_mode() {
        let config = AnchorConfig::default().with_build_env(Some("email"));
        let processed = Pipeline::new(&config)
            .process("---\n---\n- **A** x\n", None)
            .unwrap();
        assert_eq!(processed.skip_reason, Some(SkipReason::EmailMode));
        assert_eq!(processed.status, Status::Skipped);
    }

    #[test]
    fn test_unchanged() {
        let processed = Pipeline::new(&AnchorConfig::default())
            .process("---\n---\nplain\n", None)
            .unwrap();
        assert_eq!(processed.status, Status::Unchanged);
    }

    #[test]
    fn test_errors_propagate() {
        let pipeline = Pipeline::new(&AnchorConfig::default());

        let err = pipeline
            .process("---\na: [\n---\n", Some("bad.md"))
            .unwrap_err();
        assert!(matches!(err, HookError::Document(_)));

        let err = pipeline.process("{% auto_anchor %}", None).unwrap_err();
        assert!(matches!(err, HookError::Template(_)));
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let source = "---\n---\n- **A** {% auto_anchor %}";
        let processed = Pipeline::empty().process(source, None).unwrap();
        assert_eq!(processed.output, source);
        assert_eq!(processed.status, Status::Unchanged);
    }
}
