//! Pre-render hook
//!
//! Injects anchors into a document's content unless the document opts out
//! (`auto_id: false` in its front matter) or the build formats for email.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;

use super::HookError;
use crate::anchors::{AnchorInjector, InjectedAnchor};
use crate::core::config::AnchorConfig;
use crate::core::document::Document;

/// Why a document was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Front matter set the opt-out key to `false`
    OptedOut,
    /// The build formats for email
    EmailMode,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::OptedOut => f.write_str("opted out"),
            SkipReason::EmailMode => f.write_str("email mode"),
        }
    }
}

/// Result of running a pre-render hook on one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    Rewritten(Vec<InjectedAnchor>),
    Skipped(SkipReason),
}

/// A hook the host calls once per document before rendering templates
pub trait PreRenderHook: Send + Sync {
    fn name(&self) -> &str;

    fn pre_render(&self, doc: &mut Document) -> Result<HookOutcome, HookError>;
}

/// Pre-render hook that injects list anchors
#[derive(Debug, Clone)]
pub struct AutoAnchorHook {
    injector: AnchorInjector,
    email_mode: bool,
    opt_out_key: String,
}

impl AutoAnchorHook {
    pub fn new(config: &AnchorConfig) -> Self {
        Self {
            injector: AnchorInjector::new(config.slug_mode),
            email_mode: config.email_mode,
            opt_out_key: config.opt_out_key.clone(),
        }
    }

    /// Why `doc` should be skipped, if it should
    ///
    /// Only a boolean `false` opts out; the string `"false"` does not.
    pub fn skip_reason(&self, doc: &Document) -> Option<SkipReason> {
        if doc.data(&self.opt_out_key) == Some(&Value::Bool(false)) {
            return Some(SkipReason::OptedOut);
        }
        if self.email_mode {
            return Some(SkipReason::EmailMode);
        }
        None
    }
}

impl PreRenderHook for AutoAnchorHook {
    fn name(&self) -> &str {
        "auto_anchor"
    }

    fn pre_render(&self, doc: &mut Document) -> Result<HookOutcome, HookError> {
        if let Some(reason) = self.skip_reason(doc) {
            log::debug!(
                "Skipping {} ({})",
                doc.path.as_deref().unwrap_or("<input>"),
                reason
            );
            return Ok(HookOutcome::Skipped(reason));
        }

        let anchors = self.injector.transform_in_place(&mut doc.content);
        log::debug!(
            "Injected {} anchor(s) into {}",
            anchors.len(),
            doc.path.as_deref().unwrap_or("<input>")
        );
        Ok(HookOutcome::Rewritten(anchors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str) -> Document {
        Document::parse(source, Some("test.md")).unwrap()
    }

    #[test]
    fn test_rewrites_document() {
        let hook = AutoAnchorHook::new(&AnchorConfig::default());
        let mut d = doc("---\ntitle: T\n---\n- **Hello World:** some text\n");

        let outcome = hook.pre_render(&mut d).unwrap();

        match outcome {
            HookOutcome::Rewritten(anchors) => assert_eq!(anchors[0].slug, "hello-world"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(d.content.starts_with("- {:hello-world .anchor-list}"));
        assert!(d.to_source().starts_with("---\ntitle: T\n---\n"));
    }

    #[test]
    fn test_auto_id_false_leaves_content_alone() {
        let hook = AutoAnchorHook::new(&AnchorConfig::default());
        let source = "---\nauto_id: false\n---\n- **Hello** x\n";
        let mut d = doc(source);

        let outcome = hook.pre_render(&mut d).unwrap();

        assert_eq!(outcome, HookOutcome::Skipped(SkipReason::OptedOut));
        assert_eq!(d.to_source(), source);
    }

    #[test]
    fn test_auto_id_string_false_does_not_opt_out() {
        let hook = AutoAnchorHook::new(&AnchorConfig::default());
        let mut d = doc("---\nauto_id: \"false\"\n---\n- **Hello** x\n");

        assert!(matches!(
            hook.pre_render(&mut d).unwrap(),
            HookOutcome::Rewritten(_)
        ));
    }

    #[test]
    fn test_auto_id_true_processes() {
        let hook = AutoAnchorHook::new(&AnchorConfig::default());
        let mut d = doc("---\nauto_id: true\n---\n- **Hello** x\n");
        assert!(hook.skip_reason(&d).is_none());
        hook.pre_render(&mut d).unwrap();
        assert!(d.content.contains("#hello"));
    }

    #[test]
    fn test_email_mode_skips() {
        let config = AnchorConfig::default().with_build_env(Some("email"));
        let hook = AutoAnchorHook::new(&config);
        let mut d = doc("- **Hello** x\n");

        assert_eq!(
            hook.pre_render(&mut d).unwrap(),
            HookOutcome::Skipped(SkipReason::EmailMode)
        );
        assert_eq!(d.content, "- **Hello** x\n");
    }

    #[test]
    fn test_custom_opt_out_key() {
        let config = AnchorConfig {
            opt_out_key: "anchors".to_string(),
            ..Default::default()
        };
        let hook = AutoAnchorHook::new(&config);

        let d = doc("---\nanchors: false\n---\n- **A** x\n");
        assert_eq!(hook.skip_reason(&d), Some(SkipReason::OptedOut));

        let d = doc("---\nauto_id: false\n---\n- **A** x\n");
        assert_eq!(hook.skip_reason(&d), None);
    }
}
