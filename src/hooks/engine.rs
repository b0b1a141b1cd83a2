//! Block tag expansion
//!
//! [`BlockTagEngine`] is a minimal template engine that understands only the
//! block tags registered with it:
//!
//! ```text
//! {% auto_anchor %}
//! - **Install:** run the installer
//! {% endauto_anchor %}
//! ```
//!
//! Everything else, including other template syntax, passes through verbatim.
//! Whitespace-control dashes (`{%- ... -%}`) are accepted but do not trim.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::util::line_of_offset;

/// Static regex for block tag markers: `{% name args %}` or `{% endname %}`
pub static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{%-?\s*(end)?([A-Za-z_][A-Za-z0-9_]*)(?:\s+[^%]*?)?\s*-?%\}")
        .expect("Invalid TAG_RE regex")
});

/// Errors raised while expanding block tags
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("block '{name}' opened on line {line} is never closed")]
    UnclosedBlock { name: String, line: usize },

    #[error("unexpected 'end{name}' on line {line}")]
    UnexpectedEnd { name: String, line: usize },
}

/// Renders template source
pub trait TemplateEngine {
    fn render(&self, source: &str) -> Result<String, TemplateError>;
}

/// A block-style tag: `{% name %}body{% endname %}`
pub trait BlockTag: Send + Sync {
    fn name(&self) -> &str;

    /// Render the raw `body`; `engine` renders nested template source
    fn render(&self, body: &str, engine: &dyn TemplateEngine) -> Result<String, TemplateError>;
}

/// A tag marker found in the source
#[derive(Debug)]
struct Marker<'a> {
    name: &'a str,
    is_end: bool,
    start: usize,
    end: usize,
}

/// An opened block awaiting its end marker
#[derive(Debug)]
struct OpenBlock<'a> {
    name: &'a str,
    start: usize,
    body_start: usize,
}

/// Template engine that expands registered block tags only
#[derive(Default)]
pub struct BlockTagEngine {
    tags: HashMap<String, Box<dyn BlockTag>>,
}

impl BlockTagEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block tag, replacing any tag with the same name
    pub fn register(&mut self, tag: impl BlockTag + 'static) {
        self.tags.insert(tag.name().to_string(), Box::new(tag));
    }

    pub fn with_tag(mut self, tag: impl BlockTag + 'static) -> Self {
        self.register(tag);
        self
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    fn markers<'a>(&self, source: &'a str) -> Vec<Marker<'a>> {
        TAG_RE
            .captures_iter(source)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(2)?.as_str();
                if !self.has_tag(name) {
                    return None;
                }
                Some(Marker {
                    name,
                    is_end: caps.get(1).is_some(),
                    start: whole.start(),
                    end: whole.end(),
                })
            })
            .collect()
    }
}

impl TemplateEngine for BlockTagEngine {
    fn render(&self, source: &str) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(source.len());
        let mut open: Vec<OpenBlock<'_>> = Vec::new();
        let mut cursor = 0;

        for marker in self.markers(source) {
            if !marker.is_end {
                if open.is_empty() {
                    output.push_str(&source[cursor..marker.start]);
                }
                open.push(OpenBlock {
                    name: marker.name,
                    start: marker.start,
                    body_start: marker.end,
                });
                continue;
            }

            let block = match open.pop() {
                Some(block) if block.name == marker.name => block,
                _ => {
                    return Err(TemplateError::UnexpectedEnd {
                        name: marker.name.to_string(),
                        line: line_of_offset(source, marker.start),
                    })
                }
            };

            // Inner blocks stay in the body; the tag renders them through the engine
            if open.is_empty() {
                let body = &source[block.body_start..marker.start];
                if let Some(tag) = self.tags.get(block.name) {
                    output.push_str(&tag.render(body, self)?);
                }
                cursor = marker.end;
            }
        }

        if let Some(block) = open.first() {
            return Err(TemplateError::UnclosedBlock {
                name: block.name.to_string(),
                line: line_of_offset(source, block.start),
            });
        }

        output.push_str(&source[cursor..]);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wraps its body in brackets after rendering it
    struct Bracket;

    impl BlockTag for Bracket {
        fn name(&self) -> &str {
            "bracket"
        }

        fn render(&self, body: &str, engine: &dyn TemplateEngine) -> Result<String, TemplateError> {
            Ok(format!("[{}]", engine.render(body)?))
        }
    }

    /// Upper-cases its raw body without re-rendering
    struct Shout;

    impl BlockTag for Shout {
        fn name(&self) -> &str {
            "shout"
        }

        fn render(&self, body: &str, _engine: &dyn TemplateEngine) -> Result<String, TemplateError> {
            Ok(body.to_uppercase())
        }
    }

    fn engine() -> BlockTagEngine {
        BlockTagEngine::new().with_tag(Bracket).with_tag(Shout)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let source = "no tags {{ var }} {% if x %}y{% endif %}";
        assert_eq!(engine().render(source).unwrap(), source);
    }

    #[test]
    fn test_expands_block() {
        assert_eq!(
            engine().render("a {% bracket %}b{% endbracket %} c").unwrap(),
            "a [b] c"
        );
    }

    #[test]
    fn test_nested_same_name() {
        assert_eq!(
            engine()
                .render("{% bracket %}x{% bracket %}y{% endbracket %}z{% endbracket %}")
                .unwrap(),
            "[x[y]z]"
        );
    }

    #[test]
    fn test_nested_different_tags() {
        assert_eq!(
            engine()
                .render("{% bracket %}a{% shout %}b{% endshout %}{% endbracket %}")
                .unwrap(),
            "[aB]"
        );
    }

    #[test]
    fn test_raw_body_reaches_tag() {
        assert_eq!(
            engine()
                .render("{% shout %}x{% bracket %}y{% endbracket %}{% endshout %}")
                .unwrap(),
            "X{% BRACKET %}Y{% ENDBRACKET %}"
        );
    }

    #[test]
    fn test_whitespace_control_and_arguments() {
        assert_eq!(
            engine().render("{%- bracket arg=1 -%}b{%- endbracket -%}").unwrap(),
            "[b]"
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(engine().render("{% shout %}{% endshout %}").unwrap(), "");
    }

    #[test]
    fn test_multiple_blocks() {
        assert_eq!(
            engine()
                .render("{% shout %}a{% endshout %}-{% shout %}b{% endshout %}")
                .unwrap(),
            "A-B"
        );
    }

    #[test]
    fn test_unclosed_block() {
        let err = engine().render("line\n{% bracket %}\nbody").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnclosedBlock {
                name: "bracket".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn test_unexpected_end() {
        let err = engine().render("text {% endbracket %}").unwrap_err();
        assert!(matches!(err, TemplateError::UnexpectedEnd { .. }));
        assert!(err.to_string().contains("endbracket"));
    }

    #[test]
    fn test_mismatched_end() {
        let err = engine()
            .render("{% bracket %}{% shout %}{% endbracket %}{% endshout %}")
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnexpectedEnd {
                name: "bracket".to_string(),
                line: 1
            }
        );
    }

    #[test]
    fn test_unregistered_tags_ignored() {
        let source = "{% raw %}{% bracket %}{% endraw %}";
        let err = engine().render(source).unwrap_err();
        assert!(matches!(err, TemplateError::UnclosedBlock { .. }));

        let plain = BlockTagEngine::new();
        assert_eq!(plain.render(source).unwrap(), source);
    }
}
