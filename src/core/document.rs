//! Source documents with optional YAML front matter
//!
//! ```text
//! ---
//! title: Guide
//! auto_id: false
//! ---
//! body...
//! ```
//!
//! The raw front matter block is kept verbatim so writing a document back
//! never reformats it.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while reading a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid front matter in {path}: {source}")]
    FrontMatter {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("front matter in {path} is not a mapping")]
    NotAMapping { path: String },
}

/// A source file split into front matter and content
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Path relative to the site root, when known
    pub path: Option<String>,

    /// Parsed front matter (empty when absent)
    pub front_matter: Mapping,

    /// Body after the front matter
    pub content: String,

    raw_front_matter: Option<String>,
}

impl Document {
    /// Parse a source file
    pub fn parse(source: &str, path: Option<&str>) -> Result<Self, DocumentError> {
        let display_path = || path.unwrap_or("<input>").to_string();

        let Some((raw, yaml, body)) = split_front_matter(source) else {
            return Ok(Self {
                path: path.map(str::to_string),
                front_matter: Mapping::new(),
                content: source.to_string(),
                raw_front_matter: None,
            });
        };

        let value: Value = serde_yaml::from_str(yaml).map_err(|source| {
            DocumentError::FrontMatter {
                path: display_path(),
                source,
            }
        })?;

        let front_matter = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => Mapping::new(),
            _ => {
                return Err(DocumentError::NotAMapping {
                    path: display_path(),
                })
            }
        };

        Ok(Self {
            path: path.map(str::to_string),
            front_matter,
            content: body.to_string(),
            raw_front_matter: Some(raw.to_string()),
        })
    }

    /// Whether the source had a front matter block
    pub fn has_front_matter(&self) -> bool {
        self.raw_front_matter.is_some()
    }

    /// Number of source lines taken by the front matter block
    pub fn front_matter_lines(&self) -> usize {
        self.raw_front_matter
            .as_deref()
            .map(|raw| raw.matches('\n').count())
            .unwrap_or(0)
    }

    /// Look up a front matter value
    pub fn data(&self, key: &str) -> Option<&Value> {
        self.front_matter.get(key)
    }

    /// Reassemble front matter and content
    pub fn to_source(&self) -> String {
        match &self.raw_front_matter {
            Some(raw) => format!("{}{}", raw, self.content),
            None => self.content.clone(),
        }
    }
}

/// Split `source` into (raw block, yaml, body)
fn split_front_matter(source: &str) -> Option<(&str, &str, &str)> {
    let first_end = source.find('\n')?;
    if source[..first_end].trim_end() != "---" {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;

    for segment in source[yaml_start..].split_inclusive('\n') {
        let trimmed = segment.trim_end();
        if trimmed == "---" || trimmed == "..." {
            let end = offset + segment.len();
            return Some((&source[..end], &source[yaml_start..offset], &source[end..]));
        }
        offset += segment.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_front_matter() {
        let source = "---\ntitle: Guide\nauto_id: false\n---\n- **Item** body\n";
        let doc = Document::parse(source, Some("guide.md")).unwrap();

        assert!(doc.has_front_matter());
        assert_eq!(doc.data("title"), Some(&Value::String("Guide".into())));
        assert_eq!(doc.data("auto_id"), Some(&Value::Bool(false)));
        assert_eq!(doc.content, "- **Item** body\n");
        assert_eq!(doc.front_matter_lines(), 4);
        assert_eq!(doc.to_source(), source);
    }

    #[test]
    fn test_parse_without_front_matter() {
        let source = "- **Item** body\n";
        let doc = Document::parse(source, None).unwrap();

        assert!(!doc.has_front_matter());
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.front_matter_lines(), 0);
        assert_eq!(doc.content, source);
        assert_eq!(doc.to_source(), source);
    }

    #[test]
    fn test_empty_front_matter() {
        let doc = Document::parse("---\n---\nbody", None).unwrap();
        assert!(doc.has_front_matter());
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.content, "body");
    }

    #[test]
    fn test_dots_close_front_matter() {
        let doc = Document::parse("---\na: 1\n...\nbody\n", None).unwrap();
        assert_eq!(doc.content, "body\n");
    }

    #[test]
    fn test_unclosed_front_matter_is_content() {
        let source = "---\na: 1\nno closing line\n";
        let doc = Document::parse(source, None).unwrap();
        assert!(!doc.has_front_matter());
        assert_eq!(doc.content, source);
    }

    #[test]
    fn test_crlf_front_matter() {
        let source = "---\r\ntitle: x\r\n---\r\nbody\r\n";
        let doc = Document::parse(source, None).unwrap();
        assert!(doc.has_front_matter());
        assert_eq!(doc.content, "body\r\n");
        assert_eq!(doc.to_source(), source);
    }

    #[test]
    fn test_raw_front_matter_kept_verbatim() {
        let source = "---\n# comment\ntitle:   'spaced'\n---\nbody";
        let doc = Document::parse(source, None).unwrap();
        assert_eq!(doc.to_source(), source);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Document::parse("---\ntitle: [unclosed\n---\n", Some("bad.md")).unwrap_err();
        assert!(matches!(err, DocumentError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));
    }

    #[test]
    fn test_scalar_front_matter_rejected() {
        let err = Document::parse("---\njust a string\n---\n", None).unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping { .. }));
    }

    #[test]
    fn test_horizontal_rule_later_is_not_front_matter() {
        let source = "intro\n---\nmore\n";
        let doc = Document::parse(source, None).unwrap();
        assert!(!doc.has_front_matter());
    }
}
