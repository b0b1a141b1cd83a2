//! Unified Result Model
//!
//! Every processed file maps to a ResultItem before rendering output.

use serde::{Deserialize, Serialize};

use crate::anchors::InjectedAnchor;
use crate::hooks::SkipReason;

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Source with front matter (pre-render hook and block tags)
    Document,
    /// Source without front matter (block tags only)
    Fragment,
    Error,
}

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Rewritten,
    Unchanged,
    Skipped,
    Failed,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Output size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Output content hash (XXH3)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the excerpt was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub status: Status,

    /// Anchors injected by the pre-render hook
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anchors: Vec<InjectedAnchor>,

    /// Why the pre-render hook left the document alone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,

    /// Rewritten lines (may be truncated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn new(kind: Kind, path: Option<String>, status: Status) -> Self {
        Self {
            kind,
            path,
            status,
            anchors: Vec::new(),
            skip_reason: None,
            excerpt: None,
            meta: Meta::default(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Create a document result
    pub fn document(path: impl Into<String>, status: Status) -> Self {
        Self::new(Kind::Document, Some(path.into()), status)
    }

    /// Create a fragment result
    pub fn fragment(path: impl Into<String>, status: Status) -> Self {
        Self::new(Kind::Fragment, Some(path.into()), status)
    }

    /// Create an error result
    pub fn error(path: Option<String>, error: ItemError) -> Self {
        let mut item = Self::new(Kind::Error, path, Status::Failed);
        item.errors.push(error);
        item
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<InjectedAnchor>) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_skip_reason(mut self, reason: Option<SkipReason>) -> Self {
        self.skip_reason = reason;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Sort items by path for stable output; items without a path go last
    pub fn sort(&mut self) {
        self.items.sort_by(|a, b| match (&a.path, &b.path) {
            (Some(pa), Some(pb)) => pa.cmp(pb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in a given status
    pub fn count(&self, status: Status) -> usize {
        self.items.iter().filter(|item| item.status == status).count()
    }
}

impl IntoIterator for ResultSet {
    type Item = ResultItem;
    type IntoIter = std::vec::IntoIter<ResultItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
