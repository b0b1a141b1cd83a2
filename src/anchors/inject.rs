//! Anchor injection
//!
//! Rewrites titled list items so they carry an id attribute and a jump link:
//!
//! ```text
//! - **Hello World:** some text
//! - {:hello-world .anchor-list} <a href="#hello-world" class="anchor-list-link">●</a> **Hello World:** some text
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::anchors::title::{find_title, TitleKind};
use crate::core::slug::{slugify, SlugMode};

/// A list item line: optional spaces, `- `, then anything
pub static LIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *- ").expect("Invalid LIST_ITEM_RE regex"));

/// Anchor glyph shown inside the jump link
pub const ANCHOR_GLYPH: &str = "●";

/// Class attached to the rewritten list item
pub const LIST_CLASS: &str = "anchor-list";

/// Class attached to the jump link
pub const LINK_CLASS: &str = "anchor-list-link";

/// An anchor added to a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectedAnchor {
    /// Line number (1-indexed)
    pub line: u32,
    pub slug: String,
    pub kind: TitleKind,
}

/// Output of a rewrite pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub anchors: Vec<InjectedAnchor>,
}

impl Rewrite {
    pub fn duplicate_slugs(&self) -> Vec<String> {
        duplicate_slugs(&self.anchors)
    }
}

/// Slugs injected more than once, in order of first repeat
pub fn duplicate_slugs(anchors: &[InjectedAnchor]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for anchor in anchors {
        let count = seen.entry(anchor.slug.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(anchor.slug.clone());
        }
    }

    duplicates
}

/// Build the text that replaces a list marker
pub fn anchor_prefix(slug: &str) -> String {
    format!(
        "- {{:{slug} .{LIST_CLASS}}} <a href=\"#{slug}\" class=\"{LINK_CLASS}\">{ANCHOR_GLYPH}</a>"
    )
}

/// Injects anchors into titled list items
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorInjector {
    slug_mode: SlugMode,
}

impl AnchorInjector {
    pub fn new(slug_mode: SlugMode) -> Self {
        Self { slug_mode }
    }

    pub fn slug_mode(&self) -> SlugMode {
        self.slug_mode
    }

    /// Rewrite a single line (without its terminator)
    ///
    /// Returns `None` when the line is not a list item or has no title. A title
    /// that slugifies to nothing still gets an (empty) anchor.
    pub fn rewrite_line(&self, line: &str) -> Option<(String, String, TitleKind)> {
        if !LIST_ITEM_RE.is_match(line) {
            return None;
        }

        let title = find_title(line)?;
        let cleaned = title.text.replace('"', "");
        let slug = slugify(&cleaned, self.slug_mode);

        // Only spaces precede the marker, so the first '-' is the marker itself
        let marker = line.find('-')?;
        let prefix = anchor_prefix(&slug);

        let mut rewritten = String::with_capacity(line.len() + prefix.len());
        rewritten.push_str(&line[..marker]);
        rewritten.push_str(&prefix);
        rewritten.push_str(&line[marker + 1..]);

        Some((rewritten, slug, title.kind))
    }

    /// Rewrite every titled list item in `content`
    pub fn rewrite(&self, content: &str) -> Rewrite {
        let mut text = String::with_capacity(content.len());
        let mut anchors = Vec::new();

        for (idx, segment) in content.split_inclusive('\n').enumerate() {
            let (line, terminator) = match segment.strip_suffix('\n') {
                Some(line) => (line, "\n"),
                None => (segment, ""),
            };

            match self.rewrite_line(line) {
                Some((rewritten, slug, kind)) => {
                    text.push_str(&rewritten);
                    anchors.push(InjectedAnchor {
                        line: idx as u32 + 1,
                        slug,
                        kind,
                    });
                }
                None => text.push_str(line),
            }
            text.push_str(terminator);
        }

        Rewrite { text, anchors }
    }

    /// Rewrite `content` and return the new text
    pub fn transform(&self, content: &str) -> String {
        self.rewrite(content).text
    }

    /// Rewrite `content` in place, returning the injected anchors
    pub fn transform_in_place(&self, content: &mut String) -> Vec<InjectedAnchor> {
        let rewrite = self.rewrite(content);
        *content = rewrite.text;
        rewrite.anchors
    }
}

/// Inject anchors using the default `latin` slug mode
pub fn auto_anchor(content: &str) -> String {
    AnchorInjector::default().transform(content)
}
