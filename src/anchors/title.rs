//! Title span detection
//!
//! A list item's title is the first of:
//! - `**bold**`
//! - `*italic*`
//! - `[label]` directly followed by `(` or `[` (inline or reference link)
//!
//! The line is scanned left to right. At every position the alternatives are
//! tried in the order above and the first one that matches there wins. Each
//! alternative stops at its first closing delimiter, so `**a** and **b**`
//! yields `**a**`.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Which markup produced a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKind {
    Bold,
    Italic,
    LinkLabel,
}

impl TitleKind {
    /// Alternatives in the order they are tried at each position
    pub const PRIORITY: [TitleKind; 3] = [TitleKind::Bold, TitleKind::Italic, TitleKind::LinkLabel];

    /// End offset of the shortest span of this kind starting at `start`
    fn match_at(self, bytes: &[u8], start: usize) -> Option<usize> {
        let rest = &bytes[start..];
        match self {
            TitleKind::Bold => {
                if !rest.starts_with(b"**") {
                    return None;
                }
                find_pair(&rest[2..], b'*', b'*').map(|pos| start + 2 + pos + 2)
            }
            TitleKind::Italic => {
                if rest.first() != Some(&b'*') {
                    return None;
                }
                rest[1..]
                    .iter()
                    .position(|b| *b == b'*')
                    .map(|pos| start + 1 + pos + 1)
            }
            TitleKind::LinkLabel => {
                if rest.first() != Some(&b'[') {
                    return None;
                }
                (1..rest.len().saturating_sub(1))
                    .find(|&i| rest[i] == b']' && matches!(rest[i + 1], b'(' | b'['))
                    .map(|i| start + i + 2)
            }
        }
    }
}

/// Position of the first `first` immediately followed by `second`
fn find_pair(bytes: &[u8], first: u8, second: u8) -> Option<usize> {
    bytes.windows(2).position(|w| w[0] == first && w[1] == second)
}

/// A matched title within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSpan<'a> {
    pub kind: TitleKind,
    /// Byte range within the line, delimiters included
    pub range: Range<usize>,
    /// The matched text, delimiters included
    pub text: &'a str,
}

/// Find the title span of a line, if any
pub fn find_title(line: &str) -> Option<TitleSpan<'_>> {
    let bytes = line.as_bytes();

    for (start, byte) in bytes.iter().enumerate() {
        if *byte != b'*' && *byte != b'[' {
            continue;
        }

        for kind in TitleKind::PRIORITY {
            if let Some(end) = kind.match_at(bytes, start) {
                return Some(TitleSpan {
                    kind,
                    range: start..end,
                    text: &line[start..end],
                });
            }
        }
    }

    None
}
