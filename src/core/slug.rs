//! Slug generation
//!
//! Turns free text into URL-safe identifiers using the same modes as the
//! slug filter of the host site generator:
//! - `none`: lowercase only
//! - `raw`: whitespace runs become `-`
//! - `default`: anything that is not a letter, mark or decimal digit becomes `-`
//! - `pretty`: like `default` but keeps `._~!$&'()+,;=@`
//! - `ascii`: anything outside `[A-Za-z0-9]` becomes `-`
//! - `latin`: folds Latin diacritics to ASCII, then behaves like `default`

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static RAW_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid RAW_RE regex"));

static DEFAULT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{M}\p{L}\p{Nd}]+").expect("Invalid DEFAULT_RE regex"));

static PRETTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{M}\p{L}\p{Nd}._~!$&'()+,;=@]+").expect("Invalid PRETTY_RE regex")
});

static ASCII_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("Invalid ASCII_RE regex"));

/// Errors raised while configuring slug generation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("unknown slug mode '{0}' (expected one of: none, raw, default, pretty, ascii, latin)")]
    UnknownMode(String),
}

/// Slug generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    None,
    Raw,
    #[serde(rename = "default")]
    Standard,
    Pretty,
    Ascii,
    #[default]
    Latin,
}

impl SlugMode {
    pub const ALL: [SlugMode; 6] = [
        SlugMode::None,
        SlugMode::Raw,
        SlugMode::Standard,
        SlugMode::Pretty,
        SlugMode::Ascii,
        SlugMode::Latin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlugMode::None => "none",
            SlugMode::Raw => "raw",
            SlugMode::Standard => "default",
            SlugMode::Pretty => "pretty",
            SlugMode::Ascii => "ascii",
            SlugMode::Latin => "latin",
        }
    }
}

impl fmt::Display for SlugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlugMode {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SlugMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| SlugError::UnknownMode(s.to_string()))
    }
}

/// Convert `input` into a slug using `mode`
///
/// Runs of replaceable characters collapse into a single `-`, one leading
/// and one trailing `-` are trimmed, and the result is lowercased.
pub fn slugify(input: &str, mode: SlugMode) -> String {
    let replaced: Cow<'_, str> = match mode {
        SlugMode::None => return input.to_lowercase(),
        SlugMode::Raw => RAW_RE.replace_all(input, "-"),
        SlugMode::Standard => DEFAULT_RE.replace_all(input, "-"),
        SlugMode::Pretty => PRETTY_RE.replace_all(input, "-"),
        SlugMode::Ascii => ASCII_RE.replace_all(input, "-"),
        SlugMode::Latin => {
            let folded = transliterate_latin(input);
            Cow::Owned(DEFAULT_RE.replace_all(&folded, "-").into_owned())
        }
    };

    let replaced: &str = &replaced;
    let trimmed = replaced.strip_prefix('-').unwrap_or(replaced);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);
    let slug = trimmed.to_lowercase();

    if slug.is_empty() {
        log::warn!("Empty slug generated for '{}'", input);
    }

    slug
}

/// Fold Latin letters with diacritics to their ASCII base letters.
///
/// Characters with no ASCII rendering become `?`.
pub fn transliterate_latin(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        if is_combining_mark(ch) {
            continue;
        }
        if let Some(folded) = fold_special(ch) {
            out.push_str(folded);
            continue;
        }

        let base: String = ch.nfd().filter(|c| !is_combining_mark(*c)).collect();
        if !base.is_empty() && base.is_ascii() {
            out.push_str(&base);
        } else {
            out.push('?');
        }
    }

    out
}

/// Latin letters that have no canonical decomposition
fn fold_special(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'ß' => "ss",
        'Æ' => "AE",
        'æ' => "ae",
        'Ø' => "O",
        'ø' => "o",
        'Œ' => "OE",
        'œ' => "oe",
        'Þ' => "Th",
        'þ' => "th",
        'Ð' | 'Đ' => "D",
        'ð' | 'đ' => "d",
        'Ħ' => "H",
        'ħ' => "h",
        'ı' => "i",
        'Ŀ' | 'Ł' => "L",
        'ŀ' | 'ł' => "l",
        'Ŋ' => "NG",
        'ŋ' => "ng",
        'ĸ' => "k",
        'Ŧ' => "T",
        'ŧ' => "t",
        '×' => "x",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin_basic() {
        assert_eq!(slugify("Hello World:", SlugMode::Latin), "hello-world");
        assert_eq!(slugify("**Hello World:**", SlugMode::Latin), "hello-world");
    }

    #[test]
    fn test_latin_folds_diacritics() {
        assert_eq!(slugify("Crème Brûlée", SlugMode::Latin), "creme-brulee");
        assert_eq!(slugify("Straße", SlugMode::Latin), "strasse");
        assert_eq!(slugify("Ærø Łódź", SlugMode::Latin), "aero-lodz");
    }

    #[test]
    fn test_latin_drops_non_latin_scripts() {
        assert_eq!(slugify("日本語", SlugMode::Latin), "");
        assert_eq!(slugify("Tokyo 東京 guide", SlugMode::Latin), "tokyo-guide");
    }

    #[test]
    fn test_latin_decomposed_input() {
        assert_eq!(slugify("Cafe\u{301}", SlugMode::Latin), "cafe");
    }

    #[test]
    fn test_default_keeps_unicode_letters() {
        assert_eq!(slugify("Crème Brûlée", SlugMode::Standard), "crème-brûlée");
        assert_eq!(slugify("日本語 テスト", SlugMode::Standard), "日本語-テスト");
    }

    #[test]
    fn test_pretty_keeps_punctuation() {
        assert_eq!(slugify("Hello, World!", SlugMode::Pretty), "hello,-world!");
        assert_eq!(slugify("v1.2 notes", SlugMode::Pretty), "v1.2-notes");
    }

    #[test]
    fn test_ascii_mode() {
        assert_eq!(slugify("Crème", SlugMode::Ascii), "cr-me");
        assert_eq!(slugify("__init__ Method", SlugMode::Ascii), "init-method");
    }

    #[test]
    fn test_raw_mode() {
        assert_eq!(slugify("Hello   World!", SlugMode::Raw), "hello-world!");
    }

    #[test]
    fn test_none_mode() {
        assert_eq!(slugify("Hello World", SlugMode::None), "hello world");
    }

    #[test]
    fn test_trims_single_separator_each_side() {
        assert_eq!(slugify("  spaced out  ", SlugMode::Latin), "spaced-out");
        assert_eq!(slugify("-", SlugMode::Latin), "");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("latin".parse::<SlugMode>().unwrap(), SlugMode::Latin);
        assert_eq!("DEFAULT".parse::<SlugMode>().unwrap(), SlugMode::Standard);
        assert_eq!("ascii".parse::<SlugMode>().unwrap(), SlugMode::Ascii);
    }

    #[test]
    fn test_mode_parse_invalid() {
        let err = "cyrillic".parse::<SlugMode>().unwrap_err();
        assert_eq!(err, SlugError::UnknownMode("cyrillic".to_string()));
        assert!(err.to_string().contains("unknown slug mode"));
    }

    #[test]
    fn test_mode_display_roundtrips_names() {
        for mode in SlugMode::ALL {
            assert_eq!(mode.to_string().parse::<SlugMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_default_mode_is_latin() {
        assert_eq!(SlugMode::default(), SlugMode::Latin);
    }
}
