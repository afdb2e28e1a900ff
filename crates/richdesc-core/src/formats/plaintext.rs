// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML to plain text conversion

use crate::ast::TextFormat;
use crate::entities::decode_entities;
use crate::traits::{ConvertConfig, Converter, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b[^>]*>(.*?)</pre>").expect("valid pre regex"));
static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>").expect("valid blockquote regex")
});
static BLOCK_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|div|h[1-6])\s*>").expect("valid block end regex"));
static ROW_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:li|tr)\s*>").expect("valid row end regex"));
static CELL_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</t[dh]\s*>").expect("valid cell end regex"));
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid br regex"));
static OL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ol\b[^>]*>(.*?)</ol>").expect("valid ol regex"));
static LI_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<li\b[^>]*>").expect("valid li regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static HSPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").expect("valid whitespace regex"));
static BLANK_LINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank line regex"));

/// Renders editor HTML as whitespace-normalized plain text
pub struct HtmlToPlainText;

impl HtmlToPlainText {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlToPlainText {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for HtmlToPlainText {
    fn source(&self) -> TextFormat {
        TextFormat::Html
    }

    fn target(&self) -> TextFormat {
        TextFormat::PlainText
    }

    fn convert(&self, input: &str, _config: &ConvertConfig) -> Result<String> {
        if input.trim().is_empty() {
            return Ok(String::new());
        }

        let text = PRE_RE.replace_all(input, |caps: &Captures| {
            let lines: Vec<String> = caps[1].lines().map(|line| format!("    {}", line)).collect();
            format!("\n\n{}\n\n", lines.join("\n"))
        });
        let text = BLOCKQUOTE_RE.replace_all(&text, |caps: &Captures| {
            let lines: Vec<String> = caps[1]
                .trim()
                .lines()
                .map(|line| format!("> {}", line.trim()))
                .collect();
            format!("\n\n{}\n\n", lines.join("\n"))
        });

        let text = BLOCK_END_RE.replace_all(&text, "\n\n");
        let text = ROW_END_RE.replace_all(&text, "\n");
        let text = CELL_END_RE.replace_all(&text, "\t");
        let text = BR_RE.replace_all(&text, "\n");

        let text = OL_RE.replace_all(&text, |caps: &Captures| {
            let mut counter = 0;
            let items = LI_OPEN_RE.replace_all(&caps[1], |_: &Captures| {
                counter += 1;
                format!("{}. ", counter)
            });
            format!("\n{}\n", items)
        });
        let text = LI_OPEN_RE.replace_all(&text, "• ");

        let text = TAG_RE.replace_all(&text, "");
        let text = decode_entities(&text);

        Ok(normalize_whitespace(&text))
    }
}

/// Collapse horizontal whitespace, trim every line, allow at most one blank
/// line in a row, trim the result
fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HSPACE_RE.replace_all(&text, " ");
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let text = lines.join("\n");
    BLANK_LINES_RE.replace_all(&text, "\n\n").trim().to_string()
}
