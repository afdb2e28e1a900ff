// SPDX-License-Identifier: AGPL-3.0-or-later
//! RTF to HTML conversion

use super::{HtmlWriter, RtfReader};
use crate::ast::TextFormat;
use crate::traits::{ConvertConfig, Converter, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static BODY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body>").expect("valid body regex"));

/// Converts stored RTF into the HTML fragment an editor loads
pub struct RtfToHtml;

impl RtfToHtml {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RtfToHtml {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for RtfToHtml {
    fn source(&self) -> TextFormat {
        TextFormat::Rtf
    }

    fn target(&self) -> TextFormat {
        TextFormat::Html
    }

    fn convert(&self, input: &str, config: &ConvertConfig) -> Result<String> {
        if input.trim().is_empty() {
            return Ok(String::new());
        }

        let _span = tracing::debug_span!("rtf_to_html", bytes = input.len()).entered();
        let doc = RtfReader::new().read(input)?;
        tracing::debug!(
            blocks = doc.blocks.len(),
            words = doc.word_count(),
            "parsed rtf document"
        );

        let page = HtmlWriter::new(config).render(&doc);
        Ok(extract_body(&page).trim().to_string())
    }
}

/// Content between `<body>` and `</body>`, or the whole page when there is no body
fn extract_body(page: &str) -> &str {
    match BODY_RE.captures(page).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => page,
    }
}
