// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lenient conversion entry points
//!
//! These functions never fail. Blank input (`None`, empty or whitespace
//! only) yields an empty string; a conversion error yields its descriptor,
//! `"<Kind>: <message>"`, in place of the converted text.

use crate::formats::{HtmlToPlainText, HtmlToRtf, RtfToHtml};
use crate::traits::{ConvertConfig, Converter};
use serde::{Deserialize, Serialize};

fn lenient(converter: &dyn Converter, input: Option<&str>, config: &ConvertConfig) -> String {
    let input = match input {
        Some(s) if !s.trim().is_empty() => s,
        _ => return String::new(),
    };

    match converter.convert(input, config) {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(
                from = %converter.source(),
                to = %converter.target(),
                error = %e,
                "conversion failed"
            );
            e.describe()
        }
    }
}

/// RTF to the HTML body fragment, with the default configuration
pub fn rtf_to_html(rtf: Option<&str>) -> String {
    rtf_to_html_with(rtf, &ConvertConfig::default())
}

pub fn rtf_to_html_with(rtf: Option<&str>, config: &ConvertConfig) -> String {
    lenient(&RtfToHtml::new(), rtf, config)
}

/// HTML fragment to a complete RTF document, with the default configuration
pub fn html_to_rtf(html: Option<&str>) -> String {
    html_to_rtf_with(html, &ConvertConfig::default())
}

pub fn html_to_rtf_with(html: Option<&str>, config: &ConvertConfig) -> String {
    lenient(&HtmlToRtf::new(), html, config)
}

/// HTML fragment to normalized plain text
pub fn html_to_plain_text(html: Option<&str>) -> String {
    html_to_plain_text_with(html, &ConvertConfig::default())
}

pub fn html_to_plain_text_with(html: Option<&str>, config: &ConvertConfig) -> String {
    lenient(&HtmlToPlainText::new(), html, config)
}

/// The pair of columns stored for a description field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "DescriptionRtf")]
    pub rtf: String,
    #[serde(rename = "DescriptionText")]
    pub text: String,
}

impl Description {
    /// Build both stored columns from editor HTML
    pub fn from_html(html: Option<&str>, config: &ConvertConfig) -> Self {
        Self {
            rtf: html_to_rtf_with(html, config),
            text: html_to_plain_text_with(html, config),
        }
    }

    /// HTML to load back into an editor
    pub fn to_html(&self) -> String {
        rtf_to_html(Some(&self.rtf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_inputs() {
        for input in [None, Some(""), Some("   "), Some("\n\t")] {
            assert_eq!(rtf_to_html(input), "");
            assert_eq!(html_to_rtf(input), "");
            assert_eq!(html_to_plain_text(input), "");
        }
    }

    #[test]
    fn test_errors_become_descriptors() {
        let html = rtf_to_html(Some("not rtf at all"));
        assert!(html.starts_with("ParseError: line 1, column 1:"), "{html}");

        let rtf = html_to_rtf(Some("<span style=\"font-size: 99999999999pt\">x</span>"));
        assert!(rtf.starts_with("InvalidNumber: "), "{rtf}");
    }

    #[test]
    fn test_config_is_used() {
        let config = ConvertConfig {
            default_font: "Georgia".to_string(),
            ..ConvertConfig::default()
        };
        let rtf = html_to_rtf_with(Some("<p>x</p>"), &config);
        assert!(rtf.contains("\\f0\\fnil\\fcharset0 Georgia;"));
    }

    #[test]
    fn test_description_columns() {
        let desc = Description::from_html(
            Some("<p>Hello <b>World</b></p>"),
            &ConvertConfig::default(),
        );
        assert!(desc.rtf.starts_with("{\\rtf1"));
        assert!(desc.rtf.contains("{\\b World}"));
        assert_eq!(desc.text, "Hello World");
        assert_eq!(desc.to_html(), "<p>Hello <strong>World</strong></p>");

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["DescriptionText"], "Hello World");
    }

    #[test]
    fn test_empty_description() {
        let desc = Description::from_html(None, &ConvertConfig::default());
        assert_eq!(desc, Description::default());
        assert_eq!(desc.to_html(), "");
    }
}
