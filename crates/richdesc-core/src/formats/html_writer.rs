// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML rendering of the document model

use crate::ast::{Alignment, Block, CharStyle, Document, Inline, ListKind};
use crate::traits::ConvertConfig;
use html_escape::{encode_double_quoted_attribute, encode_text};

/// Renders a [`Document`] as a standalone HTML5 page
pub struct HtmlWriter<'a> {
    config: &'a ConvertConfig,
}

impl<'a> HtmlWriter<'a> {
    pub fn new(config: &'a ConvertConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, doc: &Document) -> String {
        let mut output = String::new();
        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        output.push_str(&format!(
            "<meta name=\"generator\" content=\"{}\">\n",
            encode_double_quoted_attribute(&self.config.generator)
        ));
        output.push_str("</head>\n<body>\n");

        for block in &doc.blocks {
            render_block(&mut output, block);
            output.push('\n');
        }

        output.push_str("</body>\n</html>\n");
        output
    }
}

fn render_block(output: &mut String, block: &Block) {
    match block {
        Block::Paragraph {
            runs,
            indent_twips,
            alignment,
        } => {
            let mut css = Vec::new();
            if *indent_twips > 0 {
                css.push(format!("margin-left: {}px", indent_twips / 15));
            }
            match alignment {
                Alignment::Left => {}
                Alignment::Center => css.push("text-align: center".to_string()),
                Alignment::Right => css.push("text-align: right".to_string()),
                Alignment::Justify => css.push("text-align: justify".to_string()),
            }

            if css.is_empty() {
                output.push_str("<p>");
            } else {
                output.push_str(&format!("<p style=\"{}\">", css.join("; ")));
            }
            if runs.is_empty() {
                output.push_str("<br>");
            }
            render_inlines(output, runs);
            output.push_str("</p>");
        }

        Block::List { kind, items } => {
            let tag = match kind {
                ListKind::Bullet => "ul",
                ListKind::Ordered => "ol",
            };
            output.push_str(&format!("<{}>", tag));
            for item in items {
                output.push_str("<li>");
                render_inlines(output, item);
                output.push_str("</li>");
            }
            output.push_str(&format!("</{}>", tag));
        }
    }
}

fn render_inlines(output: &mut String, inlines: &[Inline]) {
    for inline in inlines {
        match inline {
            Inline::Text { content, style } => render_run(output, content, style),
            Inline::LineBreak => output.push_str("<br>"),
            Inline::Tab => output.push_str("&nbsp;&nbsp;&nbsp;&nbsp;"),
        }
    }
}

fn render_run(output: &mut String, content: &str, style: &CharStyle) {
    let mut html = encode_text(content).into_owned();

    let wrap = |html: String, tag: &str| format!("<{tag}>{html}</{tag}>");
    if style.superscript {
        html = wrap(html, "sup");
    }
    if style.subscript {
        html = wrap(html, "sub");
    }
    if style.strike {
        html = wrap(html, "s");
    }
    if style.underline {
        html = wrap(html, "u");
    }
    if style.italic {
        html = wrap(html, "em");
    }
    if style.bold {
        html = wrap(html, "strong");
    }

    let mut css = Vec::new();
    if let Some(font) = &style.font {
        css.push(format!("font-family: '{}'", font.replace('\'', "")));
    }
    if let Some(size) = style.size {
        if size % 2 == 0 {
            css.push(format!("font-size: {}pt", size / 2));
        } else {
            css.push(format!("font-size: {}.5pt", size / 2));
        }
    }
    if let Some(color) = style.color {
        css.push(format!("color: {}", color.to_hex()));
    }
    if let Some(background) = style.background {
        css.push(format!("background-color: {}", background.to_hex()));
    }

    if css.is_empty() {
        output.push_str(&html);
    } else {
        let css = css.join("; ");
        output.push_str(&format!(
            "<span style=\"{}\">{}</span>",
            encode_double_quoted_attribute(&css),
            html
        ));
    }
}
