// SPDX-License-Identifier: AGPL-3.0-or-later
//! Converters for each supported direction

pub mod html_to_rtf;
pub mod html_writer;
pub mod plaintext;
pub mod rtf_reader;
pub mod rtf_to_html;

pub use html_to_rtf::HtmlToRtf;
pub use html_writer::HtmlWriter;
pub use plaintext::HtmlToPlainText;
pub use rtf_reader::RtfReader;
pub use rtf_to_html::RtfToHtml;
