// SPDX-License-Identifier: AGPL-3.0-or-later
//! richdesc core - rich-text description conversion
//!
//! This crate provides:
//! - HTML to RTF conversion for storing editor content
//! - RTF to HTML conversion for loading it back into an editor
//! - HTML to plain text for search and display columns
//! - Lenient wrappers that never fail, for save and load paths
//! - C FFI exports (feature `ffi`)

pub mod ast;
pub mod convert;
pub mod entities;
pub mod formats;
pub mod traits;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use ast::{Document, TextFormat};
pub use convert::{
    html_to_plain_text, html_to_plain_text_with, html_to_rtf, html_to_rtf_with, rtf_to_html,
    rtf_to_html_with, Description,
};
pub use traits::{
    ConversionError, ConvertConfig, Converter, ConverterExt, ConverterRegistry, Result,
};
