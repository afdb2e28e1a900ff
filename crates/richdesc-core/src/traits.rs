// SPDX-License-Identifier: AGPL-3.0-or-later
//! Converter trait, configuration and error types

use crate::ast::TextFormat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::num::ParseIntError;
use std::path::Path;

/// Error type for conversions
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("line {line}, column {column}: {message}")]
    ParseError {
        line: u32,
        column: u32,
        message: String,
    },

    #[error("invalid numeric value `{value}`: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("no converter from {from:?} to {to:?}")]
    UnsupportedConversion { from: TextFormat, to: TextFormat },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ConversionError {
    /// Variant name, used as the leading part of error descriptors
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ParseError { .. } => "ParseError",
            Self::InvalidNumber { .. } => "InvalidNumber",
            Self::UnsupportedConversion { .. } => "UnsupportedConversion",
            Self::Io(_) => "Io",
            Self::Config(_) => "Config",
        }
    }

    /// Render the error as `"<Kind>: <message>"`.
    ///
    /// This string is what the lenient conversion functions return in place
    /// of a converted value, so its shape must stay stable.
    pub fn describe(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }

    pub(crate) fn invalid_number(value: &str, source: ParseIntError) -> Self {
        Self::InvalidNumber {
            value: value.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Configuration shared by all converters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Font used when the HTML carries no outer font-family
    pub default_font: String,
    /// Font size in points used when the HTML carries no outer font-size
    pub default_font_size: u32,
    /// Monospace font for `<pre>` and `<code>`
    pub code_font: String,
    /// Written to the RTF `\*\generator` group and the HTML generator meta
    pub generator: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_font: "Calibri".to_string(),
            default_font_size: 12,
            code_font: "Courier New".to_string(),
            generator: concat!("richdesc ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ConvertConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "loaded converter configuration");
        Ok(config)
    }
}

/// A single-direction conversion between two text formats
pub trait Converter: Send + Sync {
    /// The format this converter reads
    fn source(&self) -> TextFormat;

    /// The format this converter produces
    fn target(&self) -> TextFormat;

    /// Convert a string, reporting failures as errors
    fn convert(&self, input: &str, config: &ConvertConfig) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait ConverterExt: Converter {
    /// Convert everything a reader yields
    fn convert_reader<R: Read>(&self, reader: R, config: &ConvertConfig) -> Result<String> {
        let mut input = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut input)?;
        self.convert(&input, config)
    }

    /// Convert a string straight into a writer
    fn convert_writer<W: Write>(
        &self,
        input: &str,
        writer: &mut W,
        config: &ConvertConfig,
    ) -> Result<()> {
        let output = self.convert(input, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

impl<T: Converter> ConverterExt for T {}

/// Registry of converters keyed by direction
pub struct ConverterRegistry {
    converters: HashMap<(TextFormat, TextFormat), Box<dyn Converter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Registry holding the three built-in directions
    pub fn with_defaults() -> Self {
        use crate::formats::{HtmlToPlainText, HtmlToRtf, RtfToHtml};

        let mut registry = Self::new();
        registry.register(Box::new(HtmlToRtf::new()));
        registry.register(Box::new(HtmlToPlainText::new()));
        registry.register(Box::new(RtfToHtml::new()));
        registry
    }

    pub fn register(&mut self, converter: Box<dyn Converter>) {
        let key = (converter.source(), converter.target());
        self.converters.insert(key, converter);
    }

    pub fn get(&self, from: TextFormat, to: TextFormat) -> Option<&dyn Converter> {
        self.converters.get(&(from, to)).map(|c| c.as_ref())
    }

    /// Supported directions, sorted for stable listings
    pub fn directions(&self) -> Vec<(TextFormat, TextFormat)> {
        let mut directions: Vec<_> = self.converters.keys().copied().collect();
        directions.sort_by_key(|(from, to)| (from.label(), to.label()));
        directions
    }

    /// Convert between formats
    pub fn convert(
        &self,
        input: &str,
        from: TextFormat,
        to: TextFormat,
        config: &ConvertConfig,
    ) -> Result<String> {
        if from == to {
            return Ok(input.to_string());
        }

        let converter = self
            .get(from, to)
            .ok_or(ConversionError::UnsupportedConversion { from, to })?;

        converter.convert(input, config)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
