// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document model and lookup tables shared by the converters
//!
//! The RTF reader produces a [`Document`] which the HTML writer renders.
//! The HTML to RTF direction only needs the [`FontTable`] and [`ColorTable`]
//! built in its pre-pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Text format identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextFormat {
    Html,
    Rtf,
    PlainText,
}

impl TextFormat {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Rtf => "rtf",
            Self::PlainText => "txt",
        }
    }

    /// Short display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Rtf => "RTF",
            Self::PlainText => "TXT",
        }
    }

    pub const ALL: [Self; 3] = [Self::Html, Self::Rtf, Self::PlainText];

    /// Guess a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "rtf" => Some(Self::Rtf),
            "txt" | "text" => Some(Self::PlainText),
            _ => None,
        }
    }
}

impl fmt::Display for TextFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An RGB colour triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse six hex digits (no leading `#`)
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Ordered, case-insensitively deduplicated font names.
///
/// Entry 0 is the document default; positions are RTF `\fN` indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontTable {
    names: Vec<String>,
}

impl FontTable {
    pub fn new(default_font: &str) -> Self {
        Self {
            names: vec![default_font.to_string()],
        }
    }

    /// Append a font unless an equal name (ignoring case) is present
    pub fn insert(&mut self, name: &str) -> usize {
        if let Some(index) = self.index_of(name) {
            return index;
        }
        self.names.push(name.to_string());
        self.names.len() - 1
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Ordered, deduplicated colours. Entry 0 is always black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    colors: Vec<Rgb>,
}

impl ColorTable {
    pub fn new() -> Self {
        Self {
            colors: vec![Rgb::BLACK],
        }
    }

    pub fn insert(&mut self, color: Rgb) -> usize {
        if let Some(index) = self.index_of(color) {
            return index;
        }
        self.colors.push(color);
        self.colors.len() - 1
    }

    pub fn index_of(&self, color: Rgb) -> Option<usize> {
        self.colors.iter().position(|c| *c == color)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.colors.iter().copied()
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The root document node produced by the RTF reader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Count words in the document
    pub fn word_count(&self) -> usize {
        self.blocks.iter().map(|b| b.word_count()).sum()
    }

    /// Count characters in the document
    pub fn char_count(&self) -> usize {
        self.blocks.iter().map(|b| b.char_count()).sum()
    }
}

/// Block-level elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        runs: Vec<Inline>,
        /// Left indent in twips
        indent_twips: i32,
        alignment: Alignment,
    },

    List {
        kind: ListKind,
        items: Vec<Vec<Inline>>,
    },
}

impl Block {
    pub fn word_count(&self) -> usize {
        match self {
            Block::Paragraph { runs, .. } => runs.iter().map(|i| i.word_count()).sum(),
            Block::List { items, .. } => items.iter().flatten().map(|i| i.word_count()).sum(),
        }
    }

    pub fn char_count(&self) -> usize {
        match self {
            Block::Paragraph { runs, .. } => runs.iter().map(|i| i.char_count()).sum(),
            Block::List { items, .. } => items.iter().flatten().map(|i| i.char_count()).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Character formatting of a text run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub superscript: bool,
    pub subscript: bool,
    pub font: Option<String>,
    /// Size in half-points
    pub size: Option<u32>,
    pub color: Option<Rgb>,
    pub background: Option<Rgb>,
}

/// Inline elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { content: String, style: CharStyle },
    LineBreak,
    Tab,
}

impl Inline {
    pub fn word_count(&self) -> usize {
        match self {
            Inline::Text { content, .. } => content.split_whitespace().count(),
            _ => 0,
        }
    }

    pub fn char_count(&self) -> usize {
        match self {
            Inline::Text { content, .. } => content.chars().count(),
            Inline::LineBreak | Inline::Tab => 1,
        }
    }
}
