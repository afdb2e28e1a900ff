// SPDX-License-Identifier: AGPL-3.0-or-later
//! RTF reader
//!
//! Reads the token stream of an RTF document into a [`Document`].
//! Tokens and control words come from the `rtf_parser` lexer. Before
//! scanning, `normalize_escapes` rewrites the escapes that lexer cannot
//! separate from neighbouring text: `\uN` with its fallback characters,
//! escaped braces and backslashes, and blanks between groups.
//!
//! Only what the description editor can express is kept: character
//! formatting, fonts, colours, paragraph indent and alignment, and lists.
//! Pictures, fields instructions, style sheets and other non-text
//! destinations are skipped.

use crate::ast::{Alignment, Block, CharStyle, Document, Inline, ListKind, Rgb};
use crate::traits::{ConversionError, Result};
use rtf_parser::lexer::{Lexer, LexerError};
use rtf_parser::tokens::{ControlWord, Property, Token};
use std::collections::HashMap;

/// Windows-1252 characters for bytes 0x80..=0x9F
const CP1252_HIGH: [char; 32] = [
    '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8D}', 'Ž', '\u{8F}',
    '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9D}', 'ž', 'Ÿ',
];

/// `\levelnfc` value of bulleted list levels
const NFC_BULLET: i32 = 23;

/// Destinations whose content never reaches the document body
const SKIPPED_DESTINATIONS: &[&str] = &[
    "info",
    "pict",
    "shppict",
    "nonshppict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "footnote",
    "pntext",
    "generator",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "xmlnstbl",
    "rsidtbl",
];

/// Rewrites escapes into forms the lexer tokenizes unambiguously:
///
/// - `\uN` and its fallback characters become the literal character, with
///   the fallback count taken from the enclosing group's `\ucN`
/// - `\\`, `\{` and `\}` become `\'5c`, `\'7b` and `\'7d`
/// - `\~` and `\_` become their literal characters, `\-` is dropped
/// - every control word followed by text gets a space delimiter
/// - blanks between a brace, hex escape or line break and the next
///   control token become hex escapes
fn normalize_escapes(input: &str) -> String {
    Normalizer::default().run(&input.replace('\r', ""))
}

struct Normalizer {
    out: String,
    /// `\ucN` of each open group
    uc: Vec<usize>,
    /// Fallback characters still to drop after a `\uN`
    skip: usize,
    high_surrogate: Option<u16>,
    /// True where the lexer would drop a whitespace-only text token
    boundary: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            out: String::new(),
            uc: vec![1],
            skip: 0,
            high_surrogate: None,
            boundary: false,
        }
    }
}

impl Normalizer {
    fn run(mut self, input: &str) -> String {
        self.out.reserve(input.len() + 16);
        let mut pos = 0;

        while let Some(c) = input[pos..].chars().next() {
            pos += c.len_utf8();
            match c {
                '{' => {
                    let uc = self.uc.last().copied().unwrap_or(1);
                    self.uc.push(uc);
                    self.group_edge(c);
                }
                '}' => {
                    if self.uc.len() > 1 {
                        self.uc.pop();
                    }
                    self.group_edge(c);
                }
                '\n' => {
                    self.out.push(c);
                    self.boundary = true;
                }
                ' ' | '\t' if self.boundary && self.skip == 0 => {
                    let end = input[pos..]
                        .find(|c: char| c != ' ' && c != '\t')
                        .map_or(input.len(), |i| pos + i);
                    let run = &input[pos - 1..end];
                    pos = end;
                    let rest = &input[end..];
                    if rest.trim().is_empty() {
                        // blanks after the closing brace
                    } else if rest.starts_with(['{', '}', '\\', '\n']) {
                        run.bytes().for_each(|b| self.push_hex(b));
                    } else {
                        self.out.push_str(run);
                        self.boundary = false;
                    }
                }
                '\\' => pos = self.escape(input, pos),
                c => self.literal(c),
            }
        }
        self.out
    }

    fn group_edge(&mut self, brace: char) {
        self.skip = 0;
        self.out.push(brace);
        self.boundary = true;
    }

    /// Handle the escape starting after the backslash at `pos - 1`.
    /// Returns the position after it.
    fn escape(&mut self, input: &str, pos: usize) -> usize {
        let rest = &input[pos..];
        let Some(next) = rest.chars().next() else {
            return pos;
        };

        match next {
            '\\' | '{' | '}' => {
                self.literal(next);
                pos + 1
            }
            '\'' => match rest.get(1..3).filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit())) {
                Some(hex) => {
                    if self.skip > 0 {
                        self.skip -= 1;
                    } else {
                        self.out.push_str("\\'");
                        self.out.push_str(hex);
                        self.boundary = true;
                    }
                    pos + 3
                }
                None => pos + 1,
            },
            '~' => {
                self.literal('\u{00A0}');
                pos + 1
            }
            '_' => {
                self.literal('\u{2011}');
                pos + 1
            }
            '\n' => {
                self.out.push_str("\\\n");
                self.boundary = true;
                pos + 1
            }
            '*' => {
                self.out.push_str("\\*");
                self.boundary = false;
                pos + 1
            }
            c if c.is_ascii_lowercase() => self.control_word(input, pos),
            // `\-` and symbols with no text meaning
            other => pos + other.len_utf8(),
        }
    }

    fn control_word(&mut self, input: &str, pos: usize) -> usize {
        let rest = &input[pos..];
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let name = &rest[..name_len];
        let mut end = pos + name_len;

        let after = &input[end..];
        let sign = usize::from(after.starts_with('-'));
        let digits = after[sign..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(after.len() - sign);
        let param = (digits > 0).then(|| {
            // Out-of-range values saturate
            let magnitude = after[sign..sign + digits]
                .parse::<i64>()
                .unwrap_or(i64::MAX)
                .min(i64::from(i32::MAX));
            (if sign == 1 { -magnitude } else { magnitude }) as i32
        });
        if digits > 0 {
            end += sign + digits;
        }
        if input[end..].starts_with(' ') {
            end += 1;
        }

        if let ("u", Some(code)) = (name, param) {
            self.unicode(code);
            return end;
        }
        if let ("uc", Some(count), Some(top)) = (name, param, self.uc.last_mut()) {
            *top = count.max(0) as usize;
        }

        self.out.push('\\');
        self.out.push_str(name);
        if let Some(param) = param {
            self.out.push_str(&param.to_string());
        }
        if !matches!(input[end..].chars().next(), None | Some('\\' | '{' | '}' | '\n')) {
            self.out.push(' ');
        }
        self.boundary = false;
        end
    }

    fn unicode(&mut self, code: i32) {
        let unit = if code < 0 {
            i64::from(code) + 65536
        } else {
            i64::from(code)
        };
        self.skip = self.uc.last().copied().unwrap_or(1);
        let Ok(unit) = u32::try_from(unit) else {
            return;
        };

        match unit {
            0xD800..=0xDBFF => self.high_surrogate = Some(unit as u16),
            0xDC00..=0xDFFF => {
                if let Some(high) = self.high_surrogate.take() {
                    if let Some(Ok(c)) = char::decode_utf16([high, unit as u16]).next() {
                        self.push_char(c);
                    }
                }
            }
            _ => {
                if let Some(c) = char::from_u32(unit) {
                    self.push_char(c);
                }
            }
        }
    }

    /// A text character, unless it is a pending fallback character
    fn literal(&mut self, c: char) {
        if self.skip > 0 {
            self.skip -= 1;
            return;
        }
        self.push_char(c);
    }

    fn push_char(&mut self, c: char) {
        match c {
            '\\' | '{' | '}' | ' ' | '\t' => self.push_hex(c as u8),
            _ => {
                self.out.push(c);
                self.boundary = false;
            }
        }
    }

    fn push_hex(&mut self, byte: u8) {
        self.out.push_str(&format!("\\'{:02x}", byte));
        self.boundary = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Body,
    FontTable,
    ColorTable,
    ListTable,
    ListOverrideTable,
    /// `\listtext`, the rendered marker of a list item
    ListText,
    Skip,
}

/// Character formatting as raw table references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CharState {
    bold: bool,
    italic: bool,
    underline: bool,
    strike: bool,
    superscript: bool,
    subscript: bool,
    font: Option<i32>,
    size: Option<u32>,
    color: Option<usize>,
    background: Option<usize>,
}

#[derive(Debug, Clone)]
struct GroupState {
    destination: Destination,
    chars: CharState,
    paragraph: ParagraphState,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            destination: Destination::Body,
            chars: CharState::default(),
            paragraph: ParagraphState::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct ParagraphState {
    indent: i32,
    alignment: Alignment,
    list: Option<i32>,
}

/// Reads RTF into the document model
#[derive(Default)]
pub struct RtfReader {
    stack: Vec<GroupState>,
    state: GroupState,
    /// True right after `{` until the first token of the group
    group_start: bool,
    ignorable: bool,

    default_font: Option<i32>,
    base_size: Option<Option<u32>>,
    fonts: HashMap<i32, String>,
    current_font: Option<i32>,
    font_name: String,
    colors: Vec<Option<Rgb>>,
    color: (Option<u8>, Option<u8>, Option<u8>),
    list_nfc: Option<i32>,
    bullet_lists: HashMap<i32, bool>,
    override_list: Option<i32>,
    overrides: HashMap<i32, i32>,

    runs: Vec<Inline>,
    pending: String,
    pending_state: CharState,
    list_marker: String,
    blocks: Vec<Block>,
    in_list: bool,
}

impl RtfReader {
    pub fn new() -> Self {
        Self {
            default_font: Some(0),
            ..Self::default()
        }
    }

    /// Read a complete RTF document
    pub fn read(mut self, input: &str) -> Result<Document> {
        let start = input.len() - input.trim_start().len();
        if !input[start..].starts_with("{\\rtf") {
            let (line, column) = position(input, start);
            return Err(ConversionError::ParseError {
                line,
                column,
                message: "expected `{\\rtf` header".to_string(),
            });
        }

        let source = normalize_escapes(&input[start..]);
        let tokens = Lexer::scan(&source).map_err(|e| lexer_error(input, start, &e))?;
        for token in &tokens {
            self.token(token);
        }
        self.end_paragraph(false);

        tracing::debug!(
            tokens = tokens.len(),
            blocks = self.blocks.len(),
            fonts = self.fonts.len(),
            colors = self.colors.len(),
            "read rtf document"
        );
        Ok(Document {
            blocks: self.blocks,
        })
    }

    fn token(&mut self, token: &Token<'_>) {
        let group_start = std::mem::replace(&mut self.group_start, false);

        match token {
            Token::OpeningBracket => {
                self.flush();
                self.stack.push(self.state.clone());
                self.group_start = true;
                self.ignorable = false;
            }
            Token::ClosingBracket => {
                self.flush();
                self.end_group();
                if self.stack.len() == 1 {
                    self.end_paragraph(false);
                }
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            Token::IgnorableDestination if group_start => {
                self.ignorable = true;
                self.group_start = true;
            }
            Token::CRLF if self.state.destination == Destination::Body => self.end_paragraph(true),
            Token::PlainText(text) => {
                for c in text.chars() {
                    self.text(c);
                }
            }
            // After normalization only `\'hh` escapes reach the lexer as `\u`
            Token::ControlSymbol((ControlWord::Unicode, Property::Value(byte))) => self.hex(*byte),
            Token::ControlSymbol((word, property)) => {
                let param = match property {
                    Property::Value(v) => Some(*v),
                    Property::On => Some(1),
                    Property::Off => Some(0),
                    Property::None => None,
                };
                if group_start && self.enter_destination(word) {
                    return;
                }
                self.word(word, param);
            }
            _ => {}
        }
    }

    /// Handle the first control word of a group. Returns true if it only
    /// selected the destination.
    fn enter_destination(&mut self, word: &ControlWord<'_>) -> bool {
        if self.state.destination == Destination::Skip {
            return true;
        }

        let destination = match word {
            ControlWord::FontTable => Destination::FontTable,
            ControlWord::ColorTable => Destination::ColorTable,
            ControlWord::StyleSheet | ControlWord::FileTable => Destination::Skip,
            ControlWord::Unknown(raw) => match unknown_name(raw) {
                "listtable" => Destination::ListTable,
                "listoverridetable" => Destination::ListOverrideTable,
                "listtext" => Destination::ListText,
                name if SKIPPED_DESTINATIONS.contains(&name) => Destination::Skip,
                _ if self.ignorable => Destination::Skip,
                _ => {
                    self.ignorable = false;
                    return false;
                }
            },
            _ if self.ignorable => Destination::Skip,
            _ => return false,
        };
        self.ignorable = false;
        self.state.destination = destination;
        true
    }

    fn end_group(&mut self) {
        if self.state.destination == Destination::FontTable {
            self.finish_font();
        }
    }

    fn word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        match self.state.destination {
            Destination::Skip | Destination::ListText => {}
            Destination::FontTable => self.font_table_word(word, param),
            Destination::ColorTable => self.color_table_word(word, param),
            Destination::ListTable => self.list_table_word(word, param),
            Destination::ListOverrideTable => self.list_override_word(word, param),
            Destination::Body => self.body_word(word, param),
        }
    }

    fn font_table_word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        if let ControlWord::FontNumber = word {
            self.finish_font();
            self.current_font = param;
        }
    }

    fn finish_font(&mut self) {
        if let Some(id) = self.current_font.take() {
            let name = self.font_name.trim().trim_end_matches(';').trim().to_string();
            if !name.is_empty() {
                self.fonts.entry(id).or_insert(name);
            }
        }
        self.font_name.clear();
    }

    fn color_table_word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        let value = param.map(|p| p.clamp(0, 255) as u8);
        match word {
            ControlWord::ColorRed => self.color.0 = value,
            ControlWord::ColorGreen => self.color.1 = value,
            ControlWord::ColorBlue => self.color.2 = value,
            _ => {}
        }
    }

    fn list_table_word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        let ControlWord::Unknown(raw) = word else {
            return;
        };
        match unknown_name(raw) {
            "list" => self.list_nfc = None,
            "levelnfc" if self.list_nfc.is_none() => self.list_nfc = param,
            "listid" => {
                if let Some(id) = param {
                    let bullet = self.list_nfc == Some(NFC_BULLET);
                    self.bullet_lists.insert(id, bullet);
                }
            }
            _ => {}
        }
    }

    fn list_override_word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        let ControlWord::Unknown(raw) = word else {
            return;
        };
        match unknown_name(raw) {
            "listid" => self.override_list = param,
            "ls" => {
                if let (Some(ls), Some(list)) = (param, self.override_list) {
                    self.overrides.insert(ls, list);
                }
            }
            _ => {}
        }
    }

    fn body_word(&mut self, word: &ControlWord<'_>, param: Option<i32>) {
        let on = param != Some(0);
        match word {
            ControlWord::Par => self.end_paragraph(true),
            ControlWord::Pard => self.state.paragraph = ParagraphState::default(),
            ControlWord::LeftIndent => self.state.paragraph.indent = param.unwrap_or(0),
            ControlWord::LeftAligned => self.state.paragraph.alignment = Alignment::Left,
            ControlWord::Center => self.state.paragraph.alignment = Alignment::Center,
            ControlWord::RightAligned => self.state.paragraph.alignment = Alignment::Right,
            ControlWord::Justify => self.state.paragraph.alignment = Alignment::Justify,
            ControlWord::Line => self.push_inline(Inline::LineBreak),
            ControlWord::Tab => self.push_inline(Inline::Tab),

            ControlWord::Plain => self.state.chars = CharState::default(),
            ControlWord::Bold => self.state.chars.bold = on,
            ControlWord::Italic => self.state.chars.italic = on,
            ControlWord::Underline => self.state.chars.underline = on,
            ControlWord::UnderlineNone => self.state.chars.underline = false,
            ControlWord::Strikethrough => self.state.chars.strike = on,
            ControlWord::Superscript => {
                self.state.chars.superscript = true;
                self.state.chars.subscript = false;
            }
            ControlWord::Subscript => {
                self.state.chars.subscript = true;
                self.state.chars.superscript = false;
            }
            ControlWord::FontNumber => self.state.chars.font = param,
            ControlWord::FontSize => self.state.chars.size = param.map(|p| p.max(0) as u32),
            ControlWord::ColorNumber => self.state.chars.color = param.map(|p| p.max(0) as usize),

            ControlWord::Emdash => self.text('—'),
            ControlWord::Endash => self.text('–'),
            ControlWord::Bullet => self.text('•'),
            ControlWord::LeftSingleQuote => self.text('‘'),
            ControlWord::RightSingleQuote => self.text('’'),
            ControlWord::LeftDoubleQuote => self.text('“'),
            ControlWord::RightDoubleQuote => self.text('”'),

            ControlWord::Unknown(raw) => match unknown_name(raw) {
                "deff" => self.default_font = param,
                "page" | "sect" => self.end_paragraph(true),
                "ls" => self.state.paragraph.list = param,
                "highlight" | "cb" => {
                    self.state.chars.background = param.filter(|p| *p > 0).map(|p| p as usize)
                }
                "nosupersub" => {
                    self.state.chars.superscript = false;
                    self.state.chars.subscript = false;
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn hex(&mut self, byte: i32) {
        let c = match u8::try_from(byte) {
            Ok(byte @ 0x80..=0x9F) => CP1252_HIGH[usize::from(byte - 0x80)],
            Ok(byte) => char::from(byte),
            Err(_) => return,
        };
        self.text(c);
    }

    fn text(&mut self, c: char) {
        match self.state.destination {
            Destination::FontTable => self.font_name.push(c),
            Destination::ColorTable => {
                if c == ';' {
                    let color = match self.color {
                        (None, None, None) => None,
                        (r, g, b) => Some(Rgb::new(
                            r.unwrap_or(0),
                            g.unwrap_or(0),
                            b.unwrap_or(0),
                        )),
                    };
                    self.colors.push(color);
                    self.color = (None, None, None);
                }
            }
            Destination::ListText => self.list_marker.push(c),
            Destination::Body => self.push_char(c),
            _ => {}
        }
    }

    fn push_char(&mut self, c: char) {
        if self.state.destination != Destination::Body {
            return;
        }
        if self.pending_state != self.state.chars {
            self.flush();
            self.pending_state = self.state.chars.clone();
        }
        self.pending.push(c);
    }

    fn push_inline(&mut self, inline: Inline) {
        if self.state.destination != Destination::Body {
            return;
        }
        self.flush();
        self.runs.push(inline);
    }

    /// Move buffered text into a run
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.pending);
        let style = self.resolve(&self.pending_state.clone());

        if let Some(Inline::Text {
            content: last,
            style: last_style,
        }) = self.runs.last_mut()
        {
            if *last_style == style {
                last.push_str(&content);
                return;
            }
        }
        self.runs.push(Inline::Text { content, style });
    }

    /// Turn table references into concrete values. The document default
    /// font and the size of the first text are left implicit.
    fn resolve(&mut self, state: &CharState) -> CharStyle {
        let base_size = *self.base_size.get_or_insert(state.size);

        let font = state
            .font
            .filter(|f| Some(*f) != self.default_font)
            .and_then(|f| self.fonts.get(&f).cloned());
        let color = |index: Option<usize>| index.and_then(|i| self.colors.get(i).copied().flatten());

        CharStyle {
            bold: state.bold,
            italic: state.italic,
            underline: state.underline,
            strike: state.strike,
            superscript: state.superscript,
            subscript: state.subscript,
            font,
            size: state.size.filter(|s| Some(*s) != base_size),
            color: color(state.color).filter(|c| *c != Rgb::BLACK),
            background: color(state.background),
        }
    }

    /// Close the current paragraph. With `explicit` false (end of input)
    /// an empty paragraph is dropped.
    fn end_paragraph(&mut self, explicit: bool) {
        self.flush();
        let runs = std::mem::take(&mut self.runs);
        let marker = std::mem::take(&mut self.list_marker);
        if !explicit && runs.is_empty() {
            return;
        }

        match self.state.paragraph.list {
            Some(ls) => {
                let kind = self.list_kind(ls);
                // An ordered item numbered 1 opens a new list
                let restart = kind == ListKind::Ordered && marker_number(&marker) == Some(1);
                match self.blocks.last_mut() {
                    Some(Block::List { kind: last, items })
                        if self.in_list && *last == kind && !restart =>
                    {
                        items.push(runs)
                    }
                    _ => self.blocks.push(Block::List {
                        kind,
                        items: vec![runs],
                    }),
                }
                self.in_list = true;
            }
            None => {
                self.blocks.push(Block::Paragraph {
                    runs,
                    indent_twips: self.state.paragraph.indent,
                    alignment: self.state.paragraph.alignment,
                });
                self.in_list = false;
            }
        }
    }

    fn list_kind(&self, ls: i32) -> ListKind {
        let bullet = self
            .overrides
            .get(&ls)
            .and_then(|list| self.bullet_lists.get(list))
            .copied()
            .unwrap_or(true);
        if bullet {
            ListKind::Bullet
        } else {
            ListKind::Ordered
        }
    }
}

/// Name of a control word the lexer has no variant for
fn unknown_name(raw: &str) -> &str {
    raw.trim_start_matches('\\')
}

/// Number of a `\listtext` marker such as `1.` or `2)`
fn marker_number(marker: &str) -> Option<u32> {
    marker.trim().trim_end_matches(['.', ')']).parse().ok()
}

fn lexer_error(input: &str, start: usize, error: &LexerError) -> ConversionError {
    let offset = match error {
        LexerError::InvalidLastChar => input
            .trim_end()
            .char_indices()
            .last()
            .map_or(start, |(i, _)| i),
        _ => start,
    };
    let (line, column) = position(input, offset);
    ConversionError::ParseError {
        line,
        column,
        message: error.to_string(),
    }
}

/// 1-based line and column of a byte offset
fn position(input: &str, offset: usize) -> (u32, u32) {
    let before = &input[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line as u32, column as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(rtf: &str) -> Document {
        RtfReader::new().read(rtf).unwrap()
    }

    fn text(content: &str) -> Inline {
        Inline::Text {
            content: content.to_string(),
            style: CharStyle::default(),
        }
    }

    #[test]
    fn test_normalize_escapes() {
        assert_eq!(
            normalize_escapes("{\\b1 x\\'e9\\\\a\\{\\u233?b\\~c\\-d}"),
            "{\\b1 x\\'e9\\'5ca\\'7b\u{e9}b\u{a0}cd}"
        );
    }

    #[test]
    fn test_normalize_delimiters_and_blanks() {
        assert_eq!(
            normalize_escapes("{\\rtf1 {\\b a} {\\i b}\\blue0;\\par}  \r\n"),
            "{\\rtf1{\\b a}\\'20{\\i b}\\blue0 ;\\par}\n"
        );
    }

    #[test]
    fn test_normalize_fallback_count_is_group_scoped() {
        assert_eq!(
            normalize_escapes("{\\uc2{\\uc0\\u233 x}\\u233 ab\\u8364\\'80\\'80c}"),
            "{\\uc2{\\uc0\u{e9}x}\u{e9}\u{20ac}c}"
        );
    }

    #[test]
    fn test_lexer_sees_normalized_tokens() {
        let source = normalize_escapes("{\\b1 x\\{\\fs-20 y}");
        let tokens = Lexer::scan(&source).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::OpeningBracket,
                Token::ControlSymbol((ControlWord::Bold, Property::Value(1))),
                Token::PlainText("x"),
                Token::ControlSymbol((ControlWord::Unicode, Property::Value(0x7b))),
                Token::ControlSymbol((ControlWord::FontSize, Property::Value(-20))),
                Token::PlainText("y"),
                Token::ClosingBracket,
            ]
        );
    }

    #[test]
    fn test_missing_header() {
        let err = RtfReader::new().read("\n  hello").unwrap_err();
        match err {
            ConversionError::ParseError { line, column, .. } => {
                assert_eq!((line, column), (2, 3));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_trailing_text_after_document() {
        let err = RtfReader::new().read("{\\rtf1 x}\nmore").unwrap_err();
        match err {
            ConversionError::ParseError { line, column, message } => {
                assert_eq!((line, column), (2, 4));
                assert!(message.contains("RTF Lexer"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_paragraphs() {
        let doc = read("{\\rtf1\\ansi Hello\\par World\\par}");
        assert_eq!(doc.blocks.len(), 2);
        match &doc.blocks[0] {
            Block::Paragraph { runs, .. } => assert_eq!(runs, &vec![text("Hello")]),
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn test_spaces_between_groups_kept() {
        let doc = read("{\\rtf1 Plain {\\b bold} {\\i italic}\\par}");
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            runs,
            &vec![
                text("Plain "),
                Inline::Text {
                    content: "bold".to_string(),
                    style: CharStyle {
                        bold: true,
                        ..CharStyle::default()
                    },
                },
                text(" "),
                Inline::Text {
                    content: "italic".to_string(),
                    style: CharStyle {
                        italic: true,
                        ..CharStyle::default()
                    },
                },
            ]
        );
    }

    #[test]
    fn test_tables_skipped_and_resolved() {
        let doc = read(
            "{\\rtf1\\deff0{\\fonttbl{\\f0\\fnil Calibri;}{\\f1\\fnil Courier New;}}\
             {\\colortbl ;\\red255\\green0\\blue0;}\
             {\\*\\generator Test;}\\pard\\f0\\fs24 a{\\f1\\cf1\\b b}\\par}",
        );
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs[0], text("a"));
        assert_eq!(
            runs[1],
            Inline::Text {
                content: "b".to_string(),
                style: CharStyle {
                    bold: true,
                    font: Some("Courier New".to_string()),
                    color: Some(Rgb::new(255, 0, 0)),
                    ..CharStyle::default()
                },
            }
        );
    }

    #[test]
    fn test_unicode_and_fallback() {
        let doc = read("{\\rtf1\\uc1 caf\\u233?\\u-10179?\\u-8704? \\'93q\\'94}");
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs, &vec![text("café\u{1F600} “q”")]);
    }

    #[test]
    fn test_lists_from_tables() {
        let doc = read(
            "{\\rtf1{\\*\\listtable{\\list{\\listlevel\\levelnfc23}\\listid1}\
             {\\list{\\listlevel\\levelnfc0}\\listid2}}\
             {\\*\\listoverridetable{\\listoverride\\listid1\\ls1}{\\listoverride\\listid2\\ls2}}\
             \\pard\\ls2{\\listtext 1.\\tab}A\\par\\pard\\ls2{\\listtext 2.\\tab}B\\par\
             \\pard\\ls1{\\listtext \\'95\\tab}C\\par\\pard after\\par}",
        );
        assert_eq!(doc.blocks.len(), 3);
        match &doc.blocks[0] {
            Block::List { kind, items } => {
                assert_eq!(*kind, ListKind::Ordered);
                assert_eq!(items.len(), 2);
                assert_eq!(items[1], vec![text("B")]);
            }
            other => panic!("unexpected block {other:?}"),
        }
        assert!(matches!(&doc.blocks[1], Block::List { kind: ListKind::Bullet, .. }));
        assert!(matches!(&doc.blocks[2], Block::Paragraph { .. }));
    }

    #[test]
    fn test_ordered_list_restarts_at_one() {
        let doc = read(
            "{\\rtf1{\\*\\listtable{\\list{\\listlevel\\levelnfc0}\\listid2}}\
             {\\*\\listoverridetable{\\listoverride\\listid2\\ls2}}\
             \\pard\\ls2{\\listtext 1.\\tab}A\\par\\pard\\ls2{\\listtext 2.\\tab}B\\par\\pard \
             \\pard\\ls2{\\listtext 1.\\tab}C\\par\\pard }",
        );
        assert_eq!(
            doc.blocks,
            vec![
                Block::List {
                    kind: ListKind::Ordered,
                    items: vec![vec![text("A")], vec![text("B")]],
                },
                Block::List {
                    kind: ListKind::Ordered,
                    items: vec![vec![text("C")]],
                },
            ]
        );
    }

    #[test]
    fn test_paragraph_properties() {
        let doc = read("{\\rtf1\\pard\\li720\\qc centred\\par}");
        match &doc.blocks[0] {
            Block::Paragraph {
                indent_twips,
                alignment,
                ..
            } => {
                assert_eq!(*indent_twips, 720);
                assert_eq!(*alignment, Alignment::Center);
            }
            other => panic!("unexpected block {other:?}"),
        }
    }

    #[test]
    fn test_escaped_symbols_and_breaks() {
        let doc = read("{\\rtf1 a\\\\b\\{c\\}\\line d\\tab e}");
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(
            runs,
            &vec![text("a\\b{c}"), Inline::LineBreak, text("d"), Inline::Tab, text("e")]
        );
    }

    #[test]
    fn test_backslash_before_group() {
        let doc = read("{\\rtf1 dir\\\\{\\b x}}");
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs[0], text("dir\\"));
        assert_eq!(runs.len(), 2);
    }

    #[test]
    fn test_unknown_ignorable_destination_skipped() {
        let doc = read("{\\rtf1{\\*\\unknownthing secret}visible}");
        let Block::Paragraph { runs, .. } = &doc.blocks[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(runs, &vec![text("visible")]);
    }
}
