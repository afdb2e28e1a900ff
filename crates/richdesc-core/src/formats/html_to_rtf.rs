// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML to RTF conversion
//!
//! The HTML produced by the description editor is small and regular, so the
//! conversion is a fixed sequence of pattern substitutions rather than a DOM
//! walk. The order of the stages is significant:
//!
//! 1. entities are decoded first, so `&amp;` ends up as a plain `&` and
//!    `&#123;` as an escaped `\{`;
//! 2. font and colour tables are built from the whole decoded input, so every
//!    `\fN`, `\cfN` and `\highlightN` emitted later refers to an existing entry
//!    under the same name the body's styles use;
//! 3. RTF escaping happens before tag rewriting, so the control words the
//!    rewriting inserts are never escaped themselves;
//! 4. residual tags are stripped only after every known tag was rewritten.

use crate::ast::{ColorTable, FontTable, Rgb, TextFormat};
use crate::entities::decode_entities;
use crate::traits::{ConversionError, ConvertConfig, Converter, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `rgb(r, g, b)` or `#rrggbb`; groups 1-3 hold rgb components, group 4 hex digits
const COLOR_VALUE: &str = r"(?:rgb\(\s*(\d+)\s*,\s*(\d+)\s*,\s*(\d+)\s*\)|#([0-9a-fA-F]{6})\b)";

static OUTER_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<(?:div|body)\b[^>]*?\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid outer style regex")
});
static STYLE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)(?:^|\s)style\s*=(.*)").expect("valid style regex")
});
static FONT_FAMILY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)font-family\s*:\s*((?:&quot;|"[^"<>;]*"|'[^'<>;]*'|[^;"<>])+)"#).expect("valid font-family regex")
});
static FONT_SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)font-size\s*:\s*(\d+)(?:\.\d+)?pt").expect("valid font-size regex")
});
static ANY_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)(?:background-)?color\s*:\s*{COLOR_VALUE}"))
        .expect("valid color regex")
});
static FG_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"(?i)(?:^|[;\s"'])color\s*:\s*{COLOR_VALUE}"#)).expect("valid color regex")
});
static BG_COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)background-color\s*:\s*{COLOR_VALUE}"))
        .expect("valid background regex")
});
static UNDERLINE_STYLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)text-decoration(?:-line)?\s*:[^;]*underline").expect("valid decoration regex")
});
static INDENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:margin|padding)-left\s*:\s*(\d+)(?:\.\d+)?px").expect("valid indent regex")
});

static PRE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre\b[^>]*>(.*?)</pre>").expect("valid pre regex"));
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").expect("valid code regex"));
static BLOCKQUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<blockquote\b[^>]*>(.*?)</blockquote>").expect("valid blockquote regex")
});
// Innermost span only: the content may hold any tag except `<span` / `</span`.
static SPAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<span\b([^>]*)>([^<]*(?:<(?:[^s/]|/[^s]|/s[^p]|s[^p])[^<]*)*)</span>")
        .expect("valid span regex")
});
static SUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<sup\b[^>]*>(.*?)</sup>").expect("valid sup regex"));
static SUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<sub\b[^>]*>(.*?)</sub>").expect("valid sub regex"));
static BOLD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:strong|b)\b[^>]*>(.*?)</(?:strong|b)>").expect("valid bold regex")
});
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:em|i)\b[^>]*>(.*?)</(?:em|i)>").expect("valid italic regex")
});
static UNDERLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<u\b[^>]*>(.*?)</u>").expect("valid underline regex"));
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(?:s|strike|del)\b[^>]*>(.*?)</(?:s|strike|del)>")
        .expect("valid strike regex")
});
static OL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ol\b[^>]*>(.*?)</ol>").expect("valid ol regex"));
static UL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<ul\b[^>]*>(.*?)</ul>").expect("valid ul regex"));
static LI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<li\b[^>]*>(.*?)</li>").expect("valid li regex"));
static P_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").expect("valid paragraph regex"));
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<h([1-6])\b[^>]*>(.*?)</h[1-6]>").expect("valid heading regex")
});
static DIV_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</?div\b[^>]*>").expect("valid div regex"));
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\b[^>]*>").expect("valid br regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

/// Heading sizes in half-points, `<h1>` first
const HEADING_SIZES: [u32; 6] = [32, 28, 26, 24, 22, 20];

/// RTF list override numbers of the two fixed list templates
const BULLET_LIST: u32 = 1;
const NUMBERED_LIST: u32 = 2;

/// Converts editor HTML into a complete RTF document
pub struct HtmlToRtf;

impl HtmlToRtf {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlToRtf {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter for HtmlToRtf {
    fn source(&self) -> TextFormat {
        TextFormat::Html
    }

    fn target(&self) -> TextFormat {
        TextFormat::Rtf
    }

    fn convert(&self, input: &str, config: &ConvertConfig) -> Result<String> {
        if input.trim().is_empty() {
            return Ok(String::new());
        }

        let defaults = DefaultStyle::extract(input, config)?;
        let body = decode_entities(input);
        let tables = RtfTables::build(&body, &defaults.font, &config.code_font)?;
        tracing::debug!(
            fonts = tables.fonts.len(),
            colors = tables.colors.len(),
            "built rtf tables"
        );

        let mut output = String::with_capacity(input.len() * 2 + 1024);
        write_header(&mut output, &tables, &defaults, config);

        let body = escape_rtf(&body);
        let body = rewrite_tags(&body, &tables)?;
        output.push_str(&escape_unicode(&body));
        output.push('}');

        Ok(output)
    }
}

/// Document-wide font and size taken from the outermost styled container
#[derive(Debug, Clone, PartialEq, Eq)]
struct DefaultStyle {
    font: String,
    size_pt: u32,
}

impl DefaultStyle {
    fn extract(html: &str, config: &ConvertConfig) -> Result<Self> {
        let mut style = Self {
            font: config.default_font.clone(),
            size_pt: config.default_font_size,
        };

        let outer = OUTER_STYLE_RE
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str())
            .find(|s| {
                let lower = s.to_ascii_lowercase();
                lower.contains("font-family") || lower.contains("font-size")
            });

        if let Some(outer) = outer {
            let outer = decode_entities(outer);
            if let Some(font) = font_family(&outer) {
                style.font = font;
            }
            if let Some(size) = font_size_pt(&outer)? {
                style.size_pt = size;
            }
        }

        Ok(style)
    }
}

/// The positional lookup tables written into the RTF header
#[derive(Debug, Clone)]
struct RtfTables {
    fonts: FontTable,
    colors: ColorTable,
    code_font: usize,
}

impl RtfTables {
    fn build(html: &str, default_font: &str, code_font: &str) -> Result<Self> {
        let mut fonts = FontTable::new(default_font);
        for caps in FONT_FAMILY_RE.captures_iter(html) {
            if let Some(name) = clean_font_name(&caps[1]) {
                fonts.insert(&name);
            }
        }
        let code_font = fonts.insert(code_font);

        let mut colors = ColorTable::new();
        for caps in ANY_COLOR_RE.captures_iter(html) {
            if let Some(color) = parse_color(&caps)? {
                colors.insert(color);
            }
        }

        Ok(Self {
            fonts,
            colors,
            code_font,
        })
    }
}

fn write_header(output: &mut String, tables: &RtfTables, defaults: &DefaultStyle, config: &ConvertConfig) {
    output.push_str("{\\rtf1\\ansi\\ansicpg1252\\deff0\\nouicompat\\deflang1033\n");

    output.push_str("{\\fonttbl");
    for (i, name) in tables.fonts.iter().enumerate() {
        output.push_str(&format!(
            "{{\\f{}\\fnil\\fcharset0 {};}}",
            i,
            escape_unicode(&escape_rtf(name))
        ));
    }
    output.push_str("}\n");

    output.push_str("{\\colortbl ");
    for color in tables.colors.iter() {
        output.push_str(&format!("\\red{}\\green{}\\blue{};", color.r, color.g, color.b));
    }
    output.push_str("}\n");

    output.push_str("{\\*\\listtable\n");
    output.push_str(&format!(
        "{{\\list\\listtemplateid{id}\\listhybrid{{\\listlevel\\levelnfc23\\levelnfcn23\\leveljc0\\leveljcn0\\levelfollow0\\levelstartat1\\levelspace0\\levelindent0{{\\leveltext\\leveltemplateid{id}\\'01\\u8226 ?;}}{{\\levelnumbers;}}\\fi-360\\li720\\lin720 }}{{\\listname ;}}\\listid{id}}}\n",
        id = BULLET_LIST
    ));
    output.push_str(&format!(
        "{{\\list\\listtemplateid{id}\\listhybrid{{\\listlevel\\levelnfc0\\levelnfcn0\\leveljc0\\leveljcn0\\levelfollow0\\levelstartat1\\levelspace0\\levelindent0{{\\leveltext\\leveltemplateid{id}\\'02\\'00.;}}{{\\levelnumbers\\'01;}}\\fi-360\\li720\\lin720 }}{{\\listname ;}}\\listid{id}}}}}\n",
        id = NUMBERED_LIST
    ));
    output.push_str("{\\*\\listoverridetable");
    for id in [BULLET_LIST, NUMBERED_LIST] {
        output.push_str(&format!(
            "{{\\listoverride\\listid{id}\\listoverridecount0\\ls{id}}}"
        ));
    }
    output.push_str("}\n");

    output.push_str(&format!(
        "{{\\*\\generator {};}}\n",
        escape_unicode(&escape_rtf(&config.generator))
    ));
    output.push_str(&format!(
        "\\viewkind4\\uc1\\pard\\f0\\fs{} ",
        defaults.size_pt.saturating_mul(2)
    ));
}

/// Escape the three RTF special characters. Backslash goes first so the
/// backslashes added for braces are not escaped again.
fn escape_rtf(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('{', "\\{")
        .replace('}', "\\}")
}

/// Write every non-ASCII character as `\uN?` (signed UTF-16 units)
fn escape_unicode(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        if c.is_ascii() {
            output.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                output.push_str(&format!("\\u{}?", *unit as i16));
            }
        }
    }
    output
}

fn rewrite_tags(body: &str, tables: &RtfTables) -> Result<String> {
    let mono = tables.code_font;

    let body = PRE_RE.replace_all(body, |caps: &Captures| {
        let lines: Vec<&str> = caps[1].lines().collect();
        format!("{{\\pard\\f{} {}\\par}}\n", mono, lines.join("\\par\n"))
    });
    let body = CODE_RE.replace_all(&body, |caps: &Captures| format!("{{\\f{} {}}}", mono, &caps[1]));
    let body = BLOCKQUOTE_RE.replace_all(&body, "{\\pard\\li720\\ri720 $1\\par}\n");

    let mut body = body.into_owned();
    while SPAN_RE.is_match(&body) {
        body = try_replace_all(&SPAN_RE, &body, |caps| span_group(&caps[1], &caps[2], tables))?;
    }

    let body = SUP_RE.replace_all(&body, "{\\super $1}");
    let body = SUB_RE.replace_all(&body, "{\\sub $1}");
    let body = BOLD_RE.replace_all(&body, "{\\b $1}");
    let body = ITALIC_RE.replace_all(&body, "{\\i $1}");
    let body = UNDERLINE_RE.replace_all(&body, "{\\ul $1}");
    let body = STRIKE_RE.replace_all(&body, "{\\strike $1}");
    let body = OL_RE.replace_all(&body, |caps: &Captures| list_paragraphs(&caps[1], NUMBERED_LIST));
    let body = UL_RE.replace_all(&body, |caps: &Captures| list_paragraphs(&caps[1], BULLET_LIST));
    let body = P_RE.replace_all(&body, "\\pard $1\\par\n");
    let body = HEADING_RE.replace_all(&body, |caps: &Captures| {
        let level: usize = caps[1].parse().unwrap_or(1);
        let size = HEADING_SIZES[level.clamp(1, 6) - 1];
        format!("\\pard{{\\b\\fs{} {}}}\\par\n", size, &caps[2])
    });
    let body = DIV_RE.replace_all(&body, "");
    let body = BR_RE.replace_all(&body, "\\line ");
    let body = TAG_RE.replace_all(&body, "");

    Ok(body.into_owned())
}

/// `Regex::replace_all` for fallible replacements
fn try_replace_all<F>(re: &Regex, text: &str, mut rewrite: F) -> Result<String>
where
    F: FnMut(&Captures<'_>) -> Result<String>,
{
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        output.push_str(&text[last..whole.start()]);
        output.push_str(&rewrite(&caps)?);
        last = whole.end();
    }
    output.push_str(&text[last..]);
    Ok(output)
}

/// One RTF group for a `<span>`, carrying only the properties its style sets.
/// Fonts and colours missing from the tables are left out.
fn span_group(attrs: &str, content: &str, tables: &RtfTables) -> Result<String> {
    let Some(style) = STYLE_ATTR_RE
        .captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Ok(content.to_string());
    };

    let mut controls = String::new();

    if let Some(index) = font_family(style).and_then(|name| tables.fonts.index_of(&name)) {
        controls.push_str(&format!("\\f{}", index));
    }
    if let Some(size) = font_size_pt(style)? {
        controls.push_str(&format!("\\fs{}", size.saturating_mul(2)));
    }
    if let Some(caps) = FG_COLOR_RE.captures(style) {
        if let Some(index) = parse_color(&caps)?.and_then(|c| tables.colors.index_of(c)) {
            controls.push_str(&format!("\\cf{}", index));
        }
    }
    if let Some(caps) = BG_COLOR_RE.captures(style) {
        if let Some(index) = parse_color(&caps)?.and_then(|c| tables.colors.index_of(c)) {
            controls.push_str(&format!("\\highlight{}", index));
        }
    }
    if UNDERLINE_STYLE_RE.is_match(style) {
        controls.push_str("\\ul");
    }
    if let Some(caps) = INDENT_RE.captures(style) {
        let px = parse_number(&caps[1])?;
        controls.push_str(&format!("\\li{}", px.saturating_mul(15)));
    }

    if controls.is_empty() {
        Ok(format!("{{{}}}", content))
    } else {
        Ok(format!("{{{} {}}}", controls, content))
    }
}

/// Paragraphs for the `<li>` items of one list. Numbering restarts per list.
fn list_paragraphs(content: &str, list: u32) -> String {
    let mut output = String::new();
    for (i, item) in LI_RE.captures_iter(content).enumerate() {
        let marker = if list == NUMBERED_LIST {
            format!("{}.", i + 1)
        } else {
            "\\'95".to_string()
        };
        output.push_str(&format!(
            "\\pard\\ls{}\\ilvl0\\fi-360\\li720{{\\listtext {}\\tab}}{}\\par\n",
            list,
            marker,
            item[1].trim()
        ));
    }
    output.push_str("\\pard ");
    output
}

/// First family of a `font-family` declaration, unquoted
fn font_family(style: &str) -> Option<String> {
    FONT_FAMILY_RE
        .captures(style)
        .and_then(|caps| clean_font_name(&caps[1]))
}

fn clean_font_name(raw: &str) -> Option<String> {
    let raw = raw.replace("&quot;", "\"");
    let raw = raw.trim_start();
    let name = match raw.chars().next() {
        Some(quote @ ('"' | '\'')) => raw[1..].split(quote).next().unwrap_or_default(),
        _ => raw
            .split(|c: char| c == ',' || c == '"')
            .next()
            .unwrap_or_default(),
    };
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn font_size_pt(style: &str) -> Result<Option<u32>> {
    match FONT_SIZE_RE.captures(style) {
        Some(caps) => Ok(Some(parse_number(&caps[1])?)),
        None => Ok(None),
    }
}

fn parse_number(digits: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|e| ConversionError::invalid_number(digits, e))
}

/// Colour from a match of a [`COLOR_VALUE`]-based pattern
fn parse_color(caps: &Captures<'_>) -> Result<Option<Rgb>> {
    if let (Some(r), Some(g), Some(b)) = (caps.get(1), caps.get(2), caps.get(3)) {
        let channel = |m: regex::Match<'_>| -> Result<u8> {
            Ok(parse_number(m.as_str())?.min(255) as u8)
        };
        return Ok(Some(Rgb::new(channel(r)?, channel(g)?, channel(b)?)));
    }
    Ok(caps.get(4).and_then(|hex| Rgb::from_hex(hex.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn convert(html: &str) -> String {
        HtmlToRtf::new().convert(html, &ConvertConfig::default()).unwrap()
    }

    fn body_of(rtf: &str) -> &str {
        let start = rtf.find("\\viewkind4").unwrap();
        &rtf[start..]
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("  \n\t"), "");
    }

    #[test]
    fn test_italic() {
        let rtf = convert("<i>hi</i>");
        assert!(rtf.starts_with("{\\rtf1\\ansi"));
        assert!(rtf.ends_with('}'));
        assert!(rtf.contains("{\\i hi}"));
    }

    #[test]
    fn test_bold_underline_strike() {
        let rtf = convert("<strong>a</strong><b>b</b><u>c</u><del>d</del>");
        assert!(rtf.contains("{\\b a}{\\b b}{\\ul c}{\\strike d}"));
    }

    #[test]
    fn test_decode_before_escape() {
        let rtf = convert("A &amp; B");
        assert!(rtf.contains("A & B"));
        assert!(!rtf.contains("&amp;"));

        let rtf = convert("x &#123; y");
        assert!(body_of(&rtf).contains("x \\{ y"));
    }

    #[test]
    fn test_escape_order() {
        let rtf = convert("path\\to {x}");
        assert!(body_of(&rtf).contains("path\\\\to \\{x\\}"));
    }

    #[test]
    fn test_default_style_from_outer_div() {
        let rtf = convert(
            "<div style=\"font-family: 'Segoe UI', sans-serif; font-size: 10pt\"><p>x</p></div>",
        );
        assert!(rtf.contains("{\\f0\\fnil\\fcharset0 Segoe UI;}"));
        assert!(rtf.contains("\\pard\\f0\\fs20 "));
    }

    #[test]
    fn test_default_style_fallback() {
        let rtf = convert("<p>x</p>");
        assert!(rtf.contains("{\\fonttbl{\\f0\\fnil\\fcharset0 Calibri;}{\\f1\\fnil\\fcharset0 Courier New;}}"));
        assert!(rtf.contains("\\fs24 "));
    }

    #[test]
    fn test_font_table_dedup() {
        let html = "<span style=\"font-family: Arial\">a</span>\
                    <span style=\"font-family: arial\">b</span>\
                    <span style=\"font-family: &quot;Times New Roman&quot;, serif\">c</span>";
        let rtf = convert(html);
        assert!(rtf.contains(
            "{\\fonttbl{\\f0\\fnil\\fcharset0 Calibri;}{\\f1\\fnil\\fcharset0 Arial;}\
             {\\f2\\fnil\\fcharset0 Times New Roman;}{\\f3\\fnil\\fcharset0 Courier New;}}"
        ));
        assert!(rtf.contains("{\\f1 a}{\\f1 b}{\\f2 c}"));
    }

    #[test]
    fn test_color_table_dedup() {
        let html = "<span style=\"color: rgb(255,0,0)\">a</span>\
                    <span style=\"color: rgb(255, 0, 0)\">b</span>\
                    <span style=\"color: #FF0000\">c</span>";
        let rtf = convert(html);
        assert!(rtf.contains("{\\colortbl \\red0\\green0\\blue0;\\red255\\green0\\blue0;}"));
        assert!(rtf.contains("{\\cf1 a}{\\cf1 b}{\\cf1 c}"));
    }

    #[test]
    fn test_span_properties_in_order() {
        let html = "<span style=\"text-decoration: underline; background-color: #ffff00; \
                    color: rgb(0,0,255); font-size: 14pt; margin-left: 20px\">x</span>";
        let rtf = convert(html);
        assert!(rtf.contains("{\\fs28\\cf2\\highlight1\\ul\\li300 x}"));
    }

    #[test]
    fn test_background_not_taken_as_foreground() {
        let rtf = convert("<span style=\"background-color: #00ff00\">x</span>");
        assert!(rtf.contains("{\\highlight1 x}"));
        assert!(!rtf.contains("\\cf"));
    }

    #[test]
    fn test_nested_spans() {
        let html = "<span style=\"color: #ff0000\">a <span style=\"font-size: 8pt\">b</span> c</span>";
        let rtf = convert(html);
        assert!(rtf.contains("{\\cf1 a {\\fs16 b} c}"));
    }

    #[test]
    fn test_plain_span_unwrapped() {
        let rtf = convert("<span class=\"x\">a</span>");
        assert!(body_of(&rtf).contains(" a}"));
        assert!(!rtf.contains("span"));
    }

    #[test]
    fn test_ordered_lists_restart() {
        let rtf = convert("<ol><li>A</li><li>B</li></ol><ol><li>C</li></ol>");
        assert!(rtf.contains("\\ls2\\ilvl0\\fi-360\\li720{\\listtext 1.\\tab}A\\par"));
        assert!(rtf.contains("{\\listtext 2.\\tab}B\\par"));
        assert!(rtf.contains("{\\listtext 1.\\tab}C\\par"));
    }

    #[test]
    fn test_bullet_list() {
        let rtf = convert("<ul><li>A</li></ul>");
        assert!(rtf.contains("\\pard\\ls1\\ilvl0\\fi-360\\li720{\\listtext \\'95\\tab}A\\par"));
    }

    #[test]
    fn test_code_block_uses_monospace() {
        let rtf = convert("<pre>let x;\nlet y;</pre>");
        assert!(rtf.contains("{\\pard\\f1 let x;\\par\nlet y;\\par}"));

        let rtf = convert("<p>use <code>x</code></p>");
        assert!(rtf.contains("\\pard use {\\f1 x}\\par"));
    }

    #[test]
    fn test_blockquote_sup_sub_br() {
        let rtf = convert("<blockquote>q</blockquote>H<sub>2</sub>O x<sup>2</sup><br>end");
        assert!(rtf.contains("{\\pard\\li720\\ri720 q\\par}"));
        assert!(rtf.contains("H{\\sub 2}O x{\\super 2}\\line end"));
    }

    #[test]
    fn test_div_unwrapped_and_unknown_tags_stripped() {
        let rtf = convert("<div><article>kept</article><img src=x></div>");
        let body = body_of(&rtf);
        assert!(body.contains("kept"));
        assert!(!body.contains('<'));
    }

    #[test]
    fn test_heading() {
        let rtf = convert("<h2>Title</h2>");
        assert!(rtf.contains("\\pard{\\b\\fs28 Title}\\par"));
    }

    #[test]
    fn test_unicode_escaped() {
        let rtf = convert("<p>&copy; caf\u{e9} \u{1F600}</p>");
        assert!(rtf.contains("\\u169? caf\\u233? \\u-10179?\\u-8704?"));
        assert!(rtf.is_ascii());
    }

    #[test]
    fn test_lists_declared_in_header() {
        let rtf = convert("x");
        assert!(rtf.contains("\\listid1}"));
        assert!(rtf.contains("\\listid2}"));
        assert!(rtf.contains("{\\listoverride\\listid1\\listoverridecount0\\ls1}"));
        assert!(rtf.contains("{\\*\\generator richdesc "));
    }

    #[test]
    fn test_oversized_number_is_an_error() {
        let err = HtmlToRtf::new()
            .convert(
                "<span style=\"color: rgb(99999999999,0,0)\">x</span>",
                &ConvertConfig::default(),
            )
            .unwrap_err();
        assert_eq!(err.kind(), "InvalidNumber");
    }

    #[test]
    fn test_non_ascii_header_names_escaped() {
        let config = ConvertConfig {
            generator: "richdesc \u{e9}dition".to_string(),
            ..ConvertConfig::default()
        };
        let rtf = HtmlToRtf::new()
            .convert("<span style=\"font-family: Caf\u{e9} Sans\">x</span>", &config)
            .unwrap();
        assert!(rtf.contains("{\\f1\\fnil\\fcharset0 Caf\\u233? Sans;}"));
        assert!(rtf.contains("{\\*\\generator richdesc \\u233?dition;}"));
        assert!(body_of(&rtf).contains("{\\f1 x}"));
        assert!(rtf.is_ascii());
    }

    #[test]
    fn test_entities_in_font_names() {
        let rtf = convert("<span style=\"font-family: Ben &amp; Jerry\">x</span>");
        assert!(rtf.contains("{\\f1\\fnil\\fcharset0 Ben & Jerry;}"));
        assert!(body_of(&rtf).contains("{\\f1 x}"));

        let rtf = convert("<div style=\"font-family: Ben &amp; Jerry\"><p>x</p></div>");
        assert!(rtf.contains("{\\fonttbl{\\f0\\fnil\\fcharset0 Ben & Jerry;}{\\f1\\fnil\\fcharset0 Courier New;}}"));
    }

    #[test]
    fn test_missing_table_entries_left_out() {
        let tables = RtfTables {
            fonts: FontTable::new("Calibri"),
            colors: ColorTable::new(),
            code_font: 1,
        };
        let group = span_group(
            " style=\"font-family: Arial; color: #ff0000; background-color: #00ff00; font-size: 10pt\"",
            "x",
            &tables,
        )
        .unwrap();
        assert_eq!(group, "{\\fs20 x}");

        let group = span_group(" style=\"font-family: Arial; color: #ff0000\"", "y", &tables).unwrap();
        assert_eq!(group, "{y}");
    }

    #[test]
    fn test_only_style_attribute_read() {
        let rtf = convert("<span data-style=\"color: #ff0000\">x</span>");
        let body = body_of(&rtf);
        assert!(body.contains(" x}"));
        assert!(!body.contains("\\cf"));

        let rtf = convert("<span class=\"a\" style=\"color: #ff0000\">y</span>");
        assert!(body_of(&rtf).contains("{\\cf1 y}"));
    }

    #[test]
    fn test_rgb_components_clamped() {
        let rtf = convert("<span style=\"color: rgb(300, 0, 0)\">x</span>");
        assert!(rtf.contains("\\red255\\green0\\blue0;"));
    }
}
