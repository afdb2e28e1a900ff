// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML character reference decoding

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid entity regex")
});

/// Named references understood by the decoder
fn named(name: &str) -> Option<char> {
    let c = match name {
        "nbsp" => '\u{00A0}',
        "lt" => '<',
        "gt" => '>',
        "amp" => '&',
        "quot" => '"',
        "apos" => '\'',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '—',
        "ndash" => '–',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "bull" => '•',
        "middot" => '·',
        "laquo" => '«',
        "raquo" => '»',
        "euro" => '€',
        "pound" => '£',
        "yen" => '¥',
        "cent" => '¢',
        "sect" => '§',
        "para" => '¶',
        "deg" => '°',
        "plusmn" => '±',
        "times" => '×',
        "divide" => '÷',
        _ => return None,
    };
    Some(c)
}

fn numeric(reference: &str) -> Option<char> {
    let code = match reference.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => reference.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

/// Replace named and numeric character references with the characters they
/// stand for.
///
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;` rather than `<`.
/// References that are unknown or name an invalid code point are kept as
/// written.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    ENTITY_RE.replace_all(input, |caps: &Captures| {
        let reference = &caps[1];
        let decoded = match reference.strip_prefix('#') {
            Some(number) => numeric(number),
            None => named(reference),
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_named_entities() {
        assert_eq!(decode_entities("A &amp; B"), "A & B");
        assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
        assert_eq!(decode_entities("&quot;x&apos;"), "\"x'");
        assert_eq!(decode_entities("&copy; 2024 &euro;5"), "© 2024 €5");
        assert_eq!(decode_entities("a&nbsp;b"), "a\u{00A0}b");
    }

    #[test]
    fn test_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_entities("&#8226;"), "•");
    }

    #[test]
    fn test_unknown_and_invalid_kept() {
        assert_eq!(decode_entities("&bogus; &#xD800; &#99999999999;"), "&bogus; &#xD800; &#99999999999;");
        assert_eq!(decode_entities("AT&T"), "AT&T");
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    proptest! {
        #[test]
        fn prop_no_entities_unchanged(s in "[^&]*") {
            let decoded = decode_entities(&s);
            prop_assert!(matches!(decoded, Cow::Borrowed(_)));
            prop_assert_eq!(decoded.as_ref(), s.as_str());
        }

        #[test]
        fn prop_decoding_never_lengthens(s in ".*") {
            prop_assert!(decode_entities(&s).chars().count() <= s.chars().count());
        }
    }
}
