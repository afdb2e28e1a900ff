// SPDX-License-Identifier: AGPL-3.0-or-later
#![no_main]

use libfuzzer_sys::fuzz_target;
use richdesc_core::{html_to_plain_text, html_to_rtf, rtf_to_html};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let rtf = html_to_rtf(Some(input));
    let _ = html_to_plain_text(Some(input));
    let _ = rtf_to_html(Some(input));

    // Whatever the HTML side writes must be readable again
    let html = rtf_to_html(Some(&rtf));
    assert!(!html.starts_with("ParseError:") || rtf.starts_with("InvalidNumber:"));
});
