// SPDX-License-Identifier: AGPL-3.0-or-later
//! C FFI exports
//!
//! Each conversion takes a nullable NUL-terminated UTF-8 string and returns
//! a newly allocated string that must be released with
//! [`richdesc_free_string`]. The lenient contract applies: a null pointer
//! counts as blank input, and failures come back as descriptor strings.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::convert::{html_to_plain_text, html_to_rtf, rtf_to_html};

/// Borrow the input, or describe why it cannot be read
unsafe fn input<'a>(ptr: *const c_char) -> Result<Option<&'a str>, String> {
    if ptr.is_null() {
        return Ok(None);
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map(Some)
        .map_err(|e| format!("Utf8Error: {}", e))
}

fn into_raw(output: String) -> *mut c_char {
    // NUL cannot cross the boundary; `&#0;` in HTML is the only way to get one
    let output = if output.contains('\0') {
        output.replace('\0', "")
    } else {
        output
    };
    CString::new(output).unwrap_or_default().into_raw()
}

unsafe fn convert_with(ptr: *const c_char, convert: fn(Option<&str>) -> String) -> *mut c_char {
    match input(ptr) {
        Ok(text) => into_raw(convert(text)),
        Err(descriptor) => into_raw(descriptor),
    }
}

/// Convert editor HTML to an RTF document
///
/// # Safety
/// - `html` must be null or a valid null-terminated string
/// - The result must be freed with `richdesc_free_string`
#[no_mangle]
pub unsafe extern "C" fn richdesc_html_to_rtf(html: *const c_char) -> *mut c_char {
    convert_with(html, html_to_rtf)
}

/// Convert editor HTML to plain text
///
/// # Safety
/// - `html` must be null or a valid null-terminated string
/// - The result must be freed with `richdesc_free_string`
#[no_mangle]
pub unsafe extern "C" fn richdesc_html_to_plain_text(html: *const c_char) -> *mut c_char {
    convert_with(html, html_to_plain_text)
}

/// Convert RTF to an HTML body fragment
///
/// # Safety
/// - `rtf` must be null or a valid null-terminated string
/// - The result must be freed with `richdesc_free_string`
#[no_mangle]
pub unsafe extern "C" fn richdesc_rtf_to_html(rtf: *const c_char) -> *mut c_char {
    convert_with(rtf, rtf_to_html)
}

/// Free a string allocated by the library
///
/// # Safety
/// - `s` must be a valid string from this library or null
#[no_mangle]
pub unsafe extern "C" fn richdesc_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Get library version
///
/// Returns a static string, do not free
#[no_mangle]
pub extern "C" fn richdesc_version() -> *const c_char {
    static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");
    VERSION.as_ptr() as *const c_char
}
