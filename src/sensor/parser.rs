//! Tokenizes an SDI-12 data response body into numeric fields.
//!
//! Fields are delimited by `+`; a negative value keeps its `-` as part of
//! the token (`+23.5+-12.0` is two fields). A token that fails numeric
//! conversion yields `f32::NAN` for that slot and never aborts extraction
//! of the remaining fields, so downstream consumers can distinguish "the
//! sensor reported zero" from "this field was unreadable".

use core::str;

/// Fills `values` from `body`, one slot per expected field.
///
/// `body` is the response with the address echo already stripped; a
/// trailing `\r`, `\n` or `\r\n` on the final token is removed before
/// conversion. Extraction stops when `values` is full or the input is
/// exhausted; slots the input never reached stay at the NAN sentinel.
///
/// Pure and infallible: the only failure signal is `f32::NAN`.
pub fn parse_values(body: &[u8], values: &mut [f32]) {
    values.fill(f32::NAN);

    let mut tokens = body.split(|&b| b == b'+');
    if body.first() == Some(&b'+') {
        // leading separator, not an empty first field
        tokens.next();
    }

    for (slot, token) in values.iter_mut().zip(tokens) {
        *slot = parse_token(token);
    }
}

fn parse_token(token: &[u8]) -> f32 {
    let token = trim_line_ending(token);
    str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(f32::NAN)
}

fn trim_line_ending(token: &[u8]) -> &[u8] {
    let token = token.strip_suffix(b"\n").unwrap_or(token);
    token.strip_suffix(b"\r").unwrap_or(token)
}
