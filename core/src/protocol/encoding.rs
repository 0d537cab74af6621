//! Path encoding for device query strings.
//!
//! The device decodes query values with plain percent-decoding and takes a
//! `+` literally, so form-style encoding (space as `+`) would corrupt any
//! name containing a space. Every byte outside the unreserved set below is
//! percent-encoded, which yields `%20` for a space and `%2B` for a literal
//! plus sign.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left as-is: ASCII alphanumerics plus `.`, `-`, `*`, `_`.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

/// Percent-encode `s` for use as a device query value.
///
/// The output never contains `+`: whitespace is always `%20`, and a `+` in
/// the input becomes `%2B`. Slashes are encoded as `%2F`.
pub fn encode_path_segment(s: &str) -> String {
    utf8_percent_encode(s, UNRESERVED).to_string()
}
